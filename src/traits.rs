//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::reconciliation::FlagChanges;
use crate::types::*;
use crate::utils::validation::{validate_positive, validate_scale};

/// Storage abstraction for the sales ledger
///
/// This trait allows the ledger to work with any storage backend (SQLite,
/// PostgreSQL, in-memory, etc.). Methods take `&self` so that one backend can
/// be shared between clones of the ledger; implementations provide their own
/// interior synchronisation.
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Store a new sale and return it with its assigned id
    async fn insert_sale(
        &self,
        date: NaiveDate,
        weight: BigDecimal,
        unit_price: BigDecimal,
    ) -> LedgerResult<Sale>;

    /// Store a new receipt and return it with its assigned id
    async fn insert_receipt(&self, date: NaiveDate, amount: BigDecimal) -> LedgerResult<Receipt>;

    /// Get a sale by ID
    async fn get_sale(&self, sale_id: RecordId) -> LedgerResult<Option<Sale>>;

    /// Get a receipt by ID
    async fn get_receipt(&self, receipt_id: RecordId) -> LedgerResult<Option<Receipt>>;

    /// List all sales in id order
    async fn list_sales(&self) -> LedgerResult<Vec<Sale>>;

    /// List all receipts in id order
    async fn list_receipts(&self) -> LedgerResult<Vec<Receipt>>;

    /// Delete a sale
    async fn delete_sale(&self, sale_id: RecordId) -> LedgerResult<()>;

    /// Delete a receipt
    async fn delete_receipt(&self, receipt_id: RecordId) -> LedgerResult<()>;

    /// Read both ledgers at a single point in time
    async fn snapshot(&self) -> LedgerResult<LedgerSnapshot>;

    /// Write reconciled flags.
    ///
    /// Must be atomic: if any change cannot be written (for example because the
    /// row has been deleted) no change is written.
    async fn apply_flag_changes(&self, changes: &FlagChanges) -> LedgerResult<()>;
}

/// Trait for implementing custom validation of new records
pub trait RecordValidator: Send + Sync {
    /// Validate the fields of a sale before it is stored
    fn validate_sale(
        &self,
        date: NaiveDate,
        weight: &BigDecimal,
        unit_price: &BigDecimal,
    ) -> LedgerResult<()>;

    /// Validate the fields of a receipt before it is stored
    fn validate_receipt(&self, date: NaiveDate, amount: &BigDecimal) -> LedgerResult<()>;
}

/// Default validator: values must be positive and fit the stored scales
pub struct DefaultRecordValidator;

impl RecordValidator for DefaultRecordValidator {
    fn validate_sale(
        &self,
        _date: NaiveDate,
        weight: &BigDecimal,
        unit_price: &BigDecimal,
    ) -> LedgerResult<()> {
        validate_positive("Weight", weight)?;
        validate_scale("Weight", weight, QUANTITY_SCALE)?;
        validate_positive("Price", unit_price)?;
        validate_scale("Price", unit_price, CURRENCY_SCALE)
    }

    fn validate_receipt(&self, _date: NaiveDate, amount: &BigDecimal) -> LedgerResult<()> {
        validate_positive("Amount", amount)?;
        validate_scale("Amount", amount, CURRENCY_SCALE)
    }
}
