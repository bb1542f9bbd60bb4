//! Sale record management

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::traits::*;
use crate::types::*;

/// Sale manager for recording and removing sales
pub struct SaleManager<S: LedgerStorage> {
    storage: S,
    validator: Arc<dyn RecordValidator>,
}

impl<S: LedgerStorage + Clone> Clone for SaleManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S: LedgerStorage> SaleManager<S> {
    /// Create a new sale manager
    pub fn new(storage: S) -> Self {
        Self::with_validator(storage, Arc::new(DefaultRecordValidator))
    }

    /// Create a new sale manager with custom validator
    pub fn with_validator(storage: S, validator: Arc<dyn RecordValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record a new sale. It starts open until the next reconciliation.
    pub async fn record_sale(
        &self,
        date: NaiveDate,
        weight: BigDecimal,
        unit_price: BigDecimal,
    ) -> LedgerResult<Sale> {
        self.validator.validate_sale(date, &weight, &unit_price)?;
        self.storage.insert_sale(date, weight, unit_price).await
    }

    pub async fn get_sale(&self, sale_id: RecordId) -> LedgerResult<Option<Sale>> {
        self.storage.get_sale(sale_id).await
    }

    /// Get a sale by ID, returning an error if not found
    pub async fn get_sale_required(&self, sale_id: RecordId) -> LedgerResult<Sale> {
        self.storage
            .get_sale(sale_id)
            .await?
            .ok_or(LedgerError::SaleNotFound(sale_id))
    }

    pub async fn list_sales(&self) -> LedgerResult<Vec<Sale>> {
        self.storage.list_sales().await
    }

    pub async fn delete_sale(&self, sale_id: RecordId) -> LedgerResult<()> {
        self.storage.delete_sale(sale_id).await
    }
}
