//! Receipt record management

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::traits::*;
use crate::types::*;

/// Receipt manager for recording and removing money received
pub struct ReceiptManager<S: LedgerStorage> {
    storage: S,
    validator: Arc<dyn RecordValidator>,
}

impl<S: LedgerStorage + Clone> Clone for ReceiptManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<S: LedgerStorage> ReceiptManager<S> {
    pub fn new(storage: S) -> Self {
        Self::with_validator(storage, Arc::new(DefaultRecordValidator))
    }

    pub fn with_validator(storage: S, validator: Arc<dyn RecordValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record money received. It starts unsettled until the next reconciliation.
    pub async fn record_receipt(&self, date: NaiveDate, amount: BigDecimal) -> LedgerResult<Receipt> {
        self.validator.validate_receipt(date, &amount)?;
        self.storage.insert_receipt(date, amount).await
    }

    pub async fn get_receipt(&self, receipt_id: RecordId) -> LedgerResult<Option<Receipt>> {
        self.storage.get_receipt(receipt_id).await
    }

    pub async fn get_receipt_required(&self, receipt_id: RecordId) -> LedgerResult<Receipt> {
        self.storage
            .get_receipt(receipt_id)
            .await?
            .ok_or(LedgerError::ReceiptNotFound(receipt_id))
    }

    pub async fn list_receipts(&self) -> LedgerResult<Vec<Receipt>> {
        self.storage.list_receipts().await
    }

    pub async fn delete_receipt(&self, receipt_id: RecordId) -> LedgerResult<()> {
        self.storage.delete_receipt(receipt_id).await
    }
}
