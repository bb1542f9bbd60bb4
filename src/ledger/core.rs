//! Main ledger orchestrator that coordinates records, reconciliation and reporting

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::ledger::{ReceiptManager, SaleManager};
use crate::reconciliation::{Reconciliation, ReconciliationEngine};
use crate::reporting::{is_overdue, overdue_cutoff, LedgerSummary, SalesStatement};
use crate::traits::*;
use crate::types::*;
use crate::utils::ConfiguredRecordValidator;

/// Which sales to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleFilter {
    All,
    Open,
    Closed,
    /// Open sales dated strictly before `cutoff`
    OverdueOpen { cutoff: NaiveDate },
}

impl SaleFilter {
    fn matches(&self, sale: &Sale) -> bool {
        match self {
            SaleFilter::All => true,
            SaleFilter::Open => !sale.is_closed,
            SaleFilter::Closed => sale.is_closed,
            SaleFilter::OverdueOpen { cutoff } => is_overdue(sale, *cutoff),
        }
    }
}

/// Which receipts to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptFilter {
    All,
    Settled,
    Unsettled,
}

impl ReceiptFilter {
    fn matches(&self, receipt: &Receipt) -> bool {
        match self {
            ReceiptFilter::All => true,
            ReceiptFilter::Settled => receipt.is_settled,
            ReceiptFilter::Unsettled => !receipt.is_settled,
        }
    }
}

/// What a reconciliation run computed and wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationOutcome {
    pub reconciliation: Reconciliation,
    /// Number of flags that differed from storage and were rewritten
    pub changes_written: usize,
    /// The ledgers as they stand after the run
    pub snapshot: LedgerSnapshot,
}

/// Main sales ledger
///
/// Every read that depends on `is_closed` or `is_settled` reconciles first.
/// Clones share storage and the writer lock, so record changes and
/// reconciliation runs never interleave.
pub struct SalesLedger<S: LedgerStorage> {
    storage: S,
    sale_manager: SaleManager<S>,
    receipt_manager: ReceiptManager<S>,
    engine: ReconciliationEngine,
    config: LedgerConfig,
    write_lock: Arc<Mutex<()>>,
}

impl<S: LedgerStorage + Clone> Clone for SalesLedger<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            sale_manager: self.sale_manager.clone(),
            receipt_manager: self.receipt_manager.clone(),
            engine: self.engine,
            config: self.config.clone(),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S: LedgerStorage + Clone> SalesLedger<S> {
    /// Create a new ledger with the default configuration
    pub fn new(storage: S) -> Self {
        let config = LedgerConfig::default();
        let validator = Arc::new(ConfiguredRecordValidator::new(config.clone()));
        Self::build(storage, config, validator)
    }

    /// Create a new ledger with a custom configuration
    pub fn with_config(storage: S, config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        let validator = Arc::new(ConfiguredRecordValidator::new(config.clone()));
        Ok(Self::build(storage, config, validator))
    }

    /// Create a new ledger with a custom record validator
    pub fn with_validator(
        storage: S,
        config: LedgerConfig,
        validator: Arc<dyn RecordValidator>,
    ) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self::build(storage, config, validator))
    }

    fn build(storage: S, config: LedgerConfig, validator: Arc<dyn RecordValidator>) -> Self {
        Self {
            sale_manager: SaleManager::with_validator(storage.clone(), Arc::clone(&validator)),
            receipt_manager: ReceiptManager::with_validator(storage.clone(), validator),
            storage,
            engine: ReconciliationEngine::new(),
            config,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // Record operations
    /// Record a sale; `total` is computed from weight and price
    pub async fn record_sale(
        &self,
        date: NaiveDate,
        weight: BigDecimal,
        unit_price: BigDecimal,
    ) -> LedgerResult<Sale> {
        let _guard = self.write_lock.lock().await;
        self.sale_manager.record_sale(date, weight, unit_price).await
    }

    /// Record money received
    pub async fn record_receipt(&self, date: NaiveDate, amount: BigDecimal) -> LedgerResult<Receipt> {
        let _guard = self.write_lock.lock().await;
        self.receipt_manager.record_receipt(date, amount).await
    }

    pub async fn delete_sale(&self, sale_id: RecordId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        self.sale_manager.delete_sale(sale_id).await
    }

    pub async fn delete_receipt(&self, receipt_id: RecordId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        self.receipt_manager.delete_receipt(receipt_id).await
    }

    /// Get a sale by ID. The flag is as last stored.
    pub async fn get_sale(&self, sale_id: RecordId) -> LedgerResult<Option<Sale>> {
        self.sale_manager.get_sale(sale_id).await
    }

    /// Get a receipt by ID. The flag is as last stored.
    pub async fn get_receipt(&self, receipt_id: RecordId) -> LedgerResult<Option<Receipt>> {
        self.receipt_manager.get_receipt(receipt_id).await
    }

    // Reconciliation
    /// Recompute every flag from the full history and store the ones that changed.
    ///
    /// The changed flags are written in one atomic batch. Any storage failure
    /// is reported as [`LedgerError::ReconciliationFailed`] and leaves the
    /// stored flags as they were.
    pub async fn reconcile(&self) -> LedgerResult<ReconciliationOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut snapshot = self.storage.snapshot().await.map_err(|e| {
            warn!(error = %e, "Could not read ledgers for reconciliation");
            LedgerError::ReconciliationFailed(e.to_string())
        })?;

        let reconciliation = self.engine.reconcile(&snapshot.sales, &snapshot.receipts);
        let changes = reconciliation.changes(&snapshot.sales, &snapshot.receipts);

        if !changes.is_empty() {
            self.storage
                .apply_flag_changes(&changes)
                .await
                .map_err(|e| {
                    warn!(error = %e, changes = changes.len(), "Could not store reconciled flags");
                    LedgerError::ReconciliationFailed(e.to_string())
                })?;
        }
        reconciliation.apply(&mut snapshot.sales, &mut snapshot.receipts);

        info!(
            sales = snapshot.sales.len(),
            closed = reconciliation.closed_count(),
            receipts = snapshot.receipts.len(),
            settled = reconciliation.settled_count(),
            closed_value = %reconciliation.closed_value,
            changes = changes.len(),
            "Ledger reconciled"
        );

        Ok(ReconciliationOutcome {
            changes_written: changes.len(),
            reconciliation,
            snapshot,
        })
    }

    // Listings
    /// Reconciled sales matching `filter`, newest first
    pub async fn sales(&self, filter: SaleFilter) -> LedgerResult<Vec<Sale>> {
        let outcome = self.reconcile().await?;
        let mut sales: Vec<Sale> = outcome
            .snapshot
            .sales
            .into_iter()
            .filter(|sale| filter.matches(sale))
            .collect();
        sales.sort_by_key(|sale| Reverse((sale.date, sale.id)));
        Ok(sales)
    }

    /// Reconciled receipts matching `filter`, newest first
    pub async fn receipts(&self, filter: ReceiptFilter) -> LedgerResult<Vec<Receipt>> {
        let outcome = self.reconcile().await?;
        let mut receipts: Vec<Receipt> = outcome
            .snapshot
            .receipts
            .into_iter()
            .filter(|receipt| filter.matches(receipt))
            .collect();
        receipts.sort_by_key(|receipt| Reverse((receipt.date, receipt.id)));
        Ok(receipts)
    }

    /// Open sales older than `days` days as of `today`, newest first
    pub async fn overdue_sales(&self, days: u32, today: NaiveDate) -> LedgerResult<Vec<Sale>> {
        let cutoff = overdue_cutoff(today, days);
        self.sales(SaleFilter::OverdueOpen { cutoff }).await
    }

    /// Open sales older than the configured `overdue_days`
    pub async fn overdue_sales_as_of(&self, today: NaiveDate) -> LedgerResult<Vec<Sale>> {
        self.overdue_sales(self.config.overdue_days, today).await
    }

    // Reporting
    /// Dashboard figures
    pub async fn summary(&self) -> LedgerResult<LedgerSummary> {
        let outcome = self.reconcile().await?;
        Ok(LedgerSummary::from_reconciliation(&outcome.reconciliation))
    }

    /// All receipts and sales in date order with totals
    pub async fn statement(&self, as_of: NaiveDate) -> LedgerResult<SalesStatement> {
        let outcome = self.reconcile().await?;
        Ok(SalesStatement::new(as_of, outcome.snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_ledger_basic_operations() {
        let ledger = SalesLedger::new(MemoryStorage::new());

        let first = ledger
            .record_sale(day(1), BigDecimal::from(2), BigDecimal::from(30))
            .await
            .unwrap();
        let second = ledger
            .record_sale(day(2), BigDecimal::from(1), BigDecimal::from(60))
            .await
            .unwrap();
        let receipt = ledger
            .record_receipt(day(3), BigDecimal::from(100))
            .await
            .unwrap();

        let outcome = ledger.reconcile().await.unwrap();
        assert_eq!(outcome.reconciliation.is_closed(first.id), Some(true));
        assert_eq!(outcome.reconciliation.is_closed(second.id), Some(false));
        assert_eq!(outcome.reconciliation.is_settled(receipt.id), Some(false));
        assert_eq!(outcome.changes_written, 1);

        let stored = ledger.get_sale(first.id).await.unwrap().unwrap();
        assert!(stored.is_closed);

        // Nothing changed, nothing written
        let again = ledger.reconcile().await.unwrap();
        assert_eq!(again.changes_written, 0);
        assert_eq!(again.reconciliation, outcome.reconciliation);
    }

    #[tokio::test]
    async fn test_listing_filters_newest_first() {
        let ledger = SalesLedger::new(MemoryStorage::new());
        for d in [1, 2, 3] {
            ledger
                .record_sale(day(d), BigDecimal::from(1), BigDecimal::from(10))
                .await
                .unwrap();
        }
        ledger
            .record_receipt(day(4), BigDecimal::from(20))
            .await
            .unwrap();

        let all: Vec<RecordId> = ledger
            .sales(SaleFilter::All)
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec![3, 2, 1]);

        let open = ledger.sales(SaleFilter::Open).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, 3);

        let closed = ledger.sales(SaleFilter::Closed).await.unwrap();
        assert_eq!(closed.len(), 2);

        let settled = ledger.receipts(ReceiptFilter::Settled).await.unwrap();
        assert_eq!(settled.len(), 1);
        assert!(ledger
            .receipts(ReceiptFilter::Unsettled)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = LedgerConfig {
            quantity_scale: 7,
            ..LedgerConfig::default()
        };
        assert!(matches!(
            SalesLedger::with_config(MemoryStorage::new(), config),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_filters_survive_json() {
        let filter = SaleFilter::OverdueOpen { cutoff: day(15) };

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"{"OverdueOpen":{"cutoff":"2024-01-15"}}"#);
        assert_eq!(serde_json::from_str::<SaleFilter>(&json).unwrap(), filter);

        let json = serde_json::to_string(&ReceiptFilter::Unsettled).unwrap();
        assert_eq!(
            serde_json::from_str::<ReceiptFilter>(&json).unwrap(),
            ReceiptFilter::Unsettled
        );
    }
}
