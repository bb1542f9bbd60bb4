//! In-memory storage implementation for testing

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::reconciliation::FlagChanges;
use crate::traits::*;
use crate::types::*;

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<RecordId, T>,
    last_id: RecordId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }
}

fn poisoned<T>(_: PoisonError<T>) -> LedgerError {
    LedgerError::Storage("memory storage lock poisoned".to_string())
}

/// In-memory storage implementation for testing and development
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    sales: Arc<RwLock<Table<Sale>>>,
    receipts: Arc<RwLock<Table<Receipt>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing). Id sequences are not reset.
    pub fn clear(&self) -> LedgerResult<()> {
        self.sales.write().map_err(poisoned)?.rows.clear();
        self.receipts.write().map_err(poisoned)?.rows.clear();
        Ok(())
    }
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn insert_sale(
        &self,
        date: NaiveDate,
        weight: BigDecimal,
        unit_price: BigDecimal,
    ) -> LedgerResult<Sale> {
        let mut sales = self.sales.write().map_err(poisoned)?;
        let sale = Sale::new(sales.next_id(), date, weight, unit_price);
        sales.rows.insert(sale.id, sale.clone());
        Ok(sale)
    }

    async fn insert_receipt(&self, date: NaiveDate, amount: BigDecimal) -> LedgerResult<Receipt> {
        let mut receipts = self.receipts.write().map_err(poisoned)?;
        let receipt = Receipt::new(receipts.next_id(), date, amount);
        receipts.rows.insert(receipt.id, receipt.clone());
        Ok(receipt)
    }

    async fn get_sale(&self, sale_id: RecordId) -> LedgerResult<Option<Sale>> {
        Ok(self
            .sales
            .read()
            .map_err(poisoned)?
            .rows
            .get(&sale_id)
            .cloned())
    }

    async fn get_receipt(&self, receipt_id: RecordId) -> LedgerResult<Option<Receipt>> {
        Ok(self
            .receipts
            .read()
            .map_err(poisoned)?
            .rows
            .get(&receipt_id)
            .cloned())
    }

    async fn list_sales(&self) -> LedgerResult<Vec<Sale>> {
        Ok(self
            .sales
            .read()
            .map_err(poisoned)?
            .rows
            .values()
            .cloned()
            .collect())
    }

    async fn list_receipts(&self) -> LedgerResult<Vec<Receipt>> {
        Ok(self
            .receipts
            .read()
            .map_err(poisoned)?
            .rows
            .values()
            .cloned()
            .collect())
    }

    async fn delete_sale(&self, sale_id: RecordId) -> LedgerResult<()> {
        if self
            .sales
            .write()
            .map_err(poisoned)?
            .rows
            .remove(&sale_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(LedgerError::SaleNotFound(sale_id))
        }
    }

    async fn delete_receipt(&self, receipt_id: RecordId) -> LedgerResult<()> {
        if self
            .receipts
            .write()
            .map_err(poisoned)?
            .rows
            .remove(&receipt_id)
            .is_some()
        {
            Ok(())
        } else {
            Err(LedgerError::ReceiptNotFound(receipt_id))
        }
    }

    async fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        // Lock order is always sales, then receipts
        let sales = self.sales.read().map_err(poisoned)?;
        let receipts = self.receipts.read().map_err(poisoned)?;
        Ok(LedgerSnapshot {
            sales: sales.rows.values().cloned().collect(),
            receipts: receipts.rows.values().cloned().collect(),
        })
    }

    async fn apply_flag_changes(&self, changes: &FlagChanges) -> LedgerResult<()> {
        let mut sales = self.sales.write().map_err(poisoned)?;
        let mut receipts = self.receipts.write().map_err(poisoned)?;

        if let Some((id, _)) = changes
            .sales
            .iter()
            .find(|(id, _)| !sales.rows.contains_key(id))
        {
            return Err(LedgerError::SaleNotFound(*id));
        }
        if let Some((id, _)) = changes
            .receipts
            .iter()
            .find(|(id, _)| !receipts.rows.contains_key(id))
        {
            return Err(LedgerError::ReceiptNotFound(*id));
        }

        for (id, closed) in &changes.sales {
            if let Some(sale) = sales.rows.get_mut(id) {
                sale.is_closed = *closed;
            }
        }
        for (id, settled) in &changes.receipts {
            if let Some(receipt) = receipts.rows.get_mut(id) {
                receipt.is_settled = *settled;
            }
        }

        Ok(())
    }
}
