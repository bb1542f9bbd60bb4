//! FIFO cumulative-sum reconciliation engine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::types::*;

/// Flags that differ between storage and a fresh reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagChanges {
    /// `(sale id, new is_closed)`
    pub sales: Vec<(RecordId, bool)>,
    /// `(receipt id, new is_settled)`
    pub receipts: Vec<(RecordId, bool)>,
}

impl FlagChanges {
    /// True when storage already matches the pass
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.receipts.is_empty()
    }

    /// Number of flags to rewrite
    pub fn len(&self) -> usize {
        self.sales.len() + self.receipts.len()
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Computed `is_closed` for every sale
    pub sale_flags: BTreeMap<RecordId, bool>,
    /// Computed `is_settled` for every receipt
    pub receipt_flags: BTreeMap<RecordId, bool>,
    /// Sum of all receipt amounts
    pub total_received: BigDecimal,
    /// Sum of all sale totals
    pub total_sold: BigDecimal,
    /// Sum of the totals of the closed sales
    pub closed_value: BigDecimal,
    /// Sum of the amounts of the settled receipts
    pub settled_value: BigDecimal,
}

impl Reconciliation {
    /// Computed flag for a sale, `None` if the sale was not part of the pass
    pub fn is_closed(&self, sale_id: RecordId) -> Option<bool> {
        self.sale_flags.get(&sale_id).copied()
    }

    /// Computed flag for a receipt, `None` if the receipt was not part of the pass
    pub fn is_settled(&self, receipt_id: RecordId) -> Option<bool> {
        self.receipt_flags.get(&receipt_id).copied()
    }

    /// Number of sales marked closed
    pub fn closed_count(&self) -> usize {
        self.sale_flags.values().filter(|closed| **closed).count()
    }

    /// Number of receipts marked settled
    pub fn settled_count(&self) -> usize {
        self.receipt_flags.values().filter(|settled| **settled).count()
    }

    /// Rows whose stored flag disagrees with this reconciliation.
    ///
    /// Rows unknown to the pass are left out.
    pub fn changes(&self, sales: &[Sale], receipts: &[Receipt]) -> FlagChanges {
        let sales = sales
            .iter()
            .filter_map(|sale| {
                self.is_closed(sale.id)
                    .filter(|closed| *closed != sale.is_closed)
                    .map(|closed| (sale.id, closed))
            })
            .collect();
        let receipts = receipts
            .iter()
            .filter_map(|receipt| {
                self.is_settled(receipt.id)
                    .filter(|settled| *settled != receipt.is_settled)
                    .map(|settled| (receipt.id, settled))
            })
            .collect();

        FlagChanges { sales, receipts }
    }

    /// Copy the computed flags onto in-memory rows
    pub fn apply(&self, sales: &mut [Sale], receipts: &mut [Receipt]) {
        for sale in sales.iter_mut() {
            if let Some(closed) = self.is_closed(sale.id) {
                sale.is_closed = closed;
            }
        }
        for receipt in receipts.iter_mut() {
            if let Some(settled) = self.is_settled(receipt.id) {
                receipt.is_settled = settled;
            }
        }
    }
}

/// Stateless reconciliation engine.
///
/// Every pass starts from scratch over the complete history; the flags stored
/// on the rows are never read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Create a new reconciliation engine
    pub fn new() -> Self {
        Self
    }

    /// Decide which sales are closed and which receipts are settled.
    ///
    /// Rows are visited by `(date, id)` ascending. A sale is closed while the
    /// running total of sales, including itself, does not exceed the total
    /// received. A receipt is settled while the running total of receipts,
    /// including itself, does not exceed the closed value. Both walks stop at the
    /// first row that fails, so closed sales and settled receipts are always
    /// prefixes of their ordered ledgers.
    pub fn reconcile(&self, sales: &[Sale], receipts: &[Receipt]) -> Reconciliation {
        let mut ordered_sales: Vec<&Sale> = sales.iter().collect();
        ordered_sales.sort_by_key(|sale| (sale.date, sale.id));
        let mut ordered_receipts: Vec<&Receipt> = receipts.iter().collect();
        ordered_receipts.sort_by_key(|receipt| (receipt.date, receipt.id));

        let total_received: BigDecimal = receipts.iter().map(|r| &r.amount).sum();
        let total_sold: BigDecimal = sales.iter().map(|s| &s.total).sum();

        let mut sale_flags = BTreeMap::new();
        let mut cumulative_sales = BigDecimal::from(0);
        let mut closed_value = BigDecimal::from(0);
        let mut closing = true;
        for sale in ordered_sales {
            cumulative_sales += &sale.total;
            closing = closing && cumulative_sales <= total_received;
            if closing {
                closed_value += &sale.total;
            }
            sale_flags.insert(sale.id, closing);
        }

        let mut receipt_flags = BTreeMap::new();
        let mut cumulative_receipts = BigDecimal::from(0);
        let mut settled_value = BigDecimal::from(0);
        let mut settling = true;
        for receipt in ordered_receipts {
            cumulative_receipts += &receipt.amount;
            settling = settling && cumulative_receipts <= closed_value;
            if settling {
                settled_value += &receipt.amount;
            }
            receipt_flags.insert(receipt.id, settling);
        }

        debug!(
            sales = sale_flags.len(),
            receipts = receipt_flags.len(),
            %total_received,
            %closed_value,
            "Reconciliation pass computed"
        );

        Reconciliation {
            sale_flags,
            receipt_flags,
            total_received,
            total_sold,
            closed_value,
            settled_value,
        }
    }
}
