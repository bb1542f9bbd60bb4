//! Balance figures and chronological statements built from a reconciled snapshot

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reconciliation::Reconciliation;
use crate::types::*;

/// Headline figures for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// All money received
    pub total_received: BigDecimal,
    /// All sale totals
    pub total_sold: BigDecimal,
    /// `total_sold - total_received`; negative when customers paid in advance
    pub balance: BigDecimal,
    /// Value of the closed sales
    pub closed_value: BigDecimal,
    /// Value of the sales still open
    pub open_sales_value: BigDecimal,
    /// Money received but not yet applied to closed sales
    pub unsettled_value: BigDecimal,
    /// Number of open sales
    pub open_sales: usize,
    /// Number of unsettled receipts
    pub unsettled_receipts: usize,
}

impl LedgerSummary {
    /// Build the summary from a pass and the snapshot it ran over
    pub fn from_reconciliation(reconciliation: &Reconciliation) -> Self {
        let total_received = reconciliation.total_received.clone();
        let total_sold = reconciliation.total_sold.clone();
        let closed_value = reconciliation.closed_value.clone();

        Self {
            balance: &total_sold - &total_received,
            open_sales_value: &total_sold - &closed_value,
            unsettled_value: &total_received - &reconciliation.settled_value,
            open_sales: reconciliation.sale_flags.len() - reconciliation.closed_count(),
            unsettled_receipts: reconciliation.receipt_flags.len()
                - reconciliation.settled_count(),
            total_received,
            total_sold,
            closed_value,
        }
    }
}

/// Every receipt and sale in date order, with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesStatement {
    pub as_of: NaiveDate,
    pub receipts: Vec<Receipt>,
    pub sales: Vec<Sale>,
    pub total_received: BigDecimal,
    pub total_sold: BigDecimal,
    /// `total_sold - total_received`
    pub balance: BigDecimal,
}

impl SalesStatement {
    pub fn new(as_of: NaiveDate, snapshot: LedgerSnapshot) -> Self {
        let total_received = snapshot.total_received();
        let total_sold = snapshot.total_sold();
        let LedgerSnapshot {
            mut sales,
            mut receipts,
        } = snapshot;
        sales.sort_by_key(|sale| (sale.date, sale.id));
        receipts.sort_by_key(|receipt| (receipt.date, receipt.id));

        Self {
            as_of,
            balance: &total_sold - &total_received,
            receipts,
            sales,
            total_received,
            total_sold,
        }
    }
}
