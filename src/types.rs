//! Core types and data structures for the sales ledger

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier of a stored row. Assigned by storage in creation order.
pub type RecordId = u64;

/// Decimal places kept for currency values (totals, amounts, prices)
pub const CURRENCY_SCALE: i64 = 2;

/// Decimal places kept for quantity values (weights)
pub const QUANTITY_SCALE: i64 = 3;

/// Round a currency value to two decimal places (half-even)
pub fn round_currency(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(CURRENCY_SCALE, RoundingMode::HalfEven)
}

/// Round a quantity to three decimal places (half-even)
pub fn round_quantity(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(QUANTITY_SCALE, RoundingMode::HalfEven)
}

/// A sale of goods ("item sold")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier, ascending in creation order
    pub id: RecordId,
    /// Date the goods were sold
    pub date: NaiveDate,
    /// Quantity sold (kg)
    pub weight: BigDecimal,
    /// Price per unit of weight
    pub unit_price: BigDecimal,
    /// `weight * unit_price`, fixed when the sale is written
    pub total: BigDecimal,
    /// Whether the sale is paid for. Derived by reconciliation.
    pub is_closed: bool,
    /// When the sale was recorded
    pub created_at: NaiveDateTime,
}

impl Sale {
    /// Create a new, open sale and compute its total from the stored weight and price
    pub fn new(id: RecordId, date: NaiveDate, weight: BigDecimal, unit_price: BigDecimal) -> Self {
        let weight = round_quantity(&weight);
        let unit_price = round_currency(&unit_price);
        let total = round_currency(&(&weight * &unit_price));
        Self {
            id,
            date,
            weight,
            unit_price,
            total,
            is_closed: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Money received from customers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier, ascending in creation order
    pub id: RecordId,
    /// Date the money was received
    pub date: NaiveDate,
    /// Amount received
    pub amount: BigDecimal,
    /// Whether this money has been applied to closed sales. Derived by reconciliation.
    pub is_settled: bool,
    /// When the receipt was recorded
    pub created_at: NaiveDateTime,
}

impl Receipt {
    /// Create a new, unsettled receipt
    pub fn new(id: RecordId, date: NaiveDate, amount: BigDecimal) -> Self {
        Self {
            id,
            date,
            amount: round_currency(&amount),
            is_settled: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Consistent copy of both ledgers taken at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub sales: Vec<Sale>,
    pub receipts: Vec<Receipt>,
}

impl LedgerSnapshot {
    /// Sum of all receipt amounts
    pub fn total_received(&self) -> BigDecimal {
        self.receipts.iter().map(|r| &r.amount).sum()
    }

    /// Sum of all sale totals
    pub fn total_sold(&self) -> BigDecimal {
        self.sales.iter().map(|s| &s.total).sum()
    }
}

/// Errors that can occur in the sales ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Sale not found: {0}")]
    SaleNotFound(RecordId),
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(RecordId),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Reconciliation failed: {0}")]
    ReconciliationFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sale_total_is_weight_times_price() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let sale = Sale::new(1, date, dec("12.5"), dec("40.00"));

        assert_eq!(sale.total, dec("500.00"));
        assert!(!sale.is_closed);
    }

    #[test]
    fn test_sale_total_rounds_to_currency_scale() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        // 1.125 * 3.10 = 3.48750 -> 3.49 (half-even looks at the 7)
        let sale = Sale::new(1, date, dec("1.125"), dec("3.10"));
        assert_eq!(sale.total, dec("3.49"));

        // 0.125 * 1.00 = 0.125 -> 0.12 (tie goes to even)
        let sale = Sale::new(2, date, dec("0.125"), dec("1.00"));
        assert_eq!(sale.total, dec("0.12"));
    }

    #[test]
    fn test_sale_stores_weight_and_price_at_their_scales() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let sale = Sale::new(1, date, dec("1.00049"), dec("10.001"));

        assert_eq!(sale.weight, dec("1.000"));
        assert_eq!(sale.unit_price, dec("10.00"));
        // Total follows the stored values, not the raw input
        assert_eq!(sale.total, dec("10.00"));
    }

    #[test]
    fn test_receipt_starts_unsettled() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let receipt = Receipt::new(7, date, dec("100"));

        assert_eq!(receipt.id, 7);
        assert_eq!(receipt.amount, dec("100.00"));
        assert!(!receipt.is_settled);
    }

    #[test]
    fn test_round_quantity() {
        assert_eq!(round_quantity(&dec("2.0005")), dec("2.000"));
        assert_eq!(round_quantity(&dec("2.0015")), dec("2.002"));
    }

    #[test]
    fn test_snapshot_totals() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let snapshot = LedgerSnapshot {
            sales: vec![
                Sale::new(1, date, dec("2"), dec("30")),
                Sale::new(2, date, dec("1"), dec("15.50")),
            ],
            receipts: vec![Receipt::new(1, date, dec("50"))],
        };

        assert_eq!(snapshot.total_sold(), dec("75.50"));
        assert_eq!(snapshot.total_received(), dec("50"));
        assert_eq!(LedgerSnapshot::default().total_sold(), BigDecimal::from(0));
    }
}
