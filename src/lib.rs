//! # Sales Ledger
//!
//! Tracks the money a small business receives and the goods it sells, and
//! reconciles the two so that every sale is known to be paid for (closed) or
//! not, and every receipt to be applied to closed sales (settled) or not.
//!
//! ## Features
//!
//! - **FIFO reconciliation**: oldest sales close first against the cash
//!   received, oldest receipts settle first against the closed sales
//! - **Fixed-point amounts**: `BigDecimal` throughout, two decimal places for
//!   money and three for weights
//! - **Record management**: validated creation and deletion of sales and receipts
//! - **Reporting**: balances, open and overdue sales, unsettled money, and a
//!   chronological statement
//! - **Storage abstraction**: backend-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//! use sales_ledger::{ReconciliationEngine, Receipt, Sale};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let sales = vec![Sale::new(1, day(1), BigDecimal::from(1), BigDecimal::from(100))];
//! let receipts = vec![Receipt::new(1, day(2), BigDecimal::from(100))];
//!
//! let result = ReconciliationEngine::new().reconcile(&sales, &receipts);
//! assert_eq!(result.is_closed(1), Some(true));
//! assert_eq!(result.is_settled(1), Some(true));
//! assert_eq!(result.closed_value, BigDecimal::from(100));
//! ```

pub mod config;
pub mod ledger;
pub mod reconciliation;
pub mod reporting;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::LedgerConfig;
pub use ledger::*;
pub use reconciliation::*;
pub use reporting::*;
pub use traits::*;
pub use types::*;
