//! Ledger module containing record management and the reconciling orchestrator

pub mod core;
pub mod receipts;
pub mod sales;

pub use self::core::*;
pub use receipts::*;
pub use sales::*;
