//! Reconciliation of sales against money received
//!
//! Sales are closed oldest first for as long as their running total stays within
//! the cash received. Receipts are then settled oldest first for as long as
//! their running total stays within the value of the closed sales. No receipt is
//! ever linked to a specific sale; both decisions are thresholds on cumulative
//! sums.

pub mod engine;

pub use engine::*;
