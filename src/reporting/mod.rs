//! Reporting on reconciled ledgers

pub mod aging;
pub mod summary;

pub use aging::*;
pub use summary::*;
