//! Ledger configuration
//!
//! All fields have defaults, so an empty document is a valid configuration:
//!
//! ```toml
//! overdue_days = 45
//! currency_scale = 2
//! quantity_scale = 3
//! max_digits = 10
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{LedgerError, LedgerResult, CURRENCY_SCALE, QUANTITY_SCALE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Age in days after which an open sale is reported as overdue
    pub overdue_days: u32,
    /// Maximum decimal places for amounts and prices
    pub currency_scale: i64,
    /// Maximum decimal places for weights
    pub quantity_scale: i64,
    /// Maximum number of significant digits in any value
    pub max_digits: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            overdue_days: 30,
            currency_scale: CURRENCY_SCALE,
            quantity_scale: QUANTITY_SCALE,
            max_digits: 10,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> LedgerResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if !(0..=CURRENCY_SCALE).contains(&self.currency_scale) {
            return Err(LedgerError::Config(format!(
                "currency_scale must be between 0 and {}, got {}",
                CURRENCY_SCALE, self.currency_scale
            )));
        }

        if !(0..=QUANTITY_SCALE).contains(&self.quantity_scale) {
            return Err(LedgerError::Config(format!(
                "quantity_scale must be between 0 and {}, got {}",
                QUANTITY_SCALE, self.quantity_scale
            )));
        }

        let widest_scale = self.currency_scale.max(self.quantity_scale) as u64;
        if self.max_digits <= widest_scale {
            return Err(LedgerError::Config(format!(
                "max_digits ({}) must exceed the widest scale ({})",
                self.max_digits, widest_scale
            )));
        }

        Ok(())
    }
}
