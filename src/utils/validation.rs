//! Validation utilities

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::LedgerConfig;
use crate::traits::*;
use crate::types::*;

/// Validate that a value is positive
pub fn validate_positive(field: &str, value: &BigDecimal) -> LedgerResult<()> {
    if *value <= BigDecimal::from(0) {
        Err(LedgerError::Validation(format!("{} must be positive", field)))
    } else {
        Ok(())
    }
}

/// Validate that a value has at most `scale` decimal places
pub fn validate_scale(field: &str, value: &BigDecimal, scale: i64) -> LedgerResult<()> {
    let (_, exponent) = value.normalized().as_bigint_and_exponent();
    if exponent > scale {
        return Err(LedgerError::Validation(format!(
            "{} cannot have more than {} decimal places",
            field, scale
        )));
    }

    Ok(())
}

/// Validate that a value fits in `max_digits` significant digits once stored at `scale`
pub fn validate_digits(
    field: &str,
    value: &BigDecimal,
    scale: i64,
    max_digits: u64,
) -> LedgerResult<()> {
    let (integer_part, _) = value.with_scale(0).abs().as_bigint_and_exponent();
    let integer_digits = integer_part.to_string().trim_start_matches('0').len() as u64;
    let allowed = max_digits.saturating_sub(scale.max(0) as u64);
    if integer_digits > allowed {
        return Err(LedgerError::Validation(format!(
            "{} cannot have more than {} digits before the decimal point",
            field, allowed
        )));
    }

    Ok(())
}

/// Validator enforcing the configured precision limits
pub struct ConfiguredRecordValidator {
    config: LedgerConfig,
}

impl ConfiguredRecordValidator {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    fn check(&self, field: &str, value: &BigDecimal, scale: i64) -> LedgerResult<()> {
        validate_positive(field, value)?;
        validate_scale(field, value, scale)?;
        validate_digits(field, value, scale, self.config.max_digits)
    }
}

impl Default for ConfiguredRecordValidator {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl RecordValidator for ConfiguredRecordValidator {
    fn validate_sale(
        &self,
        _date: NaiveDate,
        weight: &BigDecimal,
        unit_price: &BigDecimal,
    ) -> LedgerResult<()> {
        self.check("Weight", weight, self.config.quantity_scale)?;
        self.check("Price", unit_price, self.config.currency_scale)?;

        // The stored total has to fit as well
        let total = round_currency(&(weight * unit_price));
        validate_digits("Total", &total, self.config.currency_scale, self.config.max_digits)
    }

    fn validate_receipt(&self, _date: NaiveDate, amount: &BigDecimal) -> LedgerResult<()> {
        self.check("Amount", amount, self.config.currency_scale)
    }
}
