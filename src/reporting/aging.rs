//! Overdue filtering for open sales
//!
//! Aging is applied on top of the reconciled `is_closed` flag; it never takes
//! part in reconciliation itself.

use chrono::{Days, NaiveDate};

use crate::types::Sale;

/// Sales dated strictly before the returned day are overdue
pub fn overdue_cutoff(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Whether a sale is still open and older than the cutoff
pub fn is_overdue(sale: &Sale, cutoff: NaiveDate) -> bool {
    !sale.is_closed && sale.date < cutoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_cutoff() {
        assert_eq!(overdue_cutoff(date(3, 31), 30), date(3, 1));
        assert_eq!(overdue_cutoff(date(3, 1), 0), date(3, 1));
        assert_eq!(overdue_cutoff(NaiveDate::MIN, 5), NaiveDate::MIN);
    }

    #[test]
    fn test_only_open_old_sales_are_overdue() {
        let cutoff = date(3, 1);
        let mut old = Sale::new(1, date(2, 28), BigDecimal::from(1), BigDecimal::from(5));
        let on_cutoff = Sale::new(2, date(3, 1), BigDecimal::from(1), BigDecimal::from(5));

        assert!(is_overdue(&old, cutoff));
        assert!(!is_overdue(&on_cutoff, cutoff));

        old.is_closed = true;
        assert!(!is_overdue(&old, cutoff));
    }
}
