//! Property-based tests for the reconciliation engine
//!
//! Ledgers are generated with random dates (plenty of same-day collisions) and
//! amounts in cents, then checked against the invariants every pass must hold.

use bigdecimal::BigDecimal;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use sales_ledger::{Receipt, ReconciliationEngine, Sale};

fn date(offset: u8) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap()
}

fn cents(value: u32) -> BigDecimal {
    BigDecimal::new(value.into(), 2)
}

fn sales_strategy() -> impl Strategy<Value = Vec<Sale>> {
    prop::collection::vec((0u8..20, 1u32..50_000), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (offset, price))| {
                Sale::new(i as u64 + 1, date(offset), BigDecimal::from(1), cents(price))
            })
            .collect()
    })
}

fn receipts_strategy() -> impl Strategy<Value = Vec<Receipt>> {
    prop::collection::vec((0u8..20, 1u32..80_000), 0..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (offset, amount))| Receipt::new(i as u64 + 1, date(offset), cents(amount)))
            .collect()
    })
}

proptest! {
    /// A second pass over already reconciled rows changes nothing
    #[test]
    fn reconciliation_is_idempotent(sales in sales_strategy(), receipts in receipts_strategy()) {
        let engine = ReconciliationEngine::new();
        let (mut sales, mut receipts) = (sales, receipts);

        let first = engine.reconcile(&sales, &receipts);
        first.apply(&mut sales, &mut receipts);
        let second = engine.reconcile(&sales, &receipts);

        prop_assert!(second.changes(&sales, &receipts).is_empty());
        prop_assert_eq!(first, second);
    }

    /// Closed sales form a prefix of the (date, id) ordering
    #[test]
    fn closed_sales_are_a_prefix(sales in sales_strategy(), receipts in receipts_strategy()) {
        let result = ReconciliationEngine::new().reconcile(&sales, &receipts);

        let mut ordered: Vec<&Sale> = sales.iter().collect();
        ordered.sort_by_key(|s| (s.date, s.id));
        let flags: Vec<bool> = ordered.iter().map(|s| result.is_closed(s.id) == Some(true)).collect();

        prop_assert!(flags.windows(2).all(|w| w[0] || !w[1]), "flags: {:?}", flags);
    }

    /// Settled receipts form a prefix of the (date, id) ordering
    #[test]
    fn settled_receipts_are_a_prefix(sales in sales_strategy(), receipts in receipts_strategy()) {
        let result = ReconciliationEngine::new().reconcile(&sales, &receipts);

        let mut ordered: Vec<&Receipt> = receipts.iter().collect();
        ordered.sort_by_key(|r| (r.date, r.id));
        let flags: Vec<bool> = ordered.iter().map(|r| result.is_settled(r.id) == Some(true)).collect();

        prop_assert!(flags.windows(2).all(|w| w[0] || !w[1]), "flags: {:?}", flags);
    }

    /// Closed value is exactly the closed totals and never more than was received
    #[test]
    fn closed_value_is_conserved(sales in sales_strategy(), receipts in receipts_strategy()) {
        let result = ReconciliationEngine::new().reconcile(&sales, &receipts);

        let closed_total: BigDecimal = sales
            .iter()
            .filter(|s| result.is_closed(s.id) == Some(true))
            .map(|s| &s.total)
            .sum();
        let settled_total: BigDecimal = receipts
            .iter()
            .filter(|r| result.is_settled(r.id) == Some(true))
            .map(|r| &r.amount)
            .sum();

        prop_assert_eq!(&result.closed_value, &closed_total);
        prop_assert!(result.closed_value <= result.total_received);
        prop_assert_eq!(&result.settled_value, &settled_total);
        prop_assert!(result.settled_value <= result.closed_value);
    }

    /// The first open sale is exactly the one that pushes the running total past the cash received
    #[test]
    fn first_open_sale_overflows_receipts(sales in sales_strategy(), receipts in receipts_strategy()) {
        let result = ReconciliationEngine::new().reconcile(&sales, &receipts);

        let mut ordered: Vec<&Sale> = sales.iter().collect();
        ordered.sort_by_key(|s| (s.date, s.id));
        if let Some(open) = ordered.iter().find(|s| result.is_closed(s.id) == Some(false)) {
            prop_assert!(&result.closed_value + &open.total > result.total_received);
        }
    }

    /// Shuffling the input never changes the outcome
    #[test]
    fn input_order_does_not_matter(sales in sales_strategy(), receipts in receipts_strategy()) {
        let engine = ReconciliationEngine::new();
        let forward = engine.reconcile(&sales, &receipts);

        let mut reversed_sales = sales.clone();
        reversed_sales.reverse();
        let mut reversed_receipts = receipts.clone();
        reversed_receipts.reverse();

        prop_assert_eq!(forward, engine.reconcile(&reversed_sales, &reversed_receipts));
    }
}
