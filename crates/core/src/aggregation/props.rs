//! Property-based tests for the aggregation engine.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{aggregate_accounts, aggregate_cash};
use crate::accounts::{AccountDirectory, AccountType};
use crate::period::ReportPeriod;
use crate::testing::arb_ledger;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Monthly debits and credits add up to the totals**
    #[test]
    fn prop_account_months_sum_to_total(entries in arb_ledger()) {
        let directory = AccountDirectory::default_chart();
        let period = ReportPeriod::year(2025).unwrap();
        let aggregates = aggregate_accounts(&directory, &entries, &period);

        for aggregate in aggregates.accounts.values() {
            let debit: Decimal = aggregate.monthly.values().map(|m| m.debit).sum();
            let credit: Decimal = aggregate.monthly.values().map(|m| m.credit).sum();
            prop_assert_eq!(debit, aggregate.total.debit);
            prop_assert_eq!(credit, aggregate.total.credit);
            for month in aggregate.monthly.keys() {
                prop_assert!(period.contains(month.first_day()));
            }
        }
    }

    /// **Property: Aggregated posted entries keep debits equal to credits**
    #[test]
    fn prop_aggregates_stay_balanced(entries in arb_ledger()) {
        let directory = AccountDirectory::default_chart();
        let period = ReportPeriod::range(
            crate::testing::date(2024, 1, 1),
            crate::testing::date(2025, 12, 31),
        ).unwrap();
        let aggregates = aggregate_accounts(&directory, &entries, &period);

        let debits: Decimal = aggregates.accounts.values().map(|a| a.total.debit).sum();
        let credits: Decimal = aggregates.accounts.values().map(|a| a.total.credit).sum();
        prop_assert_eq!(debits, credits);

        // Assets + expenses (debit side) equal liabilities + equity + income.
        let debit_side = aggregates.total_balance(AccountType::Asset)
            + aggregates.total_balance(AccountType::Expense);
        let credit_side = aggregates.total_balance(AccountType::Liability)
            + aggregates.total_balance(AccountType::Equity)
            + aggregates.total_balance(AccountType::Income);
        prop_assert_eq!(debit_side, credit_side);
    }

    /// **Property: Rollup preserves totals**
    #[test]
    fn prop_rollup_preserves_totals(entries in arb_ledger()) {
        let directory = AccountDirectory::default_chart();
        let period = ReportPeriod::year(2025).unwrap();
        let aggregates = aggregate_accounts(&directory, &entries, &period);
        let rolled = aggregates.rolled_up(&directory);

        for account_type in AccountType::ALL {
            prop_assert_eq!(
                aggregates.total_balance(account_type),
                rolled.total_balance(account_type)
            );
        }
        prop_assert!(rolled.accounts.keys().all(|code| !code.contains('-')));
    }

    /// **Property: Cash items sum monthly to their totals and to the net movement**
    #[test]
    fn prop_cash_months_sum_to_total(entries in arb_ledger()) {
        let directory = AccountDirectory::default_chart();
        let period = ReportPeriod::year(2025).unwrap();
        let cash = aggregate_cash(&directory, &entries, &period);

        for item in cash.items.values() {
            let monthly: Decimal = cash_sum(item.monthly.values());
            prop_assert_eq!(monthly, item.total);
        }
        let net: Decimal = cash_sum(cash.net_movement.values());
        prop_assert_eq!(net, cash.total());
    }

    /// **Property: Aggregation is idempotent**
    #[test]
    fn prop_aggregation_idempotent(entries in arb_ledger()) {
        let directory = AccountDirectory::default_chart();
        let period = ReportPeriod::year(2025).unwrap();
        let snapshot = entries.clone();

        let first = aggregate_accounts(&directory, &entries, &period);
        let second = aggregate_accounts(&directory, &entries, &period);
        prop_assert_eq!(first, second);
        prop_assert_eq!(
            aggregate_cash(&directory, &entries, &period),
            aggregate_cash(&directory, &entries, &period)
        );
        prop_assert_eq!(entries, snapshot);
    }
}

fn cash_sum<'a>(values: impl Iterator<Item = &'a Decimal>) -> Decimal {
    values.copied().sum()
}
