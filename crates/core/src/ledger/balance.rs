//! Account balance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side on which an account's balance grows.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Income: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debit-normal accounts (Asset, Expense)
    DebitNormal,
    /// Credit-normal accounts (Liability, Equity, Income)
    CreditNormal,
}

impl NormalBalance {
    /// Calculates the balance change for a debit/credit pair.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debit - credit,
            Self::CreditNormal => credit - debit,
        }
    }
}

/// Running balance information for a general ledger line.
///
/// - sequence: monotonically increasing counter
/// - previous_balance: balance before this line
/// - current_balance: balance after this line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Line sequence within the listing (monotonically increasing).
    pub sequence: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Starts a chain from an opening balance, before any line is applied.
    #[must_use]
    pub fn opening(balance: Decimal) -> Self {
        Self {
            sequence: 0,
            previous_balance: balance,
            current_balance: balance,
        }
    }

    /// Creates a new running balance based on the previous line.
    ///
    /// - current_balance[N] = previous_balance[N] + balance_change
    /// - previous_balance[N] = current_balance[N-1]
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal_change() {
        assert_eq!(
            NormalBalance::DebitNormal.balance_change(dec!(100), dec!(30)),
            dec!(70)
        );
    }

    #[test]
    fn test_credit_normal_change() {
        assert_eq!(
            NormalBalance::CreditNormal.balance_change(dec!(100), dec!(30)),
            dec!(-70)
        );
    }

    #[test]
    fn test_running_balance_from_opening() {
        let opening = RunningBalance::opening(dec!(250));
        let next = RunningBalance::next_entry(&opening, dec!(-50));
        assert_eq!(next.sequence, 1);
        assert_eq!(next.previous_balance, dec!(250));
        assert_eq!(next.current_balance, dec!(200));
    }

    /// Strategy for generating balance changes (can be positive or negative)
    fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Property: Previous balance equals prior current balance**
        #[test]
        fn prop_previous_equals_prior_current(
            change1 in balance_change_strategy(),
            change2 in balance_change_strategy(),
        ) {
            let rb1 = RunningBalance::next_entry(&RunningBalance::opening(Decimal::ZERO), change1);
            let rb2 = RunningBalance::next_entry(&rb1, change2);

            prop_assert_eq!(rb2.previous_balance, rb1.current_balance);
            prop_assert_eq!(rb2.current_balance, rb1.current_balance + change2);
        }

        /// **Property: Final balance equals opening plus the sum of all changes**
        #[test]
        fn prop_final_balance_equals_sum_of_changes(
            opening in balance_change_strategy(),
            changes in prop::collection::vec(balance_change_strategy(), 1..20),
        ) {
            let mut current = RunningBalance::opening(opening);
            for change in &changes {
                current = RunningBalance::next_entry(&current, *change);
            }

            let expected: Decimal = opening + changes.iter().copied().sum::<Decimal>();
            prop_assert_eq!(current.current_balance, expected);
            prop_assert_eq!(current.sequence as usize, changes.len());
        }

        /// **Property: Debit-normal and credit-normal changes are mirror images**
        #[test]
        fn prop_normal_sides_are_opposite(
            debit in balance_change_strategy(),
            credit in balance_change_strategy(),
        ) {
            prop_assert_eq!(
                NormalBalance::DebitNormal.balance_change(debit, credit),
                -NormalBalance::CreditNormal.balance_change(debit, credit)
            );
        }
    }
}
