//! Property-based tests for ledger entry validation rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{EntryLine, TransactionEntry, TransactionSource};
use super::validation::{LedgerValidationError, validate_entry};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

fn line(is_debit: bool, amount: Decimal) -> EntryLine {
    if is_debit {
        EntryLine::debit("1001", "Bank Account", amount)
    } else {
        EntryLine::credit("4000", "Rental Income", amount)
    }
}

/// Helper to create an entry for testing.
fn make_entry(lines: Vec<EntryLine>) -> TransactionEntry {
    let mut entry = TransactionEntry::new(
        "TXN-PROP",
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        "property test",
        TransactionSource::Manual,
    );
    entry.lines = lines;
    entry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Zero-amount lines are rejected**
    #[test]
    fn prop_zero_amount_rejected(
        is_debit in any::<bool>(),
        other_amount in positive_amount(),
    ) {
        let entry = make_entry(vec![
            line(is_debit, Decimal::ZERO),
            line(!is_debit, other_amount),
        ]);

        let result = validate_entry(&entry);
        prop_assert!(
            matches!(result, Err(LedgerValidationError::ZeroAmount { index: 0 })),
            "Zero amount should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: Negative-amount lines are rejected**
    #[test]
    fn prop_negative_amount_rejected(
        is_debit in any::<bool>(),
        neg_amount in negative_amount(),
        other_amount in positive_amount(),
    ) {
        let entry = make_entry(vec![
            line(is_debit, neg_amount),
            line(!is_debit, other_amount),
        ]);

        let result = validate_entry(&entry);
        prop_assert!(
            matches!(result, Err(LedgerValidationError::NegativeAmount { index: 0 })),
            "Negative amount should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: Single-line entries are rejected as single-sided**
    #[test]
    fn prop_single_line_rejected(
        is_debit in any::<bool>(),
        amount in positive_amount(),
    ) {
        let entry = make_entry(vec![line(is_debit, amount)]);

        let result = validate_entry(&entry);
        prop_assert!(
            matches!(result, Err(LedgerValidationError::SingleSided)),
            "Single line should be rejected as single-sided, got: {:?}",
            result
        );
    }

    /// **Property: Any difference between debits and credits is rejected**
    #[test]
    fn prop_unbalanced_rejected(
        amount in positive_amount(),
        delta in positive_amount(),
    ) {
        let entry = make_entry(vec![
            line(true, amount + delta),
            line(false, amount),
        ]);

        let result = validate_entry(&entry);
        prop_assert_eq!(
            result,
            Err(LedgerValidationError::Unbalanced {
                debits: amount + delta,
                credits: amount,
            })
        );
        prop_assert!(!entry.is_balanced());
    }

    /// **Property: Balanced multi-line entries are accepted**
    #[test]
    fn prop_multi_line_balanced_accepted(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<EntryLine> = amounts.iter().map(|a| line(true, *a)).collect();
        lines.push(line(false, total));
        let entry = make_entry(lines);

        let result = validate_entry(&entry);
        prop_assert!(
            result.is_ok(),
            "Balanced entry should be accepted, got: {:?}",
            result
        );
        prop_assert!(entry.is_balanced());
    }

    /// **Property: A reversal of a valid entry is itself valid and cancels it**
    #[test]
    fn prop_reversal_is_valid(amount in positive_amount()) {
        let entry = make_entry(vec![line(true, amount), line(false, amount)]);
        let reversal = entry.reversal("TXN-PROP-R", entry.date);

        prop_assert!(validate_entry(&reversal).is_ok());
        prop_assert_eq!(reversal.total_debit(), entry.total_credit());
    }
}
