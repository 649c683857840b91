//! Shared fixtures and proptest strategies for unit tests.

use chrono::{Days, NaiveDate};
use lodgebook_shared::types::ResidenceId;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::ledger::{EntryLine, EntryStatus, TransactionEntry, TransactionSource};

pub const NORTH: ResidenceId = ResidenceId::from_uuid(Uuid::from_u128(0x1001));
pub const SOUTH: ResidenceId = ResidenceId::from_uuid(Uuid::from_u128(0x1002));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(
    id: &str,
    day: NaiveDate,
    description: &str,
    source: TransactionSource,
    lines: Vec<EntryLine>,
) -> TransactionEntry {
    let mut entry = TransactionEntry::new(id, day, description, source).for_residence(NORTH);
    entry.lines = lines;
    entry
}

/// A small but complete residence year (2025) with an opening in December 2024.
pub fn sample_ledger() -> Vec<TransactionEntry> {
    use TransactionSource as S;
    vec![
        entry(
            "TXN-0001",
            date(2024, 12, 1),
            "Owner capital contribution",
            S::Manual,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(10000)),
                EntryLine::credit("3000", "Owner's Capital", dec!(10000)),
            ],
        ),
        entry(
            "TXN-0002",
            date(2024, 12, 15),
            "Furniture for rooms",
            S::ExpensePayment,
            vec![
                EntryLine::debit("1600", "Furniture and Fittings", dec!(2500)),
                EntryLine::credit("1001", "Bank Account", dec!(2500)),
            ],
        ),
        entry(
            "TXN-0003",
            date(2025, 1, 1),
            "January rent due",
            S::RentalAccrual,
            vec![
                EntryLine::debit("1100-stu1", "AR - Student 1", dec!(450)),
                EntryLine::debit("1100-stu2", "AR - Student 2", dec!(450)),
                EntryLine::credit("4000", "Rental Income", dec!(900)),
            ],
        ),
        entry(
            "TXN-0004",
            date(2025, 1, 3),
            "Security deposit Student 1",
            S::Payment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(200)),
                EntryLine::credit("2020", "Tenant Security Deposits", dec!(200)),
            ],
        ),
        entry(
            "TXN-0005",
            date(2025, 1, 5),
            "Rent received Student 1",
            S::Payment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(450)),
                EntryLine::credit("1100-stu1", "AR - Student 1", dec!(450)),
            ],
        ),
        entry(
            "TXN-0006",
            date(2025, 1, 6),
            "Admin fee Student 2",
            S::Payment,
            vec![
                EntryLine::debit("1002", "Mobile Money (Ecocash)", dec!(20)),
                EntryLine::credit("4100", "Administrative Fees", dec!(20)),
            ],
        ),
        entry(
            "TXN-0007",
            date(2025, 1, 10),
            "Petty cash top-up",
            S::PettyCash,
            vec![
                EntryLine::debit("1011", "Admin Petty Cash", dec!(100)),
                EntryLine::credit("1001", "Bank Account", dec!(100)),
            ],
        ),
        entry(
            "TXN-0008",
            date(2025, 1, 12),
            "Plumbing repairs",
            S::ExpensePayment,
            vec![
                EntryLine::debit("5000", "Maintenance & Repairs", dec!(35.50)),
                EntryLine::credit("1011", "Admin Petty Cash", dec!(35.50)),
            ],
        ),
        entry(
            "TXN-0009",
            date(2025, 1, 31),
            "January electricity bill",
            S::ExpenseAccrual,
            vec![
                EntryLine::debit("5100", "Electricity", dec!(120)),
                EntryLine::credit("2000", "Accounts Payable", dec!(120)),
            ],
        ),
        entry(
            "TXN-0010",
            date(2025, 2, 1),
            "February rent due",
            S::RentalAccrual,
            vec![
                EntryLine::debit("1100-stu1", "AR - Student 1", dec!(450)),
                EntryLine::debit("1100-stu2", "AR - Student 2", dec!(450)),
                EntryLine::credit("4000", "Rental Income", dec!(900)),
            ],
        ),
        entry(
            "TXN-0011",
            date(2025, 2, 4),
            "Rent received Student 2 (January)",
            S::Payment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(450)),
                EntryLine::credit("1100-stu2", "AR - Student 2", dec!(450)),
            ],
        ),
        entry(
            "TXN-0012",
            date(2025, 2, 10),
            "ZESA electricity supplier payment",
            S::VendorPayment,
            vec![
                EntryLine::debit("2000", "Accounts Payable", dec!(120))
                    .with_description("Electricity for January"),
                EntryLine::credit("1001", "Bank Account", dec!(120)),
            ],
        ),
        entry(
            "TXN-0013",
            date(2025, 2, 20),
            "March rent paid in advance Student 1",
            S::AdvancePayment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(450)),
                EntryLine::credit("2200", "Rent Received in Advance", dec!(450)),
            ],
        ),
        entry(
            "TXN-0014",
            date(2025, 2, 25),
            "Staff wages February",
            S::ExpensePayment,
            vec![
                EntryLine::debit("5200", "Salaries & Wages", dec!(300)),
                EntryLine::credit("1001", "Bank Account", dec!(300)),
            ],
        ),
        entry(
            "TXN-0015",
            date(2025, 2, 28),
            "Depreciation February",
            S::Adjustment,
            vec![
                EntryLine::debit("5900", "Depreciation", dec!(41.67)),
                EntryLine::credit("1790", "Accumulated Depreciation", dec!(41.67)),
            ],
        ),
        entry(
            "TXN-0016",
            date(2025, 3, 2),
            "Bank charges",
            S::Manual,
            vec![
                EntryLine::debit("5310", "Bank Charges", dec!(4.25)),
                EntryLine::credit("1001", "Bank Account", dec!(4.25)),
            ],
        ),
        entry(
            "TXN-0017",
            date(2025, 3, 3),
            "Rent received Student 1 (February)",
            S::Payment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(450)),
                EntryLine::credit("1100-stu1", "AR - Student 1", dec!(450)),
            ],
        ),
        entry(
            "TXN-0018",
            date(2025, 3, 4),
            "Duplicate receipt, voided",
            S::Payment,
            vec![
                EntryLine::debit("1001", "Bank Account", dec!(999)),
                EntryLine::credit("4000", "Rental Income", dec!(999)),
            ],
        )
        .with_status(EntryStatus::Voided),
        entry(
            "TXN-0019",
            date(2025, 3, 5),
            "Deposit refund Student 2",
            S::Refund,
            vec![
                EntryLine::debit("2020", "Tenant Security Deposits", dec!(50)),
                EntryLine::credit("1001", "Bank Account", dec!(50)),
            ],
        )
        .for_residence(SOUTH),
    ]
}

/// The kinds of entry the random ledger draws from.
const TEMPLATES: usize = 14;

fn template(kind: usize, amount: Decimal, student: u8) -> (TransactionSource, &'static str, Vec<EntryLine>) {
    use TransactionSource as S;
    let ar = format!("1100-stu{student}");
    match kind {
        0 => (
            S::RentalAccrual,
            "Rent due",
            vec![
                EntryLine::debit(ar.clone(), "AR", amount),
                EntryLine::credit("4000", "Rental Income", amount),
            ],
        ),
        1 => (
            S::Payment,
            "Rent received",
            vec![
                EntryLine::debit("1001", "Bank Account", amount),
                EntryLine::credit(ar, "AR", amount),
            ],
        ),
        2 => (
            S::AdvancePayment,
            "Rent paid in advance",
            vec![
                EntryLine::debit("1002", "Mobile Money", amount),
                EntryLine::credit("2200", "Rent Received in Advance", amount),
            ],
        ),
        3 => (
            S::Payment,
            "Security deposit",
            vec![
                EntryLine::debit("1001", "Bank Account", amount),
                EntryLine::credit("2020", "Tenant Security Deposits", amount),
            ],
        ),
        4 => (
            S::ExpensePayment,
            "Repairs",
            vec![
                EntryLine::debit("5000", "Maintenance & Repairs", amount),
                EntryLine::credit("1011", "Admin Petty Cash", amount),
            ],
        ),
        5 => (
            S::ExpenseAccrual,
            "Water bill",
            vec![
                EntryLine::debit("5110", "Water", amount),
                EntryLine::credit("2000", "Accounts Payable", amount),
            ],
        ),
        6 => (
            S::VendorPayment,
            "Supplier payment for water",
            vec![
                EntryLine::debit("2000", "Accounts Payable", amount),
                EntryLine::credit("1001", "Bank Account", amount),
            ],
        ),
        7 => (
            S::PettyCash,
            "Petty cash top-up",
            vec![
                EntryLine::debit("1011", "Admin Petty Cash", amount),
                EntryLine::credit("1001", "Bank Account", amount),
            ],
        ),
        8 => (
            S::Manual,
            "Capital contribution",
            vec![
                EntryLine::debit("1001", "Bank Account", amount),
                EntryLine::credit("3000", "Owner's Capital", amount),
            ],
        ),
        9 => (
            S::ExpensePayment,
            "Equipment purchase",
            vec![
                EntryLine::debit("1700", "Equipment", amount),
                EntryLine::credit("1001", "Bank Account", amount),
            ],
        ),
        10 => (
            S::Manual,
            "Loan drawdown",
            vec![
                EntryLine::debit("1001", "Bank Account", amount),
                EntryLine::credit("2500", "Long-term Loan", amount),
            ],
        ),
        11 => (
            S::Adjustment,
            "Depreciation",
            vec![
                EntryLine::debit("5900", "Depreciation", amount),
                EntryLine::credit("1790", "Accumulated Depreciation", amount),
            ],
        ),
        12 => (
            S::Payment,
            "Admin fee",
            vec![
                EntryLine::debit("1000", "Cash on Hand", amount),
                EntryLine::credit("4100", "Administrative Fees", amount),
            ],
        ),
        _ => (
            S::Refund,
            "Deposit refund",
            vec![
                EntryLine::debit("2020", "Tenant Security Deposits", amount),
                EntryLine::credit("1001", "Bank Account", amount),
            ],
        ),
    }
}

/// Random balanced entry, dated between 2024-10-01 and 2025-12-31.
pub fn arb_entry() -> impl Strategy<Value = TransactionEntry> {
    (
        0..TEMPLATES,
        1i64..500_000i64,
        0u64..457,
        0u8..3,
        prop::option::of(prop_oneof![Just(NORTH), Just(SOUTH)]),
        prop_oneof![8 => Just(EntryStatus::Posted), 1 => Just(EntryStatus::Voided), 1 => Just(EntryStatus::Draft)],
    )
        .prop_map(|(kind, cents, offset, student, residence, status)| {
            let amount = Decimal::new(cents, 2);
            let (source, description, lines) = template(kind, amount, student);
            let day = date(2024, 10, 1) + Days::new(offset);
            let mut entry = TransactionEntry::new("TXN", day, description, source).with_status(status);
            entry.residence = residence;
            entry.lines = lines;
            entry
        })
}

/// Random ledger with unique transaction numbers.
pub fn arb_ledger() -> impl Strategy<Value = Vec<TransactionEntry>> {
    prop::collection::vec(arb_entry(), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, mut entry)| {
                entry.transaction_id = format!("TXN-{i:04}");
                entry
            })
            .collect()
    })
}
