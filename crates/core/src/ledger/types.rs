//! Ledger domain types.
//!
//! A [`TransactionEntry`] is one balanced double-entry posting: a set of
//! debit/credit lines tagged with account codes, a source describing what
//! produced it, a date and optional residence / student linkage.

use chrono::{DateTime, NaiveDate, Utc};
use lodgebook_shared::types::{EntryId, ResidenceId, StudentId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classification::is_cash_account;

/// What produced a transaction entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    /// Tenant payment received.
    Payment,
    /// Rent paid ahead of the period it covers.
    AdvancePayment,
    /// Expense paid out of cash or bank.
    ExpensePayment,
    /// Settlement of a supplier invoice.
    VendorPayment,
    /// Petty cash spend or top-up.
    PettyCash,
    /// Money returned to a tenant.
    Refund,
    /// Monthly rent charged to a tenant.
    RentalAccrual,
    /// Expense recognised before it is paid.
    ExpenseAccrual,
    /// Invoice raised to a tenant.
    Invoice,
    /// Manual journal.
    Manual,
    /// Period-end adjustment.
    Adjustment,
    /// Reversal of an earlier entry.
    Reversal,
    /// Anything else.
    Other,
}

impl TransactionSource {
    /// Every source, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Payment,
        Self::AdvancePayment,
        Self::ExpensePayment,
        Self::VendorPayment,
        Self::PettyCash,
        Self::Refund,
        Self::RentalAccrual,
        Self::ExpenseAccrual,
        Self::Invoice,
        Self::Manual,
        Self::Adjustment,
        Self::Reversal,
        Self::Other,
    ];

    /// Returns true if the source records money actually changing hands.
    #[must_use]
    pub const fn is_cash_movement(self) -> bool {
        matches!(
            self,
            Self::Payment
                | Self::AdvancePayment
                | Self::ExpensePayment
                | Self::VendorPayment
                | Self::PettyCash
                | Self::Refund
        )
    }

    /// Returns true if the source recognises income or expense without cash.
    #[must_use]
    pub const fn is_accrual(self) -> bool {
        matches!(
            self,
            Self::RentalAccrual | Self::ExpenseAccrual | Self::Invoice
        )
    }

    /// Neither a cash movement nor an accrual.
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        !self.is_cash_movement() && !self.is_accrual()
    }

    /// Snake-case name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::AdvancePayment => "advance_payment",
            Self::ExpensePayment => "expense_payment",
            Self::VendorPayment => "vendor_payment",
            Self::PettyCash => "petty_cash",
            Self::Refund => "refund",
            Self::RentalAccrual => "rental_accrual",
            Self::ExpenseAccrual => "expense_accrual",
            Self::Invoice => "invoice",
            Self::Manual => "manual",
            Self::Adjustment => "adjustment",
            Self::Reversal => "reversal",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    /// Parses a source name. Legacy spellings from older imports are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let source = match normalized.as_str() {
            "payment" | "tenant_payment" | "receipt" => Self::Payment,
            "advance_payment" | "advance" => Self::AdvancePayment,
            "expense_payment" => Self::ExpensePayment,
            "vendor_payment" | "supplier_payment" => Self::VendorPayment,
            "petty_cash" | "petty_cash_expense" => Self::PettyCash,
            "refund" => Self::Refund,
            "rental_accrual" | "rent_accrual" => Self::RentalAccrual,
            "expense_accrual" => Self::ExpenseAccrual,
            "invoice" => Self::Invoice,
            "manual" | "journal" => Self::Manual,
            "adjustment" => Self::Adjustment,
            "reversal" => Self::Reversal,
            "other" => Self::Other,
            _ => return Err(format!("Unknown transaction source: {s}")),
        };
        Ok(source)
    }
}

/// Lifecycle of an entry. Only posted entries reach reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Being prepared, not yet on the books.
    Draft,
    /// On the books (immutable).
    #[default]
    Posted,
    /// Cancelled before it took effect (immutable).
    Voided,
}

impl EntryStatus {
    /// Returns true if the entry counts towards balances.
    #[must_use]
    pub const fn is_posted(self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Lowercase name used in storage and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "voided" | "void" => Ok(Self::Voided),
            _ => Err(format!("Unknown entry status: {s}")),
        }
    }
}

/// One debit or credit line of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    /// Account code the line posts to.
    pub account_code: String,
    /// Account name as recorded on the line.
    #[serde(default)]
    pub account_name: String,
    /// Debit amount (zero on credit lines).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero on debit lines).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line narrative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntryLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(
        account_code: impl Into<String>,
        account_name: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            account_name: account_name.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Sets the line narrative.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `debit - credit`.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the line posts to a cash or bank account.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        is_cash_account(&self.account_code)
    }
}

/// A double-entry transaction as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// Storage id.
    pub id: EntryId,
    /// Business transaction number, unique across the ledger.
    pub transaction_id: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Entry narrative.
    pub description: String,
    /// External reference (receipt number, invoice number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// What produced the entry.
    pub source: TransactionSource,
    /// Id of the originating document (payment, expense, invoice).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Residence the entry belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence: Option<ResidenceId>,
    /// Student (tenant) the entry relates to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentId>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: EntryStatus,
    /// Debit and credit lines.
    pub lines: Vec<EntryLine>,
    /// User who recorded the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl TransactionEntry {
    /// Creates a posted entry with no lines.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        source: TransactionSource,
    ) -> Self {
        Self {
            id: EntryId::new(),
            transaction_id: transaction_id.into(),
            date,
            description: description.into(),
            reference: None,
            source,
            source_id: None,
            residence: None,
            student: None,
            status: EntryStatus::Posted,
            lines: Vec::new(),
            created_by: None,
            created_at: Utc::now(),
        }
    }

    /// Appends a line.
    #[must_use]
    pub fn with_line(mut self, line: EntryLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Links the entry to a residence.
    #[must_use]
    pub fn for_residence(mut self, residence: ResidenceId) -> Self {
        self.residence = Some(residence);
        self
    }

    /// Links the entry to a student.
    #[must_use]
    pub fn for_student(mut self, student: StudentId) -> Self {
        self.student = Some(student);
        self
    }

    /// Sets the external reference.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// `total_debit() == total_credit()`, compared exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Returns true if any line posts to a cash account.
    #[must_use]
    pub fn touches_cash(&self) -> bool {
        self.lines.iter().any(EntryLine::is_cash)
    }

    /// Builds the entry that cancels this one: same lines with sides swapped.
    ///
    /// The reversal is posted on `date`; the original is left untouched.
    #[must_use]
    pub fn reversal(&self, transaction_id: impl Into<String>, date: NaiveDate) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| EntryLine {
                account_code: line.account_code.clone(),
                account_name: line.account_name.clone(),
                debit: line.credit,
                credit: line.debit,
                description: line.description.clone(),
            })
            .collect();

        Self {
            id: EntryId::new(),
            transaction_id: transaction_id.into(),
            date,
            description: format!("Reversal of {}", self.transaction_id),
            reference: Some(self.transaction_id.clone()),
            source: TransactionSource::Reversal,
            source_id: Some(self.id.to_string()),
            residence: self.residence,
            student: self.student,
            status: EntryStatus::Posted,
            lines,
            created_by: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn rent_payment() -> TransactionEntry {
        TransactionEntry::new(
            "TXN-0001",
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            "March rent",
            TransactionSource::Payment,
        )
        .with_line(EntryLine::debit("1001", "Bank Account", dec!(450)))
        .with_line(EntryLine::credit("1100", "Accounts Receivable", dec!(450)))
    }

    #[test]
    fn test_sources_partition() {
        for source in TransactionSource::ALL {
            let flags = [
                source.is_cash_movement(),
                source.is_accrual(),
                source.is_neutral(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{source}");
        }
    }

    #[rstest]
    #[case("payment", TransactionSource::Payment)]
    #[case("Expense Payment", TransactionSource::ExpensePayment)]
    #[case("rent-accrual", TransactionSource::RentalAccrual)]
    #[case("journal", TransactionSource::Manual)]
    #[case("PETTY_CASH", TransactionSource::PettyCash)]
    fn test_source_from_str(#[case] input: &str, #[case] expected: TransactionSource) {
        assert_eq!(TransactionSource::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_source_round_trips_through_as_str() {
        for source in TransactionSource::ALL {
            assert_eq!(TransactionSource::from_str(source.as_str()).unwrap(), source);
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.as_str()));
        }
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert!(TransactionSource::from_str("barter").is_err());
    }

    #[test]
    fn test_totals_and_balance() {
        let entry = rent_payment();
        assert_eq!(entry.total_debit(), dec!(450));
        assert_eq!(entry.total_credit(), dec!(450));
        assert!(entry.is_balanced());
        assert!(entry.touches_cash());
    }

    #[test]
    fn test_accrual_does_not_touch_cash() {
        let entry = TransactionEntry::new(
            "TXN-0002",
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            "Rent due",
            TransactionSource::RentalAccrual,
        )
        .with_line(EntryLine::debit("1100", "Accounts Receivable", dec!(450)))
        .with_line(EntryLine::credit("4000", "Rental Income", dec!(450)));
        assert!(!entry.touches_cash());
    }

    #[test]
    fn test_reversal_swaps_sides() {
        let original = rent_payment();
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let reversal = original.reversal("TXN-0001-R", date);

        assert_eq!(reversal.source, TransactionSource::Reversal);
        assert_eq!(reversal.date, date);
        assert_eq!(reversal.reference.as_deref(), Some("TXN-0001"));
        assert!(reversal.is_balanced());
        for (a, b) in original.lines.iter().zip(&reversal.lines) {
            assert_eq!(a.signed_amount(), -b.signed_amount());
        }
        assert_eq!(original.status, EntryStatus::Posted);
    }

    #[test]
    fn test_status_default_and_parse() {
        assert_eq!(EntryStatus::default(), EntryStatus::Posted);
        assert!(EntryStatus::Posted.is_posted());
        assert!(!EntryStatus::Voided.is_posted());
        assert_eq!(EntryStatus::from_str("void").unwrap(), EntryStatus::Voided);
    }
}
