//! Cash-basis rules: which entries count as cash, and what the cash was for.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::is_cash_account;
use crate::ledger::{EntryLine, TransactionEntry};

/// Accounting basis of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Income and expenses when money moves.
    #[default]
    Cash,
    /// Income and expenses when earned or incurred.
    Accrual,
}

impl Basis {
    /// Lowercase name used in requests and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Accrual => "accrual",
        }
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Basis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "accrual" | "accruals" => Ok(Self::Accrual),
            _ => Err(format!("Unknown basis: {s} (expected cash or accrual)")),
        }
    }
}

/// Returns true if the entry takes part in reports on the given basis.
///
/// Accrual basis reads every posted entry. Cash basis reads cash-movement
/// sources, and neutral sources (manual, adjustment, reversal, other) only
/// when they touch a cash account. Accrual sources never count as cash.
#[must_use]
pub fn basis_includes(basis: Basis, entry: &TransactionEntry) -> bool {
    if !entry.status.is_posted() {
        return false;
    }
    match basis {
        Basis::Accrual => true,
        Basis::Cash => {
            let source = entry.source;
            source.is_cash_movement() || (source.is_neutral() && entry.touches_cash())
        }
    }
}

/// The part of an entry's cash movement explained by one non-cash line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAttribution {
    /// Counter-account code.
    pub account_code: String,
    /// Counter-account name as recorded on the line.
    pub account_name: String,
    /// Line narrative, falling back to the entry narrative.
    pub description: String,
    /// `credit - debit` of the line: positive is cash in, negative cash out.
    pub amount: Decimal,
}

/// Net movement on the entry's cash lines (`debit - credit`, positive = cash in).
#[must_use]
pub fn net_cash_movement(entry: &TransactionEntry) -> Decimal {
    entry
        .lines
        .iter()
        .filter(|line| line.is_cash())
        .map(EntryLine::signed_amount)
        .sum()
}

/// Returns true if every line posts to a cash account (bank to petty cash, ...).
#[must_use]
pub fn is_internal_transfer(entry: &TransactionEntry) -> bool {
    !entry.lines.is_empty() && entry.lines.iter().all(EntryLine::is_cash)
}

/// Splits an entry's cash movement across its non-cash lines.
///
/// For a balanced entry touching cash the attributions sum to
/// [`net_cash_movement`]. Entries that do not touch cash, and internal
/// transfers, have no attribution.
#[must_use]
pub fn cash_attribution(entry: &TransactionEntry) -> Vec<CashAttribution> {
    if !entry.touches_cash() || is_internal_transfer(entry) {
        return Vec::new();
    }
    entry
        .lines
        .iter()
        .filter(|line| !is_cash_account(&line.account_code))
        .map(|line| CashAttribution {
            account_code: line.account_code.clone(),
            account_name: line.account_name.clone(),
            description: line
                .description
                .clone()
                .unwrap_or_else(|| entry.description.clone()),
            amount: line.credit - line.debit,
        })
        .collect()
}
