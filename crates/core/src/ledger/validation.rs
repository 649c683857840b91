//! Business rule validation for ledger entries.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{EntryLine, TransactionEntry};
use crate::accounts::AccountDirectory;

/// Validation errors for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerValidationError {
    /// Entry debits do not equal credits.
    #[error("Transaction is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Entry has no lines.
    #[error("Transaction must have at least one line")]
    NoLines,

    /// Entry has only one side (all debits or all credits).
    #[error("Transaction must have both debit and credit lines")]
    SingleSided,

    /// A line has a negative amount.
    #[error("Line {index}: amounts must not be negative")]
    NegativeAmount {
        /// Zero-based line index.
        index: usize,
    },

    /// A line carries both a debit and a credit.
    #[error("Line {index}: a line is either a debit or a credit, not both")]
    BothSides {
        /// Zero-based line index.
        index: usize,
    },

    /// A line has neither a debit nor a credit.
    #[error("Line {index}: amount must be positive")]
    ZeroAmount {
        /// Zero-based line index.
        index: usize,
    },

    /// A line has no account code.
    #[error("Line {index}: account code is required")]
    MissingAccount {
        /// Zero-based line index.
        index: usize,
    },

    /// A line posts to a code the chart cannot place.
    #[error("Line {index}: account {code} is not in the chart of accounts")]
    UnknownAccount {
        /// Zero-based line index.
        index: usize,
        /// Offending code.
        code: String,
    },

    /// A line posts to an account closed for posting.
    #[error("Line {index}: account {code} is inactive")]
    InactiveAccount {
        /// Zero-based line index.
        index: usize,
        /// Offending code.
        code: String,
    },

    /// The business transaction number is blank.
    #[error("Transaction id is required")]
    MissingTransactionId,
}

fn validate_line(index: usize, line: &EntryLine) -> Result<(), LedgerValidationError> {
    if line.account_code.trim().is_empty() {
        return Err(LedgerValidationError::MissingAccount { index });
    }
    if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
        return Err(LedgerValidationError::NegativeAmount { index });
    }
    if line.debit > Decimal::ZERO && line.credit > Decimal::ZERO {
        return Err(LedgerValidationError::BothSides { index });
    }
    if line.debit.is_zero() && line.credit.is_zero() {
        return Err(LedgerValidationError::ZeroAmount { index });
    }
    Ok(())
}

/// Validates the double-entry rules of a transaction entry.
///
/// # Errors
///
/// Returns the first rule the entry violates.
pub fn validate_entry(entry: &TransactionEntry) -> Result<(), LedgerValidationError> {
    if entry.transaction_id.trim().is_empty() {
        return Err(LedgerValidationError::MissingTransactionId);
    }
    if entry.lines.is_empty() {
        return Err(LedgerValidationError::NoLines);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for (index, line) in entry.lines.iter().enumerate() {
        validate_line(index, line)?;
        total_debits += line.debit;
        total_credits += line.credit;
    }

    if total_debits.is_zero() || total_credits.is_zero() {
        return Err(LedgerValidationError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}

/// Validates an entry and checks every line against the chart of accounts.
///
/// # Errors
///
/// Returns the first double-entry or account rule the entry violates.
pub fn validate_against_directory(
    entry: &TransactionEntry,
    directory: &AccountDirectory,
) -> Result<(), LedgerValidationError> {
    validate_entry(entry)?;

    for (index, line) in entry.lines.iter().enumerate() {
        match directory.get(&line.account_code) {
            Some(account) if !account.is_active => {
                return Err(LedgerValidationError::InactiveAccount {
                    index,
                    code: line.account_code.clone(),
                });
            }
            Some(_) => {}
            None => {
                if directory
                    .resolve(&line.account_code, &line.account_name)
                    .is_none()
                {
                    return Err(LedgerValidationError::UnknownAccount {
                        index,
                        code: line.account_code.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}
