//! Report error types.

use lodgebook_shared::AppError;
use thiserror::Error;

use super::request::RequestError;
use crate::ledger::{LedgerValidationError, StoreError};
use crate::period::PeriodError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The request parameters were rejected.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The ledger store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An entry was rejected before it reached the store.
    #[error(transparent)]
    Invalid(#[from] LedgerValidationError),

    /// The report period could not be built.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Reporting settings are unusable.
    #[error("Invalid reporting configuration: {0}")]
    InvalidConfig(String),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Request(e) => Self::Validation(e.to_string()),
            ReportError::Period(e) => Self::Validation(e.to_string()),
            ReportError::Invalid(e) => Self::BusinessRule(e.to_string()),
            ReportError::Store(StoreError::Invalid(e)) => Self::BusinessRule(e.to_string()),
            ReportError::Store(StoreError::DuplicateTransaction(id)) => {
                Self::Conflict(format!("Transaction {id} already exists"))
            }
            ReportError::Store(StoreError::Backend(msg)) => Self::Database(msg),
            ReportError::AccountNotFound(code) => Self::NotFound(format!("Account {code}")),
            ReportError::InvalidConfig(msg) => Self::Config(msg),
        }
    }
}
