//! Double-entry ledger.
//!
//! - Transaction entries and their lines
//! - Business rule validation
//! - Balance calculations
//! - Query filters and the append-only ledger store

pub mod balance;
pub mod query;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::{NormalBalance, RunningBalance};
pub use query::LedgerQuery;
pub use store::{InMemoryLedger, LedgerStore, StoreError, StoreResult};
pub use types::{EntryLine, EntryStatus, TransactionEntry, TransactionSource};
pub use validation::{LedgerValidationError, validate_against_directory, validate_entry};
