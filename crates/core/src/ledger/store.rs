//! Ledger store abstraction and the in-memory implementation.
//!
//! The ledger is append-only: entries are never updated in place. A posting
//! is cancelled by appending its reversal.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::query::LedgerQuery;
use super::types::TransactionEntry;
use super::validation::{LedgerValidationError, validate_entry};
use crate::accounts::{Account, AccountDirectory};

/// Errors raised by ledger stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entry breaks a double-entry rule.
    #[error(transparent)]
    Invalid(#[from] LedgerValidationError),

    /// An entry with the same business transaction number already exists.
    #[error("Transaction {0} already exists")]
    DuplicateTransaction(String),

    /// The backing store failed.
    #[error("Ledger store failure: {0}")]
    Backend(String),
}

/// Result type for ledger store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Source of accounts and posted entries for reporting.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns the chart of accounts.
    async fn accounts(&self) -> StoreResult<Vec<Account>>;

    /// Returns the posted entries matching `query`, ordered by date then
    /// transaction number.
    async fn entries(&self, query: &LedgerQuery) -> StoreResult<Vec<TransactionEntry>>;

    /// Validates and appends an entry.
    async fn append(&self, entry: TransactionEntry) -> StoreResult<()>;

    /// Loads the chart of accounts into a directory.
    async fn directory(&self) -> StoreResult<AccountDirectory> {
        Ok(AccountDirectory::new(self.accounts().await?))
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<TransactionEntry>,
    transaction_ids: HashSet<String>,
}

/// Ledger store held in process memory.
///
/// Used by tests and anywhere a database is not available. Cloning shares
/// the same ledger.
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    accounts: Arc<Vec<Account>>,
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger over the given chart of accounts.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(accounts),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Creates a ledger pre-loaded with entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails validation or repeats a
    /// transaction number.
    pub fn with_entries(
        accounts: Vec<Account>,
        entries: impl IntoIterator<Item = TransactionEntry>,
    ) -> StoreResult<Self> {
        let mut inner = Inner::default();
        for entry in entries {
            Self::push(&mut inner, entry)?;
        }
        Ok(Self {
            accounts: Arc::new(accounts),
            inner: Arc::new(RwLock::new(inner)),
        })
    }

    /// Number of stored entries, posted or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Returns true if nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }

    fn push(inner: &mut Inner, entry: TransactionEntry) -> StoreResult<()> {
        validate_entry(&entry)?;
        if !inner.transaction_ids.insert(entry.transaction_id.clone()) {
            return Err(StoreError::DuplicateTransaction(entry.transaction_id));
        }
        inner.entries.push(entry);
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.accounts.as_ref().clone())
    }

    async fn entries(&self, query: &LedgerQuery) -> StoreResult<Vec<TransactionEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<TransactionEntry> = inner
            .entries
            .iter()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(entries)
    }

    async fn append(&self, entry: TransactionEntry) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        Self::push(&mut inner, entry)
    }
}
