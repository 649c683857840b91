//! Ledger repository: the Postgres-backed ledger store.
//!
//! Entries are written once, header and lines in one database transaction,
//! and never updated.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use lodgebook_core::accounts::Account;
use lodgebook_core::ledger::{
    EntryLine, LedgerQuery, LedgerStore, StoreError, StoreResult, TransactionEntry, validate_entry,
};
use lodgebook_shared::types::{EntryId, ResidenceId, StudentId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::account::{AccountError, AccountRepository};
use crate::entities::{entry_lines, sea_orm_active_enums::EntryStatus, transaction_entries};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// An entry with the same transaction number is already stored.
    #[error("Transaction {0} already exists")]
    DuplicateTransaction(String),

    /// A line index does not fit the line number column.
    #[error("Entry {0} has too many lines")]
    TooManyLines(String),

    /// Account lookup failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Unique constraint on `transaction_entries.transaction_id`.
const TRANSACTION_ID_CONSTRAINT: &str = "transaction_entries_transaction_id_key";

impl LedgerError {
    /// Maps a failed header insert, turning a transaction number clash into
    /// [`LedgerError::DuplicateTransaction`].
    fn from_header_insert(err: DbErr, transaction_id: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
                if message.contains(TRANSACTION_ID_CONSTRAINT) =>
            {
                Self::DuplicateTransaction(transaction_id.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

impl From<LedgerError> for StoreError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateTransaction(id) => Self::DuplicateTransaction(id),
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Header conditions of a ledger query, usable on any select joined to
/// `transaction_entries`.
fn header_condition(query: &LedgerQuery) -> Condition {
    let mut condition = Condition::all()
        .add(transaction_entries::Column::Status.eq(EntryStatus::Posted))
        .add(transaction_entries::Column::EntryDate.lte(query.to));
    if let Some(from) = query.from {
        condition = condition.add(transaction_entries::Column::EntryDate.gte(from));
    }
    if let Some(residence) = query.residence {
        condition = condition.add(transaction_entries::Column::ResidenceId.eq(residence.into_inner()));
    }
    condition
}

fn into_entry(header: transaction_entries::Model, mut lines: Vec<entry_lines::Model>) -> TransactionEntry {
    lines.sort_by_key(|line| line.line_no);
    TransactionEntry {
        id: EntryId::from_uuid(header.id),
        transaction_id: header.transaction_id,
        date: header.entry_date,
        description: header.description,
        reference: header.reference,
        source: header.source.into(),
        source_id: header.source_id,
        residence: header.residence_id.map(ResidenceId::from_uuid),
        student: header.student_id.map(StudentId::from_uuid),
        status: header.status.into(),
        lines: lines
            .into_iter()
            .map(|line| EntryLine {
                account_code: line.account_code,
                account_name: line.account_name,
                debit: line.debit,
                credit: line.credit,
                description: line.description,
            })
            .collect(),
        created_by: header.created_by.map(UserId::from_uuid),
        created_at: header.created_at.with_timezone(&Utc),
    }
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    accounts: AccountRepository,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            db,
        }
    }

    /// The account repository sharing this connection.
    #[must_use]
    pub const fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    /// Loads posted entries matching `query` with their lines, ordered by
    /// date then transaction number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_entries(&self, query: &LedgerQuery) -> Result<Vec<TransactionEntry>, LedgerError> {
        let headers = transaction_entries::Entity::find()
            .filter(header_condition(query))
            .order_by_asc(transaction_entries::Column::EntryDate)
            .order_by_asc(transaction_entries::Column::TransactionId)
            .all(&self.db)
            .await?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        // Same header filters through a join; no per-entry bind parameters.
        let mut lines_by_entry: HashMap<Uuid, Vec<entry_lines::Model>> = HashMap::new();
        for line in entry_lines::Entity::find()
            .inner_join(transaction_entries::Entity)
            .filter(header_condition(query))
            .all(&self.db)
            .await?
        {
            lines_by_entry.entry(line.entry_id).or_default().push(line);
        }

        let entries: Vec<TransactionEntry> = headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_entry.remove(&header.id).unwrap_or_default();
                into_entry(header, lines)
            })
            .collect();
        debug!(entries = entries.len(), "Ledger entries loaded");
        Ok(entries)
    }

    /// Inserts an entry and its lines in one database transaction.
    ///
    /// Double-entry rules are checked by [`LedgerStore::append`]; this only
    /// guards the transaction number, through its unique constraint.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction number is taken or the write fails.
    pub async fn insert_entry(&self, entry: &TransactionEntry) -> Result<(), LedgerError> {
        let txn = self.db.begin().await?;

        let entry_id = entry.id.into_inner();
        let header = transaction_entries::ActiveModel {
            id: Set(entry_id),
            transaction_id: Set(entry.transaction_id.clone()),
            entry_date: Set(entry.date),
            description: Set(entry.description.clone()),
            reference: Set(entry.reference.clone()),
            source: Set(entry.source.into()),
            source_id: Set(entry.source_id.clone()),
            residence_id: Set(entry.residence.map(ResidenceId::into_inner)),
            student_id: Set(entry.student.map(StudentId::into_inner)),
            status: Set(entry.status.into()),
            created_by: Set(entry.created_by.map(UserId::into_inner)),
            created_at: Set(entry.created_at.into()),
        };
        header
            .insert(&txn)
            .await
            .map_err(|err| LedgerError::from_header_insert(err, &entry.transaction_id))?;

        for (index, line) in entry.lines.iter().enumerate() {
            let line_no = i32::try_from(index)
                .map_err(|_| LedgerError::TooManyLines(entry.transaction_id.clone()))?;
            entry_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                entry_id: Set(entry_id),
                line_no: Set(line_no),
                account_code: Set(line.account_code.clone()),
                account_name: Set(line.account_name.clone()),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description.clone()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        info!(
            transaction_id = %entry.transaction_id,
            lines = entry.lines.len(),
            "Entry stored"
        );
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn accounts(&self) -> StoreResult<Vec<Account>> {
        self.accounts
            .list_accounts()
            .await
            .map_err(|err| LedgerError::from(err).into())
    }

    async fn entries(&self, query: &LedgerQuery) -> StoreResult<Vec<TransactionEntry>> {
        Ok(self.find_entries(query).await?)
    }

    async fn append(&self, entry: TransactionEntry) -> StoreResult<()> {
        validate_entry(&entry)?;
        Ok(self.insert_entry(&entry).await?)
    }
}
