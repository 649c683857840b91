//! Account repository for chart of accounts database operations.

use lodgebook_core::accounts::Account;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code is blank.
    #[error("Account code is required")]
    MissingCode,

    /// Account lists itself as its parent.
    #[error("Account {0} cannot be its own parent")]
    SelfParent(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            category: model.category,
            parent_code: model.parent_code,
            is_active: model.is_active,
        }
    }
}

fn active_model(account: &Account) -> Result<accounts::ActiveModel, AccountError> {
    if account.code.trim().is_empty() {
        return Err(AccountError::MissingCode);
    }
    if account.parent_code.as_deref() == Some(account.code.as_str()) {
        return Err(AccountError::SelfParent(account.code.clone()));
    }

    let now = chrono::Utc::now().into();
    Ok(accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(account.code.clone()),
        name: Set(account.name.clone()),
        account_type: Set(account.account_type.into()),
        category: Set(account.category.clone()),
        parent_code: Set(account.parent_code.clone()),
        is_active: Set(account.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

fn on_code_conflict() -> OnConflict {
    OnConflict::column(accounts::Column::Code)
        .update_columns([
            accounts::Column::Name,
            accounts::Column::AccountType,
            accounts::Column::Category,
            accounts::Column::ParentCode,
            accounts::Column::IsActive,
            accounts::Column::UpdatedAt,
        ])
        .to_owned()
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every account, active or not, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    /// Lists accounts open for posting, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Account>, AccountError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(account.map(Account::from))
    }

    /// Inserts an account, or updates the one with the same code.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is malformed or the write fails.
    pub async fn upsert(&self, account: &Account) -> Result<(), AccountError> {
        let model = active_model(account)?;
        accounts::Entity::insert(model)
            .on_conflict(on_code_conflict())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Upserts a whole chart in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any account is malformed or a write fails; nothing
    /// is written in that case.
    pub async fn upsert_chart(&self, chart: &[Account]) -> Result<usize, AccountError> {
        let models = chart
            .iter()
            .map(active_model)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;
        for model in models {
            accounts::Entity::insert(model)
                .on_conflict(on_code_conflict())
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        info!(accounts = chart.len(), "Chart of accounts upserted");
        Ok(chart.len())
    }
}
