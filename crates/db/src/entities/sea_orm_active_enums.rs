//! Postgres enum types and their mapping to the domain enums.

use lodgebook_core::accounts::AccountType as DomainAccountType;
use lodgebook_core::ledger::{EntryStatus as DomainEntryStatus, TransactionSource as DomainSource};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_source")]
pub enum TransactionSource {
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "advance_payment")]
    AdvancePayment,
    #[sea_orm(string_value = "expense_payment")]
    ExpensePayment,
    #[sea_orm(string_value = "vendor_payment")]
    VendorPayment,
    #[sea_orm(string_value = "petty_cash")]
    PettyCash,
    #[sea_orm(string_value = "refund")]
    Refund,
    #[sea_orm(string_value = "rental_accrual")]
    RentalAccrual,
    #[sea_orm(string_value = "expense_accrual")]
    ExpenseAccrual,
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
    #[sea_orm(string_value = "reversal")]
    Reversal,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "voided")]
    Voided,
}

impl From<DomainAccountType> for AccountType {
    fn from(value: DomainAccountType) -> Self {
        match value {
            DomainAccountType::Asset => Self::Asset,
            DomainAccountType::Liability => Self::Liability,
            DomainAccountType::Equity => Self::Equity,
            DomainAccountType::Income => Self::Income,
            DomainAccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for DomainAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Income => Self::Income,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<DomainSource> for TransactionSource {
    fn from(value: DomainSource) -> Self {
        match value {
            DomainSource::Payment => Self::Payment,
            DomainSource::AdvancePayment => Self::AdvancePayment,
            DomainSource::ExpensePayment => Self::ExpensePayment,
            DomainSource::VendorPayment => Self::VendorPayment,
            DomainSource::PettyCash => Self::PettyCash,
            DomainSource::Refund => Self::Refund,
            DomainSource::RentalAccrual => Self::RentalAccrual,
            DomainSource::ExpenseAccrual => Self::ExpenseAccrual,
            DomainSource::Invoice => Self::Invoice,
            DomainSource::Manual => Self::Manual,
            DomainSource::Adjustment => Self::Adjustment,
            DomainSource::Reversal => Self::Reversal,
            DomainSource::Other => Self::Other,
        }
    }
}

impl From<TransactionSource> for DomainSource {
    fn from(value: TransactionSource) -> Self {
        match value {
            TransactionSource::Payment => Self::Payment,
            TransactionSource::AdvancePayment => Self::AdvancePayment,
            TransactionSource::ExpensePayment => Self::ExpensePayment,
            TransactionSource::VendorPayment => Self::VendorPayment,
            TransactionSource::PettyCash => Self::PettyCash,
            TransactionSource::Refund => Self::Refund,
            TransactionSource::RentalAccrual => Self::RentalAccrual,
            TransactionSource::ExpenseAccrual => Self::ExpenseAccrual,
            TransactionSource::Invoice => Self::Invoice,
            TransactionSource::Manual => Self::Manual,
            TransactionSource::Adjustment => Self::Adjustment,
            TransactionSource::Reversal => Self::Reversal,
            TransactionSource::Other => Self::Other,
        }
    }
}

impl From<DomainEntryStatus> for EntryStatus {
    fn from(value: DomainEntryStatus) -> Self {
        match value {
            DomainEntryStatus::Draft => Self::Draft,
            DomainEntryStatus::Posted => Self::Posted,
            DomainEntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<EntryStatus> for DomainEntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}
