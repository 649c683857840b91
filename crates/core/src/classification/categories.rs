//! Statement categories for accounts.

use serde::{Deserialize, Serialize};

use super::codes::{chart_number, is_contra_asset, keywords_match};
use crate::accounts::{Account, AccountType};

/// Balance sheet placement of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceSheetClass {
    /// Cash, receivables, prepayments.
    CurrentAsset,
    /// Land, buildings, furniture, equipment.
    NonCurrentAsset,
    /// Payables, tenant deposits, rent received in advance.
    CurrentLiability,
    /// Long-term loans and mortgages.
    NonCurrentLiability,
    /// Owner's capital and retained earnings.
    Equity,
}

const NON_CURRENT_ASSET_WORDS: &[&str] = &[
    "equipment",
    "building",
    "furniture",
    "vehicle",
    "freehold",
    "leasehold",
    "long-term",
];

const NON_CURRENT_LIABILITY_WORDS: &[&str] = &["long-term", "loan", "mortgage"];

/// Classifies a balance sheet account as current or non-current.
///
/// Returns `None` for income and expense accounts.
#[must_use]
pub fn balance_sheet_class(account: &Account) -> Option<BalanceSheetClass> {
    let number = chart_number(&account.code);
    match account.account_type {
        AccountType::Asset => {
            let non_current = is_contra_asset(&account.name)
                || keywords_match(&account.name, NON_CURRENT_ASSET_WORDS)
                || number.is_some_and(|n| n >= 1500);
            Some(if non_current {
                BalanceSheetClass::NonCurrentAsset
            } else {
                BalanceSheetClass::CurrentAsset
            })
        }
        AccountType::Liability => {
            let non_current = keywords_match(&account.name, NON_CURRENT_LIABILITY_WORDS)
                || number.is_some_and(|n| n >= 2500);
            Some(if non_current {
                BalanceSheetClass::NonCurrentLiability
            } else {
                BalanceSheetClass::CurrentLiability
            })
        }
        AccountType::Equity => Some(BalanceSheetClass::Equity),
        AccountType::Income | AccountType::Expense => None,
    }
}

/// Income statement grouping for income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    /// Rent and accommodation fees.
    Rental,
    /// Administration and booking fees.
    AdminFees,
    /// Forfeited or retained deposits.
    Deposit,
    /// Everything else.
    Other,
}

impl IncomeCategory {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rental => "Rental Income",
            Self::AdminFees => "Administrative Fees",
            Self::Deposit => "Deposit Income",
            Self::Other => "Other Income",
        }
    }

    /// Snake-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Rental => "rental",
            Self::AdminFees => "admin_fees",
            Self::Deposit => "deposit",
            Self::Other => "other",
        }
    }
}

/// Income statement grouping for expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Repairs and upkeep.
    Maintenance,
    /// Electricity, water, gas, internet.
    Utilities,
    /// Salaries and wages.
    Staff,
    /// Office, bank charges, stationery.
    Administrative,
    /// Everything else.
    Other,
}

impl ExpenseCategory {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Maintenance => "Maintenance & Repairs",
            Self::Utilities => "Utilities",
            Self::Staff => "Staff Costs",
            Self::Administrative => "Administrative Expenses",
            Self::Other => "Other Expenses",
        }
    }

    /// Snake-case key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Utilities => "utilities",
            Self::Staff => "staff",
            Self::Administrative => "administrative",
            Self::Other => "other",
        }
    }
}

/// Classifies an income account by code range, then by name keywords.
#[must_use]
pub fn income_category(code: &str, name: &str) -> IncomeCategory {
    match chart_number(code) {
        Some(4000..=4099) => IncomeCategory::Rental,
        Some(4100..=4199) => IncomeCategory::AdminFees,
        Some(4300..=4399) => IncomeCategory::Deposit,
        _ => income_category_from_text(name),
    }
}

/// Classifies income from free text only (account names, descriptions).
#[must_use]
pub fn income_category_from_text(text: &str) -> IncomeCategory {
    if keywords_match(text, &["rent", "accommodation", "boarding", "lodging"]) {
        IncomeCategory::Rental
    } else if keywords_match(text, &["admin"]) {
        IncomeCategory::AdminFees
    } else if keywords_match(text, &["deposit"]) {
        IncomeCategory::Deposit
    } else {
        IncomeCategory::Other
    }
}

/// Classifies an expense account by code range, then by name keywords.
#[must_use]
pub fn expense_category(code: &str, name: &str) -> ExpenseCategory {
    match chart_number(code) {
        Some(5000..=5099) => ExpenseCategory::Maintenance,
        Some(5100..=5199) => ExpenseCategory::Utilities,
        Some(5200..=5299) => ExpenseCategory::Staff,
        Some(5300..=5399) => ExpenseCategory::Administrative,
        _ => expense_category_from_text(name),
    }
}

/// Classifies an expense from free text only (account names, descriptions).
#[must_use]
pub fn expense_category_from_text(text: &str) -> ExpenseCategory {
    if keywords_match(
        text,
        &["maintenance", "repair", "plumbing", "painting", "electrician"],
    ) {
        ExpenseCategory::Maintenance
    } else if keywords_match(
        text,
        &["electric", "water", "gas", "internet", "wifi", "utilit", "zesa"],
    ) {
        ExpenseCategory::Utilities
    } else if keywords_match(text, &["salar", "wage", "staff", "payroll"]) {
        ExpenseCategory::Staff
    } else if keywords_match(
        text,
        &["admin", "office", "bank charge", "stationery", "audit", "licen"],
    ) {
        ExpenseCategory::Administrative
    } else {
        ExpenseCategory::Other
    }
}
