//! Classification rules.
//!
//! Pure functions that place account codes on the chart, group accounts
//! into statement categories, and decide whether an entry is a cash
//! movement.

pub mod cash;
pub mod categories;
pub mod codes;

pub use cash::{
    Basis, CashAttribution, basis_includes, cash_attribution, is_internal_transfer,
    net_cash_movement,
};
pub use categories::{
    BalanceSheetClass, ExpenseCategory, IncomeCategory, balance_sheet_class, expense_category,
    expense_category_from_text, income_category, income_category_from_text,
};
pub use codes::{
    account_type_for_code, chart_number, is_cash_account, is_contra_asset, is_deferred_income,
    is_descendant, is_payable, is_receivable, is_tenant_deposit, root_code,
};
