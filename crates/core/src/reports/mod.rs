//! Financial report generation.
//!
//! Statement assemblers are pure functions over a chart of accounts and a
//! slice of entries:
//! - Income Statement (cash or accrual basis)
//! - Balance Sheet, point in time or month by month
//! - Cash Flow Statement
//! - Trial Balance
//! - General Ledger
//!
//! [`FinancialReportsService`] reads what they need from a ledger store and
//! keeps generated reports in a [`ReportCache`].

pub mod balance_sheet;
pub mod cache;
pub mod cash_flow;
pub mod error;
pub mod general_ledger;
pub mod income_statement;
pub mod request;
pub mod service;
pub mod trial_balance;
pub mod types;


pub use balance_sheet::{
    BalanceSection, BalanceSheet, MonthlyBalanceSheet, balance_sheet, monthly_balance_sheet,
};
pub use cache::ReportCache;
pub use cash_flow::{CashFlowLine, CashFlowSection, CashFlowStatement, cash_flow};
pub use error::ReportError;
pub use general_ledger::{GeneralLedger, GeneralLedgerLine, general_ledger};
pub use income_statement::{IncomeStatement, income_statement};
pub use request::{ReportParams, ReportRequest, RequestDefaults, RequestError, parse_residence};
pub use service::{
    FinancialReportsService, GeneratedReport, InvalidEntry, LedgerVerification, ReportSettings,
    UnbalancedEntry, assemble,
};
pub use trial_balance::{TrialBalance, TrialBalanceLine, trial_balance};
pub use types::{
    AmountSeries, BalanceLine, CategoryGroup, ReportDocument, ReportKind, StatementLine,
    StatementSection,
};
