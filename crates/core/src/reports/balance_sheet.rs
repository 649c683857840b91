//! Balance sheet assembly.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lodgebook_shared::types::{Currency, ResidenceId, round_cents, within_tolerance};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BalanceLine, ReportKind};
use crate::accounts::{Account, AccountDirectory, AccountType};
use crate::aggregation::{UnclassifiedLine, aggregate_accounts};
use crate::classification::{BalanceSheetClass, balance_sheet_class};
use crate::ledger::{LedgerQuery, TransactionEntry};
use crate::period::{MonthKey, PeriodError, ReportPeriod};

/// Lines of one balance sheet class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSection {
    /// Non-zero account balances, in code order.
    pub lines: Vec<BalanceLine>,
    /// Sum of the lines.
    pub total: Decimal,
}

impl BalanceSection {
    fn push(&mut self, line: BalanceLine) {
        self.total += line.balance;
        self.lines.push(line);
    }
}

/// Financial position at a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Always [`ReportKind::BalanceSheet`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Balances include every posted entry up to this date.
    pub as_of: NaiveDate,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Cash, receivables, prepayments.
    pub current_assets: BalanceSection,
    /// Property, furniture, equipment net of depreciation.
    pub non_current_assets: BalanceSection,
    /// Payables, deposits held, rent received in advance.
    pub current_liabilities: BalanceSection,
    /// Long-term loans.
    pub non_current_liabilities: BalanceSection,
    /// Equity accounts.
    pub equity: BalanceSection,
    /// Cumulative income less expenses.
    pub retained_earnings: Decimal,
    /// Current plus non-current assets.
    pub total_assets: Decimal,
    /// Current plus non-current liabilities.
    pub total_liabilities: Decimal,
    /// Equity accounts plus retained earnings.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Assets less liabilities and equity, rounded to cents.
    pub difference: Decimal,
    /// True when the difference is within one cent.
    pub is_balanced: bool,
    /// Lines left out because their account could not be classified.
    pub unclassified: Vec<UnclassifiedLine>,
}

/// Builds the balance sheet at the end of `as_of`.
#[must_use]
pub fn balance_sheet(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    as_of: NaiveDate,
    residence: Option<ResidenceId>,
    currency: Currency,
) -> BalanceSheet {
    let scoped = LedgerQuery::through(as_of)
        .for_residence(residence)
        .select(entries);
    let aggregates =
        aggregate_accounts(directory, scoped, &ReportPeriod::through(as_of)).rolled_up(directory);

    let mut current_assets = BalanceSection::default();
    let mut non_current_assets = BalanceSection::default();
    let mut current_liabilities = BalanceSection::default();
    let mut non_current_liabilities = BalanceSection::default();
    let mut equity = BalanceSection::default();

    for aggregate in aggregates.accounts.values() {
        let balance = aggregate.balance();
        if balance.is_zero() {
            continue;
        }
        let account = directory.get(&aggregate.code).cloned().unwrap_or_else(|| {
            Account::new(&aggregate.code, &aggregate.name, aggregate.account_type)
        });
        let Some(class) = balance_sheet_class(&account) else {
            continue;
        };
        let line = BalanceLine {
            code: aggregate.code.clone(),
            name: aggregate.name.clone(),
            balance,
        };
        match class {
            BalanceSheetClass::CurrentAsset => current_assets.push(line),
            BalanceSheetClass::NonCurrentAsset => non_current_assets.push(line),
            BalanceSheetClass::CurrentLiability => current_liabilities.push(line),
            BalanceSheetClass::NonCurrentLiability => non_current_liabilities.push(line),
            BalanceSheetClass::Equity => equity.push(line),
        }
    }

    let retained_earnings = aggregates.total_balance(AccountType::Income)
        - aggregates.total_balance(AccountType::Expense);
    let total_assets = current_assets.total + non_current_assets.total;
    let total_liabilities = current_liabilities.total + non_current_liabilities.total;
    let total_equity = equity.total + retained_earnings;
    let liabilities_and_equity = total_liabilities + total_equity;

    BalanceSheet {
        report_type: ReportKind::BalanceSheet,
        currency,
        as_of,
        residence,
        current_assets,
        non_current_assets,
        current_liabilities,
        non_current_liabilities,
        equity,
        retained_earnings,
        total_assets,
        total_liabilities,
        total_equity,
        liabilities_and_equity,
        difference: round_cents(total_assets - liabilities_and_equity),
        is_balanced: within_tolerance(total_assets, liabilities_and_equity),
        unclassified: aggregates.unclassified,
    }
}

/// Month-end balance sheets for a calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalanceSheet {
    /// Always [`ReportKind::MonthlyBalanceSheet`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Calendar year.
    pub year: i32,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// One sheet per month, dated on the month's last day.
    pub months: BTreeMap<MonthKey, BalanceSheet>,
    /// True when every month-end sheet balances.
    pub all_balanced: bool,
}

/// Builds the twelve month-end balance sheets of `year`.
///
/// # Errors
///
/// Returns an error if the year is out of range.
pub fn monthly_balance_sheet(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    year: i32,
    residence: Option<ResidenceId>,
    currency: Currency,
) -> Result<MonthlyBalanceSheet, PeriodError> {
    let months: BTreeMap<MonthKey, BalanceSheet> = ReportPeriod::year(year)?
        .months()
        .into_par_iter()
        .map(|month| {
            let sheet = balance_sheet(directory, entries, month.last_day(), residence, currency);
            (month, sheet)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect();
    let all_balanced = months.values().all(|sheet| sheet.is_balanced);

    Ok(MonthlyBalanceSheet {
        report_type: ReportKind::MonthlyBalanceSheet,
        currency,
        year,
        residence,
        months,
        all_balanced,
    })
}
