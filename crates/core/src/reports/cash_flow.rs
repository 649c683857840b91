//! Cash flow statement assembly.
//!
//! Cash attributed to counter-accounts is sorted into operating, investing
//! and financing activities. The statement reconciles the computed closing
//! cash with the actual balance of the cash accounts at period end.

use std::collections::BTreeMap;

use lodgebook_shared::types::{Currency, ResidenceId, round_cents, within_tolerance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AmountSeries, ReportKind};
use crate::accounts::{AccountDirectory, AccountType};
use crate::aggregation::{CashPosting, UnclassifiedLine, aggregate_cash};
use crate::classification::{
    BalanceSheetClass, ExpenseCategory, IncomeCategory, balance_sheet_class, expense_category,
    expense_category_from_text, income_category, is_cash_account, is_deferred_income,
    is_payable, is_receivable, is_tenant_deposit,
};
use crate::ledger::{LedgerQuery, TransactionEntry};
use crate::period::{MonthKey, ReportPeriod};

/// One line of a cash flow section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowLine {
    /// Stable key (`receipts.rental`, `payments.utilities`, an account code).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Signed amounts: positive is cash in.
    #[serde(flatten)]
    pub amounts: AmountSeries,
}

/// Operating, investing or financing activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSection {
    /// Lines in statement order.
    pub lines: Vec<CashFlowLine>,
    /// Net cash from the section.
    #[serde(flatten)]
    pub amounts: AmountSeries,
}

impl CashFlowSection {
    /// Line with the given key.
    #[must_use]
    pub fn line(&self, key: &str) -> Option<&CashFlowLine> {
        self.lines.iter().find(|line| line.key == key)
    }
}

/// Cash movements for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Always [`ReportKind::CashFlow`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Period covered.
    pub period: ReportPeriod,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Monthly columns.
    pub months: Vec<MonthKey>,
    /// Cash-account balance the day before the period starts.
    pub opening_cash: Decimal,
    /// Rent, fees, deposits and running costs.
    pub operating: CashFlowSection,
    /// Purchases and disposals of non-current assets.
    pub investing: CashFlowSection,
    /// Owner contributions, drawings and loans.
    pub financing: CashFlowSection,
    /// Sum of the three sections.
    pub net_change: AmountSeries,
    /// Computed cash at the end of each month.
    pub closing_by_month: BTreeMap<MonthKey, Decimal>,
    /// Opening cash plus net change.
    pub closing_cash: Decimal,
    /// Actual cash-account balance at period end.
    pub cash_balance_at_end: Decimal,
    /// Actual balance less computed closing cash, rounded to cents.
    pub unreconciled_difference: Decimal,
    /// True when the difference is within one cent.
    pub is_reconciled: bool,
    /// Money moved between cash accounts (not part of the net change).
    pub internal_transfers: AmountSeries,
    /// Counter-lines whose account could not be classified. Their cash is
    /// reported under other operating activities.
    pub unclassified: Vec<UnclassifiedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Operating,
    Investing,
    Financing,
}

/// Operating line order: receipts, deposits, payments, other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum FlowKey {
    Receipts(IncomeCategory),
    TenantDeposits,
    Payments(ExpenseCategory),
    OtherOperating,
    Account(String),
}

impl FlowKey {
    fn key(&self) -> String {
        match self {
            Self::Receipts(category) => format!("receipts.{}", category.key()),
            Self::TenantDeposits => "tenant_deposits".to_string(),
            Self::Payments(category) => format!("payments.{}", category.key()),
            Self::OtherOperating => "other_operating".to_string(),
            Self::Account(code) => code.clone(),
        }
    }

    fn label(&self, directory: &AccountDirectory, fallback: &str) -> String {
        match self {
            Self::Receipts(category) => format!("Receipts: {}", category.label()),
            Self::TenantDeposits => "Tenant Deposits".to_string(),
            Self::Payments(category) => format!("Payments: {}", category.label()),
            Self::OtherOperating => "Other Operating".to_string(),
            Self::Account(code) => directory
                .get(code)
                .map_or_else(|| fallback.to_string(), |account| account.name.clone()),
        }
    }
}

fn classify(posting: &CashPosting, directory: &AccountDirectory) -> (Activity, FlowKey) {
    let Some(account) = &posting.account else {
        return (Activity::Operating, FlowKey::OtherOperating);
    };
    let code = account.code.as_str();
    let name = account.name.as_str();
    let by_account = || FlowKey::Account(directory.rollup_code(code));

    match account.account_type {
        AccountType::Income => (
            Activity::Operating,
            FlowKey::Receipts(income_category(code, name)),
        ),
        AccountType::Expense => (
            Activity::Operating,
            FlowKey::Payments(expense_category(code, name)),
        ),
        AccountType::Equity => (Activity::Financing, by_account()),
        AccountType::Asset if is_receivable(code) => {
            (Activity::Operating, FlowKey::Receipts(IncomeCategory::Rental))
        }
        AccountType::Liability if is_tenant_deposit(code, name) => {
            (Activity::Operating, FlowKey::TenantDeposits)
        }
        AccountType::Liability if is_deferred_income(code, name) => {
            (Activity::Operating, FlowKey::Receipts(IncomeCategory::Rental))
        }
        AccountType::Liability if is_payable(code) => (
            Activity::Operating,
            FlowKey::Payments(expense_category_from_text(&posting.description)),
        ),
        AccountType::Asset | AccountType::Liability => match balance_sheet_class(account) {
            Some(BalanceSheetClass::NonCurrentAsset) => (Activity::Investing, by_account()),
            Some(BalanceSheetClass::NonCurrentLiability) => (Activity::Financing, by_account()),
            _ => (Activity::Operating, FlowKey::OtherOperating),
        },
    }
}

struct SectionLines {
    months: Vec<MonthKey>,
    lines: BTreeMap<FlowKey, CashFlowLine>,
}

impl SectionLines {
    fn new(months: &[MonthKey]) -> Self {
        Self {
            months: months.to_vec(),
            lines: BTreeMap::new(),
        }
    }

    fn add(&mut self, key: FlowKey, label: String, month: MonthKey, amount: Decimal) {
        let months = &self.months;
        self.lines
            .entry(key.clone())
            .or_insert_with(|| CashFlowLine {
                key: key.key(),
                label,
                amounts: AmountSeries::zeroed(months),
            })
            .amounts
            .add(month, amount);
    }

    fn finish(self) -> CashFlowSection {
        let mut amounts = AmountSeries::zeroed(&self.months);
        for line in self.lines.values() {
            amounts.absorb(&line.amounts);
        }
        CashFlowSection {
            lines: self.lines.into_values().collect(),
            amounts,
        }
    }
}

/// Balance of the cash accounts over the given entries.
fn cash_balance<'a>(entries: impl IntoIterator<Item = &'a TransactionEntry>) -> Decimal {
    entries
        .into_iter()
        .flat_map(|entry| &entry.lines)
        .filter(|line| is_cash_account(&line.account_code))
        .map(|line| line.debit - line.credit)
        .sum()
}

/// Builds the cash flow statement for `period`.
#[must_use]
pub fn cash_flow(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    period: &ReportPeriod,
    residence: Option<ResidenceId>,
    currency: Currency,
) -> CashFlowStatement {
    let months = period.months();
    let opening_cash = period.opening_date().map_or(Decimal::ZERO, |opening| {
        cash_balance(
            LedgerQuery::through(opening)
                .for_residence(residence)
                .select(entries),
        )
    });
    let cash_balance_at_end = cash_balance(
        LedgerQuery::through(period.end)
            .for_residence(residence)
            .select(entries),
    );

    let scoped = LedgerQuery::between(period.start, period.end)
        .for_residence(residence)
        .select(entries);
    let cash = aggregate_cash(directory, scoped, period);

    let mut operating = SectionLines::new(&months);
    let mut investing = SectionLines::new(&months);
    let mut financing = SectionLines::new(&months);

    for posting in &cash.postings {
        let (activity, key) = classify(posting, directory);
        let label = key.label(directory, &posting.account_name);
        let section = match activity {
            Activity::Operating => &mut operating,
            Activity::Investing => &mut investing,
            Activity::Financing => &mut financing,
        };
        section.add(key, label, posting.month(), posting.amount);
    }

    let operating = operating.finish();
    let investing = investing.finish();
    let financing = financing.finish();

    let mut net_change = AmountSeries::zeroed(&months);
    net_change.absorb(&operating.amounts);
    net_change.absorb(&investing.amounts);
    net_change.absorb(&financing.amounts);

    let mut running = opening_cash;
    let closing_by_month = net_change
        .monthly
        .iter()
        .map(|(month, change)| {
            running += *change;
            (*month, running)
        })
        .collect();
    let closing_cash = opening_cash + net_change.total;

    let mut internal_transfers = AmountSeries::zeroed(&months);
    for (month, amount) in &cash.internal_transfers {
        internal_transfers.add(*month, *amount);
    }

    CashFlowStatement {
        report_type: ReportKind::CashFlow,
        currency,
        period: *period,
        residence,
        months,
        opening_cash,
        operating,
        investing,
        financing,
        net_change,
        closing_by_month,
        closing_cash,
        cash_balance_at_end,
        unreconciled_difference: round_cents(cash_balance_at_end - closing_cash),
        is_reconciled: within_tolerance(cash_balance_at_end, closing_cash),
        internal_transfers,
        unclassified: cash.unclassified,
    }
}
