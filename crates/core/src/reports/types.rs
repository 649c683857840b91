//! Report data types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance_sheet::{BalanceSheet, MonthlyBalanceSheet};
use super::cash_flow::CashFlowStatement;
use super::general_ledger::GeneralLedger;
use super::income_statement::IncomeStatement;
use super::trial_balance::TrialBalance;
use crate::classification::{ExpenseCategory, IncomeCategory};
use crate::period::MonthKey;

/// The statements the reporting service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Income statement (profit and loss).
    IncomeStatement,
    /// Balance sheet at a date.
    BalanceSheet,
    /// Twelve month-end balance sheets.
    MonthlyBalanceSheet,
    /// Cash flow statement.
    CashFlow,
    /// Trial balance.
    TrialBalance,
    /// General ledger listing for one account.
    GeneralLedger,
}

impl ReportKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 6] = [
        Self::IncomeStatement,
        Self::BalanceSheet,
        Self::MonthlyBalanceSheet,
        Self::CashFlow,
        Self::TrialBalance,
        Self::GeneralLedger,
    ];

    /// Snake-case name used in requests, cache keys and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::MonthlyBalanceSheet => "monthly_balance_sheet",
            Self::CashFlow => "cash_flow",
            Self::TrialBalance => "trial_balance",
            Self::GeneralLedger => "general_ledger",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "income_statement" | "profit_and_loss" | "pnl" => Ok(Self::IncomeStatement),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "monthly_balance_sheet" => Ok(Self::MonthlyBalanceSheet),
            "cash_flow" | "cash_flow_statement" => Ok(Self::CashFlow),
            "trial_balance" => Ok(Self::TrialBalance),
            "general_ledger" | "ledger" => Ok(Self::GeneralLedger),
            _ => Err(format!("Unknown report type: {s}")),
        }
    }
}

/// Amounts by month plus their total.
///
/// `total` is always the exact sum of `monthly`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountSeries {
    /// Amount per month.
    pub monthly: BTreeMap<MonthKey, Decimal>,
    /// Sum of the monthly amounts.
    pub total: Decimal,
}

impl AmountSeries {
    /// A series with a zero for every month.
    #[must_use]
    pub fn zeroed(months: &[MonthKey]) -> Self {
        Self {
            monthly: months.iter().map(|m| (*m, Decimal::ZERO)).collect(),
            total: Decimal::ZERO,
        }
    }

    /// Adds an amount to a month.
    pub fn add(&mut self, month: MonthKey, amount: Decimal) {
        *self.monthly.entry(month).or_default() += amount;
        self.total += amount;
    }

    /// Adds every month of another series.
    pub fn absorb(&mut self, other: &Self) {
        for (month, amount) in &other.monthly {
            self.add(*month, *amount);
        }
    }

    /// `self - other`, month by month.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (month, amount) in &other.monthly {
            result.add(*month, -*amount);
        }
        result
    }

    /// Amount for one month (zero if absent).
    #[must_use]
    pub fn month(&self, month: MonthKey) -> Decimal {
        self.monthly.get(&month).copied().unwrap_or_default()
    }

    /// Returns true if the series sums to its total.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.monthly.values().copied().sum::<Decimal>() == self.total
    }
}

/// One account line of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account code (rolled up to the chart account).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amounts.
    #[serde(flatten)]
    pub amounts: AmountSeries,
}

/// Lines that share a statement category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup<C> {
    /// Category key.
    pub category: C,
    /// Display label.
    pub label: String,
    /// Lines, in code order.
    pub lines: Vec<StatementLine>,
    /// Sum of the lines.
    #[serde(flatten)]
    pub amounts: AmountSeries,
}

/// Revenue or expense section of an income statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection<C> {
    /// Groups, in category order.
    pub groups: Vec<CategoryGroup<C>>,
    /// Sum of the groups.
    #[serde(flatten)]
    pub amounts: AmountSeries,
}

impl<C: Copy + PartialEq> StatementSection<C> {
    /// Group for one category.
    #[must_use]
    pub fn group(&self, category: C) -> Option<&CategoryGroup<C>> {
        self.groups.iter().find(|group| group.category == category)
    }

    /// Total of one category (zero if absent).
    #[must_use]
    pub fn category_total(&self, category: C) -> Decimal {
        self.group(category).map_or(Decimal::ZERO, |g| g.amounts.total)
    }
}

/// Categories that label statement groups.
pub(crate) trait GroupCategory: Copy + Ord {
    fn label(self) -> &'static str;
}

impl GroupCategory for IncomeCategory {
    fn label(self) -> &'static str {
        Self::label(self)
    }
}

impl GroupCategory for ExpenseCategory {
    fn label(self) -> &'static str {
        Self::label(self)
    }
}

/// Collects amounts into category groups and account lines.
///
/// Every line and group carries a zero for each month of the report, so
/// monthly columns line up across the statement.
pub(crate) struct SectionBuilder<C> {
    months: Vec<MonthKey>,
    groups: BTreeMap<C, BTreeMap<String, StatementLine>>,
}

impl<C: GroupCategory> SectionBuilder<C> {
    pub(crate) fn new(months: &[MonthKey]) -> Self {
        Self {
            months: months.to_vec(),
            groups: BTreeMap::new(),
        }
    }

    pub(crate) fn add(
        &mut self,
        category: C,
        code: &str,
        name: &str,
        month: MonthKey,
        amount: Decimal,
    ) {
        let months = &self.months;
        self.groups
            .entry(category)
            .or_default()
            .entry(code.to_string())
            .or_insert_with(|| StatementLine {
                code: code.to_string(),
                name: name.to_string(),
                amounts: AmountSeries::zeroed(months),
            })
            .amounts
            .add(month, amount);
    }

    pub(crate) fn finish(self) -> StatementSection<C> {
        let mut section_amounts = AmountSeries::zeroed(&self.months);
        let groups = self
            .groups
            .into_iter()
            .map(|(category, lines)| {
                let mut amounts = AmountSeries::zeroed(&self.months);
                for line in lines.values() {
                    amounts.absorb(&line.amounts);
                }
                section_amounts.absorb(&amounts);
                CategoryGroup {
                    category,
                    label: category.label().to_string(),
                    lines: lines.into_values().collect(),
                    amounts,
                }
            })
            .collect();
        StatementSection {
            groups,
            amounts: section_amounts,
        }
    }
}

/// A code/name/balance row of a point-in-time statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance on the account's normal side.
    pub balance: Decimal,
}

/// Any generated statement.
///
/// Every variant carries its own `report_type` field, so the untagged
/// serialization is still self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportDocument {
    /// Income statement.
    IncomeStatement(IncomeStatement),
    /// Balance sheet.
    BalanceSheet(BalanceSheet),
    /// Monthly balance sheets.
    MonthlyBalanceSheet(MonthlyBalanceSheet),
    /// Cash flow statement.
    CashFlow(CashFlowStatement),
    /// Trial balance.
    TrialBalance(TrialBalance),
    /// General ledger.
    GeneralLedger(GeneralLedger),
}

impl ReportDocument {
    /// Kind of the wrapped statement.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::IncomeStatement(_) => ReportKind::IncomeStatement,
            Self::BalanceSheet(_) => ReportKind::BalanceSheet,
            Self::MonthlyBalanceSheet(_) => ReportKind::MonthlyBalanceSheet,
            Self::CashFlow(_) => ReportKind::CashFlow,
            Self::TrialBalance(_) => ReportKind::TrialBalance,
            Self::GeneralLedger(_) => ReportKind::GeneralLedger,
        }
    }
}
