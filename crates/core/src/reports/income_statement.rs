//! Income statement assembly.

use lodgebook_shared::types::{Currency, ResidenceId};
use serde::{Deserialize, Serialize};

use super::types::{AmountSeries, ReportKind, SectionBuilder, StatementSection};
use crate::accounts::{AccountDirectory, AccountType};
use crate::aggregation::{Basis, UnclassifiedLine, aggregate_accounts, aggregate_cash};
use crate::classification::{
    ExpenseCategory, IncomeCategory, expense_category, expense_category_from_text,
    income_category, is_deferred_income, is_payable, is_receivable, is_tenant_deposit,
};
use crate::ledger::{LedgerQuery, TransactionEntry};
use crate::period::{MonthKey, ReportPeriod};

/// Revenue, expenses and net income for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Always [`ReportKind::IncomeStatement`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Period covered.
    pub period: ReportPeriod,
    /// Cash or accrual.
    pub basis: Basis,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Monthly columns.
    pub months: Vec<MonthKey>,
    /// Revenue by income category.
    pub revenue: StatementSection<IncomeCategory>,
    /// Expenses by expense category.
    pub expenses: StatementSection<ExpenseCategory>,
    /// Revenue less expenses.
    pub net_income: AmountSeries,
    /// Lines left out because their account could not be classified.
    pub unclassified: Vec<UnclassifiedLine>,
}

/// Builds the income statement for `period` on the given basis.
#[must_use]
pub fn income_statement(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    period: &ReportPeriod,
    basis: Basis,
    residence: Option<ResidenceId>,
    currency: Currency,
) -> IncomeStatement {
    let months = period.months();
    let scoped = LedgerQuery::between(period.start, period.end)
        .for_residence(residence)
        .select(entries);

    let mut revenue = SectionBuilder::new(&months);
    let mut expenses = SectionBuilder::new(&months);

    let unclassified = match basis {
        Basis::Accrual => {
            let aggregates = aggregate_accounts(directory, scoped, period).rolled_up(directory);
            for aggregate in aggregates.of_type(AccountType::Income) {
                let category = income_category(&aggregate.code, &aggregate.name);
                for (month, amounts) in &aggregate.monthly {
                    revenue.add(
                        category,
                        &aggregate.code,
                        &aggregate.name,
                        *month,
                        amounts.credit - amounts.debit,
                    );
                }
            }
            for aggregate in aggregates.of_type(AccountType::Expense) {
                let category = expense_category(&aggregate.code, &aggregate.name);
                for (month, amounts) in &aggregate.monthly {
                    expenses.add(
                        category,
                        &aggregate.code,
                        &aggregate.name,
                        *month,
                        amounts.debit - amounts.credit,
                    );
                }
            }
            aggregates.unclassified
        }
        Basis::Cash => {
            let cash = aggregate_cash(directory, scoped, period);
            for posting in &cash.postings {
                let Some(account) = &posting.account else {
                    continue;
                };
                let code = directory.rollup_code(&account.code);
                let name = directory
                    .get(&code)
                    .map_or(account.name.as_str(), |parent| parent.name.as_str());
                let month = posting.month();

                match account.account_type {
                    AccountType::Income => revenue.add(
                        income_category(&account.code, &account.name),
                        &code,
                        name,
                        month,
                        posting.amount,
                    ),
                    AccountType::Expense => expenses.add(
                        expense_category(&account.code, &account.name),
                        &code,
                        name,
                        month,
                        -posting.amount,
                    ),
                    AccountType::Asset if is_receivable(&account.code) => {
                        revenue.add(IncomeCategory::Rental, &code, name, month, posting.amount);
                    }
                    AccountType::Liability if is_tenant_deposit(&account.code, &account.name) => {}
                    AccountType::Liability if is_deferred_income(&account.code, &account.name) => {
                        revenue.add(IncomeCategory::Rental, &code, name, month, posting.amount);
                    }
                    AccountType::Liability if is_payable(&account.code) => expenses.add(
                        expense_category_from_text(&posting.description),
                        &code,
                        name,
                        month,
                        -posting.amount,
                    ),
                    _ => {}
                }
            }
            cash.unclassified
        }
    };

    let revenue = revenue.finish();
    let expenses = expenses.finish();
    let net_income = revenue.amounts.minus(&expenses.amounts);

    IncomeStatement {
        report_type: ReportKind::IncomeStatement,
        currency,
        period: *period,
        basis,
        residence,
        months,
        revenue,
        expenses,
        net_income,
        unclassified,
    }
}
