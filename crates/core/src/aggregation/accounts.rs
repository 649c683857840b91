//! Per-account debit/credit aggregation.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::{AccountDirectory, AccountType};
use crate::ledger::{EntryLine, TransactionEntry};
use crate::period::{MonthKey, ReportPeriod};

/// Debit and credit sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebitCredit {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl DebitCredit {
    /// Sums of one line.
    #[must_use]
    pub fn of_line(line: &EntryLine) -> Self {
        Self {
            debit: line.debit,
            credit: line.credit,
        }
    }

    /// Net on the normal side of the given account type.
    #[must_use]
    pub fn net(&self, account_type: AccountType) -> Decimal {
        account_type
            .normal_balance()
            .balance_change(self.debit, self.credit)
    }
}

impl Add for DebitCredit {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            debit: self.debit + rhs.debit,
            credit: self.credit + rhs.credit,
        }
    }
}

impl AddAssign for DebitCredit {
    fn add_assign(&mut self, rhs: Self) {
        self.debit += rhs.debit;
        self.credit += rhs.credit;
    }
}

/// Debits and credits of one account, by month and in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAggregate {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Monthly sums.
    pub monthly: BTreeMap<MonthKey, DebitCredit>,
    /// Sum over every month.
    pub total: DebitCredit,
}

impl AccountAggregate {
    fn empty(code: String, name: String, account_type: AccountType) -> Self {
        Self {
            code,
            name,
            account_type,
            monthly: BTreeMap::new(),
            total: DebitCredit::default(),
        }
    }

    fn add(&mut self, month: MonthKey, amounts: DebitCredit) {
        *self.monthly.entry(month).or_default() += amounts;
        self.total += amounts;
    }

    /// Total net on the account's normal side.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.total.net(self.account_type)
    }

    /// Net on the account's normal side for one month (zero if no activity).
    #[must_use]
    pub fn month_balance(&self, month: MonthKey) -> Decimal {
        self.monthly
            .get(&month)
            .map_or(Decimal::ZERO, |amounts| amounts.net(self.account_type))
    }
}

/// A posted line whose account code nothing could classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedLine {
    /// Business transaction number of the entry.
    pub transaction_id: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Code on the line.
    pub account_code: String,
    /// Name on the line.
    pub account_name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl UnclassifiedLine {
    pub(crate) fn new(entry: &TransactionEntry, line: &EntryLine) -> Self {
        Self {
            transaction_id: entry.transaction_id.clone(),
            date: entry.date,
            account_code: line.account_code.clone(),
            account_name: line.account_name.clone(),
            debit: line.debit,
            credit: line.credit,
        }
    }
}

/// Result of [`aggregate_accounts`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAggregates {
    /// Aggregates keyed by account code.
    pub accounts: BTreeMap<String, AccountAggregate>,
    /// Lines left out because their code could not be classified.
    pub unclassified: Vec<UnclassifiedLine>,
}

impl AccountAggregates {
    /// Aggregate for one code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&AccountAggregate> {
        self.accounts.get(code)
    }

    /// Aggregates of one account type, in code order.
    pub fn of_type(&self, account_type: AccountType) -> impl Iterator<Item = &AccountAggregate> {
        self.accounts
            .values()
            .filter(move |aggregate| aggregate.account_type == account_type)
    }

    /// Sum of normal-side balances of one account type.
    #[must_use]
    pub fn total_balance(&self, account_type: AccountType) -> Decimal {
        self.of_type(account_type).map(AccountAggregate::balance).sum()
    }

    /// Folds sub-accounts into their top-most known ancestor.
    ///
    /// The parent's name and type win over the child's. Codes with no known
    /// ancestor are kept as they are.
    #[must_use]
    pub fn rolled_up(&self, directory: &AccountDirectory) -> Self {
        let mut accounts: BTreeMap<String, AccountAggregate> = BTreeMap::new();
        for aggregate in self.accounts.values() {
            let code = directory.rollup_code(&aggregate.code);
            let target = accounts.entry(code.clone()).or_insert_with(|| {
                let parent = if code == aggregate.code {
                    directory.get(&code).cloned()
                } else {
                    directory.resolve(&code, "")
                };
                match parent {
                    Some(parent) => AccountAggregate::empty(
                        code.clone(),
                        parent.name,
                        parent.account_type,
                    ),
                    None => AccountAggregate::empty(
                        code.clone(),
                        aggregate.name.clone(),
                        aggregate.account_type,
                    ),
                }
            });
            for (month, amounts) in &aggregate.monthly {
                target.add(*month, *amounts);
            }
        }
        Self {
            accounts,
            unclassified: self.unclassified.clone(),
        }
    }
}

/// Sums debits and credits per account code and month for posted entries
/// dated inside `period`.
///
/// Codes missing from the directory are resolved through their parents and
/// the code-range rules; lines nothing can classify go to `unclassified`.
#[must_use]
pub fn aggregate_accounts<'a>(
    directory: &AccountDirectory,
    entries: impl IntoIterator<Item = &'a TransactionEntry>,
    period: &ReportPeriod,
) -> AccountAggregates {
    let mut result = AccountAggregates::default();

    for entry in entries {
        if !entry.status.is_posted() || !period.contains(entry.date) {
            continue;
        }
        let month = MonthKey::of(entry.date);
        for line in &entry.lines {
            if !result.accounts.contains_key(&line.account_code) {
                let Some(account) = directory.resolve(&line.account_code, &line.account_name)
                else {
                    result.unclassified.push(UnclassifiedLine::new(entry, line));
                    continue;
                };
                result.accounts.insert(
                    line.account_code.clone(),
                    AccountAggregate::empty(account.code, account.name, account.account_type),
                );
            }
            if let Some(aggregate) = result.accounts.get_mut(&line.account_code) {
                aggregate.add(month, DebitCredit::of_line(line));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionSource;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn entry(id: &str, day: NaiveDate, lines: Vec<EntryLine>) -> TransactionEntry {
        let mut entry = TransactionEntry::new(id, day, "test", TransactionSource::Manual);
        entry.lines = lines;
        entry
    }

    fn sample() -> Vec<TransactionEntry> {
        vec![
            entry(
                "T1",
                date(1, 5),
                vec![
                    EntryLine::debit("1100-stu1", "AR - Student 1", dec!(400)),
                    EntryLine::credit("4000", "Rental Income", dec!(400)),
                ],
            ),
            entry(
                "T2",
                date(2, 5),
                vec![
                    EntryLine::debit("1100-stu2", "AR - Student 2", dec!(350)),
                    EntryLine::credit("4000", "Rental Income", dec!(350)),
                ],
            ),
            entry(
                "T3",
                date(2, 7),
                vec![
                    EntryLine::debit("1001", "Bank", dec!(400)),
                    EntryLine::credit("1100-stu1", "AR - Student 1", dec!(400)),
                ],
            ),
        ]
    }

    #[test]
    fn test_sums_per_account_and_month() {
        let directory = AccountDirectory::default_chart();
        let entries = sample();
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::year(2025).unwrap());

        let rent = result.get("4000").unwrap();
        assert_eq!(rent.total.credit, dec!(750));
        assert_eq!(rent.balance(), dec!(750));
        assert_eq!(rent.month_balance(MonthKey::of(date(1, 1))), dec!(400));
        assert_eq!(rent.month_balance(MonthKey::of(date(2, 1))), dec!(350));
        assert_eq!(rent.month_balance(MonthKey::of(date(3, 1))), Decimal::ZERO);

        let student = result.get("1100-stu1").unwrap();
        assert_eq!(student.name, "AR - Student 1");
        assert_eq!(student.account_type, AccountType::Asset);
        assert_eq!(student.balance(), Decimal::ZERO);
        assert!(result.unclassified.is_empty());
    }

    #[test]
    fn test_period_filter() {
        let directory = AccountDirectory::default_chart();
        let entries = sample();
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::month(2025, 1).unwrap());
        assert_eq!(result.get("4000").unwrap().balance(), dec!(400));
        assert!(result.get("1001").is_none());
    }

    #[test]
    fn test_rollup_folds_children_into_parent() {
        let directory = AccountDirectory::default_chart();
        let entries = sample();
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::year(2025).unwrap())
            .rolled_up(&directory);

        assert!(result.get("1100-stu1").is_none());
        let receivables = result.get("1100").unwrap();
        assert_eq!(receivables.name, "Accounts Receivable - Tenants");
        assert_eq!(receivables.total.debit, dec!(750));
        assert_eq!(receivables.total.credit, dec!(400));
        assert_eq!(receivables.balance(), dec!(350));
    }

    #[test]
    fn test_rollup_by_prefix_with_empty_chart() {
        let directory = AccountDirectory::new(vec![]);
        let entries = sample();
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::year(2025).unwrap())
            .rolled_up(&directory);

        let codes: Vec<&str> = result.accounts.keys().map(String::as_str).collect();
        assert_eq!(codes, ["1001", "1100", "4000"]);
        let receivables = result.get("1100").unwrap();
        assert_eq!(receivables.account_type, AccountType::Asset);
        assert_eq!(receivables.balance(), dec!(350));
    }

    #[test]
    fn test_unclassified_lines_are_reported() {
        let directory = AccountDirectory::default_chart();
        let entries = vec![entry(
            "T9",
            date(3, 1),
            vec![
                EntryLine::debit("1001", "Bank", dec!(10)),
                EntryLine::credit("XYZ", "Mystery", dec!(10)),
            ],
        )];
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::year(2025).unwrap());
        assert_eq!(result.unclassified.len(), 1);
        assert_eq!(result.unclassified[0].account_code, "XYZ");
        assert_eq!(result.get("1001").unwrap().balance(), dec!(10));
    }

    #[test]
    fn test_total_balance_by_type() {
        let directory = AccountDirectory::default_chart();
        let entries = sample();
        let result = aggregate_accounts(&directory, &entries, &ReportPeriod::year(2025).unwrap());
        assert_eq!(result.total_balance(AccountType::Income), dec!(750));
        assert_eq!(result.total_balance(AccountType::Asset), dec!(750));
    }
}
