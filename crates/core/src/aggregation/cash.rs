//! Cash-basis aggregation: what each entry's cash movement was for.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accounts::UnclassifiedLine;
use crate::accounts::{Account, AccountDirectory};
use crate::classification::{
    Basis, basis_includes, cash_attribution, is_internal_transfer, net_cash_movement,
};
use crate::ledger::TransactionEntry;
use crate::period::{MonthKey, ReportPeriod};

/// One attributed slice of an entry's cash movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashPosting {
    /// Business transaction number of the entry.
    pub transaction_id: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Counter-account code on the line.
    pub account_code: String,
    /// Counter-account name on the line.
    pub account_name: String,
    /// Counter-account as resolved through the directory.
    pub account: Option<Account>,
    /// Line narrative, or the entry narrative.
    pub description: String,
    /// Signed amount: positive is cash in, negative cash out.
    pub amount: Decimal,
}

impl CashPosting {
    /// Month of the posting.
    #[must_use]
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// Cash attributed to one counter-account, by month and in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowItem {
    /// Counter-account code.
    pub code: String,
    /// Counter-account name.
    pub name: String,
    /// Signed monthly sums.
    pub monthly: BTreeMap<MonthKey, Decimal>,
    /// Signed sum over every month.
    pub total: Decimal,
}

/// Result of [`aggregate_cash`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAggregates {
    /// Every attributed posting, in entry order.
    pub postings: Vec<CashPosting>,
    /// Postings summed per counter-account code.
    pub items: BTreeMap<String, CashFlowItem>,
    /// Amount moved between cash accounts, per month.
    pub internal_transfers: BTreeMap<MonthKey, Decimal>,
    /// Net cash movement of the included entries, per month.
    pub net_movement: BTreeMap<MonthKey, Decimal>,
    /// Counter-lines whose code could not be classified. They are still
    /// part of `postings` so cash totals stay whole.
    pub unclassified: Vec<UnclassifiedLine>,
}

impl CashAggregates {
    /// Sum of all postings.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.postings.iter().map(|p| p.amount).sum()
    }

    /// Total moved between cash accounts.
    #[must_use]
    pub fn total_internal_transfers(&self) -> Decimal {
        self.internal_transfers.values().copied().sum()
    }
}

/// Attributes the cash movement of every cash-basis entry dated inside
/// `period` to its counter-accounts.
#[must_use]
pub fn aggregate_cash<'a>(
    directory: &AccountDirectory,
    entries: impl IntoIterator<Item = &'a TransactionEntry>,
    period: &ReportPeriod,
) -> CashAggregates {
    let mut result = CashAggregates::default();

    for entry in entries {
        if !period.contains(entry.date) || !basis_includes(Basis::Cash, entry) {
            continue;
        }
        let month = MonthKey::of(entry.date);

        if is_internal_transfer(entry) {
            let moved: Decimal = entry.lines.iter().map(|line| line.debit).sum();
            *result.internal_transfers.entry(month).or_default() += moved;
            continue;
        }

        let attributions = cash_attribution(entry);
        if attributions.is_empty() {
            continue;
        }
        *result.net_movement.entry(month).or_default() += net_cash_movement(entry);

        for attribution in attributions {
            let account = directory.resolve(&attribution.account_code, &attribution.account_name);
            if account.is_none() {
                if let Some(line) = entry
                    .lines
                    .iter()
                    .find(|line| line.account_code == attribution.account_code)
                {
                    result.unclassified.push(UnclassifiedLine::new(entry, line));
                }
            }

            let item = result
                .items
                .entry(attribution.account_code.clone())
                .or_insert_with(|| CashFlowItem {
                    code: attribution.account_code.clone(),
                    name: account
                        .as_ref()
                        .map_or_else(|| attribution.account_name.clone(), |a| a.name.clone()),
                    monthly: BTreeMap::new(),
                    total: Decimal::ZERO,
                });
            *item.monthly.entry(month).or_default() += attribution.amount;
            item.total += attribution.amount;

            result.postings.push(CashPosting {
                transaction_id: entry.transaction_id.clone(),
                date: entry.date,
                account_code: attribution.account_code,
                account_name: attribution.account_name,
                account,
                description: attribution.description,
                amount: attribution.amount,
            });
        }
    }

    result
}
