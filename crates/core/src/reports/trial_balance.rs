//! Trial balance assembly.

use chrono::NaiveDate;
use lodgebook_shared::types::{Currency, ResidenceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::ReportKind;
use crate::accounts::{AccountDirectory, AccountType};
use crate::aggregation::{AccountAggregate, UnclassifiedLine, aggregate_accounts};
use crate::ledger::{LedgerQuery, TransactionEntry};
use crate::period::ReportPeriod;

/// One account on the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of debits posted.
    pub total_debit: Decimal,
    /// Sum of credits posted.
    pub total_credit: Decimal,
    /// Balance on the account's normal side.
    pub balance: Decimal,
    /// Net debit, or zero.
    pub debit_balance: Decimal,
    /// Net credit, or zero.
    pub credit_balance: Decimal,
}

impl From<&AccountAggregate> for TrialBalanceLine {
    fn from(aggregate: &AccountAggregate) -> Self {
        let net_debit = aggregate.total.debit - aggregate.total.credit;
        Self {
            code: aggregate.code.clone(),
            name: aggregate.name.clone(),
            account_type: aggregate.account_type,
            total_debit: aggregate.total.debit,
            total_credit: aggregate.total.credit,
            balance: aggregate.balance(),
            debit_balance: net_debit.max(Decimal::ZERO),
            credit_balance: (-net_debit).max(Decimal::ZERO),
        }
    }
}

/// Debit and credit totals of every account at a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Always [`ReportKind::TrialBalance`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Totals include every posted entry up to this date.
    pub as_of: NaiveDate,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Whether sub-accounts were folded into their parents.
    pub rollup: bool,
    /// Accounts in code order.
    pub lines: Vec<TrialBalanceLine>,
    /// Sum of debits posted.
    pub total_debit: Decimal,
    /// Sum of credits posted.
    pub total_credit: Decimal,
    /// Sum of net debit balances.
    pub total_debit_balance: Decimal,
    /// Sum of net credit balances.
    pub total_credit_balance: Decimal,
    /// True when both pairs of totals agree exactly.
    pub is_balanced: bool,
    /// Lines left out because their account could not be classified.
    pub unclassified: Vec<UnclassifiedLine>,
}

/// Builds the trial balance at the end of `as_of`.
#[must_use]
pub fn trial_balance(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    as_of: NaiveDate,
    residence: Option<ResidenceId>,
    rollup: bool,
    currency: Currency,
) -> TrialBalance {
    let scoped = LedgerQuery::through(as_of)
        .for_residence(residence)
        .select(entries);
    let mut aggregates = aggregate_accounts(directory, scoped, &ReportPeriod::through(as_of));
    if rollup {
        aggregates = aggregates.rolled_up(directory);
    }

    let lines: Vec<TrialBalanceLine> = aggregates
        .accounts
        .values()
        .map(TrialBalanceLine::from)
        .collect();

    let total_debit: Decimal = lines.iter().map(|l| l.total_debit).sum();
    let total_credit: Decimal = lines.iter().map(|l| l.total_credit).sum();
    let total_debit_balance: Decimal = lines.iter().map(|l| l.debit_balance).sum();
    let total_credit_balance: Decimal = lines.iter().map(|l| l.credit_balance).sum();

    TrialBalance {
        report_type: ReportKind::TrialBalance,
        currency,
        as_of,
        residence,
        rollup,
        lines,
        total_debit,
        total_credit,
        total_debit_balance,
        total_credit_balance,
        is_balanced: total_debit == total_credit && total_debit_balance == total_credit_balance,
        unclassified: aggregates.unclassified,
    }
}
