//! General ledger listing for one account.

use chrono::NaiveDate;
use lodgebook_shared::types::{Currency, PageRequest, PageResponse, ResidenceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use super::types::ReportKind;
use crate::accounts::{Account, AccountDirectory};
use crate::ledger::{LedgerQuery, RunningBalance, TransactionEntry, TransactionSource};
use crate::period::ReportPeriod;

/// One posted line on the listed account or one of its sub-accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedgerLine {
    /// Business transaction number.
    pub transaction_id: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Line narrative, or the entry narrative.
    pub description: String,
    /// External reference on the entry.
    pub reference: Option<String>,
    /// Where the entry came from.
    pub source: TransactionSource,
    /// Code on the line (may be a sub-account).
    pub account_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance before and after this line.
    pub running: RunningBalance,
}

/// Date-ordered postings of one account with running balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralLedger {
    /// Always [`ReportKind::GeneralLedger`].
    pub report_type: ReportKind,
    /// Reporting currency.
    pub currency: Currency,
    /// Listed account.
    pub account: Account,
    /// Period covered.
    pub period: ReportPeriod,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Balance before the period starts.
    pub opening_balance: Decimal,
    /// Debits inside the period.
    pub total_debit: Decimal,
    /// Credits inside the period.
    pub total_credit: Decimal,
    /// Balance after the last line of the period.
    pub closing_balance: Decimal,
    /// Requested page of lines.
    pub lines: PageResponse<GeneralLedgerLine>,
}

/// Lists `account_code` and its sub-accounts for `period`.
///
/// Balances are on the account's normal side. Running balances are computed
/// over the whole period before the requested page is cut.
///
/// # Errors
///
/// Returns [`ReportError::AccountNotFound`] if the code cannot be resolved.
pub fn general_ledger(
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    account_code: &str,
    period: &ReportPeriod,
    residence: Option<ResidenceId>,
    page: PageRequest,
    currency: Currency,
) -> Result<GeneralLedger, ReportError> {
    let fallback_name = entries
        .iter()
        .flat_map(|entry| &entry.lines)
        .find(|line| line.account_code == account_code)
        .map_or(account_code, |line| line.account_name.as_str());
    let account = directory
        .resolve(account_code, fallback_name)
        .ok_or_else(|| ReportError::AccountNotFound(account_code.to_string()))?;
    let normal = account.account_type.normal_balance();

    let mut scoped: Vec<&TransactionEntry> = LedgerQuery::through(period.end)
        .for_residence(residence)
        .select(entries)
        .collect();
    scoped.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });

    let mut opening_balance = Decimal::ZERO;
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut running = None;
    let mut lines = Vec::new();

    for entry in scoped {
        for line in &entry.lines {
            if !directory.is_within(&line.account_code, &account.code) {
                continue;
            }
            let change = normal.balance_change(line.debit, line.credit);
            if entry.date < period.start {
                opening_balance += change;
                continue;
            }
            total_debit += line.debit;
            total_credit += line.credit;

            let previous = running.unwrap_or_else(|| RunningBalance::opening(opening_balance));
            let current = RunningBalance::next_entry(&previous, change);
            running = Some(current);

            lines.push(GeneralLedgerLine {
                transaction_id: entry.transaction_id.clone(),
                date: entry.date,
                description: line
                    .description
                    .clone()
                    .unwrap_or_else(|| entry.description.clone()),
                reference: entry.reference.clone(),
                source: entry.source,
                account_code: line.account_code.clone(),
                debit: line.debit,
                credit: line.credit,
                running: current,
            });
        }
    }

    let closing_balance = running.map_or(opening_balance, |r| r.current_balance);

    Ok(GeneralLedger {
        report_type: ReportKind::GeneralLedger,
        currency,
        account,
        period: *period,
        residence,
        opening_balance,
        total_debit,
        total_credit,
        closing_balance,
        lines: page.paginate(lines),
    })
}
