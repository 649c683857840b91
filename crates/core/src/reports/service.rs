//! Report generation service.
//!
//! Ties a ledger store to the statement assemblers: a request is answered
//! from the cache when possible, otherwise the entries it needs are read
//! from the store, assembled and cached.

use std::sync::Arc;

use chrono::NaiveDate;
use lodgebook_shared::config::ReportingConfig;
use lodgebook_shared::types::{Currency, ResidenceId};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::balance_sheet::{balance_sheet, monthly_balance_sheet};
use super::cache::ReportCache;
use super::cash_flow::cash_flow;
use super::error::ReportError;
use super::general_ledger::general_ledger;
use super::income_statement::income_statement;
use super::request::{ReportParams, ReportRequest, RequestDefaults};
use super::trial_balance::trial_balance;
use super::types::{ReportDocument, ReportKind};
use crate::accounts::AccountDirectory;
use crate::aggregation::{Basis, UnclassifiedLine, aggregate_accounts};
use crate::ledger::{LedgerQuery, LedgerStore, TransactionEntry, validate_against_directory};
use crate::period::ReportPeriod;

/// Settings the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSettings {
    /// Currency printed on every report.
    pub currency: Currency,
    /// Maximum number of cached reports.
    pub cache_capacity: u64,
    /// Seconds a cached report stays valid.
    pub cache_ttl_secs: u64,
    /// Basis used when a request does not name one.
    pub default_basis: Basis,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            cache_capacity: super::cache::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: super::cache::DEFAULT_TTL_SECS,
            default_basis: Basis::default(),
        }
    }
}

impl ReportSettings {
    /// Reads settings from the `reporting` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the default basis is not `cash` or `accrual`.
    pub fn from_config(config: &ReportingConfig) -> Result<Self, ReportError> {
        let default_basis = config
            .default_basis
            .parse()
            .map_err(ReportError::InvalidConfig)?;
        Ok(Self {
            currency: config.currency,
            cache_capacity: config.cache_capacity,
            cache_ttl_secs: config.cache_ttl_secs,
            default_basis,
        })
    }
}

/// A report and whether it came from the cache.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// The statement.
    pub document: Arc<ReportDocument>,
    /// True when served from the cache.
    pub cached: bool,
}

/// A posted entry whose debits and credits differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnbalancedEntry {
    /// Business transaction number.
    pub transaction_id: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Debits less credits.
    pub difference: Decimal,
}

/// A posted entry that breaks a ledger rule other than balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidEntry {
    /// Business transaction number.
    pub transaction_id: String,
    /// Entry date.
    pub date: NaiveDate,
    /// The rule it breaks.
    pub reason: String,
}

/// Result of [`FinancialReportsService::verify_ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerVerification {
    /// Period checked.
    pub period: ReportPeriod,
    /// Residence filter, `None` for all residences.
    pub residence: Option<ResidenceId>,
    /// Number of posted entries read.
    pub entries_checked: usize,
    /// Entries whose debits and credits differ.
    pub unbalanced: Vec<UnbalancedEntry>,
    /// Entries with other rule violations.
    pub invalid: Vec<InvalidEntry>,
    /// Lines whose account could not be classified.
    pub unclassified: Vec<UnclassifiedLine>,
}

impl LedgerVerification {
    /// True when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unbalanced.is_empty() && self.invalid.is_empty() && self.unclassified.is_empty()
    }
}

/// Assembles the statement a request asks for from already loaded entries.
///
/// # Errors
///
/// Returns an error if the general ledger account cannot be resolved or the
/// monthly balance sheet year is out of range.
pub fn assemble(
    request: &ReportRequest,
    directory: &AccountDirectory,
    entries: &[TransactionEntry],
    currency: Currency,
) -> Result<ReportDocument, ReportError> {
    let document = match request {
        ReportRequest::IncomeStatement {
            period,
            basis,
            residence,
        } => ReportDocument::IncomeStatement(income_statement(
            directory, entries, period, *basis, *residence, currency,
        )),
        ReportRequest::BalanceSheet { as_of, residence } => ReportDocument::BalanceSheet(
            balance_sheet(directory, entries, *as_of, *residence, currency),
        ),
        ReportRequest::MonthlyBalanceSheet { year, residence } => {
            ReportDocument::MonthlyBalanceSheet(monthly_balance_sheet(
                directory, entries, *year, *residence, currency,
            )?)
        }
        ReportRequest::CashFlow { period, residence } => {
            ReportDocument::CashFlow(cash_flow(directory, entries, period, *residence, currency))
        }
        ReportRequest::TrialBalance {
            as_of,
            residence,
            rollup,
        } => ReportDocument::TrialBalance(trial_balance(
            directory, entries, *as_of, *residence, *rollup, currency,
        )),
        ReportRequest::GeneralLedger {
            account,
            period,
            residence,
            page,
        } => ReportDocument::GeneralLedger(general_ledger(
            directory, entries, account, period, *residence, *page, currency,
        )?),
    };
    Ok(document)
}

/// Financial reports over a ledger store.
pub struct FinancialReportsService<S> {
    store: S,
    cache: ReportCache,
    settings: ReportSettings,
}

impl<S: LedgerStore> FinancialReportsService<S> {
    /// Creates a service with its own report cache.
    #[must_use]
    pub fn new(store: S, settings: ReportSettings) -> Self {
        let cache = ReportCache::with_config(settings.cache_capacity, settings.cache_ttl_secs);
        Self {
            store,
            cache,
            settings,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The report cache.
    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Settings in effect.
    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    /// Defaults applied to raw parameters, with `today` as the current date.
    #[must_use]
    pub fn defaults(&self, today: NaiveDate) -> RequestDefaults {
        RequestDefaults {
            basis: self.settings.default_basis,
            today,
        }
    }

    /// Generates a report, serving it from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the request cannot be assembled.
    pub async fn generate(&self, request: &ReportRequest) -> Result<GeneratedReport, ReportError> {
        let key = request.cache_key();
        if let Some(document) = self.cache.get(&key) {
            debug!(report = %request.kind(), key = %key, "Report served from cache");
            return Ok(GeneratedReport {
                document,
                cached: true,
            });
        }

        let query = request.ledger_query()?;
        // Read before the store so a post that lands mid-read keeps this
        // report out of the cache.
        let generation = self.cache.generation();
        let directory = self.store.directory().await?;
        let entries = self.store.entries(&query).await?;

        let (document, cached) = self.cache.get_or_generate_at(generation, &key, || {
            assemble(request, &directory, &entries, self.settings.currency)
        })?;
        info!(
            report = %request.kind(),
            entries = entries.len(),
            cached,
            "Report generated"
        );
        Ok(GeneratedReport { document, cached })
    }

    /// Validates raw parameters and generates the report.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is invalid or generation fails.
    pub async fn generate_from_params(
        &self,
        kind: ReportKind,
        params: &ReportParams,
        today: NaiveDate,
    ) -> Result<GeneratedReport, ReportError> {
        let request = ReportRequest::from_params(kind, params, &self.defaults(today))?;
        self.generate(&request).await
    }

    /// Validates an entry against the chart, appends it and clears the
    /// report cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is invalid or the store rejects it.
    pub async fn post_entry(&self, entry: TransactionEntry) -> Result<(), ReportError> {
        let directory = self.store.directory().await?;
        validate_against_directory(&entry, &directory)?;

        let transaction_id = entry.transaction_id.clone();
        self.store.append(entry).await?;
        self.cache.invalidate_all();
        info!(transaction_id = %transaction_id, "Entry posted, report cache cleared");
        Ok(())
    }

    /// Lists posted entries in `period` that break ledger rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn verify_ledger(
        &self,
        period: &ReportPeriod,
        residence: Option<ResidenceId>,
    ) -> Result<LedgerVerification, ReportError> {
        let directory = self.store.directory().await?;
        let query = LedgerQuery::between(period.start, period.end).for_residence(residence);
        let entries = self.store.entries(&query).await?;

        let mut unbalanced = Vec::new();
        let mut invalid = Vec::new();
        for entry in &entries {
            if !entry.is_balanced() {
                let total_debit = entry.total_debit();
                let total_credit = entry.total_credit();
                unbalanced.push(UnbalancedEntry {
                    transaction_id: entry.transaction_id.clone(),
                    date: entry.date,
                    total_debit,
                    total_credit,
                    difference: total_debit - total_credit,
                });
            } else if let Err(err) = validate_against_directory(entry, &directory) {
                invalid.push(InvalidEntry {
                    transaction_id: entry.transaction_id.clone(),
                    date: entry.date,
                    reason: err.to_string(),
                });
            }
        }
        let unclassified = aggregate_accounts(&directory, &entries, period).unclassified;

        if !unbalanced.is_empty() || !invalid.is_empty() {
            warn!(
                unbalanced = unbalanced.len(),
                invalid = invalid.len(),
                period = %period,
                "Ledger verification found problems"
            );
        }

        Ok(LedgerVerification {
            period: *period,
            residence,
            entries_checked: entries.len(),
            unbalanced,
            invalid,
            unclassified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{Account, default_accounts};
    use crate::ledger::{
        EntryLine, InMemoryLedger, LedgerValidationError, StoreError, StoreResult,
        TransactionSource,
    };
    use crate::reports::request::RequestError;
    use crate::testing::{NORTH, date, sample_ledger};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    fn service() -> FinancialReportsService<InMemoryLedger> {
        let store = InMemoryLedger::with_entries(default_accounts(), sample_ledger()).unwrap();
        FinancialReportsService::new(store, ReportSettings::default())
    }

    fn water_bill() -> TransactionEntry {
        TransactionEntry::new("TXN-0200", date(2025, 6, 1), "Water bill", TransactionSource::ExpenseAccrual)
            .for_residence(NORTH)
            .with_line(EntryLine::debit("5110", "Water", dec!(60)))
            .with_line(EntryLine::credit("2000", "Accounts Payable", dec!(60)))
    }

    fn params(pairs: &[(&str, &str)]) -> ReportParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[tokio::test]
    async fn test_second_request_is_cached() {
        let service = service();
        let request = ReportRequest::BalanceSheet {
            as_of: date(2025, 12, 31),
            residence: None,
        };

        let first = service.generate(&request).await.unwrap();
        assert!(!first.cached);
        let second = service.generate(&request).await.unwrap();
        assert!(second.cached);
        assert!(Arc::ptr_eq(&first.document, &second.document));

        let ReportDocument::BalanceSheet(sheet) = first.document.as_ref() else {
            panic!("expected a balance sheet");
        };
        assert!(sheet.is_balanced);
    }

    #[tokio::test]
    async fn test_posting_invalidates_cache() {
        let service = service();
        let request = ReportRequest::TrialBalance {
            as_of: date(2025, 12, 31),
            residence: None,
            rollup: true,
        };
        service.generate(&request).await.unwrap();

        service.post_entry(water_bill()).await.unwrap();

        let regenerated = service.generate(&request).await.unwrap();
        assert!(!regenerated.cached);
        let ReportDocument::TrialBalance(tb) = regenerated.document.as_ref() else {
            panic!("expected a trial balance");
        };
        let water = tb.lines.iter().find(|line| line.code == "5110").unwrap();
        assert_eq!(water.balance, dec!(60));
        assert!(tb.is_balanced);
    }

    /// Store whose first `entries` call waits, after taking its snapshot,
    /// until released.
    struct PausingStore {
        inner: InMemoryLedger,
        armed: AtomicBool,
        snapshot_taken: Notify,
        release: Notify,
    }

    #[async_trait]
    impl LedgerStore for PausingStore {
        async fn accounts(&self) -> StoreResult<Vec<Account>> {
            self.inner.accounts().await
        }

        async fn entries(&self, query: &LedgerQuery) -> StoreResult<Vec<TransactionEntry>> {
            let entries = self.inner.entries(query).await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.snapshot_taken.notify_one();
                self.release.notified().await;
            }
            Ok(entries)
        }

        async fn append(&self, entry: TransactionEntry) -> StoreResult<()> {
            self.inner.append(entry).await
        }
    }

    #[tokio::test]
    async fn test_report_read_before_a_post_is_not_cached() {
        let store = PausingStore {
            inner: InMemoryLedger::with_entries(default_accounts(), sample_ledger()).unwrap(),
            armed: AtomicBool::new(true),
            snapshot_taken: Notify::new(),
            release: Notify::new(),
        };
        let service = FinancialReportsService::new(store, ReportSettings::default());
        let request = ReportRequest::TrialBalance {
            as_of: date(2025, 12, 31),
            residence: None,
            rollup: true,
        };

        let post_during_read = async {
            service.store().snapshot_taken.notified().await;
            service.post_entry(water_bill()).await.unwrap();
            service.store().release.notify_one();
        };
        let (stale, ()) = tokio::join!(service.generate(&request), post_during_read);
        let stale = stale.unwrap();
        assert!(!stale.cached);

        let fresh = service.generate(&request).await.unwrap();
        assert!(!fresh.cached);
        let ReportDocument::TrialBalance(tb) = fresh.document.as_ref() else {
            panic!("expected a trial balance");
        };
        assert!(tb.lines.iter().any(|line| line.code == "5110"));
        assert!(service.generate(&request).await.unwrap().cached);
    }

    #[tokio::test]
    async fn test_post_entry_rejects_unknown_accounts_and_duplicates() {
        let service = service();

        let unknown = TransactionEntry::new("TXN-0300", date(2025, 6, 1), "x", TransactionSource::Manual)
            .with_line(EntryLine::debit("1001", "Bank", dec!(5)))
            .with_line(EntryLine::credit("ZZZ", "Mystery", dec!(5)));
        assert!(matches!(
            service.post_entry(unknown).await,
            Err(ReportError::Invalid(LedgerValidationError::UnknownAccount { .. }))
        ));

        let duplicate = TransactionEntry::new("TXN-0001", date(2025, 6, 1), "x", TransactionSource::Manual)
            .with_line(EntryLine::debit("1001", "Bank", dec!(5)))
            .with_line(EntryLine::credit("3000", "Owner's Capital", dec!(5)));
        assert!(matches!(
            service.post_entry(duplicate).await,
            Err(ReportError::Store(StoreError::DuplicateTransaction(_)))
        ));
    }

    #[tokio::test]
    async fn test_generate_from_params() {
        let service = service();
        let report = service
            .generate_from_params(
                ReportKind::IncomeStatement,
                &params(&[("period", "2025"), ("basis", "accrual"), ("residence", "all")]),
                date(2025, 8, 1),
            )
            .await
            .unwrap();
        let ReportDocument::IncomeStatement(statement) = report.document.as_ref() else {
            panic!("expected an income statement");
        };
        assert_eq!(statement.basis, Basis::Accrual);
        assert_eq!(statement.net_income.total, dec!(1318.58));

        let missing = service
            .generate_from_params(ReportKind::GeneralLedger, &ReportParams::default(), date(2025, 8, 1))
            .await;
        assert!(matches!(
            missing,
            Err(ReportError::Request(RequestError::MissingAccount))
        ));
    }

    #[tokio::test]
    async fn test_general_ledger_reads_history_for_opening_balance() {
        let service = service();
        let report = service
            .generate_from_params(
                ReportKind::GeneralLedger,
                &params(&[("period", "2025-02"), ("account", "1001")]),
                date(2025, 8, 1),
            )
            .await
            .unwrap();
        let ReportDocument::GeneralLedger(ledger) = report.document.as_ref() else {
            panic!("expected a general ledger");
        };
        // 7500 + 200 + 450 - 100 in January.
        assert_eq!(ledger.opening_balance, dec!(8050));
    }

    #[tokio::test]
    async fn test_verify_clean_ledger() {
        let service = service();
        let verification = service
            .verify_ledger(&ReportPeriod::year(2025).unwrap(), None)
            .await
            .unwrap();
        // Voided entries are not read.
        assert_eq!(verification.entries_checked, 16);
        assert!(verification.is_clean());
    }

    #[test]
    fn test_settings_from_config() {
        let config = ReportingConfig {
            default_basis: "accrual".to_string(),
            ..ReportingConfig::default()
        };
        let settings = ReportSettings::from_config(&config).unwrap();
        assert_eq!(settings.default_basis, Basis::Accrual);
        assert_eq!(settings.cache_capacity, 200);

        let bad = ReportingConfig {
            default_basis: "weekly".to_string(),
            ..ReportingConfig::default()
        };
        assert!(matches!(
            ReportSettings::from_config(&bad),
            Err(ReportError::InvalidConfig(_))
        ));
    }
}
