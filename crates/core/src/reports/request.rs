//! Report requests: raw parameters validated into typed requests.

use chrono::{Datelike, NaiveDate};
use lodgebook_shared::types::{PageRequest, ResidenceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::ReportKind;
use crate::aggregation::Basis;
use crate::ledger::LedgerQuery;
use crate::period::{PeriodError, ReportPeriod};

/// Errors raised while validating report parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The period could not be parsed.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// Basis is neither cash nor accrual.
    #[error("Invalid basis: {0}")]
    InvalidBasis(String),

    /// Residence is not a UUID or `all`.
    #[error("Invalid residence: {0}")]
    InvalidResidence(String),

    /// Date is not `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A numeric parameter could not be parsed.
    #[error("Invalid {field}: {value}")]
    InvalidNumber {
        /// Parameter name.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// A yes/no parameter could not be parsed.
    #[error("Invalid flag {field}: {value}")]
    InvalidFlag {
        /// Parameter name.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// The general ledger needs an account.
    #[error("An account code is required for the general ledger")]
    MissingAccount,

    /// Report name not recognised.
    #[error("Unknown report type: {0}")]
    UnknownReport(String),
}

/// Raw report parameters as they arrive from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParams {
    /// `2025`, `2025-03` or `2025-01-01..2025-06-30`.
    pub period: Option<String>,
    /// `cash` or `accrual`.
    pub basis: Option<String>,
    /// Residence UUID, or `all`.
    #[serde(alias = "residenceId", alias = "residence_id")]
    pub residence: Option<String>,
    /// Balance date, `YYYY-MM-DD`.
    #[serde(alias = "asOf")]
    pub as_of: Option<String>,
    /// Calendar year for the monthly balance sheet.
    pub year: Option<String>,
    /// Account code for the general ledger.
    #[serde(alias = "accountCode", alias = "account_code")]
    pub account: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<String>,
    /// Page size.
    #[serde(alias = "perPage")]
    pub per_page: Option<String>,
    /// Fold sub-accounts into their parents.
    pub rollup: Option<String>,
}

/// Values used when a parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDefaults {
    /// Basis for the income statement.
    pub basis: Basis,
    /// Date standing in for "now".
    pub today: NaiveDate,
}

/// A validated report request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "report_type", rename_all = "snake_case")]
pub enum ReportRequest {
    /// Income statement.
    IncomeStatement {
        /// Period covered.
        period: ReportPeriod,
        /// Cash or accrual.
        basis: Basis,
        /// Residence filter.
        residence: Option<ResidenceId>,
    },
    /// Balance sheet.
    BalanceSheet {
        /// Balance date.
        as_of: NaiveDate,
        /// Residence filter.
        residence: Option<ResidenceId>,
    },
    /// Month-end balance sheets of a year.
    MonthlyBalanceSheet {
        /// Calendar year.
        year: i32,
        /// Residence filter.
        residence: Option<ResidenceId>,
    },
    /// Cash flow statement.
    CashFlow {
        /// Period covered.
        period: ReportPeriod,
        /// Residence filter.
        residence: Option<ResidenceId>,
    },
    /// Trial balance.
    TrialBalance {
        /// Balance date.
        as_of: NaiveDate,
        /// Residence filter.
        residence: Option<ResidenceId>,
        /// Fold sub-accounts into their parents.
        rollup: bool,
    },
    /// General ledger for one account.
    GeneralLedger {
        /// Account code.
        account: String,
        /// Period covered.
        period: ReportPeriod,
        /// Residence filter.
        residence: Option<ResidenceId>,
        /// Requested page.
        page: PageRequest,
    },
}

impl ReportRequest {
    /// Validates raw parameters for a report kind.
    ///
    /// Omitted values fall back to `defaults`: the period to the current
    /// year, the balance date to the period end (or today), the basis to
    /// the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error for any parameter that cannot be parsed.
    pub fn from_params(
        kind: ReportKind,
        params: &ReportParams,
        defaults: &RequestDefaults,
    ) -> Result<Self, RequestError> {
        let residence = parse_residence(params.residence.as_deref())?;
        let period = match non_empty(params.period.as_deref()) {
            Some(raw) => ReportPeriod::parse(raw)?,
            None => ReportPeriod::year(defaults.today.year())?,
        };
        let as_of = || -> Result<NaiveDate, RequestError> {
            match non_empty(params.as_of.as_deref()) {
                Some(raw) => parse_date(raw),
                None if non_empty(params.period.as_deref()).is_some() => Ok(period.end),
                None => Ok(defaults.today),
            }
        };

        let request = match kind {
            ReportKind::IncomeStatement => Self::IncomeStatement {
                period,
                basis: match non_empty(params.basis.as_deref()) {
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| RequestError::InvalidBasis(raw.to_string()))?,
                    None => defaults.basis,
                },
                residence,
            },
            ReportKind::BalanceSheet => Self::BalanceSheet {
                as_of: as_of()?,
                residence,
            },
            ReportKind::MonthlyBalanceSheet => Self::MonthlyBalanceSheet {
                year: match non_empty(params.year.as_deref()) {
                    Some(raw) => raw.parse().map_err(|_| RequestError::InvalidNumber {
                        field: "year",
                        value: raw.to_string(),
                    })?,
                    None => period.start.year(),
                },
                residence,
            },
            ReportKind::CashFlow => Self::CashFlow { period, residence },
            ReportKind::TrialBalance => Self::TrialBalance {
                as_of: as_of()?,
                residence,
                rollup: parse_flag("rollup", params.rollup.as_deref())?,
            },
            ReportKind::GeneralLedger => {
                let account = non_empty(params.account.as_deref())
                    .ok_or(RequestError::MissingAccount)?
                    .to_string();
                let fallback = PageRequest::default();
                let page = parse_number("page", params.page.as_deref())?.unwrap_or(fallback.page);
                let per_page = parse_number("per_page", params.per_page.as_deref())?
                    .unwrap_or(fallback.per_page);
                Self::GeneralLedger {
                    account,
                    period,
                    residence,
                    page: PageRequest::new(page, per_page),
                }
            }
        };
        Ok(request)
    }

    /// Report kind requested.
    #[must_use]
    pub const fn kind(&self) -> ReportKind {
        match self {
            Self::IncomeStatement { .. } => ReportKind::IncomeStatement,
            Self::BalanceSheet { .. } => ReportKind::BalanceSheet,
            Self::MonthlyBalanceSheet { .. } => ReportKind::MonthlyBalanceSheet,
            Self::CashFlow { .. } => ReportKind::CashFlow,
            Self::TrialBalance { .. } => ReportKind::TrialBalance,
            Self::GeneralLedger { .. } => ReportKind::GeneralLedger,
        }
    }

    /// Residence filter of the request.
    #[must_use]
    pub const fn residence(&self) -> Option<ResidenceId> {
        match self {
            Self::IncomeStatement { residence, .. }
            | Self::BalanceSheet { residence, .. }
            | Self::MonthlyBalanceSheet { residence, .. }
            | Self::CashFlow { residence, .. }
            | Self::TrialBalance { residence, .. }
            | Self::GeneralLedger { residence, .. } => *residence,
        }
    }

    /// Entries the report needs from the store.
    ///
    /// Cumulative reports read from the start of the ledger; the cash flow
    /// statement and general ledger need history for opening balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the year of a monthly balance sheet is out of range.
    pub fn ledger_query(&self) -> Result<LedgerQuery, PeriodError> {
        let query = match self {
            Self::IncomeStatement { period, .. } => LedgerQuery::between(period.start, period.end),
            Self::BalanceSheet { as_of, .. } | Self::TrialBalance { as_of, .. } => {
                LedgerQuery::through(*as_of)
            }
            Self::MonthlyBalanceSheet { year, .. } => {
                LedgerQuery::through(ReportPeriod::year(*year)?.end)
            }
            Self::CashFlow { period, .. } | Self::GeneralLedger { period, .. } => {
                LedgerQuery::through(period.end)
            }
        };
        Ok(query.for_residence(self.residence()))
    }

    /// Canonical cache key: equal requests always produce equal keys.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let residence = self
            .residence()
            .map_or_else(|| "all".to_string(), |id| id.to_string());
        match self {
            Self::IncomeStatement { period, basis, .. } => {
                format!("{}|{period}|{basis}|{residence}", self.kind())
            }
            Self::BalanceSheet { as_of, .. } => format!("{}|{as_of}|{residence}", self.kind()),
            Self::MonthlyBalanceSheet { year, .. } => {
                format!("{}|{year}|{residence}", self.kind())
            }
            Self::CashFlow { period, .. } => format!("{}|{period}|{residence}", self.kind()),
            Self::TrialBalance { as_of, rollup, .. } => {
                format!("{}|{as_of}|{rollup}|{residence}", self.kind())
            }
            Self::GeneralLedger {
                account,
                period,
                page,
                ..
            } => format!(
                "{}|{account}|{period}|{}:{}|{residence}",
                self.kind(),
                page.page,
                page.per_page
            ),
        }
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a residence filter: blank or `all` means every residence.
///
/// # Errors
///
/// Returns an error if the value is not a residence UUID.
pub fn parse_residence(raw: Option<&str>) -> Result<Option<ResidenceId>, RequestError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(raw) if raw.eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| RequestError::InvalidResidence(raw.to_string())),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| RequestError::InvalidDate(raw.to_string()))
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<u32>, RequestError> {
    non_empty(raw)
        .map(|raw| {
            raw.parse().map_err(|_| RequestError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_flag(field: &'static str, raw: Option<&str>) -> Result<bool, RequestError> {
    match non_empty(raw).map(str::to_lowercase).as_deref() {
        None | Some("false" | "0" | "no") => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some(other) => Err(RequestError::InvalidFlag {
            field,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            basis: Basis::Cash,
            today: date(2025, 8, 14),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ReportParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[test]
    fn test_defaults_apply() {
        let request =
            ReportRequest::from_params(ReportKind::IncomeStatement, &ReportParams::default(), &defaults())
                .unwrap();
        assert_eq!(
            request,
            ReportRequest::IncomeStatement {
                period: ReportPeriod::year(2025).unwrap(),
                basis: Basis::Cash,
                residence: None,
            }
        );

        let sheet =
            ReportRequest::from_params(ReportKind::BalanceSheet, &ReportParams::default(), &defaults())
                .unwrap();
        assert_eq!(
            sheet,
            ReportRequest::BalanceSheet {
                as_of: date(2025, 8, 14),
                residence: None
            }
        );
    }

    #[test]
    fn test_as_of_follows_period_end() {
        let request = ReportRequest::from_params(
            ReportKind::TrialBalance,
            &params(&[("period", "2025-03")]),
            &defaults(),
        )
        .unwrap();
        assert!(matches!(
            request,
            ReportRequest::TrialBalance { as_of, rollup: false, .. } if as_of == date(2025, 3, 31)
        ));
    }

    #[test]
    fn test_camel_case_aliases() {
        let request = ReportRequest::from_params(
            ReportKind::GeneralLedger,
            &params(&[
                ("accountCode", "1100"),
                ("perPage", "20"),
                ("page", "2"),
                ("residenceId", "all"),
            ]),
            &defaults(),
        )
        .unwrap();
        let ReportRequest::GeneralLedger {
            account,
            page,
            residence,
            ..
        } = request
        else {
            panic!("expected a general ledger request");
        };
        assert_eq!(account, "1100");
        assert_eq!(page, PageRequest::new(2, 20));
        assert_eq!(residence, None);
    }

    #[rstest]
    #[case(ReportKind::IncomeStatement, &[("basis", "weekly")])]
    #[case(ReportKind::IncomeStatement, &[("period", "2025-13")])]
    #[case(ReportKind::CashFlow, &[("period", "0001-01-01..9999-12-31")])]
    #[case(ReportKind::BalanceSheet, &[("as_of", "31/12/2025")])]
    #[case(ReportKind::BalanceSheet, &[("residence", "north-wing")])]
    #[case(ReportKind::TrialBalance, &[("rollup", "maybe")])]
    #[case(ReportKind::GeneralLedger, &[("period", "2025")])]
    #[case(ReportKind::GeneralLedger, &[("account", "1001"), ("page", "-1")])]
    #[case(ReportKind::MonthlyBalanceSheet, &[("year", "twenty")])]
    fn test_rejects_bad_params(#[case] kind: ReportKind, #[case] pairs: &[(&str, &str)]) {
        assert!(ReportRequest::from_params(kind, &params(pairs), &defaults()).is_err());
    }

    #[test]
    fn test_cache_key_is_canonical() {
        let a = ReportRequest::from_params(
            ReportKind::IncomeStatement,
            &params(&[("period", "2025"), ("basis", "ACCRUAL"), ("residence", "all")]),
            &defaults(),
        )
        .unwrap();
        let b = ReportRequest::from_params(
            ReportKind::IncomeStatement,
            &params(&[("period", "2025-01-01..2025-12-31"), ("basis", "accrual")]),
            &defaults(),
        )
        .unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "income_statement|2025-01-01..2025-12-31|accrual|all");

        let cash = ReportRequest::from_params(ReportKind::IncomeStatement, &ReportParams::default(), &defaults())
            .unwrap();
        assert_ne!(a.cache_key(), cash.cache_key());
    }

    #[test]
    fn test_ledger_queries() {
        let cash_flow = ReportRequest::CashFlow {
            period: ReportPeriod::month(2025, 3).unwrap(),
            residence: None,
        };
        assert_eq!(
            cash_flow.ledger_query().unwrap(),
            LedgerQuery::through(date(2025, 3, 31))
        );

        let income = ReportRequest::IncomeStatement {
            period: ReportPeriod::month(2025, 3).unwrap(),
            basis: Basis::Accrual,
            residence: None,
        };
        assert_eq!(
            income.ledger_query().unwrap(),
            LedgerQuery::between(date(2025, 3, 1), date(2025, 3, 31))
        );
    }

    #[test]
    fn test_monthly_year_from_period() {
        let request = ReportRequest::from_params(
            ReportKind::MonthlyBalanceSheet,
            &params(&[("period", "2024")]),
            &defaults(),
        )
        .unwrap();
        assert_eq!(request, ReportRequest::MonthlyBalanceSheet { year: 2024, residence: None });
    }
}
