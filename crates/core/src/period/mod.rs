//! Report periods and monthly keys.

pub mod month;
pub mod range;

use chrono::NaiveDate;
use thiserror::Error;

pub use month::MonthKey;
pub use range::ReportPeriod;

/// Errors building a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month number outside 1-12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Year outside the supported calendar.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Range whose start is after its end.
    #[error("Period start {start} is after end {end}")]
    StartAfterEnd {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Range covering more months than a report can break down.
    #[error("Period spans {months} months (at most {max} allowed)")]
    TooLong {
        /// Months the range touches.
        months: i64,
        /// Upper limit.
        max: i64,
    },

    /// Input that is not a year, month or date range.
    #[error("Cannot parse period '{0}' (expected YYYY, YYYY-MM or YYYY-MM-DD..YYYY-MM-DD)")]
    Unparseable(String),
}
