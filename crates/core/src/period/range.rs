//! Report periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{MonthKey, PeriodError};

/// Longest range accepted by [`ReportPeriod::range`], in months.
pub const MAX_PERIOD_MONTHS: i64 = 120;

/// An inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// A calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is out of range.
    pub fn year(year: i32) -> Result<Self, PeriodError> {
        let start = MonthKey::new(year, 1)?.first_day();
        let end = MonthKey::new(year, 12)?.last_day();
        Ok(Self { start, end })
    }

    /// A calendar month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month or year is out of range.
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        let key = MonthKey::new(year, month)?;
        Ok(Self {
            start: key.first_day(),
            end: key.last_day(),
        })
    }

    /// An arbitrary range.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is after `end` or the range touches more
    /// than [`MAX_PERIOD_MONTHS`] months.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }
        let months = i64::from(end.year() - start.year()) * 12
            + i64::from(end.month())
            - i64::from(start.month())
            + 1;
        if months > MAX_PERIOD_MONTHS {
            return Err(PeriodError::TooLong {
                months,
                max: MAX_PERIOD_MONTHS,
            });
        }
        Ok(Self { start, end })
    }

    /// Everything up to and including `end`, for cumulative balances.
    #[must_use]
    pub const fn through(end: NaiveDate) -> Self {
        Self {
            start: NaiveDate::MIN,
            end,
        }
    }

    /// Parses `2025`, `2025-03` or `2025-01-01..2025-06-30`.
    ///
    /// # Errors
    ///
    /// Returns an error for any other shape or an invalid date.
    pub fn parse(input: &str) -> Result<Self, PeriodError> {
        let input = input.trim();
        let unparseable = || PeriodError::Unparseable(input.to_string());

        if let Some((start, end)) = input.split_once("..") {
            let start = parse_date(start).ok_or_else(unparseable)?;
            let end = parse_date(end).ok_or_else(unparseable)?;
            return Self::range(start, end);
        }

        match input.split('-').count() {
            1 => {
                if input.len() != 4 {
                    return Err(unparseable());
                }
                let year = input.parse().map_err(|_| unparseable())?;
                Self::year(year)
            }
            2 => {
                let key: MonthKey = input.parse()?;
                Self::month(key.year, key.month)
            }
            _ => Err(unparseable()),
        }
    }

    /// Months the period touches, in order.
    #[must_use]
    pub fn months(&self) -> Vec<MonthKey> {
        let last = MonthKey::of(self.end);
        let mut months = Vec::new();
        let mut current = MonthKey::of(self.start);
        while current <= last {
            months.push(current);
            current = current.next();
        }
        months
    }

    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The day before the period starts, used as the opening-balance date.
    #[must_use]
    pub fn opening_date(&self) -> Option<NaiveDate> {
        self.start.pred_opt()
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
