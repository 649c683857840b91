//! Ledger query filters.

use chrono::NaiveDate;
use lodgebook_shared::types::ResidenceId;
use serde::{Deserialize, Serialize};

use super::types::TransactionEntry;

/// Filter applied when reading entries from a ledger store.
///
/// Only posted entries ever match. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerQuery {
    /// First date included; `None` reads from the beginning of the ledger.
    pub from: Option<NaiveDate>,
    /// Last date included.
    pub to: NaiveDate,
    /// Restrict to one residence.
    pub residence: Option<ResidenceId>,
}

impl LedgerQuery {
    /// Everything posted up to and including `to`.
    #[must_use]
    pub const fn through(to: NaiveDate) -> Self {
        Self {
            from: None,
            to,
            residence: None,
        }
    }

    /// Everything posted between `from` and `to`, inclusive.
    #[must_use]
    pub const fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to,
            residence: None,
        }
    }

    /// Restricts the query to a residence (`None` keeps all residences).
    #[must_use]
    pub const fn for_residence(mut self, residence: Option<ResidenceId>) -> Self {
        self.residence = residence;
        self
    }

    /// Returns true if the entry is posted and inside the filter.
    #[must_use]
    pub fn matches(&self, entry: &TransactionEntry) -> bool {
        entry.status.is_posted()
            && self.from.is_none_or(|from| entry.date >= from)
            && entry.date <= self.to
            && self
                .residence
                .is_none_or(|residence| entry.residence == Some(residence))
    }

    /// Entries of `entries` that match, in their original order.
    pub fn select(
        self,
        entries: &[TransactionEntry],
    ) -> impl Iterator<Item = &TransactionEntry> + Clone {
        entries.iter().filter(move |entry| self.matches(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntryLine, EntryStatus, TransactionSource};
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn entry_on(day: NaiveDate) -> TransactionEntry {
        TransactionEntry::new("TXN", day, "rent", TransactionSource::Payment)
            .with_line(EntryLine::debit("1001", "Bank", dec!(10)))
            .with_line(EntryLine::credit("4000", "Rent", dec!(10)))
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let query = LedgerQuery::between(date(3, 1), date(3, 31));
        assert!(query.matches(&entry_on(date(3, 1))));
        assert!(query.matches(&entry_on(date(3, 31))));
        assert!(!query.matches(&entry_on(date(2, 28))));
        assert!(!query.matches(&entry_on(date(4, 1))));
    }

    #[test]
    fn test_through_has_no_lower_bound() {
        let query = LedgerQuery::through(date(3, 31));
        assert!(query.matches(&entry_on(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())));
    }

    #[test]
    fn test_only_posted_entries_match() {
        let query = LedgerQuery::through(date(12, 31));
        assert!(!query.matches(&entry_on(date(3, 1)).with_status(EntryStatus::Draft)));
        assert!(!query.matches(&entry_on(date(3, 1)).with_status(EntryStatus::Voided)));
    }

    #[test]
    fn test_residence_filter() {
        let here = ResidenceId::new();
        let there = ResidenceId::new();
        let query = LedgerQuery::through(date(12, 31)).for_residence(Some(here));

        assert!(query.matches(&entry_on(date(3, 1)).for_residence(here)));
        assert!(!query.matches(&entry_on(date(3, 1)).for_residence(there)));
        assert!(!query.matches(&entry_on(date(3, 1))));

        let all = LedgerQuery::through(date(12, 31)).for_residence(None);
        assert!(all.matches(&entry_on(date(3, 1)).for_residence(there)));
    }

    #[test]
    fn test_select_outlives_temporary_query() {
        let here = ResidenceId::new();
        let entries = vec![
            entry_on(date(1, 5)).for_residence(here),
            entry_on(date(2, 5)),
            entry_on(date(6, 5)).for_residence(here),
        ];

        let selected = LedgerQuery::between(date(1, 1), date(3, 31))
            .for_residence(Some(here))
            .select(&entries);
        let again = selected.clone();

        assert_eq!(selected.count(), 1);
        assert_eq!(again.map(|e| e.date).collect::<Vec<_>>(), [date(1, 5)]);
    }
}
