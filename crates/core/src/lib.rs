//! Core business logic for Lodgebook.
//!
//! This crate contains pure ledger and reporting logic with ZERO web or
//! database dependencies. Stores plug in through [`ledger::LedgerStore`].
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts and code resolution
//! - `classification` - Account code rules, report categories and cash basis
//! - `ledger` - Double-entry entries, validation and the store abstraction
//! - `period` - Report periods and month keys
//! - `aggregation` - Per-account and cash sums by month
//! - `reports` - Statement assemblers, report cache and the reports service

pub mod accounts;
pub mod aggregation;
pub mod classification;
pub mod ledger;
pub mod period;
pub mod reports;

#[cfg(test)]
mod testing;
