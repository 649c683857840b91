//! Aggregation engine.
//!
//! Walks posted entries for a period and sums them per account and month
//! (accrual view), or attributes their cash movement to counter-accounts
//! (cash view). Sums are exact decimal additions with no rounding, so
//! monthly figures always add up to their totals.

pub mod accounts;
pub mod cash;

#[cfg(test)]
mod props;

pub use crate::classification::Basis;
pub use accounts::{
    AccountAggregate, AccountAggregates, DebitCredit, UnclassifiedLine, aggregate_accounts,
};
pub use cash::{CashAggregates, CashFlowItem, CashPosting, aggregate_cash};
