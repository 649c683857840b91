//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{BALANCE_TOLERANCE, Currency, round_cents, within_tolerance};
pub use pagination::{PageMeta, PageRequest, PageResponse};
