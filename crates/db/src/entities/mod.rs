//! `SeaORM` entities for the ledger tables.

pub mod accounts;
pub mod entry_lines;
pub mod sea_orm_active_enums;
pub mod transaction_entries;
