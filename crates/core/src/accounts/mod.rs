//! Chart of accounts.

pub mod chart;
pub mod directory;
pub mod types;

pub use chart::default_accounts;
pub use directory::AccountDirectory;
pub use types::{Account, AccountType};
