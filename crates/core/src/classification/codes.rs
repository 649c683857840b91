//! Account code rules.
//!
//! Codes follow the residence chart: 1xxx assets, 2xxx liabilities,
//! 3xxx equity, 4xxx income, 5xxx expenses. Sub-ledger accounts append a
//! suffix to their parent (`1100-<student>`). A handful of legacy
//! mnemonic codes from older imports are mapped onto the numeric chart.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::accounts::AccountType;

/// Legacy mnemonic code mapped onto the numeric chart.
#[derive(Debug, Clone, Copy)]
struct WellKnownCode {
    account_type: AccountType,
    canonical: u16,
}

static WELL_KNOWN: Lazy<HashMap<&'static str, WellKnownCode>> = Lazy::new(|| {
    let entry = |account_type, canonical| WellKnownCode {
        account_type,
        canonical,
    };
    HashMap::from([
        ("CASH", entry(AccountType::Asset, 1000)),
        ("BANK", entry(AccountType::Asset, 1001)),
        ("ECOCASH", entry(AccountType::Asset, 1002)),
        ("PETTY_CASH", entry(AccountType::Asset, 1010)),
        ("AR", entry(AccountType::Asset, 1100)),
        ("AP", entry(AccountType::Liability, 2000)),
        ("DEPOSITS", entry(AccountType::Liability, 2020)),
        ("ADVANCES", entry(AccountType::Liability, 2200)),
        ("SUSPENSE", entry(AccountType::Liability, 2900)),
        ("CAPITAL", entry(AccountType::Equity, 3000)),
        ("RENT", entry(AccountType::Income, 4000)),
    ])
});

/// Returns the root of a code: the segment before the first `-`.
#[must_use]
pub fn root_code(code: &str) -> &str {
    code.split('-').next().unwrap_or(code).trim()
}

/// Returns true if `code` is `parent` or one of its `parent-*` sub-accounts.
#[must_use]
pub fn is_descendant(code: &str, parent: &str) -> bool {
    code == parent
        || code
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with('-'))
}

/// Numeric chart position of a code, resolving legacy mnemonics.
///
/// Only four-digit roots take part in range rules.
#[must_use]
pub fn chart_number(code: &str) -> Option<u16> {
    let root = root_code(code);
    if let Some(known) = WELL_KNOWN.get(root.to_uppercase().as_str()) {
        return Some(known.canonical);
    }
    if root.len() == 4 && root.bytes().all(|b| b.is_ascii_digit()) {
        return root.parse().ok();
    }
    None
}

/// Classifies a code by well-known overrides, then by prefix range.
#[must_use]
pub fn account_type_for_code(code: &str) -> Option<AccountType> {
    let root = root_code(code);
    if let Some(known) = WELL_KNOWN.get(root.to_uppercase().as_str()) {
        return Some(known.account_type);
    }
    if root.is_empty() || !root.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match root.as_bytes()[0] {
        b'1' => Some(AccountType::Asset),
        b'2' => Some(AccountType::Liability),
        b'3' => Some(AccountType::Equity),
        b'4' => Some(AccountType::Income),
        b'5' => Some(AccountType::Expense),
        _ => None,
    }
}

fn in_range(code: &str, low: u16, high: u16) -> bool {
    chart_number(code).is_some_and(|n| (low..=high).contains(&n))
}

fn name_has(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(k))
}

/// Cash and cash equivalents: cash on hand, bank, mobile money, petty cash.
#[must_use]
pub fn is_cash_account(code: &str) -> bool {
    in_range(code, 1000, 1099)
}

/// Tenant receivables, including per-student sub-ledgers.
#[must_use]
pub fn is_receivable(code: &str) -> bool {
    in_range(code, 1100, 1199)
}

/// Trade payables and accrued expenses owed to suppliers.
#[must_use]
pub fn is_payable(code: &str) -> bool {
    in_range(code, 2000, 2019)
}

/// Security deposits held on behalf of tenants.
#[must_use]
pub fn is_tenant_deposit(code: &str, name: &str) -> bool {
    in_range(code, 2020, 2029)
        || (account_type_for_code(code) == Some(AccountType::Liability)
            && name_has(name, &["deposit"]))
}

/// Rent received in advance (deferred income).
#[must_use]
pub fn is_deferred_income(code: &str, name: &str) -> bool {
    in_range(code, 2200, 2299)
        || (account_type_for_code(code) == Some(AccountType::Liability)
            && name_has(name, &["advance", "deferred", "prepaid rent"]))
}

/// Contra-asset accounts that carry credit balances.
#[must_use]
pub fn is_contra_asset(name: &str) -> bool {
    name_has(name, &["accumulated depreciation", "provision for bad debt"])
}

pub(crate) fn keywords_match(text: &str, keywords: &[&str]) -> bool {
    name_has(text, keywords)
}
