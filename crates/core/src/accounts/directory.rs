//! Account directory: code lookups and parent linkage.

use std::collections::BTreeMap;

use super::chart::default_accounts;
use super::types::Account;
use crate::classification::{account_type_for_code, is_descendant, root_code};

/// Parent chains longer than this are treated as malformed and cut.
const MAX_DEPTH: usize = 8;

/// Reference table mapping account codes to accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDirectory {
    accounts: BTreeMap<String, Account>,
}

impl AccountDirectory {
    /// Builds a directory. Later duplicates of a code replace earlier ones.
    #[must_use]
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.code.clone(), account))
                .collect(),
        }
    }

    /// Directory over the standard residence chart.
    #[must_use]
    pub fn default_chart() -> Self {
        Self::new(default_accounts())
    }

    /// Adds or replaces an account.
    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.code.clone(), account);
    }

    /// Exact lookup.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Account> {
        self.accounts.get(code)
    }

    /// Looks a code up, falling back to its nearest known parent and then to
    /// the code-range rules.
    ///
    /// A sub-ledger code such as `1100-<student>` resolves to an account with
    /// that code, the parent's type and `fallback_name`. Returns `None` when
    /// nothing can classify the code.
    #[must_use]
    pub fn resolve(&self, code: &str, fallback_name: &str) -> Option<Account> {
        if let Some(account) = self.get(code) {
            return Some(account.clone());
        }

        let name = if fallback_name.trim().is_empty() {
            code
        } else {
            fallback_name
        };

        let mut current = code;
        while let Some((parent, _)) = current.rsplit_once('-') {
            if let Some(parent_account) = self.get(parent) {
                let mut account = Account::new(code, name, parent_account.account_type)
                    .with_parent(parent);
                account.category.clone_from(&parent_account.category);
                return Some(account);
            }
            current = parent;
        }

        account_type_for_code(code).map(|account_type| Account::new(code, name, account_type))
    }

    /// Parent code: the explicit `parent_code`, else the code with its last
    /// `-segment` removed.
    #[must_use]
    pub fn parent_of(&self, code: &str) -> Option<String> {
        if let Some(parent) = self.get(code).and_then(|a| a.parent_code.as_ref()) {
            return Some(parent.clone());
        }
        code.rsplit_once('-').map(|(parent, _)| parent.to_string())
    }

    /// Ancestors of a code, nearest first.
    #[must_use]
    pub fn ancestors(&self, code: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut current = code.to_string();
        while let Some(parent) = self.parent_of(&current) {
            if parent == code || ancestors.contains(&parent) || ancestors.len() >= MAX_DEPTH {
                break;
            }
            ancestors.push(parent.clone());
            current = parent;
        }
        ancestors
    }

    /// Code a balance folds into when parent/child rollup is applied: the
    /// top-most known ancestor, else the root code when the code-range rules
    /// classify it, else the code itself.
    #[must_use]
    pub fn rollup_code(&self, code: &str) -> String {
        if let Some(ancestor) = self
            .ancestors(code)
            .into_iter()
            .rev()
            .find(|ancestor| self.accounts.contains_key(ancestor))
        {
            return ancestor;
        }
        let root = root_code(code);
        if root != code && account_type_for_code(root).is_some() {
            return root.to_string();
        }
        code.to_string()
    }

    /// Returns true if `code` is `ancestor` or sits anywhere below it.
    #[must_use]
    pub fn is_within(&self, code: &str, ancestor: &str) -> bool {
        is_descendant(code, ancestor) || self.ancestors(code).iter().any(|a| a == ancestor)
    }

    /// Direct children of a code, sorted by code.
    #[must_use]
    pub fn children_of(&self, code: &str) -> Vec<&Account> {
        self.accounts
            .values()
            .filter(|account| {
                account.code != code && self.parent_of(&account.code).as_deref() == Some(code)
            })
            .collect()
    }

    /// All codes, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.accounts.keys().map(String::as_str).collect()
    }

    /// Iterates accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the directory holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
