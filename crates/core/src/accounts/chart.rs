//! The standard residence chart of accounts.

use super::types::{Account, AccountType};

fn asset(code: &str, name: &str, category: &str) -> Account {
    Account::new(code, name, AccountType::Asset).with_category(category)
}

fn liability(code: &str, name: &str, category: &str) -> Account {
    Account::new(code, name, AccountType::Liability).with_category(category)
}

fn equity(code: &str, name: &str) -> Account {
    Account::new(code, name, AccountType::Equity).with_category("Equity")
}

fn income(code: &str, name: &str) -> Account {
    Account::new(code, name, AccountType::Income).with_category("Income")
}

fn expense(code: &str, name: &str, category: &str) -> Account {
    Account::new(code, name, AccountType::Expense).with_category(category)
}

/// Accounts every residence ledger starts with.
#[must_use]
pub fn default_accounts() -> Vec<Account> {
    vec![
        asset("1000", "Cash on Hand", "Current Assets"),
        asset("1001", "Bank Account", "Current Assets"),
        asset("1002", "Mobile Money (Ecocash)", "Current Assets"),
        asset("1010", "Petty Cash", "Current Assets"),
        asset("1011", "Admin Petty Cash", "Current Assets").with_parent("1010"),
        asset("1012", "Finance Petty Cash", "Current Assets").with_parent("1010"),
        asset("1013", "Property Manager Petty Cash", "Current Assets").with_parent("1010"),
        asset("1014", "Maintenance Petty Cash", "Current Assets").with_parent("1010"),
        asset("1100", "Accounts Receivable - Tenants", "Current Assets"),
        asset("1200", "Prepaid Expenses", "Current Assets"),
        asset("1500", "Land and Buildings", "Property, Plant & Equipment"),
        asset("1600", "Furniture and Fittings", "Property, Plant & Equipment"),
        asset("1700", "Equipment", "Property, Plant & Equipment"),
        asset("1790", "Accumulated Depreciation", "Property, Plant & Equipment"),
        liability("2000", "Accounts Payable", "Current Liabilities"),
        liability("2010", "Accrued Expenses", "Current Liabilities"),
        liability("2020", "Tenant Security Deposits", "Current Liabilities"),
        liability("2200", "Rent Received in Advance", "Current Liabilities"),
        liability("2500", "Long-term Loan", "Non-current Liabilities"),
        equity("3000", "Owner's Capital"),
        equity("3100", "Retained Earnings"),
        equity("3200", "Owner's Drawings"),
        income("4000", "Rental Income"),
        income("4100", "Administrative Fees"),
        income("4300", "Forfeited Deposits"),
        income("4900", "Other Income"),
        expense("5000", "Maintenance & Repairs", "Operating Expenses"),
        expense("5100", "Electricity", "Utilities"),
        expense("5110", "Water", "Utilities"),
        expense("5120", "Gas", "Utilities"),
        expense("5130", "Internet", "Utilities"),
        expense("5200", "Salaries & Wages", "Staff Costs"),
        expense("5300", "Office & Administration", "Administrative Expenses"),
        expense("5310", "Bank Charges", "Administrative Expenses"),
        expense("5400", "Security Services", "Operating Expenses"),
        expense("5500", "Cleaning", "Operating Expenses"),
        expense("5900", "Depreciation", "Operating Expenses"),
        expense("5990", "Sundry Expenses", "Operating Expenses"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::account_type_for_code;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let accounts = default_accounts();
        let codes: HashSet<&str> = accounts.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes.len(), accounts.len());
    }

    #[test]
    fn test_types_agree_with_code_ranges() {
        for account in default_accounts() {
            assert_eq!(
                account_type_for_code(&account.code),
                Some(account.account_type),
                "{}",
                account.code
            );
        }
    }
}
