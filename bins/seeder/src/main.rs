//! Database seeder for Lodgebook development and testing.
//!
//! Seeds the standard chart of accounts and a year of demo postings for one
//! residence: rent charged and collected, utility bills accrued and settled,
//! wages and an opening capital contribution.
//!
//! Usage: cargo run --bin seeder -- --year 2025 --students 4

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use clap::Parser;
use lodgebook_core::accounts::default_accounts;
use lodgebook_core::ledger::{
    EntryLine, LedgerStore, StoreError, TransactionEntry, TransactionSource,
};
use lodgebook_db::LedgerRepository;
use lodgebook_shared::AppConfig;
use lodgebook_shared::types::ResidenceId;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Demo residence ID (consistent for all seeds)
const DEMO_RESIDENCE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0101);

/// Seeds the chart of accounts and demo ledger entries.
#[derive(Parser, Debug)]
#[command(name = "seeder", about)]
struct Args {
    /// Year of demo postings (default: this year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Number of resident students
    #[arg(short, long, default_value_t = 3)]
    students: u8,

    /// Seed only the chart of accounts
    #[arg(long)]
    chart_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = lodgebook_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let repo = LedgerRepository::new(db);

    println!("Seeding chart of accounts...");
    let seeded = repo.accounts().upsert_chart(&default_accounts()).await?;
    println!("  {seeded} accounts");

    if args.chart_only {
        println!("Seeding complete!");
        return Ok(());
    }

    let year = args.year.unwrap_or_else(|| Utc::now().year());
    println!("Seeding demo ledger for {year}...");
    let entries = demo_entries(year, args.students, ResidenceId::from_uuid(DEMO_RESIDENCE_ID))?;

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    for entry in entries {
        match repo.append(entry).await {
            Ok(()) => inserted += 1,
            Err(StoreError::DuplicateTransaction(_)) => skipped += 1,
            Err(err) => return Err(err.into()),
        }
    }
    println!("  {inserted} entries inserted, {skipped} already present");

    println!("Seeding complete!");
    Ok(())
}

fn day(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("Invalid demo date {year}-{month:02}-{day:02}"))
}

fn last_day(year: i32, month: u32) -> anyhow::Result<NaiveDate> {
    let next = if month == 12 {
        day(year + 1, 1, 1)?
    } else {
        day(year, month + 1, 1)?
    };
    next.pred_opt().context("Date out of range")
}

struct Numberer {
    year: i32,
    next: u32,
}

impl Numberer {
    fn next(&mut self) -> String {
        self.next += 1;
        format!("DEMO-{}-{:04}", self.year, self.next)
    }
}

/// Demo postings for one residence over a calendar year.
///
/// Every student is charged rent on the 1st and pays on the 5th, except the
/// first student who leaves December unpaid. Electricity is accrued at month
/// end and settled on the 10th of the following month.
fn demo_entries(
    year: i32,
    students: u8,
    residence: ResidenceId,
) -> anyhow::Result<Vec<TransactionEntry>> {
    use TransactionSource as S;

    let rent = Decimal::from(450);
    let electricity = Decimal::from(120);
    let wages = Decimal::from(300);
    let mut ids = Numberer { year, next: 0 };
    let mut entries = vec![
        TransactionEntry::new(ids.next(), day(year, 1, 1)?, "Owner capital contribution", S::Manual)
            .with_line(EntryLine::debit("1001", "Bank Account", Decimal::from(10_000)))
            .with_line(EntryLine::credit("3000", "Owner's Capital", Decimal::from(10_000))),
    ];

    for month in 1..=12 {
        for student in 1..=students {
            let receivable = format!("1100-stu{student}");
            let name = format!("AR - Student {student}");
            entries.push(
                TransactionEntry::new(ids.next(), day(year, month, 1)?, "Monthly rent due", S::RentalAccrual)
                    .with_line(EntryLine::debit(receivable.clone(), name.clone(), rent))
                    .with_line(EntryLine::credit("4000", "Rental Income", rent)),
            );
            if month == 12 && student == 1 {
                continue;
            }
            entries.push(
                TransactionEntry::new(ids.next(), day(year, month, 5)?, "Rent received", S::Payment)
                    .with_line(EntryLine::debit("1001", "Bank Account", rent))
                    .with_line(EntryLine::credit(receivable, name, rent)),
            );
        }

        if month > 1 {
            entries.push(
                TransactionEntry::new(ids.next(), day(year, month, 10)?, "ZESA supplier payment", S::VendorPayment)
                    .with_line(
                        EntryLine::debit("2000", "Accounts Payable", electricity)
                            .with_description("Electricity"),
                    )
                    .with_line(EntryLine::credit("1001", "Bank Account", electricity)),
            );
        }
        entries.push(
            TransactionEntry::new(ids.next(), day(year, month, 25)?, "Staff wages", S::ExpensePayment)
                .with_line(EntryLine::debit("5200", "Salaries & Wages", wages))
                .with_line(EntryLine::credit("1001", "Bank Account", wages)),
        );
        entries.push(
            TransactionEntry::new(ids.next(), last_day(year, month)?, "Electricity bill", S::ExpenseAccrual)
                .with_line(EntryLine::debit("5100", "Electricity", electricity))
                .with_line(EntryLine::credit("2000", "Accounts Payable", electricity)),
        );
    }

    Ok(entries
        .into_iter()
        .map(|entry| entry.for_residence(residence))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodgebook_core::accounts::AccountDirectory;
    use lodgebook_core::ledger::validate_against_directory;
    use lodgebook_core::reports::balance_sheet;
    use lodgebook_shared::types::Currency;
    use std::collections::HashSet;

    #[test]
    fn test_demo_entries_are_valid_and_unique() {
        let directory = AccountDirectory::default_chart();
        let entries = demo_entries(2025, 3, ResidenceId::new()).unwrap();

        let ids: HashSet<_> = entries.iter().map(|e| e.transaction_id.as_str()).collect();
        assert_eq!(ids.len(), entries.len());
        for entry in &entries {
            validate_against_directory(entry, &directory).unwrap();
        }
    }

    #[test]
    fn test_demo_year_balances_with_arrears() {
        let directory = AccountDirectory::default_chart();
        let entries = demo_entries(2024, 2, ResidenceId::new()).unwrap();
        let sheet = balance_sheet(&directory, &entries, day(2024, 12, 31).unwrap(), None, Currency::default());

        assert!(sheet.is_balanced);
        let receivables = sheet
            .current_assets
            .lines
            .iter()
            .find(|line| line.code == "1100")
            .unwrap();
        assert_eq!(receivables.balance, Decimal::from(450));
    }

    #[test]
    fn test_last_day() {
        assert_eq!(last_day(2024, 2).unwrap(), day(2024, 2, 29).unwrap());
        assert_eq!(last_day(2025, 12).unwrap(), day(2025, 12, 31).unwrap());
    }
}
