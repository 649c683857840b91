//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use lodgebook_core::reports::{ReportKind, ReportParams};

/// Financial reports for residence ledgers.
#[derive(Parser, Debug)]
#[command(name = "lodgebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log as JSON lines (overrides `logging.json`)
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a report and print it as JSON
    Report {
        /// income_statement, balance_sheet, monthly_balance_sheet, cash_flow,
        /// trial_balance or general_ledger
        #[arg(value_parser = parse_kind)]
        kind: ReportKind,

        #[command(flatten)]
        params: ParamArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// List posted entries that break ledger rules
    Verify {
        /// `2025`, `2025-03` or `2025-01-01..2025-06-30` (default: this year)
        #[arg(short, long)]
        period: Option<String>,

        /// Residence UUID, or `all`
        #[arg(short, long)]
        residence: Option<String>,
    },
    /// List the available report types
    Kinds,
}

/// Report parameters, passed through as raw strings and validated by the
/// reports service.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// `2025`, `2025-03` or `2025-01-01..2025-06-30`
    #[arg(short, long)]
    pub period: Option<String>,

    /// `cash` or `accrual`
    #[arg(short, long)]
    pub basis: Option<String>,

    /// Residence UUID, or `all`
    #[arg(short, long)]
    pub residence: Option<String>,

    /// Balance date, `YYYY-MM-DD`
    #[arg(long)]
    pub as_of: Option<String>,

    /// Year for the monthly balance sheet
    #[arg(short, long)]
    pub year: Option<String>,

    /// Account code for the general ledger
    #[arg(short, long)]
    pub account: Option<String>,

    /// Page number
    #[arg(long)]
    pub page: Option<String>,

    /// Page size
    #[arg(long)]
    pub per_page: Option<String>,

    /// Fold sub-accounts into their parents (`true`/`false`)
    #[arg(long)]
    pub rollup: Option<String>,
}

impl From<ParamArgs> for ReportParams {
    fn from(args: ParamArgs) -> Self {
        Self {
            period: args.period,
            basis: args.basis,
            residence: args.residence,
            as_of: args.as_of,
            year: args.year,
            account: args.account,
            page: args.page,
            per_page: args.per_page,
            rollup: args.rollup,
        }
    }
}

fn parse_kind(value: &str) -> Result<ReportKind, String> {
    value.parse()
}
