//! Lodgebook report generator.
//!
//! Reads the ledger from Postgres and prints financial reports as JSON.
//!
//! Usage:
//!   lodgebook report income_statement --period 2025 --basis accrual
//!   lodgebook report general_ledger --account 1001 --period 2025-03
//!   lodgebook verify --period 2025
//!   lodgebook kinds

mod cli;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::Parser;
use lodgebook_core::period::ReportPeriod;
use lodgebook_core::reports::{
    FinancialReportsService, ReportError, ReportKind, ReportParams, ReportSettings,
    parse_residence,
};
use lodgebook_db::{LedgerRepository, connect};
use lodgebook_shared::config::LoggingConfig;
use lodgebook_shared::{AppConfig, AppError};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn init_tracing(logging: &LoggingConfig, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only the report.
    if json || logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.json_logs);

    if matches!(cli.command, Command::Kinds) {
        for kind in ReportKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    let settings = ReportSettings::from_config(&config.reporting).map_err(AppError::from)?;
    let db = connect(&config.database).await?;
    info!("Connected to database");

    let service = FinancialReportsService::new(LedgerRepository::new(db), settings);
    let today = Utc::now().date_naive();

    match cli.command {
        Command::Report { kind, params, pretty } => {
            let report = service
                .generate_from_params(kind, &ReportParams::from(params), today)
                .await
                .map_err(AppError::from)?;
            let json = if pretty {
                serde_json::to_string_pretty(report.document.as_ref())?
            } else {
                serde_json::to_string(report.document.as_ref())?
            };
            println!("{json}");
        }
        Command::Verify { period, residence } => {
            let period = match period {
                Some(period) => ReportPeriod::parse(&period),
                None => ReportPeriod::year(today.year()),
            }
            .map_err(|err| AppError::from(ReportError::from(err)))?;
            let residence = parse_residence(residence.as_deref())
                .map_err(|err| AppError::from(ReportError::from(err)))?;

            let verification = service
                .verify_ledger(&period, residence)
                .await
                .map_err(AppError::from)?;
            println!("{}", serde_json::to_string_pretty(&verification)?);
            if !verification.is_clean() {
                std::process::exit(2);
            }
        }
        Command::Kinds => {}
    }

    Ok(())
}
