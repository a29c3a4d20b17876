use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tax_core::calculations::AllowanceResolver;
use tax_core::{TaxService, UnknownAllowancePolicy};
use tax_data::{BatchReport, TaxRecordLoader};
use tax_db_sqlite::SqliteRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compute tax for every record in a CSV file and print the result as JSON.
///
/// The CSV file should have the following columns:
/// - totalIncome: Gross annual income
/// - wht: Tax already withheld
/// - donation: Donation claim (0 for none)
#[derive(Parser, Debug)]
#[command(name = "tax-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax records
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database holding the deduction bounds
    #[arg(short, long, default_value = "taxes.db")]
    database: String,

    /// Run database migrations before calculating
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

/// Logs go to stderr so stdout carries only the JSON document.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        info!("migrations complete");
    }

    if let Some(seeds_dir) = &args.seeds {
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        info!(dir = %seeds_dir.display(), "seeds complete");
    }

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = TaxRecordLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;
    info!(records = records.len(), file = %args.file.display(), "parsed tax records");

    let service = TaxService::new(
        Arc::new(repo),
        AllowanceResolver::new(UnknownAllowancePolicy::default()),
    );
    let details = TaxRecordLoader::calculate_with_service(&service, &records)
        .await
        .context("Failed to calculate tax records")?;

    let report = BatchReport::from_details(&details);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to render report")?
    );

    Ok(())
}
