use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tax_api::config::Cli;
use tax_api::{AppState, logging, router, serve};
use tax_core::TaxService;
use tax_core::calculations::AllowanceResolver;
use tax_core::db::RepositoryRegistry;
use tax_db_sqlite::SqliteRepositoryFactory;
use tokio::net::TcpListener;
use tracing::{debug, info};

fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let db_config = cli.db_config();
    debug!(backend = %db_config.backend, "connecting to configuration store");
    let repository = build_registry()
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open {} store", db_config.backend))?;

    let resolver = AllowanceResolver::new(cli.unknown_allowance_policy());
    let state = AppState::new(
        TaxService::new(repository, resolver),
        cli.admin_credentials(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, unknown_allowances = ?resolver.unknown_allowance_policy(), "tax-api listening");

    serve(listener, router(state))
        .await
        .context("Server error")?;

    info!("server shutdown complete");
    Ok(())
}
