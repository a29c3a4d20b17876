use clap::{Parser, ValueEnum};
use tax_core::UnknownAllowancePolicy;
use tax_core::db::DbConfig;

use crate::auth::AdminCredentials;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliUnknownAllowances {
    /// Unrecognised allowance types are deducted as claimed.
    PassThrough,
    /// Unrecognised allowance types fail the request.
    Reject,
}

impl From<CliUnknownAllowances> for UnknownAllowancePolicy {
    fn from(value: CliUnknownAllowances) -> Self {
        match value {
            CliUnknownAllowances::PassThrough => UnknownAllowancePolicy::PassThrough,
            CliUnknownAllowances::Reject => UnknownAllowancePolicy::Reject,
        }
    }
}

/// Thai personal income tax HTTP service.
///
/// Every option can also be given through the environment variable shown in
/// its help text.
#[derive(Debug, Parser)]
#[command(name = "tax-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Username for the admin endpoints.
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: String,

    /// Password for the admin endpoints.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Configuration store backend.
    #[arg(long, env = "DATABASE_BACKEND", default_value = "sqlite")]
    pub database_backend: String,

    /// Configuration store connection string.
    /// For SQLite this is a file path (e.g. `taxes.db`) or `:memory:`.
    #[arg(long, env = "DATABASE_URL", default_value = "taxes.db")]
    pub database_url: String,

    /// What to do with allowance types the calculator does not recognise.
    #[arg(long, env = "UNKNOWN_ALLOWANCES", value_enum, default_value_t = CliUnknownAllowances::PassThrough)]
    pub unknown_allowances: CliUnknownAllowances,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_backend, &self.database_url)
    }

    pub fn admin_credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }

    pub fn unknown_allowance_policy(&self) -> UnknownAllowancePolicy {
        self.unknown_allowances.into()
    }
}
