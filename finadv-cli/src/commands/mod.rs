//! Command implementations for the finadv CLI

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

use anyhow::{Context, Result};
use finadv_core::db::{create_pool_with_options, PoolSettings};
use sqlx::SqlitePool;

/// Open the database named by `--database-url`, or by settings when absent.
///
/// `SQL_ECHO` applies either way.
pub(crate) async fn connect(database_url: Option<String>) -> Result<SqlitePool> {
    let settings = finadv_core::settings().context("Invalid configuration")?;
    let database_url = database_url.unwrap_or_else(|| settings.database_url.clone());

    tracing::debug!(database_url = %database_url, "opening database");
    create_pool_with_options(&database_url, PoolSettings::from(settings))
        .await
        .with_context(|| format!("Failed to open database {}", database_url))
}
