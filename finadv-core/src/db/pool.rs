//! Database connection pool management
//!
//! Uses sqlx SqlitePool with explicit connection limits. Database files are
//! created on first connect.

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};

use crate::settings::Settings;

/// Default maximum connections for the pool.
/// Kept low for single-user tooling.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Pool tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Log every statement at info level
    pub sql_echo: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            sql_echo: false,
        }
    }
}

impl From<&Settings> for PoolSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            sql_echo: settings.sql_echo,
            ..Self::default()
        }
    }
}

/// Create a SQLite connection pool.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (`sqlite://finadv.db`, `sqlite::memory:`)
///
/// # Errors
///
/// Returns an error if the URL is malformed or the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("sqlite://finadv.db").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with_options(database_url, PoolSettings::default()).await
}

/// Create a SQLite connection pool with custom options.
///
/// In-memory databases live as long as their connection, so they get a single
/// connection that is never reaped.
pub async fn create_pool_with_options(
    database_url: &str,
    settings: PoolSettings,
) -> Result<SqlitePool, sqlx::Error> {
    let connect = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let connect = if settings.sql_echo {
        connect.log_statements(LevelFilter::Info)
    } else {
        connect.disable_statement_logging()
    };

    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
    };

    tracing::debug!(
        url = %database_url,
        echo = settings.sql_echo,
        "opening database pool"
    );

    pool.connect_with(connect).await
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
