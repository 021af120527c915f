//! HTTP server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use finadv_core::migrate::{revisions, Migrator, UpgradeTarget};
use finadv_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Database URL (overrides settings)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory served under /static
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Upgrade the schema to head before serving
    #[arg(long)]
    pub migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let pool = super::connect(args.database_url).await?;

    if args.migrate {
        let chain = revisions::chain().context("Invalid migration chain")?;
        let applied = Migrator::new(&pool, &chain)
            .upgrade(&UpgradeTarget::Head)
            .await
            .context("Failed to upgrade schema")?;
        tracing::info!(applied = applied.len(), head = chain.head().revision(), "schema at head");
    }

    tracing::info!("Starting finadv server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        static_dir: args.static_dir,
    };

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
