//! Schema migration commands
//!
//! Commands: upgrade, downgrade, current, history, heads

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finadv_core::migrate::{revisions, DowngradeTarget, MigrationChain, Migrator, UpgradeTarget};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides settings)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: MigrateCommands,
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommands {
    /// Apply revisions up to a target ("head" or a revision id)
    Upgrade {
        /// Target revision
        #[arg(default_value = "head")]
        target: String,
    },
    /// Revert revisions down to a target ("base" or a revision id)
    Downgrade {
        /// Target revision
        target: String,
    },
    /// Show the revision the database is at
    Current,
    /// List every revision, newest first
    History,
    /// Show the head revision
    Heads,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let chain = revisions::chain().context("Invalid migration chain")?;

    // These two never touch the database.
    match &args.command {
        MigrateCommands::History => {
            print_history(&chain);
            return Ok(());
        }
        MigrateCommands::Heads => {
            for head in chain.heads() {
                println!("{} (head)", head);
            }
            return Ok(());
        }
        _ => {}
    }

    let pool = super::connect(args.database_url).await?;
    let migrator = Migrator::new(&pool, &chain);

    match args.command {
        MigrateCommands::Upgrade { target } => {
            let target = UpgradeTarget::parse(&target);
            let applied = migrator
                .upgrade(&target)
                .await
                .with_context(|| format!("Upgrade to {} failed", target))?;
            report(&migrator, "applied", applied.len()).await?;
        }
        MigrateCommands::Downgrade { target } => {
            let target = DowngradeTarget::parse(&target);
            let reverted = migrator
                .downgrade(&target)
                .await
                .with_context(|| format!("Downgrade to {} failed", target))?;
            report(&migrator, "reverted", reverted.len()).await?;
        }
        MigrateCommands::Current => {
            let current = migrator.current().await.context("Failed to read revision")?;
            println!("{}", label(&chain, current.as_deref()));
        }
        MigrateCommands::History | MigrateCommands::Heads => {}
    }

    pool.close().await;
    Ok(())
}

async fn report(migrator: &Migrator<'_>, verb: &str, count: usize) -> Result<()> {
    let current = migrator.current().await.context("Failed to read revision")?;
    println!(
        "{} revision(s) {}; current: {}",
        count,
        verb,
        label(migrator.chain(), current.as_deref())
    );
    Ok(())
}

fn label(chain: &MigrationChain, revision: Option<&str>) -> String {
    match revision {
        None => "base".to_string(),
        Some(id) if id == chain.head().revision() => format!("{} (head)", id),
        Some(id) => id.to_string(),
    }
}

fn print_history(chain: &MigrationChain) {
    let head = chain.head().revision();
    for migration in chain.iter().collect::<Vec<_>>().into_iter().rev() {
        let marker = if migration.revision() == head { " (head)" } else { "" };
        println!(
            "{} -> {}{}, {}",
            migration.down_revision().unwrap_or("<base>"),
            migration.revision(),
            marker,
            migration.description()
        );
    }
}
