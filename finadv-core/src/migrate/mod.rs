//! Schema migrations
//!
//! Revisions form a single chain (root → head), each pointing at its parent.
//! The `schema_version` table holds at most one row: the last applied
//! revision. No row (or no table) means the database is at base.
//!
//! ```ignore
//! let chain = revisions::chain()?;
//! let migrator = Migrator::new(&pool, &chain);
//! migrator.upgrade(&UpgradeTarget::Head).await?;
//! ```

pub mod chain;
pub mod error;
pub mod migration;
pub mod revisions;
pub mod runner;

pub use chain::MigrationChain;
pub use error::MigrationError;
pub use migration::{execute_all, Migration};
pub use runner::{DowngradeTarget, Migrator, UpgradeTarget, VERSION_TABLE};
