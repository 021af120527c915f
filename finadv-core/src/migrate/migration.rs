//! The revision contract

use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

/// One schema change and its inverse.
///
/// Both directions run inside a transaction owned by the runner, which also
/// moves the version marker before committing.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique revision id
    fn revision(&self) -> &'static str;

    /// Parent revision, `None` for the root
    fn down_revision(&self) -> Option<&'static str>;

    fn description(&self) -> &'static str;

    async fn upgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error>;

    async fn downgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error>;
}

/// Run each statement in order on the transaction.
pub async fn execute_all(
    tx: &mut Transaction<'_, Sqlite>,
    statements: &[&str],
) -> Result<(), sqlx::Error> {
    for statement in statements {
        sqlx::query(statement).execute(&mut **tx).await?;
    }
    Ok(())
}
