//! Upgrade / downgrade runner
//!
//! Each revision runs in its own transaction together with the marker
//! update, so a failing script leaves the marker at the last revision that
//! committed.

use std::fmt;

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{Migration, MigrationChain, MigrationError};

/// Version marker table
pub const VERSION_TABLE: &str = "schema_version";

/// Where `upgrade` should stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeTarget {
    Head,
    Revision(String),
}

impl UpgradeTarget {
    /// `"head"` or a revision id.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "head" | "heads" => Self::Head,
            other => Self::Revision(other.to_string()),
        }
    }
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Revision(id) => f.write_str(id),
        }
    }
}

/// Where `downgrade` should stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DowngradeTarget {
    Base,
    Revision(String),
}

impl DowngradeTarget {
    /// `"base"` or a revision id.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "base" => Self::Base,
            other => Self::Revision(other.to_string()),
        }
    }
}

impl fmt::Display for DowngradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Revision(id) => f.write_str(id),
        }
    }
}

/// Applies a chain against one database
pub struct Migrator<'a> {
    pool: &'a SqlitePool,
    chain: &'a MigrationChain,
}

impl<'a> Migrator<'a> {
    pub fn new(pool: &'a SqlitePool, chain: &'a MigrationChain) -> Self {
        Self { pool, chain }
    }

    pub fn chain(&self) -> &'a MigrationChain {
        self.chain
    }

    /// Revision recorded in the marker, `None` at base.
    pub async fn current(&self) -> Result<Option<String>, MigrationError> {
        let (exists,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(VERSION_TABLE)
        .fetch_one(self.pool)
        .await?;

        if exists == 0 {
            return Ok(None);
        }

        let rows: Vec<(String,)> =
            sqlx::query_as(&format!("SELECT version_num FROM {}", VERSION_TABLE))
                .fetch_all(self.pool)
                .await?;

        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.into_iter().next().map(|(version,)| version)),
            n => Err(MigrationError::CorruptMarker(n)),
        }
    }

    /// Apply every unapplied revision up to and including `target`.
    ///
    /// Returns the applied revision ids; empty when already there.
    pub async fn upgrade(
        &self,
        target: &UpgradeTarget,
    ) -> Result<Vec<&'static str>, MigrationError> {
        self.ensure_version_table().await?;
        let current = self.current_position().await?;

        let target_index = match target {
            UpgradeTarget::Head => self.chain.len() - 1,
            UpgradeTarget::Revision(id) => self.position(id)?,
        };

        if let Some(current_index) = current {
            if current_index > target_index {
                return Err(MigrationError::TargetBehind {
                    target: target.to_string(),
                    current: self.revision_at(current_index).to_string(),
                });
            }
        }

        let start = current.map_or(0, |index| index + 1);
        let mut applied = Vec::new();

        for migration in self.chain.iter().skip(start).take(target_index + 1 - start) {
            tracing::info!(
                "Running upgrade {} -> {}, {}",
                migration.down_revision().unwrap_or("<base>"),
                migration.revision(),
                migration.description()
            );

            let mut tx = self.pool.begin().await?;
            migration
                .upgrade(&mut tx)
                .await
                .map_err(|source| script_error(migration, source))?;
            set_marker(&mut tx, Some(migration.revision())).await?;
            tx.commit().await?;

            applied.push(migration.revision());
        }

        if applied.is_empty() {
            tracing::info!(%target, "already at target; nothing to upgrade");
        }

        Ok(applied)
    }

    /// Revert applied revisions, newest first, down to `target`.
    ///
    /// `Base` reverts everything and leaves the marker table empty.
    pub async fn downgrade(
        &self,
        target: &DowngradeTarget,
    ) -> Result<Vec<&'static str>, MigrationError> {
        self.ensure_version_table().await?;
        let current = self.current_position().await?;

        // Index of the lowest revision to revert.
        let stop = match target {
            DowngradeTarget::Base => 0,
            DowngradeTarget::Revision(id) => self.position(id)? + 1,
        };

        let Some(current_index) = current else {
            if let DowngradeTarget::Revision(id) = target {
                return Err(MigrationError::TargetAhead {
                    target: id.clone(),
                    current: "base".to_string(),
                });
            }
            tracing::info!("already at base; nothing to downgrade");
            return Ok(Vec::new());
        };

        if stop > current_index + 1 {
            return Err(MigrationError::TargetAhead {
                target: target.to_string(),
                current: self.revision_at(current_index).to_string(),
            });
        }

        let mut reverted = Vec::new();

        for index in (stop..=current_index).rev() {
            let Some(migration) = self.chain.get(index) else {
                break;
            };

            tracing::info!(
                "Running downgrade {} -> {}, {}",
                migration.revision(),
                migration.down_revision().unwrap_or("<base>"),
                migration.description()
            );

            let mut tx = self.pool.begin().await?;
            migration
                .downgrade(&mut tx)
                .await
                .map_err(|source| script_error(migration, source))?;
            set_marker(&mut tx, migration.down_revision()).await?;
            tx.commit().await?;

            reverted.push(migration.revision());
        }

        if reverted.is_empty() {
            tracing::info!(%target, "already at target; nothing to downgrade");
        }

        Ok(reverted)
    }

    async fn ensure_version_table(&self) -> Result<(), MigrationError> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                version_num VARCHAR(32) NOT NULL,
                CONSTRAINT {}_pkc PRIMARY KEY (version_num)
            )",
            VERSION_TABLE, VERSION_TABLE
        ))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    async fn current_position(&self) -> Result<Option<usize>, MigrationError> {
        match self.current().await? {
            Some(id) => self.position(&id).map(Some),
            None => Ok(None),
        }
    }

    fn position(&self, id: &str) -> Result<usize, MigrationError> {
        self.chain
            .position(id)
            .ok_or_else(|| MigrationError::UnknownRevision(id.to_string()))
    }

    fn revision_at(&self, index: usize) -> &'static str {
        self.chain.get(index).map_or("<unknown>", |m| m.revision())
    }
}

async fn set_marker(
    tx: &mut Transaction<'_, Sqlite>,
    revision: Option<&'static str>,
) -> Result<(), MigrationError> {
    sqlx::query(&format!("DELETE FROM {}", VERSION_TABLE))
        .execute(&mut **tx)
        .await?;

    if let Some(revision) = revision {
        sqlx::query(&format!(
            "INSERT INTO {} (version_num) VALUES (?)",
            VERSION_TABLE
        ))
        .bind(revision)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn script_error(migration: &dyn Migration, source: sqlx::Error) -> MigrationError {
    tracing::error!(revision = migration.revision(), "migration script failed: {}", source);
    MigrationError::Script {
        revision: migration.revision(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_pool;
    use crate::migrate::chain::tests::Stub;
    use crate::migrate::revisions;
    use async_trait::async_trait;

    /// Creates a table on the way up and fails on purpose afterwards.
    struct Broken;

    #[async_trait]
    impl Migration for Broken {
        fn revision(&self) -> &'static str {
            "broken"
        }

        fn down_revision(&self) -> Option<&'static str> {
            Some("root")
        }

        fn description(&self) -> &'static str {
            "fails halfway"
        }

        async fn upgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error> {
            sqlx::query("CREATE TABLE half_done (x INTEGER)")
                .execute(&mut **tx)
                .await?;
            sqlx::query("THIS IS NOT SQL").execute(&mut **tx).await?;
            Ok(())
        }

        async fn downgrade<'a>(
            &self,
            _tx: &mut Transaction<'a, Sqlite>,
        ) -> Result<(), sqlx::Error> {
            Ok(())
        }
    }

    async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_one(pool)
                .await
                .unwrap();
        count == 1
    }

    #[test]
    fn parses_targets() {
        assert_eq!(UpgradeTarget::parse("head"), UpgradeTarget::Head);
        assert_eq!(
            UpgradeTarget::parse("abc123"),
            UpgradeTarget::Revision("abc123".into())
        );
        assert_eq!(DowngradeTarget::parse("base"), DowngradeTarget::Base);
        assert_eq!(DowngradeTarget::Base.to_string(), "base");
    }

    #[tokio::test]
    async fn fresh_database_is_at_base() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);

        assert_eq!(migrator.current().await.unwrap(), None);
        assert!(!table_exists(&pool, VERSION_TABLE).await);
    }

    #[tokio::test]
    async fn upgrade_to_intermediate_then_head() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);
        let root = chain.root().revision();

        let applied = migrator
            .upgrade(&UpgradeTarget::Revision(root.to_string()))
            .await
            .unwrap();
        assert_eq!(applied, [root]);
        assert_eq!(migrator.current().await.unwrap().as_deref(), Some(root));

        let applied = migrator.upgrade(&UpgradeTarget::Head).await.unwrap();
        assert_eq!(applied.len(), chain.len() - 1);
        assert_eq!(
            migrator.current().await.unwrap().as_deref(),
            Some(chain.head().revision())
        );
    }

    #[tokio::test]
    async fn upgrade_backwards_is_rejected() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);

        migrator.upgrade(&UpgradeTarget::Head).await.unwrap();
        let err = migrator
            .upgrade(&UpgradeTarget::Revision(chain.root().revision().to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::TargetBehind { .. }));
    }

    #[tokio::test]
    async fn unknown_target_is_rejected() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);

        let err = migrator
            .upgrade(&UpgradeTarget::Revision("deadbeef".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::UnknownRevision(id) if id == "deadbeef"));
    }

    #[tokio::test]
    async fn downgrade_at_base_is_noop() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);

        let reverted = migrator.downgrade(&DowngradeTarget::Base).await.unwrap();
        assert!(reverted.is_empty());
    }

    #[tokio::test]
    async fn downgrade_to_root_keeps_root() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);
        let root = chain.root().revision();

        migrator.upgrade(&UpgradeTarget::Head).await.unwrap();
        let reverted = migrator
            .downgrade(&DowngradeTarget::Revision(root.to_string()))
            .await
            .unwrap();

        assert_eq!(reverted.len(), chain.len() - 1);
        assert_eq!(migrator.current().await.unwrap().as_deref(), Some(root));
    }

    #[tokio::test]
    async fn failing_script_rolls_back_and_keeps_marker() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = MigrationChain::new(vec![
            Box::new(Stub {
                id: "root",
                parent: None,
            }),
            Box::new(Broken),
        ])
        .unwrap();
        let migrator = Migrator::new(&pool, &chain);

        let err = migrator.upgrade(&UpgradeTarget::Head).await.unwrap_err();
        assert!(matches!(err, MigrationError::Script { revision: "broken", .. }));
        assert_eq!(migrator.current().await.unwrap().as_deref(), Some("root"));
        assert!(!table_exists(&pool, "half_done").await);
    }

    #[tokio::test]
    async fn marker_naming_unknown_revision_is_an_error() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let chain = revisions::chain().unwrap();
        let migrator = Migrator::new(&pool, &chain);

        migrator.upgrade(&UpgradeTarget::Head).await.unwrap();
        sqlx::query(&format!("UPDATE {} SET version_num = 'ffffffffffff'", VERSION_TABLE))
            .execute(&pool)
            .await
            .unwrap();

        let err = migrator.upgrade(&UpgradeTarget::Head).await.unwrap_err();
        assert!(matches!(err, MigrationError::UnknownRevision(_)));
    }
}
