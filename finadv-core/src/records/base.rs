//! Base record contract: identifier and timestamps shared by every table
//!
//! Concrete records embed a `RecordMeta` and implement `Record` so the
//! generic repository can read and write them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};
use uuid::Uuid;

use crate::models::ValidationError;

/// Query type handed to `Record::bind_columns`
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Sortable, time-ordered record identifier
///
/// Canonical lowercase UUIDv7 text. The leading 48 bits are a millisecond
/// timestamp, so string order follows creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Fresh identifier for the current instant.
    pub fn new() -> Self {
        Self(Uuid::now_v7().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(|uuid| Self(uuid.hyphenated().to_string()))
            .map_err(|_| ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid identifier format",
            })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity and timestamps of a persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RecordMeta {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// New identity; both timestamps set to now.
    pub fn new() -> Self {
        let now = now();
        Self {
            id: RecordId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

impl Default for RecordMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// Microsecond precision survives every storage round trip.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A table-backed entity the generic repository can persist.
///
/// `COLUMNS` lists the domain columns (everything except `id`,
/// `created_at` and `updated_at`) in the exact order `bind_columns` binds
/// them.
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static {
    /// Table name
    const TABLE: &'static str;

    /// Human-readable name used in errors and logs
    const RESOURCE: &'static str;

    /// Domain column names, in bind order
    const COLUMNS: &'static [&'static str];

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Bind one value per entry of `COLUMNS`, in order.
    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    fn id(&self) -> &RecordId {
        &self.meta().id
    }
}
