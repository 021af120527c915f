//! Generic repository over any `Record`
//!
//! Five operations, the same for every table:
//! - get: point lookup, `None` on miss
//! - list: full scan, no ordering
//! - add / update: one committed transaction, then reload from storage
//! - delete: fetch then delete in one transaction, `None` on miss

use std::marker::PhantomData;

use sqlx::SqlitePool;

use super::DbError;
use crate::records::{Record, RecordId};

/// Repository for records of type `T`
pub struct Repo<'a, T> {
    pool: &'a SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<'a, T: Record> Repo<'a, T> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &'a SqlitePool {
        self.pool
    }

    /// Fetch the record with the given id.
    pub async fn get(&self, id: &RecordId) -> Result<Option<T>, DbError> {
        let sql = format!("{} WHERE id = ?", select_sql::<T>());
        let record = sqlx::query_as::<_, T>(&sql)
            .bind(id.as_str())
            .fetch_optional(self.pool)
            .await?;

        Ok(record)
    }

    /// All rows of the table, in storage order.
    pub async fn list(&self) -> Result<Vec<T>, DbError> {
        let sql = select_sql::<T>();
        let records = sqlx::query_as::<_, T>(&sql).fetch_all(self.pool).await?;

        Ok(records)
    }

    /// Insert, commit, and return the stored record.
    pub async fn add(&self, record: T) -> Result<T, DbError> {
        let sql = insert_sql::<T>();
        let meta = record.meta();

        let mut tx = self.pool.begin().await?;
        let query = sqlx::query(&sql)
            .bind(meta.id.as_str())
            .bind(meta.created_at)
            .bind(meta.updated_at);
        record.bind_columns(query).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::debug!(resource = T::RESOURCE, id = %meta.id, "record added");
        self.reload(record.id()).await
    }

    /// Re-persist every column of an existing record, bump `updated_at`,
    /// commit, and return the stored record.
    ///
    /// Last write wins; there is no version check.
    pub async fn update(&self, mut record: T) -> Result<T, DbError> {
        record.meta_mut().touch();
        let sql = update_sql::<T>();

        let mut tx = self.pool.begin().await?;
        let query = sqlx::query(&sql).bind(record.meta().updated_at);
        let result = record
            .bind_columns(query)
            .bind(record.id().as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: T::RESOURCE,
                id: record.id().to_string(),
            });
        }
        tx.commit().await?;

        tracing::debug!(resource = T::RESOURCE, id = %record.id(), "record updated");
        self.reload(record.id()).await
    }

    /// Delete the record with the given id, returning its last stored values.
    pub async fn delete(&self, id: &RecordId) -> Result<Option<T>, DbError> {
        let select = format!("{} WHERE id = ?", select_sql::<T>());
        let delete = format!("DELETE FROM {} WHERE id = ?", T::TABLE);

        let mut tx = self.pool.begin().await?;
        let Some(record) = sqlx::query_as::<_, T>(&select)
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(&delete)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!(resource = T::RESOURCE, id = %id, "record deleted");
        Ok(Some(record))
    }

    async fn reload(&self, id: &RecordId) -> Result<T, DbError> {
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            resource: T::RESOURCE,
            id: id.to_string(),
        })
    }
}

/// `"a", "b", "c"` for the full column set of `T`
fn column_list<T: Record>() -> String {
    ["id", "created_at", "updated_at"]
        .iter()
        .chain(T::COLUMNS)
        .map(|c| quote(c))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn select_sql<T: Record>() -> String {
    format!("SELECT {} FROM {}", column_list::<T>(), T::TABLE)
}

fn insert_sql<T: Record>() -> String {
    let placeholders = vec!["?"; 3 + T::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        column_list::<T>(),
        placeholders
    )
}

fn update_sql<T: Record>() -> String {
    let assignments = std::iter::once("updated_at")
        .chain(T::COLUMNS.iter().copied())
        .map(|c| format!("{} = ?", quote(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {} WHERE id = ?", T::TABLE, assignments)
}

pub(crate) fn quote(column: &str) -> String {
    format!("\"{}\"", column)
}
