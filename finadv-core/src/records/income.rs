//! Income record and IncomeType enum

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::base::{Record, RecordMeta, SqliteQuery};
use crate::models::Amount;

/// Maximum length of `Income::source`
pub const MAX_SOURCE_LEN: usize = 255;

/// Fixed (predictable) or Variable (one-off or irregular)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum IncomeType {
    Fixed,
    Variable,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Variable => "Variable",
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Income entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Income {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub source: String,
    #[sqlx(rename = "type")]
    pub income_type: IncomeType,
    #[sqlx(try_from = "String")]
    pub amount: Amount,
    #[sqlx(rename = "date")]
    pub entry_date: NaiveDate,
    pub description: String,
}

impl Income {
    /// New unsaved income with an empty description.
    pub fn new(
        source: impl Into<String>,
        income_type: IncomeType,
        amount: Amount,
        entry_date: NaiveDate,
    ) -> Self {
        Self {
            meta: RecordMeta::new(),
            source: source.into(),
            income_type,
            amount,
            entry_date,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Record for Income {
    const TABLE: &'static str = "income";
    const RESOURCE: &'static str = "income";
    const COLUMNS: &'static [&'static str] = &["source", "type", "amount", "date", "description"];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.source.as_str())
            .bind(self.income_type)
            .bind(self.amount.to_string())
            .bind(self.entry_date)
            .bind(self.description.as_str())
    }
}
