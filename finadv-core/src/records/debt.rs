//! Debt record and PaymentMethod enum

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::base::{Record, RecordMeta, SqliteQuery};
use crate::models::Amount;

/// How a debt is (or will be) paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum PaymentMethod {
    Pix,
    Credit,
    Debit,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [Self::Pix, Self::Credit, Self::Debit, Self::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "Pix",
            Self::Credit => "Credit",
            Self::Debit => "Debit",
            Self::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debt entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Debt {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[sqlx(try_from = "String")]
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    #[sqlx(rename = "date")]
    pub entry_date: NaiveDate,
    pub is_recurrent: bool,
    pub due_date: Option<NaiveDate>,
    pub paid: bool,
    pub description: String,
}

impl Debt {
    /// New unsaved debt: not recurrent, unpaid, no due date.
    pub fn new(amount: Amount, payment_method: PaymentMethod, entry_date: NaiveDate) -> Self {
        Self {
            meta: RecordMeta::new(),
            amount,
            payment_method,
            entry_date,
            is_recurrent: false,
            due_date: None,
            paid: false,
            description: String::new(),
        }
    }

    pub fn recurrent(mut self, is_recurrent: bool) -> Self {
        self.is_recurrent = is_recurrent;
        self
    }

    pub fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Record for Debt {
    const TABLE: &'static str = "debt";
    const RESOURCE: &'static str = "debt";
    const COLUMNS: &'static [&'static str] = &[
        "amount",
        "payment_method",
        "date",
        "is_recurrent",
        "due_date",
        "paid",
        "description",
    ];

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn bind_columns<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.amount.to_string())
            .bind(self.payment_method)
            .bind(self.entry_date)
            .bind(self.is_recurrent)
            .bind(self.due_date)
            .bind(self.paid)
            .bind(self.description.as_str())
    }
}
