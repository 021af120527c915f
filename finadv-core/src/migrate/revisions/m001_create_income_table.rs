//! Revision a1c3e5f70b21: create the income table.

use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

use crate::migrate::{execute_all, Migration};

/// Creates the income table and its date index.
pub struct CreateIncomeTable;

#[async_trait]
impl Migration for CreateIncomeTable {
    fn revision(&self) -> &'static str {
        "a1c3e5f70b21"
    }

    fn down_revision(&self) -> Option<&'static str> {
        None
    }

    fn description(&self) -> &'static str {
        "create income table"
    }

    async fn upgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error> {
        // amount is exact decimal text with two places, written by `Amount`.
        execute_all(
            tx,
            &[
                r#"
                CREATE TABLE income (
                    id VARCHAR NOT NULL,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL,
                    source VARCHAR(255) NOT NULL,
                    type VARCHAR(32) NOT NULL,
                    amount TEXT NOT NULL,
                    date DATE NOT NULL,
                    description VARCHAR(1024) NOT NULL DEFAULT '',
                    PRIMARY KEY (id)
                )
                "#,
                "CREATE INDEX ix_income_date ON income (date)",
            ],
        )
        .await
    }

    async fn downgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error> {
        execute_all(
            tx,
            &["DROP INDEX ix_income_date", "DROP TABLE income"],
        )
        .await
    }
}
