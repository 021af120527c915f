//! Revision 4d2b6e8f9a13: create the debt table.

use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

use crate::migrate::{execute_all, Migration};

/// Creates the debt table with date and unpaid indexes.
pub struct CreateDebtTable;

#[async_trait]
impl Migration for CreateDebtTable {
    fn revision(&self) -> &'static str {
        "4d2b6e8f9a13"
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some("a1c3e5f70b21")
    }

    fn description(&self) -> &'static str {
        "create debt table"
    }

    async fn upgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error> {
        execute_all(
            tx,
            &[
                r#"
                CREATE TABLE debt (
                    id VARCHAR NOT NULL,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL,
                    amount TEXT NOT NULL,
                    payment_method VARCHAR(32) NOT NULL,
                    date DATE NOT NULL,
                    is_recurrent BOOLEAN NOT NULL DEFAULT 0,
                    due_date DATE,
                    paid BOOLEAN NOT NULL DEFAULT 0,
                    description VARCHAR(1024) NOT NULL DEFAULT '',
                    PRIMARY KEY (id)
                )
                "#,
                "CREATE INDEX ix_debt_date ON debt (date)",
                "CREATE INDEX ix_debt_unpaid ON debt (due_date) WHERE paid = 0",
            ],
        )
        .await
    }

    async fn downgrade<'a>(&self, tx: &mut Transaction<'a, Sqlite>) -> Result<(), sqlx::Error> {
        execute_all(
            tx,
            &[
                "DROP INDEX ix_debt_unpaid",
                "DROP INDEX ix_debt_date",
                "DROP TABLE debt",
            ],
        )
        .await
    }
}
