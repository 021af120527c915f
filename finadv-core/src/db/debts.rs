//! Debt queries beyond the generic repository

use super::repo::{quote, select_sql};
use super::{DbError, Repo};
use crate::models::MonthRange;
use crate::records::Debt;

impl Repo<'_, Debt> {
    /// Debts whose entry date falls in the given calendar month (inclusive).
    pub async fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<Debt>, DbError> {
        let range = MonthRange::new(year, month)?;
        let sql = format!(
            "{} WHERE {date} >= ? AND {date} <= ?",
            select_sql::<Debt>(),
            date = quote("date")
        );

        let debts = sqlx::query_as::<_, Debt>(&sql)
            .bind(range.first)
            .bind(range.last)
            .fetch_all(self.pool())
            .await?;

        Ok(debts)
    }

    /// Debts not yet paid, soonest due first (no due date last).
    pub async fn list_unpaid(&self) -> Result<Vec<Debt>, DbError> {
        let sql = format!(
            "{} WHERE paid = 0 ORDER BY due_date IS NULL, due_date, {}",
            select_sql::<Debt>(),
            quote("date")
        );

        let debts = sqlx::query_as::<_, Debt>(&sql)
            .fetch_all(self.pool())
            .await?;

        Ok(debts)
    }
}
