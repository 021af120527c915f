//! Income queries beyond the generic repository

use super::repo::{quote, select_sql};
use super::{DbError, Repo};
use crate::models::MonthRange;
use crate::records::Income;

impl Repo<'_, Income> {
    /// Incomes whose entry date falls in the given calendar month (inclusive),
    /// in storage order.
    pub async fn list_by_month(&self, year: i32, month: u32) -> Result<Vec<Income>, DbError> {
        let range = MonthRange::new(year, month)?;
        let sql = format!(
            "{} WHERE {date} >= ? AND {date} <= ?",
            select_sql::<Income>(),
            date = quote("date")
        );

        let incomes = sqlx::query_as::<_, Income>(&sql)
            .bind(range.first)
            .bind(range.last)
            .fetch_all(self.pool())
            .await?;

        Ok(incomes)
    }
}
