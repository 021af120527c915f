//! Income endpoints
//!
//! - GET    /api/incomes[?year=&month=]
//! - POST   /api/incomes
//! - GET    /api/incomes/{id}
//! - PUT    /api/incomes/{id}
//! - DELETE /api/incomes/{id}

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use finadv_core::models::check_text;
use finadv_core::records::{MAX_DESCRIPTION_LEN, MAX_SOURCE_LEN};
use finadv_core::{Amount, Income, IncomeType, Record, Repo, ValidationError};
use serde::Deserialize;

use super::MonthQuery;
use crate::http::extractors::ValidRecordId;
use crate::http::{ApiError, AppState};

/// Writable income fields
#[derive(Debug, Deserialize)]
pub struct IncomeInput {
    pub source: String,
    pub income_type: IncomeType,
    pub amount: Amount,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl IncomeInput {
    fn validate(&self) -> Result<(), ValidationError> {
        check_text("source", &self.source, MAX_SOURCE_LEN, true)?;
        check_text("description", &self.description, MAX_DESCRIPTION_LEN, false)
    }

    fn into_income(self) -> Result<Income, ValidationError> {
        self.validate()?;
        Ok(
            Income::new(self.source, self.income_type, self.amount, self.entry_date)
                .with_description(self.description),
        )
    }

    fn apply(self, income: &mut Income) -> Result<(), ValidationError> {
        self.validate()?;
        income.source = self.source;
        income.income_type = self.income_type;
        income.amount = self.amount;
        income.entry_date = self.entry_date;
        income.description = self.description;
        Ok(())
    }
}

/// GET /api/incomes
async fn list_incomes(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<Income>>, ApiError> {
    let Query(query) = query?;
    let repo = Repo::<Income>::new(&state.pool);

    let mut incomes = match query.month()? {
        Some((year, month)) => repo.list_by_month(year, month).await?,
        None => repo.list().await?,
    };
    incomes.sort_by(|a, b| (a.entry_date, a.id()).cmp(&(b.entry_date, b.id())));

    Ok(Json(incomes))
}

/// POST /api/incomes
async fn create_income(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IncomeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Income>), ApiError> {
    let Json(input) = payload?;
    let income = Repo::<Income>::new(&state.pool)
        .add(input.into_income()?)
        .await?;

    tracing::info!(id = %income.id(), "income recorded");
    Ok((StatusCode::CREATED, Json(income)))
}

/// GET /api/incomes/{id}
async fn get_income(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
) -> Result<Json<Income>, ApiError> {
    Repo::<Income>::new(&state.pool)
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// PUT /api/incomes/{id}
async fn update_income(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
    payload: Result<Json<IncomeInput>, JsonRejection>,
) -> Result<Json<Income>, ApiError> {
    let Json(input) = payload?;
    let repo = Repo::<Income>::new(&state.pool);

    let mut income = repo.get(&id).await?.ok_or_else(|| not_found(&id))?;
    input.apply(&mut income)?;

    Ok(Json(repo.update(income).await?))
}

/// DELETE /api/incomes/{id}
async fn delete_income(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
) -> Result<Json<Income>, ApiError> {
    let deleted = Repo::<Income>::new(&state.pool)
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(id = %id, "income deleted");
    Ok(Json(deleted))
}

fn not_found(id: &finadv_core::RecordId) -> ApiError {
    ApiError::NotFound {
        resource: Income::RESOURCE,
        id: id.to_string(),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/incomes", get(list_incomes).post(create_income))
        .route(
            "/api/incomes/{id}",
            get(get_income).put(update_income).delete(delete_income),
        )
}
