//! Debt endpoints
//!
//! - GET    /api/debts[?year=&month=][&unpaid=true]
//! - POST   /api/debts
//! - GET    /api/debts/{id}
//! - PUT    /api/debts/{id}
//! - DELETE /api/debts/{id}

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use finadv_core::models::check_text;
use finadv_core::records::MAX_DESCRIPTION_LEN;
use finadv_core::{Amount, Debt, PaymentMethod, Record, RecordId, Repo, ValidationError};
use serde::Deserialize;

use super::month_filter;
use crate::http::extractors::ValidRecordId;
use crate::http::{ApiError, AppState};

/// Writable debt fields
#[derive(Debug, Deserialize)]
pub struct DebtInput {
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub is_recurrent: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub description: String,
}

impl DebtInput {
    fn into_debt(self) -> Result<Debt, ValidationError> {
        let mut debt = Debt::new(self.amount, self.payment_method, self.entry_date);
        self.apply(&mut debt)?;
        Ok(debt)
    }

    fn apply(self, debt: &mut Debt) -> Result<(), ValidationError> {
        check_text("description", &self.description, MAX_DESCRIPTION_LEN, false)?;
        debt.amount = self.amount;
        debt.payment_method = self.payment_method;
        debt.entry_date = self.entry_date;
        debt.is_recurrent = self.is_recurrent;
        debt.due_date = self.due_date;
        debt.paid = self.paid;
        debt.description = self.description;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DebtQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    #[serde(default)]
    pub unpaid: bool,
}

/// GET /api/debts
///
/// `unpaid=true` alone keeps the due-date ordering of the unpaid listing;
/// every other listing is ordered by entry date.
async fn list_debts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DebtQuery>, QueryRejection>,
) -> Result<Json<Vec<Debt>>, ApiError> {
    let Query(query) = query?;
    let repo = Repo::<Debt>::new(&state.pool);

    let debts = match (month_filter(query.year, query.month)?, query.unpaid) {
        (None, true) => repo.list_unpaid().await?,
        (month, unpaid) => {
            let mut debts = match month {
                Some((year, month)) => repo.list_by_month(year, month).await?,
                None => repo.list().await?,
            };
            if unpaid {
                debts.retain(|d| !d.paid);
            }
            debts.sort_by(|a, b| (a.entry_date, a.id()).cmp(&(b.entry_date, b.id())));
            debts
        }
    };

    Ok(Json(debts))
}

/// POST /api/debts
async fn create_debt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DebtInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Debt>), ApiError> {
    let Json(input) = payload?;
    let debt = Repo::<Debt>::new(&state.pool).add(input.into_debt()?).await?;

    tracing::info!(id = %debt.id(), "debt recorded");
    Ok((StatusCode::CREATED, Json(debt)))
}

/// GET /api/debts/{id}
async fn get_debt(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
) -> Result<Json<Debt>, ApiError> {
    Repo::<Debt>::new(&state.pool)
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

/// PUT /api/debts/{id}
async fn update_debt(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
    payload: Result<Json<DebtInput>, JsonRejection>,
) -> Result<Json<Debt>, ApiError> {
    let Json(input) = payload?;
    let repo = Repo::<Debt>::new(&state.pool);

    let mut debt = repo.get(&id).await?.ok_or_else(|| not_found(&id))?;
    input.apply(&mut debt)?;

    Ok(Json(repo.update(debt).await?))
}

/// DELETE /api/debts/{id}
async fn delete_debt(
    State(state): State<Arc<AppState>>,
    ValidRecordId(id): ValidRecordId,
) -> Result<Json<Debt>, ApiError> {
    let deleted = Repo::<Debt>::new(&state.pool)
        .delete(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(id = %id, "debt deleted");
    Ok(Json(deleted))
}

fn not_found(id: &RecordId) -> ApiError {
    ApiError::NotFound {
        resource: Debt::RESOURCE,
        id: id.to_string(),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/debts", get(list_debts).post(create_debt))
        .route(
            "/api/debts/{id}",
            get(get_debt).put(update_debt).delete(delete_debt),
        )
}
