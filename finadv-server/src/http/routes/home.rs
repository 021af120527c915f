//! Home page and the HTML 404 fallback

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::{routing::get, Router};
use chrono::Utc;
use finadv_core::{Debt, Income, MonthRange, Repo};

use super::MonthQuery;
use crate::http::{AppState, PageError};
use crate::pages::{self, MonthSummary};
use crate::theme::Theme;

/// GET /
///
/// Shows the requested month, or the current one when the query is absent
/// or invalid.
async fn home(
    State(state): State<Arc<AppState>>,
    theme: Theme,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Html<String>, PageError> {
    let range = query
        .ok()
        .and_then(|Query(q)| q.month().ok().flatten())
        .and_then(|(year, month)| MonthRange::new(year, month).ok())
        .unwrap_or_else(|| MonthRange::containing(Utc::now().date_naive()));

    let mut incomes = Repo::<Income>::new(&state.pool)
        .list_by_month(range.year(), range.month())
        .await?;
    incomes.sort_by_key(|i| i.entry_date);

    let mut debts = Repo::<Debt>::new(&state.pool)
        .list_by_month(range.year(), range.month())
        .await?;
    debts.sort_by_key(|d| d.entry_date);

    let summary = MonthSummary {
        range,
        incomes: &incomes,
        debts: &debts,
    };
    Ok(Html(pages::home(theme, &summary)))
}

/// Fallback for every unmatched route
pub async fn not_found(theme: Theme) -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found(theme)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home))
}
