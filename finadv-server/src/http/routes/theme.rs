//! Theme toggle endpoint

use axum::http::{header, HeaderName, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::post, Router};

use crate::theme::Theme;

const HX_REFRESH: HeaderName = HeaderName::from_static("hx-refresh");

/// POST /theme/toggle
///
/// Flips the cookie and asks htmx to reload the page.
async fn toggle(current: Theme) -> impl IntoResponse {
    let next = current.toggled();
    tracing::debug!(from = %current, to = %next, "theme toggled");

    (
        StatusCode::NO_CONTENT,
        [
            (header::SET_COOKIE, next.set_cookie()),
            (HX_REFRESH, "true".to_string()),
        ],
    )
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/theme/toggle", post(toggle))
}
