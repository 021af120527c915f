//! End-to-end HTTP behaviour through the full router

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing::get as route_get;
use axum::Router;
use finadv_core::create_pool;
use finadv_core::migrate::{revisions, Migrator, UpgradeTarget};
use finadv_server::http::{app_routes, build_router, build_router_from};
use finadv_server::{AppState, ServerConfig};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn migrated_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    let chain = revisions::chain().unwrap();
    Migrator::new(&pool, &chain)
        .upgrade(&UpgradeTarget::Head)
        .await
        .unwrap();
    pool
}

async fn app() -> (Router, SqlitePool) {
    let pool = migrated_pool().await;
    let app = build_router(AppState { pool: pool.clone() }, &ServerConfig::default());
    (app, pool)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn json_body(response: Response) -> Value {
    serde_json::from_str(&text(response).await).unwrap()
}

fn toggle(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/theme/toggle");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn home_page_renders() {
    let (app, _pool) = app().await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = text(response).await;
    assert!(body.contains("FinAdv"));
    assert!(body.contains(r#"data-theme="light""#));
}

#[tokio::test]
async fn home_page_shows_requested_month() {
    let (app, _pool) = app().await;

    let created = send_json(
        &app,
        "POST",
        "/api/incomes",
        json!({"source": "Salary", "income_type": "Fixed", "amount": "1000.50", "entry_date": "2025-02-15"}),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let body = text(get(&app, "/?year=2025&month=2").await).await;
    assert!(body.contains("February 2025"));
    assert!(body.contains("Salary"));
    assert!(body.contains("1000.50"));

    let body = text(get(&app, "/?year=2025&month=3").await).await;
    assert!(body.contains("No income recorded this month."));
}

#[tokio::test]
async fn home_page_follows_theme_cookie() {
    let (app, _pool) = app().await;

    let request = Request::get("/")
        .header(header::COOKIE, "theme=dark")
        .body(Body::empty())
        .unwrap();
    let body = text(send(&app, request).await).await;
    assert!(body.contains(r#"data-theme="dark""#));
}

#[tokio::test]
async fn theme_toggle_rotates_light_dark_light() {
    let (app, _pool) = app().await;

    let response = send(&app, toggle(None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["hx-refresh"], "true");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("theme=dark"));

    let response = send(&app, toggle(Some("theme=dark"))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("theme=light"));

    let response = send(&app, toggle(Some("theme=light"))).await;
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("theme=dark"));
}

#[tokio::test]
async fn unknown_route_is_custom_404() {
    let (app, _pool) = app().await;

    let response = get(&app, "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = text(response).await;
    assert!(body.contains("Page not found"));
    assert!(body.contains("looking for doesn't exist"));
}

async fn boom() -> &'static str {
    panic!("secret internal detail")
}

#[tokio::test]
async fn panicking_handler_is_custom_500() {
    let pool = migrated_pool().await;
    let app = build_router_from(
        app_routes().route("/_test_raise_500", route_get(boom)),
        AppState { pool },
        &ServerConfig::default(),
    );

    let response = get(&app, "/_test_raise_500").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = text(response).await;
    assert!(body.contains("Something went wrong"));
    assert!(!body.contains("secret internal detail"));
}

#[tokio::test]
async fn storage_failure_is_custom_500() {
    let (app, pool) = app().await;
    pool.close().await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text(response).await.contains("Something went wrong"));
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _pool) = app().await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn serves_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.css"), "body { color: red; }").unwrap();

    let config = ServerConfig {
        static_dir: dir.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let app = build_router(AppState { pool: migrated_pool().await }, &config);

    let response = get(&app, "/static/app.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "body { color: red; }");
}

#[tokio::test]
async fn income_crud_round_trip() {
    let (app, _pool) = app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/incomes",
        json!({
            "source": "Salary",
            "income_type": "Fixed",
            "amount": "1000.5",
            "entry_date": "2025-02-15",
            "description": "Monthly"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["amount"], "1000.50");
    let id = created["id"].as_str().unwrap().to_string();

    let fetched = json_body(get(&app, &format!("/api/incomes/{id}")).await).await;
    assert_eq!(fetched, created);

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/incomes/{id}"),
        json!({
            "source": "Salary",
            "income_type": "Variable",
            "amount": "1200",
            "entry_date": "2025-02-15"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["income_type"], "Variable");
    assert_eq!(updated["amount"], "1200.00");
    assert_eq!(updated["created_at"], created["created_at"]);

    let listed = json_body(get(&app, "/api/incomes?year=2025&month=2").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let listed = json_body(get(&app, "/api/incomes?year=2025&month=1").await).await;
    assert!(listed.as_array().unwrap().is_empty());

    let request = Request::delete(format!("/api/incomes/{id}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::OK);

    let response = get(&app, &format!("/api/incomes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_rejects_bad_input() {
    let (app, _pool) = app().await;

    let response = get(&app, "/api/incomes/not-an-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/incomes?year=2025&month=13").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/debts?month=2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/api/incomes",
        json!({"source": "", "income_type": "Fixed", "amount": "1", "entry_date": "2025-02-15"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");

    let response = send_json(
        &app,
        "POST",
        "/api/debts",
        json!({"amount": "1", "payment_method": "Barter", "entry_date": "2025-02-15"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "bad_request");
}

#[tokio::test]
async fn missing_debt_is_404() {
    let (app, _pool) = app().await;

    let id = finadv_core::RecordId::new();
    let response = get(&app, &format!("/api/debts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "not_found");

    let request = Request::delete(format!("/api/debts/{id}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, request).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unpaid_debts_listing() {
    let (app, _pool) = app().await;

    for (amount, paid, due) in [("10", false, "2025-02-20"), ("20", true, "2025-02-05"), ("30", false, "2025-02-10")] {
        let response = send_json(
            &app,
            "POST",
            "/api/debts",
            json!({
                "amount": amount,
                "payment_method": "Credit",
                "entry_date": "2025-02-01",
                "paid": paid,
                "due_date": due
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let unpaid = json_body(get(&app, "/api/debts?unpaid=true").await).await;
    let amounts: Vec<&str> = unpaid
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["amount"].as_str().unwrap())
        .collect();
    assert_eq!(amounts, ["30.00", "10.00"]);

    let all = json_body(get(&app, "/api/debts?year=2025&month=2").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}
