//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - Panic capture rendered as the generic 500 page
//! - Graceful shutdown
//! - HTML pages for browsers, JSON errors for `/api`

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, PageError};
pub use server::{
    app_routes, build_router, build_router_from, run_server, AppState, ServerConfig, ServerError,
};
