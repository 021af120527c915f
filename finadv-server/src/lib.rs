//! finadv-server: HTTP layer for FinAdv
//!
//! Server-rendered pages (home, 404, 500), the theme cookie toggle, static
//! files, and JSON endpoints over the income and debt repositories.

pub mod http;
pub mod pages;
pub mod theme;

pub use http::{build_router, run_server, ApiError, AppState, PageError, ServerConfig, ServerError};
pub use theme::Theme;
