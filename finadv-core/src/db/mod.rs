//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - The pool is the session factory; each repository call borrows one connection
//! - Every write runs in its own transaction and commits before returning
//! - Misses are `None`, storage failures are `DbError`; nothing retries

pub mod debts;
pub mod error;
pub mod incomes;
pub mod pool;
pub mod repo;

pub use error::DbError;
pub use pool::{create_pool, create_pool_with_options, PoolSettings};
pub use repo::Repo;
