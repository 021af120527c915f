//! Persisted entities
//!
//! Income and Debt are independent tables; both embed `RecordMeta`.

pub mod base;
pub mod debt;
pub mod income;

/// Maximum length of the free-text description on every record
pub const MAX_DESCRIPTION_LEN: usize = 1024;

pub use base::{Record, RecordId, RecordMeta, SqliteQuery};
pub use debt::{Debt, PaymentMethod};
pub use income::{Income, IncomeType, MAX_SOURCE_LEN};
