//! finadv-core: data layer for the FinAdv income & debt tracker
//!
//! - `settings`: process-wide configuration (database URL, SQL echo)
//! - `models`: validated value types (amounts, calendar months)
//! - `records`: persisted entities (`Income`, `Debt`) and the base record contract
//! - `db`: connection pool and the generic repository
//! - `migrate`: revision chain and the upgrade/downgrade runner

pub mod db;
pub mod migrate;
pub mod models;
pub mod records;
pub mod settings;

pub use db::{create_pool, DbError, Repo};
pub use models::{Amount, MonthRange, ValidationError};
pub use records::{Debt, Income, IncomeType, PaymentMethod, Record, RecordId, RecordMeta};
pub use settings::{settings, Settings, SettingsError};
