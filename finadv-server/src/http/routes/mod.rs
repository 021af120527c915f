//! Route handlers organized by resource

pub mod debts;
pub mod health;
pub mod home;
pub mod incomes;
pub mod theme;

use finadv_core::ValidationError;
use serde::Deserialize;

use super::error::ApiError;

/// `?year=&month=` filter shared by the record collections
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    /// `Some((year, month))` when both are given, `None` when neither is.
    pub fn month(&self) -> Result<Option<(i32, u32)>, ApiError> {
        month_filter(self.year, self.month)
    }
}

/// Year and month only make sense together.
pub fn month_filter(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Option<(i32, u32)>, ApiError> {
    match (year, month) {
        (Some(year), Some(month)) => Ok(Some((year, month))),
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ValidationError::Empty { field: "year" }.into()),
        (Some(_), None) => Err(ValidationError::Empty { field: "month" }.into()),
    }
}
