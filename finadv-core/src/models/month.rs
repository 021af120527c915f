//! Calendar month bounds

use chrono::{Datelike, NaiveDate};

use super::ValidationError;

/// Closed date interval covering one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl MonthRange {
    /// First and last day of `month` (1-12) in `year`.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::OutOfRange {
                field: "month",
                value: month.to_string(),
            });
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "year",
                value: year.to_string(),
            }
        })?;

        let last = if month == 12 {
            NaiveDate::from_ymd_opt(year, 12, 31)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1).and_then(|d| d.pred_opt())
        }
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "year",
            value: year.to_string(),
        })?;

        Ok(Self { first, last })
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        // The date itself proves the month is representable.
        Self::new(date.year(), date.month()).unwrap_or(Self {
            first: date,
            last: date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }
}
