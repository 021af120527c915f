//! Validated value types
//!
//! Invalid input returns ValidationError, not panic.

pub mod amount;
pub mod month;
pub mod validation;

pub use amount::Amount;
pub use month::MonthRange;
pub use validation::{check_text, ValidationError};
