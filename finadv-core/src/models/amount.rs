//! Fixed-point currency amount
//!
//! Every `Amount` carries exactly two fractional digits. Sign is not checked.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Fractional digits kept for every amount
pub const AMOUNT_SCALE: u32 = 2;

/// Currency amount with scale 2
///
/// # Example
/// ```
/// use finadv_core::models::Amount;
///
/// let amount: Amount = "1000.5".parse().unwrap();
/// assert_eq!(amount.to_string(), "1000.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Round half away from zero to two places.
    ///
    /// Values too large to carry two fractional digits keep their own scale;
    /// use `try_new` for untrusted input.
    pub fn new(value: Decimal) -> Self {
        let mut value =
            value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(AMOUNT_SCALE);
        Self(value)
    }

    /// Like `new`, but rejects values that cannot be held at scale 2.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        let amount = Self::new(value);
        if amount.0.scale() != AMOUNT_SCALE {
            return Err(ValidationError::OutOfRange {
                field: "amount",
                value: value.to_string(),
            });
        }
        Ok(amount)
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, AMOUNT_SCALE))
    }

    pub fn zero() -> Self {
        Self::from_cents(0)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidFormat {
            field: "amount",
            reason: "must be a decimal number",
        })?;
        Self::try_new(value)
    }
}

// Stored as decimal text; the row decoder goes through here.
impl TryFrom<String> for Amount {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_to_two_places() {
        assert_eq!("1000.5".parse::<Amount>().unwrap().to_string(), "1000.50");
        assert_eq!("50".parse::<Amount>().unwrap().to_string(), "50.00");
        assert_eq!(Amount::zero().to_string(), "0.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!("0.125".parse::<Amount>().unwrap().to_string(), "0.13");
        assert_eq!("-0.125".parse::<Amount>().unwrap().to_string(), "-0.13");
        assert_eq!("0.124".parse::<Amount>().unwrap().to_string(), "0.12");
    }

    #[test]
    fn negative_values_are_kept() {
        let amount: Amount = "-12.3".parse().unwrap();
        assert_eq!(amount, Amount::from_cents(-1230));
    }

    #[test]
    fn rejects_garbage() {
        let err = "ten".parse::<Amount>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "amount", .. }));
    }

    #[test]
    fn rejects_values_without_room_for_cents() {
        let err = "79228162514264337593543950335".parse::<Amount>().unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "amount", .. }));

        let err = serde_json::from_str::<Amount>(r#""79228162514264337593543950335""#);
        assert!(err.is_err());

        let largest: Amount = "792281625142643375935439503.35".parse().unwrap();
        assert_eq!(largest.to_string(), "792281625142643375935439503.35");
    }

    #[test]
    fn sums_amounts() {
        let total: Amount = ["10.10", "0.05", "4"]
            .iter()
            .map(|s| s.parse::<Amount>().unwrap())
            .sum();
        assert_eq!(total.to_string(), "14.15");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Amount::from_cents(100050)).unwrap();
        assert_eq!(json, "\"1000.50\"");

        let from_number: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_number.to_string(), "12.50");
        let from_string: Amount = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(from_string, from_number);
    }
}
