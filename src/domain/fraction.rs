use std::fmt;

use serde::{Deserialize, Serialize};

/// A probability or effectiveness value in the closed interval `[0, 1]`.
///
/// NaN and values outside the interval are rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fraction(f64);

impl Fraction {
    /// The fraction `0`.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new `Fraction`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFractionError` if the value is NaN or lies outside
    /// `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, InvalidFractionError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidFractionError(value))
        }
    }

    /// Creates a `Fraction` from a value known at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the value is NaN or outside `[0, 1]`. In a `const` or
    /// `static` initialiser this is a compile error.
    #[must_use]
    pub const fn from_const(value: f64) -> Self {
        assert!(value >= 0.0 && value <= 1.0, "fraction must lie in [0, 1]");
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Fraction {
    type Error = InvalidFractionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(fraction: Fraction) -> Self {
        fraction.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Error returned when a value does not lie in `[0, 1]`.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Invalid fraction {0}: must be a number between 0 and 1 inclusive")]
pub struct InvalidFractionError(f64);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0.0; "lower bound")]
    #[test_case(0.5; "midpoint")]
    #[test_case(1.0; "upper bound")]
    fn accepts_values_in_range(value: f64) {
        assert_eq!(Fraction::new(value).unwrap().get(), value);
    }

    #[test_case(-0.1; "negative")]
    #[test_case(1.000_001; "just above one")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinity")]
    fn rejects_values_out_of_range(value: f64) {
        assert!(Fraction::new(value).is_err());
    }

    #[test]
    fn deserialising_out_of_range_value_fails() {
        let result: Result<Fraction, _> = serde_json::from_str("1.5");
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(Fraction::from_const(0.25).to_string(), "0.25");
    }
}
