mod fraction;

pub use fraction::{
    evaluate_fraction, format_as_fraction, format_decimal, format_number, is_nice_fraction,
    parse_fraction, round_to_nice_fraction, COMMON_FRACTIONS,
};

use std::fmt;

use serde::{Serialize, Serializer};

/// Quantity text used when an amount is left unspecified
pub const SOME: &str = "some";

/// Default tolerance when rendering decimals as fractions
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Tolerance for deciding that a value is close to a common fraction
pub const NICE_FRACTION_TOLERANCE: f64 = 0.02;

/// A numeric ingredient amount.
///
/// `Unspecified` ("some") is its own case and never takes part in arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Known(f64),
    Unspecified,
    /// Free text that is not a number, such as `2-3`
    Literal(String),
}

impl Quantity {
    /// Interprets the textual quantity stored on a parsed component
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(SOME) {
            return Quantity::Unspecified;
        }
        match parse_fraction(text) {
            Some(value) if value.is_finite() => Quantity::Known(value),
            _ => Quantity::Literal(text.to_string()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Quantity::Known(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Quantity::Unspecified)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Known(value) => f.write_str(&format_number(*value)),
            Quantity::Unspecified => f.write_str(SOME),
            Quantity::Literal(text) => f.write_str(text),
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Quantity::Known(value) => serializer.serialize_f64(*value),
            Quantity::Unspecified => serializer.serialize_str(SOME),
            Quantity::Literal(text) => serializer.serialize_str(text),
        }
    }
}
