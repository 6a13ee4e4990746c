//! Unit resolution.
//!
//! Free-text units are looked up in a static reference table. Anything not in
//! the table gets a synthesized [`TypedUnit`] of [`Dimension::Unknown`], which
//! is only compatible with the exact same unit text. An empty unit never
//! resolves.

mod bartender;
mod convert;
mod table;

pub use bartender::{select_best_unit, select_best_unit_with, SmartAmount, ML_PER_DASH};
pub use convert::{consolidate_by_name, convert_to, convert_to_system};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use table::UnitDef;

/// Measurement systems ingredients can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    Us,
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            "us" | "us customary" => Ok(UnitSystem::Us),
            other => Err(format!("Unknown unit system: {other}")),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
            UnitSystem::Us => "us",
        })
    }
}

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Length,
    Temperature,
    Time,
    Energy,
    Unknown,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Mass => "mass",
            Dimension::Volume => "volume",
            Dimension::Length => "length",
            Dimension::Temperature => "temperature",
            Dimension::Time => "time",
            Dimension::Energy => "energy",
            Dimension::Unknown => "unknown",
        })
    }
}

/// A unit with a known dimension and a linear mapping to its dimension's base unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedUnit {
    pub name: String,
    pub dimension: Dimension,
    #[serde(skip)]
    factor: f64,
    #[serde(skip)]
    offset: f64,
}

impl TypedUnit {
    fn from_def(def: &UnitDef) -> Self {
        Self {
            name: def.symbol.to_string(),
            dimension: def.dimension,
            factor: def.factor,
            offset: def.offset,
        }
    }

    fn synthesized(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dimension: Dimension::Unknown,
            factor: 1.0,
            offset: 0.0,
        }
    }

    /// True for units that were not found in the reference table
    pub fn is_synthesized(&self) -> bool {
        self.dimension == Dimension::Unknown
    }

    pub fn to_base(&self, value: f64) -> f64 {
        (value + self.offset) * self.factor
    }

    pub fn from_base(&self, value: f64) -> f64 {
        value / self.factor - self.offset
    }

    /// Synthesized units only match the same unit text
    pub fn is_compatible(&self, other: &TypedUnit) -> bool {
        self.dimension == other.dimension
            && (self.dimension != Dimension::Unknown || self.name.eq_ignore_ascii_case(&other.name))
    }

    /// Converts `value` expressed in this unit into `target`
    pub fn convert(&self, value: f64, target: &TypedUnit) -> Option<f64> {
        self.is_compatible(target)
            .then(|| target.from_base(self.to_base(value)))
    }
}

impl fmt::Display for TypedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves a free-text unit; `None` only for empty text
pub fn resolve_unit(unit: &str) -> Option<TypedUnit> {
    let unit = unit.trim();
    if unit.is_empty() {
        return None;
    }
    Some(match table::find_unit(unit) {
        Some(def) => TypedUnit::from_def(def),
        None => TypedUnit::synthesized(unit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(text: &str) -> TypedUnit {
        resolve_unit(text).unwrap()
    }

    #[test]
    fn test_resolve_known_units() {
        assert_eq!(unit("g").dimension, Dimension::Mass);
        assert_eq!(unit("Grams").name, "g");
        assert_eq!(unit("tbsp.").name, "tbsp");
        assert_eq!(unit("fl oz").dimension, Dimension::Volume);
        assert_eq!(unit("°F").dimension, Dimension::Temperature);
        assert_eq!(unit("minutes").name, "min");
    }

    #[test]
    fn test_empty_unit_does_not_resolve() {
        assert!(resolve_unit("").is_none());
        assert!(resolve_unit("   ").is_none());
    }

    #[test]
    fn test_unknown_units_are_synthesized() {
        let pinch = unit("pinch");
        assert!(pinch.is_synthesized());
        assert!(pinch.is_compatible(&unit("Pinch")));
        assert!(!pinch.is_compatible(&unit("clove")));
        assert!(!pinch.is_compatible(&unit("g")));
    }

    #[test]
    fn test_linear_conversion() {
        let value = unit("kg").convert(0.5, &unit("g")).unwrap();
        assert!((value - 500.0).abs() < 1e-9);
        assert!(unit("kg").convert(1.0, &unit("ml")).is_none());
    }

    #[test]
    fn test_temperature_offsets() {
        let celsius = unit("°F").convert(212.0, &unit("°C")).unwrap();
        assert!((celsius - 100.0).abs() < 1e-9);
        let fahrenheit = unit("°C").convert(180.0, &unit("°F")).unwrap();
        assert!((fahrenheit - 356.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_system_from_str() {
        assert_eq!("US".parse::<UnitSystem>(), Ok(UnitSystem::Us));
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert!("martian".parse::<UnitSystem>().is_err());
        assert_eq!(UnitSystem::Imperial.to_string(), "imperial");
    }
}
