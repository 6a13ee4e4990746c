//! Smart unit selection for cocktail-style recipes ("bartender mode").
//!
//! Small volumes become dashes, the rest is rounded to amounts a bartender
//! would actually measure.

use std::fmt;

use serde::Serialize;

use super::UnitSystem;
use crate::config::UnitsConfig;
use crate::quantity::{
    format_as_fraction, format_decimal, format_number, is_nice_fraction, round_to_nice_fraction,
};

pub const ML_PER_DASH: f64 = 0.92;
const ML_PER_BARSPOON: f64 = 5.0;
const ML_PER_US_FL_OZ: f64 = 29.5735295625;
const ML_PER_US_CUP: f64 = 236.5882365;

const MAX_DASH_ML: f64 = 3.0;
const MAX_BARSPOONS: f64 = 2.0;
const MAX_OUNCE_ML: f64 = 240.0;

/// A volume expressed in the unit a bartender would use
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartAmount {
    pub value: f64,
    pub unit: String,
    /// The value as it should be displayed, e.g. `1 1/2`
    pub text: String,
}

impl SmartAmount {
    fn new(value: f64, unit: &str, text: String) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            text,
        }
    }
}

impl fmt::Display for SmartAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.text, self.unit)
    }
}

/// Picks the display unit for `ml` millilitres using the default tolerances
pub fn select_best_unit(ml: f64, system: UnitSystem) -> SmartAmount {
    select_best_unit_with(ml, system, &UnitsConfig::default())
}

/// Same as [`select_best_unit`] with explicit tolerances
pub fn select_best_unit_with(ml: f64, system: UnitSystem, config: &UnitsConfig) -> SmartAmount {
    if ml > 0.0 && ml <= MAX_DASH_ML {
        let dashes = (ml / ML_PER_DASH).round().max(1.0);
        let unit = if dashes == 1.0 { "dash" } else { "dashes" };
        return SmartAmount::new(dashes, unit, format_number(dashes));
    }

    match system {
        UnitSystem::Metric => metric_amount(ml),
        // Imperial bars pour in ounces too
        UnitSystem::Us | UnitSystem::Imperial => us_amount(ml, config),
    }
}

fn metric_amount(ml: f64) -> SmartAmount {
    if ml < 10.0 {
        let rounded = (ml / 2.5).round() * 2.5;
        let value = if rounded < 1.0 { ml } else { rounded };
        return SmartAmount::new(value, "ml", format_decimal(value));
    }

    let rounded = (ml / 5.0).round() * 5.0;
    let (value, unit) = if rounded >= 1000.0 {
        (rounded / 1000.0, "l")
    } else if rounded >= 100.0 {
        (rounded / 10.0, "cl")
    } else {
        (rounded, "ml")
    };
    SmartAmount::new(value, unit, format_decimal(value))
}

fn us_amount(ml: f64, config: &UnitsConfig) -> SmartAmount {
    if ml < 10.0 {
        let barspoons = ml / ML_PER_BARSPOON;
        if barspoons <= MAX_BARSPOONS && is_nice_fraction(barspoons, config.nice_fraction_tolerance) {
            let value = round_to_nice_fraction(barspoons);
            if value > 0.0 {
                let unit = if value <= 1.0 { "barspoon" } else { "barspoons" };
                let text = format_as_fraction(value, config.fraction_tolerance);
                return SmartAmount::new(value, unit, text);
            }
        }
        return ounces(ml, config);
    }

    if ml <= MAX_OUNCE_ML {
        ounces(ml, config)
    } else {
        let cups = nearest_twentieth(ml / ML_PER_US_CUP);
        let unit = if cups == 1.0 { "cup" } else { "cups" };
        SmartAmount::new(cups, unit, format_as_fraction(cups, config.fraction_tolerance))
    }
}

fn ounces(ml: f64, config: &UnitsConfig) -> SmartAmount {
    let value = nearest_twentieth(ml / ML_PER_US_FL_OZ);
    SmartAmount::new(value, "oz", format_as_fraction(value, config.fraction_tolerance))
}

fn nearest_twentieth(value: f64) -> f64 {
    (value * 20.0).round() / 20.0
}
