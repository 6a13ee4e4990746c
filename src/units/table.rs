//! Static unit reference data.
//!
//! Base units: gram, millilitre, centimetre, degree Celsius, second, kilojoule.

use super::{Dimension, UnitSystem};

pub(super) struct UnitDef {
    pub symbol: &'static str,
    pub names: &'static [&'static str],
    pub dimension: Dimension,
    pub factor: f64,
    pub offset: f64,
}

const fn unit(
    symbol: &'static str,
    names: &'static [&'static str],
    dimension: Dimension,
    factor: f64,
) -> UnitDef {
    UnitDef {
        symbol,
        names,
        dimension,
        factor,
        offset: 0.0,
    }
}

static UNITS: &[UnitDef] = &[
    // Mass
    unit("mg", &["mg", "milligram", "milligrams"], Dimension::Mass, 0.001),
    unit("g", &["g", "gr", "gram", "grams", "gramme", "grammes"], Dimension::Mass, 1.0),
    unit("kg", &["kg", "kilo", "kilos", "kilogram", "kilograms"], Dimension::Mass, 1000.0),
    unit("oz", &["oz", "ounce", "ounces"], Dimension::Mass, 28.349523125),
    unit("lb", &["lb", "lbs", "pound", "pounds"], Dimension::Mass, 453.59237),
    // Volume
    unit("ml", &["ml", "milliliter", "milliliters", "millilitre", "millilitres"], Dimension::Volume, 1.0),
    unit("cl", &["cl", "centiliter", "centiliters", "centilitre", "centilitres"], Dimension::Volume, 10.0),
    unit("dl", &["dl", "deciliter", "deciliters", "decilitre", "decilitres"], Dimension::Volume, 100.0),
    unit("l", &["l", "liter", "liters", "litre", "litres"], Dimension::Volume, 1000.0),
    unit("tsp", &["tsp", "tsps", "teaspoon", "teaspoons"], Dimension::Volume, 4.92892159375),
    unit("tbsp", &["tbsp", "tbsps", "tbs", "tbl", "tablespoon", "tablespoons"], Dimension::Volume, 14.78676478125),
    unit("fl oz", &["fl oz", "fl. oz", "floz", "fluid ounce", "fluid ounces"], Dimension::Volume, 29.5735295625),
    unit("cup", &["cup", "cups"], Dimension::Volume, 236.5882365),
    unit("pint", &["pt", "pts", "pint", "pints"], Dimension::Volume, 473.176473),
    unit("quart", &["qt", "qts", "quart", "quarts"], Dimension::Volume, 946.352946),
    unit("gallon", &["gal", "gals", "gallon", "gallons"], Dimension::Volume, 3785.411784),
    unit("imp fl oz", &["imp fl oz", "imperial fluid ounce", "imperial fluid ounces"], Dimension::Volume, 28.4130625),
    unit("imp pt", &["imp pt", "imperial pint", "imperial pints"], Dimension::Volume, 568.26125),
    unit("imp qt", &["imp qt", "imperial quart", "imperial quarts"], Dimension::Volume, 1136.5225),
    unit("imp gal", &["imp gal", "imperial gallon", "imperial gallons"], Dimension::Volume, 4546.09),
    unit("dash", &["dash", "dashes"], Dimension::Volume, super::ML_PER_DASH),
    unit("barspoon", &["barspoon", "barspoons", "bsp"], Dimension::Volume, 5.0),
    // Length
    unit("mm", &["mm", "millimeter", "millimeters", "millimetre", "millimetres"], Dimension::Length, 0.1),
    unit("cm", &["cm", "centimeter", "centimeters", "centimetre", "centimetres"], Dimension::Length, 1.0),
    unit("m", &["m", "meter", "meters", "metre", "metres"], Dimension::Length, 100.0),
    unit("in", &["in", "inch", "inches", "\""], Dimension::Length, 2.54),
    unit("ft", &["ft", "foot", "feet"], Dimension::Length, 30.48),
    // Temperature
    unit("°C", &["°c", "ºc", "c°", "degc", "celsius"], Dimension::Temperature, 1.0),
    UnitDef {
        symbol: "°F",
        names: &["°f", "ºf", "f°", "degf", "fahrenheit"],
        dimension: Dimension::Temperature,
        factor: 5.0 / 9.0,
        offset: -32.0,
    },
    UnitDef {
        symbol: "K",
        names: &["k", "kelvin"],
        dimension: Dimension::Temperature,
        factor: 1.0,
        offset: -273.15,
    },
    // Time
    unit("s", &["s", "sec", "secs", "second", "seconds"], Dimension::Time, 1.0),
    unit("min", &["min", "mins", "minute", "minutes"], Dimension::Time, 60.0),
    unit("h", &["h", "hr", "hrs", "hour", "hours"], Dimension::Time, 3600.0),
    unit("d", &["d", "day", "days"], Dimension::Time, 86400.0),
    // Energy
    unit("J", &["j", "joule", "joules"], Dimension::Energy, 0.001),
    unit("kJ", &["kj", "kilojoule", "kilojoules"], Dimension::Energy, 1.0),
    unit("cal", &["cal", "calorie", "calories"], Dimension::Energy, 0.004184),
    unit("kcal", &["kcal", "kilocalorie", "kilocalories"], Dimension::Energy, 4.184),
];

pub(super) fn find_unit(text: &str) -> Option<&'static UnitDef> {
    let normalized = text.trim().trim_end_matches('.').to_lowercase();
    UNITS
        .iter()
        .find(|def| def.names.iter().any(|name| *name == normalized))
}

/// Canonical unit of a dimension in a system, plus magnitude buckets
/// (threshold in canonical units, unit symbol) tried from the top
pub(super) struct SystemUnits {
    pub system: UnitSystem,
    pub dimension: Dimension,
    pub canonical: &'static str,
    pub buckets: &'static [(f64, &'static str)],
}

static SYSTEM_UNITS: &[SystemUnits] = &[
    SystemUnits {
        system: UnitSystem::Metric,
        dimension: Dimension::Mass,
        canonical: "g",
        buckets: &[(1000.0, "kg")],
    },
    SystemUnits {
        system: UnitSystem::Metric,
        dimension: Dimension::Volume,
        canonical: "ml",
        buckets: &[(1000.0, "l")],
    },
    SystemUnits {
        system: UnitSystem::Metric,
        dimension: Dimension::Length,
        canonical: "cm",
        buckets: &[(100.0, "m")],
    },
    SystemUnits {
        system: UnitSystem::Metric,
        dimension: Dimension::Temperature,
        canonical: "°C",
        buckets: &[],
    },
    SystemUnits {
        system: UnitSystem::Us,
        dimension: Dimension::Mass,
        canonical: "oz",
        buckets: &[(16.0, "lb")],
    },
    SystemUnits {
        system: UnitSystem::Us,
        dimension: Dimension::Volume,
        canonical: "cup",
        buckets: &[(4.0, "quart"), (1.0, "cup"), (1.0 / 16.0, "tbsp"), (0.0, "tsp")],
    },
    SystemUnits {
        system: UnitSystem::Us,
        dimension: Dimension::Length,
        canonical: "in",
        buckets: &[(12.0, "ft")],
    },
    SystemUnits {
        system: UnitSystem::Us,
        dimension: Dimension::Temperature,
        canonical: "°F",
        buckets: &[],
    },
    SystemUnits {
        system: UnitSystem::Imperial,
        dimension: Dimension::Mass,
        canonical: "oz",
        buckets: &[(16.0, "lb")],
    },
    SystemUnits {
        system: UnitSystem::Imperial,
        dimension: Dimension::Volume,
        canonical: "imp fl oz",
        buckets: &[(160.0, "imp gal"), (20.0, "imp pt")],
    },
    SystemUnits {
        system: UnitSystem::Imperial,
        dimension: Dimension::Length,
        canonical: "in",
        buckets: &[(12.0, "ft")],
    },
    SystemUnits {
        system: UnitSystem::Imperial,
        dimension: Dimension::Temperature,
        canonical: "°F",
        buckets: &[],
    },
];

pub(super) fn system_units(system: UnitSystem, dimension: Dimension) -> Option<&'static SystemUnits> {
    SYSTEM_UNITS
        .iter()
        .find(|entry| entry.system == system && entry.dimension == dimension)
}

impl SystemUnits {
    /// Unit symbol for a magnitude expressed in the canonical unit
    pub fn bucket_for(&self, magnitude: f64) -> Option<&'static str> {
        self.buckets
            .iter()
            .find(|(threshold, _)| magnitude.abs() >= *threshold)
            .map(|(_, symbol)| *symbol)
    }
}
