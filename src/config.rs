use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::units::UnitSystem;

/// Top-level configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct CooklangConfig {
    /// Parser behaviour
    #[serde(default)]
    pub parser: ParserConfig,
    /// Unit conversion and display
    #[serde(default)]
    pub units: UnitsConfig,
}

/// Configuration for the recipe parser
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Keep comments and block comments, allow multi-word timer names
    #[serde(default)]
    pub extended: bool,
}

/// Configuration for unit conversion and quantity display
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct UnitsConfig {
    /// Measurement system used when none is given explicitly
    #[serde(default)]
    pub system: UnitSystem,
    /// Tolerance used when rendering decimals as fractions
    #[serde(default = "default_fraction_tolerance")]
    pub fraction_tolerance: f64,
    /// Tolerance used when deciding whether a value is a "nice" fraction
    #[serde(default = "default_nice_fraction_tolerance")]
    pub nice_fraction_tolerance: f64,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            system: UnitSystem::default(),
            fraction_tolerance: default_fraction_tolerance(),
            nice_fraction_tolerance: default_nice_fraction_tolerance(),
        }
    }
}

// Default value functions
fn default_fraction_tolerance() -> f64 {
    crate::quantity::DEFAULT_TOLERANCE
}

fn default_nice_fraction_tolerance() -> f64 {
    crate::quantity::NICE_FRACTION_TOLERANCE
}

impl CooklangConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the lookup order.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with COOKLANG__ prefix
/// 2. cooklang.toml file in current directory
/// 3. Default values
///
/// Environment variable format: COOKLANG__PARSER__EXTENDED=true
pub fn load_config() -> Result<CooklangConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("cooklang").required(false))
        // Use double underscore for nested: COOKLANG__UNITS__SYSTEM
        .add_source(
            Environment::with_prefix("COOKLANG")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
