//! Cooklang recipe parsing and quantity handling.
//!
//! Text goes through the [`lexer`] and [`parser`] into a [`Recipe`]. Ingredients
//! extracted from a recipe can then be converted between unit systems,
//! consolidated into a shopping list, or shown in bartender units.
//!
//! ```
//! use cooklang_recipe::{parse, UnitSystem};
//!
//! let recipe = parse("Mix @flour{500%g} with @flour{0.5%kg}.").unwrap();
//! let list = recipe.ingredients().consolidate(None);
//! assert_eq!(list.len(), 1);
//! assert_eq!(list[0].quantity.to_string(), "1000");
//!
//! let us = list.convert_to_system(UnitSystem::Us);
//! assert_eq!(us[0].unit, "lb");
//! ```

pub mod config;
pub mod error;
pub mod lexer;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod quantity;
pub mod units;

pub use crate::config::{load_config, CooklangConfig, ParserConfig, UnitsConfig};
pub use error::{ConversionError, CooklangError, ParseError, Result};
pub use metadata::{parse_front_matter, to_front_matter};
pub use model::{Component, Ingredient, IngredientList, Item, Metadata, Recipe, Step};
pub use parser::CooklangParser;
pub use quantity::Quantity;
pub use units::{select_best_unit, Dimension, SmartAmount, TypedUnit, UnitSystem};

/// Parses a recipe with the canonical syntax
pub fn parse(input: &str) -> std::result::Result<Recipe, ParseError> {
    CooklangParser::canonical().parse(input)
}

/// Parses a recipe keeping comments and multi-word timer names
pub fn parse_extended(input: &str) -> std::result::Result<Recipe, ParseError> {
    CooklangParser::extended().parse(input)
}

/// Parses UTF-8 bytes with the canonical syntax
pub fn parse_bytes(input: &[u8]) -> std::result::Result<Recipe, ParseError> {
    CooklangParser::canonical().parse_bytes(input)
}
