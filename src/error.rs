use thiserror::Error;

/// Structural errors that abort a parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Front matter opened with `---` but never closed
    #[error("Unterminated front matter: no closing '---' after line {line}")]
    UnterminatedFrontMatter { line: usize },

    /// End of input inside a `{...}` quantity block
    #[error("Unexpected end of input in quantity block opened at line {line}, column {column}")]
    UnterminatedQuantity { line: usize, column: usize },

    /// Input bytes are not UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Failures converting an ingredient between units
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The ingredient has no unit to convert from
    #[error("Ingredient '{name}' has no unit")]
    MissingUnit { name: String },

    /// The quantity is "some" and cannot be converted
    #[error("Ingredient '{name}' has no specified quantity")]
    UnspecifiedQuantity { name: String },

    /// The quantity is free text such as "2-3"
    #[error("Ingredient '{name}' has a non-numeric quantity: {quantity}")]
    NonNumericQuantity { name: String, quantity: String },

    /// Units of different dimensions
    #[error("Cannot convert from '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },
}

/// Errors that can occur anywhere in the crate
#[derive(Error, Debug)]
pub enum CooklangError {
    /// Failed to parse a recipe
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Failed to convert an ingredient
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T, E = CooklangError> = std::result::Result<T, E>;
