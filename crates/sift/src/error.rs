//! Error types for the sift crate.

use thiserror::Error;

/// Errors raised by collection boundaries and filter calls.
///
/// Only API misuse is reported here. A record that lacks a field, or holds a
/// value of the wrong type for an operator, simply does not match.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A collection was built from something other than records.
    #[error("every element of a collection must be a record, found {found} at index {index}")]
    InvalidCollection { index: usize, found: &'static str },

    /// A collection was read from a JSON document that is not an array.
    #[error("a collection must be built from an array of records, found {found}")]
    InvalidDocument { found: &'static str },

    /// A non-record was pushed, inserted or assigned into a collection.
    #[error("all elements must be records, tried to add a {found}")]
    InvalidElement { found: &'static str },

    /// Positional insert or assignment past the end of a collection.
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Empty or malformed field specifier.
    #[error("invalid field specifier '{specifier}': {reason}")]
    InvalidSpecifier {
        specifier: String,
        reason: &'static str,
    },

    /// Unknown operator name.
    #[error("'{name}' is not a valid lookup operator")]
    InvalidOperator { name: String },

    /// Regex lookup whose target is not a usable pattern.
    #[error("invalid pattern for '{specifier}': {reason}")]
    InvalidPattern { specifier: String, reason: String },

    /// Lookups were not supplied as named pairs, or `get_one` had none.
    #[error("{0}")]
    InvalidCallShape(String),

    /// Lookup configuration cannot be used to parse specifiers.
    #[error("invalid lookup configuration: {0}")]
    InvalidConfig(String),

    /// `get_one` matched nothing.
    #[error("no records found with the following filter: {lookups}")]
    NotFound { lookups: String },

    /// `get_one` matched more than one record.
    #[error("expected to find 1 record but found {count}")]
    MultipleResults { count: usize },

    /// Records could not be read from JSON text.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
