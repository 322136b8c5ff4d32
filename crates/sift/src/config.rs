//! Lookup parsing configuration.

use serde::Deserialize;

use crate::error::{Result, SiftError};

/// What to do with a final specifier segment that is not an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownOperatorPolicy {
    /// Treat the segment as one more key in the path.
    ///
    /// `animal__dog__iexactly` looks up `animal -> dog -> iexactly` with `exact`.
    #[default]
    LiteralKey,
    /// Fail with [`SiftError::InvalidOperator`] when the segment looks like a
    /// misspelled operator (`iexactly`, `contain`, `ICONTAINS`).
    ///
    /// Segments that do not resemble an operator are still keys.
    Reject,
}

/// Settings used to split specifiers into key paths and operators.
///
/// # Example
///
/// ```
/// use sift::{LookupConfig, UnknownOperatorPolicy};
///
/// let config = LookupConfig::new()
///     .delimiter(".")
///     .unknown_operator(UnknownOperatorPolicy::Reject);
/// assert_eq!(config.any_field_marker_token(), "_any");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    delimiter: String,
    any_field_marker: String,
    unknown_operator: UnknownOperatorPolicy,
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            delimiter: "__".to_string(),
            any_field_marker: "_any".to_string(),
            unknown_operator: UnknownOperatorPolicy::default(),
        }
    }
}

impl LookupConfig {
    /// Creates the default configuration: `__` delimiter, `_any` marker,
    /// unknown suffixes treated as keys.
    pub fn new() -> Self {
        LookupConfig::default()
    }

    /// Sets the string separating path segments and the operator.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the segment that means "any field at this level".
    pub fn any_field_marker(mut self, marker: impl Into<String>) -> Self {
        self.any_field_marker = marker.into();
        self
    }

    /// Sets the policy for unrecognized operator suffixes.
    pub fn unknown_operator(mut self, policy: UnknownOperatorPolicy) -> Self {
        self.unknown_operator = policy;
        self
    }

    /// The string separating segments, `__` by default.
    pub fn delimiter_token(&self) -> &str {
        &self.delimiter
    }

    /// The any-field segment, `_any` by default.
    pub fn any_field_marker_token(&self) -> &str {
        &self.any_field_marker
    }

    /// How unrecognized operator suffixes are handled.
    pub fn unknown_operator_policy(&self) -> UnknownOperatorPolicy {
        self.unknown_operator
    }

    /// Checks that specifiers can be split unambiguously.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(SiftError::InvalidConfig(
                "delimiter must not be empty".to_string(),
            ));
        }
        if self.any_field_marker.is_empty() {
            return Err(SiftError::InvalidConfig(
                "any-field marker must not be empty".to_string(),
            ));
        }
        if self.any_field_marker.contains(&self.delimiter) {
            return Err(SiftError::InvalidConfig(format!(
                "any-field marker '{}' contains the delimiter '{}'",
                self.any_field_marker, self.delimiter
            )));
        }
        Ok(())
    }
}
