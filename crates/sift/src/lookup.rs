//! Field specifier parsing.
//!
//! A specifier such as `facts__movie__icontains` names a path into nested
//! records (`facts -> movie`) and, optionally, the operator to apply
//! (`icontains`). [`parse_specifier`] splits one into a [`KeyPath`] and an
//! [`Operator`].

use std::fmt;

use crate::config::{LookupConfig, UnknownOperatorPolicy};
use crate::error::{Result, SiftError};
use crate::op::Operator;

/// Operators at least this long are matched against misspellings.
const MIN_FUZZY_LEN: usize = 5;

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Look up a named field.
    Key(String),
    /// Consider every field at this level.
    AnyField,
}

impl Segment {
    /// Shorthand for [`Segment::Key`].
    pub fn key(name: impl Into<String>) -> Self {
        Segment::Key(name.into())
    }
}

/// Non-empty route through nested records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Builds a path from segments. Fails if there are none.
    pub fn new(segments: impl IntoIterator<Item = Segment>) -> Result<Self> {
        let segments: Vec<Segment> = segments.into_iter().collect();
        if segments.is_empty() {
            return Err(SiftError::InvalidSpecifier {
                specifier: String::new(),
                reason: "key path is empty",
            });
        }
        Ok(KeyPath { segments })
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments, which `new` never allows.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if any segment is the any-field marker.
    pub fn has_any_field(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::AnyField))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Key(name) => f.write_str(name)?,
                Segment::AnyField => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

/// Splits a specifier into its key path and operator.
///
/// The last segment is the operator when it names one and is not the only
/// segment; otherwise the operator is [`Operator::Exact`] and every segment is
/// a key. What happens to a final segment that resembles an operator without
/// naming one is governed by [`UnknownOperatorPolicy`].
///
/// # Example
///
/// ```
/// use sift::{parse_specifier, LookupConfig, Operator, Segment};
///
/// let (path, op) = parse_specifier("facts__movie__icontains", &LookupConfig::default()).unwrap();
/// assert_eq!(path.segments(), [Segment::key("facts"), Segment::key("movie")]);
/// assert_eq!(op, Operator::IContains);
/// ```
pub fn parse_specifier(specifier: &str, config: &LookupConfig) -> Result<(KeyPath, Operator)> {
    if specifier.is_empty() {
        return Err(invalid_specifier(specifier, "specifier is empty"));
    }

    let mut parts: Vec<&str> = specifier.split(config.delimiter_token()).collect();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(invalid_specifier(specifier, "empty path segment"));
    }

    let mut operator = Operator::Exact;
    if parts.len() > 1 {
        let last = parts[parts.len() - 1];
        if let Some(op) = Operator::from_suffix(last) {
            operator = op;
            parts.pop();
        } else if let Some(near) = resembles_operator(last) {
            match config.unknown_operator_policy() {
                UnknownOperatorPolicy::Reject => {
                    return Err(SiftError::InvalidOperator {
                        name: last.to_string(),
                    });
                }
                UnknownOperatorPolicy::LiteralKey => {
                    tracing::debug!(
                        specifier,
                        suffix = last,
                        resembles = %near,
                        "unrecognized operator suffix treated as a key"
                    );
                }
            }
        }
    }

    let marker = config.any_field_marker_token();
    let segments = parts.into_iter().map(|part| {
        if part == marker {
            Segment::AnyField
        } else {
            Segment::key(part)
        }
    });

    Ok((KeyPath::new(segments)?, operator))
}

fn invalid_specifier(specifier: &str, reason: &'static str) -> SiftError {
    SiftError::InvalidSpecifier {
        specifier: specifier.to_string(),
        reason,
    }
}

/// Returns the operator `segment` looks like a misspelling of.
fn resembles_operator(segment: &str) -> Option<Operator> {
    let lowered = segment.to_ascii_lowercase();
    Operator::ALL.into_iter().find(|op| {
        let name = op.as_str();
        if lowered == name {
            return true;
        }
        name.len() >= MIN_FUZZY_LEN && edit_distance(&lowered, name) <= 1
    })
}

/// Levenshtein distance between two strings, by chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
