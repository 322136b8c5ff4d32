//! Lookup operators.
//!
//! The [`Operator`] enum names every comparison a lookup specifier may end
//! with, e.g. the `icontains` in `name__icontains`.

use std::str::FromStr;

use crate::error::SiftError;

/// Comparison applied between a record's value and the lookup target.
///
/// Operators are grouped by what they accept:
/// - **Any value**: `Exact`
/// - **Text only**: `IExact`, `Regex`, `IRegex`, `IContains`
/// - **Text or sequence**: `Contains`
/// - **Membership in the target**: `In`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// Deep equality. Used when a specifier has no operator suffix.
    #[default]
    Exact,
    /// Case-insensitive text equality.
    IExact,
    /// Value is a member of the target sequence, text or record keys.
    In,
    /// Target pattern is found in the text value.
    Regex,
    /// Case-insensitive `Regex`.
    IRegex,
    /// Target is a substring of the text value or an element of the sequence.
    Contains,
    /// Case-insensitive substring match.
    IContains,
}

impl Operator {
    /// Every operator, in suffix-lookup order.
    pub const ALL: [Operator; 7] = [
        Operator::Exact,
        Operator::IExact,
        Operator::In,
        Operator::Regex,
        Operator::IRegex,
        Operator::Contains,
        Operator::IContains,
    ];

    /// Returns the operator named exactly `name`, if any.
    pub fn from_suffix(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.as_str() == name)
    }

    /// Returns `true` for the operators that fold case before comparing.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Operator::IExact | Operator::IRegex | Operator::IContains)
    }

    /// Returns `true` if the target is a regular expression.
    pub fn is_pattern(self) -> bool {
        matches!(self, Operator::Regex | Operator::IRegex)
    }

    /// Returns the suffix used in specifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Exact => "exact",
            Operator::IExact => "iexact",
            Operator::In => "in",
            Operator::Regex => "regex",
            Operator::IRegex => "iregex",
            Operator::Contains => "contains",
            Operator::IContains => "icontains",
        }
    }
}

impl FromStr for Operator {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_suffix(s).ok_or_else(|| SiftError::InvalidOperator {
            name: s.to_string(),
        })
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
