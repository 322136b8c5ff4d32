//! Compiled lookup expressions.
//!
//! A [`LookupExpression`] is one parsed filter argument: the key path to
//! resolve, the operator to apply and the target, prepared once so matching
//! a record does no parsing, regex compilation or case folding.

use regex::{Regex, RegexBuilder};

use crate::config::LookupConfig;
use crate::error::{Result, SiftError};
use crate::lookup::{parse_specifier, KeyPath};
use crate::op::Operator;
use crate::record::Record;
use crate::resolve::{resolve, Resolved};
use crate::value::Value;

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use sift::{LookupConfig, LookupExpression, Record};
///
/// let expr = LookupExpression::compile("name__iexact", "JOHN".into(), &LookupConfig::default()).unwrap();
/// assert!(expr.matches(&Record::from([("name", "John")])));
/// assert!(!expr.matches(&Record::from([("name", "john ")])));
/// assert!(!expr.matches(&Record::from([("age", 32)])));
/// ```
#[derive(Debug, Clone)]
pub struct LookupExpression {
    specifier: String,
    path: KeyPath,
    op: Operator,
    target: Value,
    operand: Operand,
}

/// Target prepared for its operator.
#[derive(Debug, Clone)]
enum Operand {
    /// Compared as given.
    Plain,
    /// Lowercased text target of a case-insensitive operator.
    Folded(String),
    /// Compiled pattern of `regex`/`iregex`.
    Pattern(Regex),
    /// Case-insensitive operator with a non-text target. Never matches.
    Unmatchable,
}

impl LookupExpression {
    /// Parses `specifier` and prepares `target` for its operator.
    ///
    /// Fails when the specifier is malformed, or when a regex operator is given
    /// a target that is not text or does not compile.
    pub fn compile(specifier: &str, target: Value, config: &LookupConfig) -> Result<Self> {
        let (path, op) = parse_specifier(specifier, config)?;

        let operand = match op {
            Operator::Regex | Operator::IRegex => {
                let Some(pattern) = target.as_str() else {
                    return Err(SiftError::InvalidPattern {
                        specifier: specifier.to_string(),
                        reason: format!("expected a text pattern, got {}", target.kind()),
                    });
                };
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(op == Operator::IRegex)
                    .build()
                    .map_err(|e| SiftError::InvalidPattern {
                        specifier: specifier.to_string(),
                        reason: e.to_string(),
                    })?;
                Operand::Pattern(regex)
            }
            Operator::IExact | Operator::IContains => match target.as_str() {
                Some(text) => Operand::Folded(text.to_lowercase()),
                None => Operand::Unmatchable,
            },
            Operator::Exact | Operator::In | Operator::Contains => Operand::Plain,
        };

        tracing::trace!(specifier, path = %path, op = %op, "compiled lookup");

        Ok(LookupExpression {
            specifier: specifier.to_string(),
            path,
            op,
            target,
            operand,
        })
    }

    /// The specifier this expression was parsed from.
    pub fn specifier(&self) -> &str {
        &self.specifier
    }

    /// The key path resolved against each record.
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// The operator applied to resolved values.
    pub fn op(&self) -> Operator {
        self.op
    }

    /// The target as given, before any case folding or regex compilation.
    pub fn target(&self) -> &Value {
        &self.target
    }

    /// Evaluates this expression against a record.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_resolved(&resolve(&self.path, record))
    }

    /// Evaluates this expression against an already resolved path.
    ///
    /// `NotFound` never matches. Any-field results match when at least one
    /// candidate does.
    pub fn matches_resolved(&self, resolved: &Resolved<'_>) -> bool {
        match resolved {
            Resolved::NotFound => false,
            Resolved::One(found) => self.matches_value(found),
            Resolved::Any(candidates) => candidates.iter().any(|found| self.matches_value(found)),
        }
    }

    /// Evaluates the operator against a single found value.
    ///
    /// Returns `false` when the value's type is not one the operator accepts.
    pub fn matches_value(&self, found: &Value) -> bool {
        match self.op {
            Operator::Exact => found == &self.target,
            Operator::IExact => match (&self.operand, found) {
                (Operand::Folded(target), Value::Text(s)) => s.to_lowercase() == *target,
                _ => false,
            },
            Operator::In => match_in(found, &self.target),
            Operator::Regex | Operator::IRegex => match (&self.operand, found) {
                (Operand::Pattern(regex), Value::Text(s)) => regex.is_match(s),
                _ => false,
            },
            Operator::Contains => match (found, &self.target) {
                (Value::Text(s), Value::Text(needle)) => s.contains(needle.as_str()),
                (Value::Sequence(items), needle) => items.contains(needle),
                _ => false,
            },
            Operator::IContains => match (&self.operand, found) {
                (Operand::Folded(needle), Value::Text(s)) => {
                    s.to_lowercase().contains(needle.as_str())
                }
                _ => false,
            },
        }
    }
}

/// Membership of `found` in `target`.
fn match_in(found: &Value, target: &Value) -> bool {
    match (target, found) {
        (Value::Sequence(items), found) => items.contains(found),
        (Value::Text(haystack), Value::Text(s)) => haystack.contains(s.as_str()),
        (Value::Record(keys), Value::Text(s)) => keys.contains_key(s),
        // Non-iterable target, or nothing to search for
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expr(specifier: &str, target: impl Into<Value>) -> LookupExpression {
        LookupExpression::compile(specifier, target.into(), &LookupConfig::default()).unwrap()
    }

    fn rec(json: serde_json::Value) -> Record {
        Value::from(json).into_record().unwrap()
    }

    #[test]
    fn exact_matches_deep_equality() {
        let e = expr("name", "john");
        assert!(e.matches_value(&Value::from("john")));
        assert!(!e.matches_value(&Value::from("John"))); // case sensitive

        let e = expr("facts", Value::from(json!({"movie": "Star Wars"})));
        assert!(e.matches(&rec(json!({"facts": {"movie": "Star Wars"}}))));
        assert!(!e.matches(&rec(json!({"facts": {"movie": "Fight Club"}}))));
    }

    #[test]
    fn exact_null_needs_present_field() {
        let e = expr("age", Value::Null);
        assert!(e.matches(&rec(json!({"age": null}))));
        assert!(!e.matches(&rec(json!({"name": "mary"}))));
        assert!(!e.matches(&rec(json!({"age": 32}))));
    }

    #[test]
    fn exact_empty_string() {
        let e = expr("pets", "");
        assert!(e.matches(&rec(json!({"pets": ""}))));
        assert!(!e.matches(&rec(json!({"pets": "dog"}))));
        assert!(!e.matches(&rec(json!({"pets": null}))));
    }

    #[test]
    fn iexact_folds_case_only_for_text() {
        let e = expr("name__iexact", "JOHN");
        assert!(e.matches_value(&Value::from("john")));
        assert!(e.matches_value(&Value::from("JoHn")));
        assert!(!e.matches_value(&Value::from("john ")));
        assert!(!e.matches_value(&Value::from(1)));

        let e = expr("age__iexact", 32);
        assert!(!e.matches_value(&Value::from(32)));
    }

    #[test]
    fn in_sequence_text_and_record_targets() {
        let e = expr("name__in", vec!["mary", "bob"]);
        assert!(e.matches_value(&Value::from("mary")));
        assert!(!e.matches_value(&Value::from("john")));

        let e = expr("age__in", vec![Value::from(31), Value::Null]);
        assert!(e.matches_value(&Value::from(31.0)));
        assert!(e.matches_value(&Value::Null));

        let e = expr("name__in", "maryland");
        assert!(e.matches_value(&Value::from("mary")));
        assert!(!e.matches_value(&Value::from(1)));

        let e = expr("name__in", Value::from(json!({"mary": 1})));
        assert!(e.matches_value(&Value::from("mary")));
        assert!(!e.matches_value(&Value::from("bob")));
    }

    #[test]
    fn in_with_non_iterable_target_never_matches() {
        let e = expr("age__in", 32);
        assert!(!e.matches_value(&Value::from(32)));
        assert!(!e.matches_value(&Value::from("32")));

        let e = expr("age__in", Value::Null);
        assert!(!e.matches_value(&Value::Null));
    }

    #[test]
    fn regex_searches_text() {
        let e = expr("name__regex", r"\d/\d/\d");
        assert!(e.matches_value(&Value::from("ge-0/0/0")));
        assert!(!e.matches_value(&Value::from("bvi10")));
        assert!(!e.matches_value(&Value::from(10)));

        let e = expr("name__regex", "GE-");
        assert!(!e.matches_value(&Value::from("ge-0/0/0")));
    }

    #[test]
    fn iregex_ignores_case() {
        let e = expr("name__iregex", r"GE-\d/\d/\d");
        assert!(e.matches_value(&Value::from("ge-0/0/1")));
        assert!(!e.matches_value(&Value::from("bvi10")));
    }

    #[test]
    fn regex_target_must_be_valid_text() {
        let config = LookupConfig::default();
        let err = LookupExpression::compile("name__regex", Value::from(3), &config).unwrap_err();
        assert!(matches!(err, SiftError::InvalidPattern { .. }));

        let err = LookupExpression::compile("name__iregex", Value::from("("), &config).unwrap_err();
        assert!(matches!(err, SiftError::InvalidPattern { ref specifier, .. } if specifier == "name__iregex"));
    }

    #[test]
    fn contains_text_and_sequences() {
        let e = expr("name__contains", "mar");
        assert!(e.matches_value(&Value::from("mary")));
        assert!(!e.matches_value(&Value::from("MARY")));

        let e = expr("tags__contains", "b");
        assert!(e.matches_value(&Value::from(vec!["a", "b"])));
        assert!(!e.matches_value(&Value::from(vec!["abc"])));

        let e = expr("nums__contains", 2);
        assert!(e.matches_value(&Value::from(vec![1, 2, 3])));
        assert!(!e.matches_value(&Value::from(2)));
    }

    #[test]
    fn contains_never_matches_records() {
        let e = expr("facts__contains", "movie");
        assert!(!e.matches(&rec(json!({"facts": {"movie": "Star Wars"}}))));

        let e = expr("facts__icontains", "movie");
        assert!(!e.matches(&rec(json!({"facts": {"movie": "Star Wars"}}))));
    }

    #[test]
    fn icontains_folds_both_sides() {
        let e = expr("name__icontains", "MAR");
        assert!(e.matches_value(&Value::from("Mary")));
        assert!(!e.matches_value(&Value::from("bob")));
        assert!(!e.matches_value(&Value::from(vec!["mary"])));

        let e = expr("name__icontains", 1);
        assert!(!e.matches_value(&Value::from("1")));
    }

    #[test]
    fn absent_field_never_matches_any_operator() {
        let record = rec(json!({"name": "john"}));
        let cases: Vec<(&str, Value)> = vec![
            ("age", Value::Null),
            ("age__exact", Value::from(32)),
            ("age__iexact", Value::from("x")),
            ("age__in", Value::from(vec![Value::Null])),
            ("age__regex", Value::from(".*")),
            ("age__iregex", Value::from("")),
            ("age__contains", Value::from("")),
            ("age__icontains", Value::from("")),
        ];
        for (specifier, target) in cases {
            let e = LookupExpression::compile(specifier, target, &LookupConfig::default()).unwrap();
            assert!(!e.matches(&record), "{specifier} matched a missing field");
        }
    }

    #[test]
    fn any_field_is_existential() {
        let e = expr("_any", "fireman");
        assert!(e.matches(&rec(json!({"name": "john", "occupation": "fireman"}))));
        assert!(!e.matches(&rec(json!({"name": "john", "occupation": "ceo"}))));

        let e = expr("_any__contains", "lumber");
        assert!(e.matches(&rec(json!({"name": "bob", "occupation": "plumber"}))));

        let e = expr("facts___any__icontains", "star");
        assert!(e.matches(&rec(json!({"facts": {"quote": "x", "movie": "Star Wars"}}))));
        assert!(!e.matches(&rec(json!({"facts": "Star Wars"}))));
    }

    #[test]
    fn any_field_over_empty_record_never_matches() {
        let e = expr("_any", Value::Null);
        assert!(!e.matches(&Record::new()));
    }

    #[test]
    fn accessors() {
        let e = expr("facts__movie__regex", "Star");
        assert_eq!(e.specifier(), "facts__movie__regex");
        assert_eq!(e.op(), Operator::Regex);
        assert_eq!(e.path().to_string(), "facts.movie");
        assert_eq!(e.target(), &Value::from("Star"));
    }
}
