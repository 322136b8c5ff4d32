//! Filter arguments and their compiled form.
//!
//! [`Lookups`] is what a caller hands to a filter call: named
//! `specifier = target` pairs, the way keyword arguments would be passed.
//! [`Filter`] is the compiled, reusable conjunction of those lookups.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::clause::LookupExpression;
use crate::config::LookupConfig;
use crate::error::{Result, SiftError};
use crate::record::Record;
use crate::value::Value;

/// Named filter arguments, in the order they were given.
///
/// Adding a specifier that is already present replaces its target and keeps
/// its position, like repeating a keyword argument would.
///
/// # Example
///
/// ```
/// use sift::{lookups, Lookups};
///
/// let built = Lookups::new()
///     .with("name__iexact", "JOHN")
///     .with("facts__movie", "Star Wars");
/// let from_macro = lookups! { name__iexact = "JOHN", facts__movie = "Star Wars" };
///
/// assert_eq!(built, from_macro);
/// assert_eq!(built.to_string(), r#"name__iexact="JOHN", facts__movie="Star Wars""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Lookups(IndexMap<String, Value>);

impl Lookups {
    /// Creates an empty set of lookups, which matches every record.
    pub fn new() -> Self {
        Lookups::default()
    }

    /// Adds a lookup.
    pub fn with(mut self, specifier: impl Into<String>, target: impl Into<Value>) -> Self {
        self.insert(specifier, target);
        self
    }

    /// Adds a lookup, returning the target it replaced.
    pub fn insert(
        &mut self,
        specifier: impl Into<String>,
        target: impl Into<Value>,
    ) -> Option<Value> {
        self.0.insert(specifier.into(), target.into())
    }

    /// Returns the target given for `specifier`.
    pub fn get(&self, specifier: &str) -> Option<&Value> {
        self.0.get(specifier)
    }

    /// Number of lookups.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no lookups were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(specifier, target)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reads lookups from a JSON object.
    ///
    /// Anything other than an object has no specifier names and fails with
    /// [`SiftError::InvalidCallShape`].
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect()),
            other => Err(SiftError::InvalidCallShape(format!(
                "lookups must be named specifier/target pairs, got {}",
                Value::from(other).kind()
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Lookups {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookups = Lookups::new();
        for (specifier, target) in iter {
            lookups.insert(specifier, target);
        }
        lookups
    }
}

impl fmt::Display for Lookups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (specifier, target)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", specifier, target)?;
        }
        Ok(())
    }
}

/// Builds [`Lookups`] from keyword-style arguments.
///
/// Identifiers are used verbatim as specifiers; use the string form for
/// specifiers that are not valid identifiers.
///
/// ```
/// use sift::lookups;
///
/// let by_name = lookups! { name__icontains = "mar", age = 32 };
/// assert_eq!(by_name.len(), 2);
///
/// let by_str = lookups! { "first-name__iexact" => "JOHN" };
/// assert!(by_str.get("first-name__iexact").is_some());
///
/// assert!(lookups! {}.is_empty());
/// ```
#[macro_export]
macro_rules! lookups {
    () => {
        $crate::Lookups::new()
    };
    ($($specifier:ident = $target:expr),+ $(,)?) => {
        $crate::Lookups::new()$(.with(stringify!($specifier), $target))+
    };
    ($($specifier:literal => $target:expr),+ $(,)?) => {
        $crate::Lookups::new()$(.with($specifier, $target))+
    };
}

/// Compiled conjunction of lookup expressions.
///
/// An empty filter matches every record. Otherwise a record matches when
/// every expression does; expressions are tried in insertion order and the
/// first failure stops evaluation.
///
/// # Example
///
/// ```
/// use sift::{lookups, Filter, LookupConfig, Record};
///
/// let records = vec![
///     Record::from([("name", "ge-0/0/0")]),
///     Record::from([("name", "bvi10")]),
/// ];
///
/// let filter = Filter::compile(&lookups! { name__regex = r"\d/\d/\d" }, &LookupConfig::default()).unwrap();
/// let matched = filter.select(&records);
/// assert_eq!(matched, vec![&records[0]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    expressions: Vec<LookupExpression>,
}

impl Filter {
    /// Parses and prepares every lookup.
    pub fn compile(lookups: &Lookups, config: &LookupConfig) -> Result<Self> {
        config.validate()?;
        let expressions = lookups
            .iter()
            .map(|(specifier, target)| LookupExpression::compile(specifier, target.clone(), config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Filter { expressions })
    }

    /// The compiled expressions, in the order they were given.
    pub fn expressions(&self) -> &[LookupExpression] {
        &self.expressions
    }

    /// Returns `true` if this filter has no expressions (matches everything).
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Tests if a single record matches every expression.
    pub fn matches(&self, record: &Record) -> bool {
        self.expressions.iter().all(|expr| expr.matches(record))
    }

    /// Returns references to the matching records, in their original order.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut candidates = 0usize;
        let matched: Vec<&'a Record> = records
            .into_iter()
            .inspect(|_| candidates += 1)
            .filter(|record| self.matches(record))
            .collect();

        tracing::debug!(
            expressions = self.expressions.len(),
            candidates,
            matched = matched.len(),
            "filter pass complete"
        );
        matched
    }

    /// Counts the matching records.
    pub fn count<'a, I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .count()
    }

    /// Returns `true` if any record matches.
    pub fn any<'a, I>(&self, records: I) -> bool
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records.into_iter().any(|record| self.matches(record))
    }
}

/// Compiles `lookups` and requires exactly one match among `records`.
pub(crate) fn select_one<'a, I>(
    records: I,
    lookups: &Lookups,
    config: &LookupConfig,
) -> Result<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    if lookups.is_empty() {
        return Err(SiftError::InvalidCallShape(
            "get_one requires at least one lookup, e.g. lookups! { id = 1 }".to_string(),
        ));
    }

    let matched = Filter::compile(lookups, config)?.select(records);
    match matched.as_slice() {
        [] => Err(SiftError::NotFound {
            lookups: lookups.to_string(),
        }),
        [one] => Ok(*one),
        many => Err(SiftError::MultipleResults { count: many.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> Vec<Record> {
        [
            json!({"name": "john", "age": 32, "occupation": "fireman"}),
            json!({"name": "mary", "age": 32, "occupation": "ceo"}),
            json!({"name": "bob", "age": 40, "occupation": "plumber"}),
        ]
        .into_iter()
        .map(|j| Value::from(j).into_record().unwrap())
        .collect()
    }

    fn compile(lookups: Lookups) -> Filter {
        Filter::compile(&lookups, &LookupConfig::default()).unwrap()
    }

    #[test]
    fn empty_filter_matches_all() {
        let records = people();
        let filter = compile(Lookups::new());
        assert!(filter.is_empty());
        assert_eq!(filter.select(&records).len(), 3);
    }

    #[test]
    fn expressions_are_anded() {
        let records = people();
        let filter = compile(lookups! { age = 32, occupation__icontains = "CE" });
        let matched = filter.select(&records);
        assert_eq!(matched, vec![&records[1]]);
        assert_eq!(filter.expressions().len(), 2);
    }

    #[test]
    fn select_preserves_order() {
        let records = people();
        let filter = compile(lookups! { name__in = vec!["bob", "john"] });
        let names: Vec<&Value> = filter
            .select(&records)
            .into_iter()
            .filter_map(|r| r.get("name"))
            .collect();
        assert_eq!(names, vec![&Value::from("john"), &Value::from("bob")]);
    }

    #[test]
    fn count_and_any() {
        let records = people();
        let filter = compile(lookups! { age = 32 });
        assert_eq!(filter.count(&records), 2);
        assert!(filter.any(&records));
        assert!(!compile(lookups! { age = 99 }).any(&records));
    }

    #[test]
    fn compile_reports_first_bad_lookup() {
        let lookups = Lookups::new().with("name", "x").with("bad__", 1);
        let err = Filter::compile(&lookups, &LookupConfig::default()).unwrap_err();
        assert!(matches!(err, SiftError::InvalidSpecifier { ref specifier, .. } if specifier == "bad__"));
    }

    #[test]
    fn compile_validates_config() {
        let config = LookupConfig::new().delimiter("");
        let err = Filter::compile(&lookups! { name = "x" }, &config).unwrap_err();
        assert!(matches!(err, SiftError::InvalidConfig(_)));
    }

    #[test]
    fn repeated_specifier_replaces_target() {
        let lookups = Lookups::new().with("name", "john").with("age", 32).with("name", "bob");
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups.get("name"), Some(&Value::from("bob")));
        assert_eq!(lookups.iter().next().map(|(s, _)| s), Some("name"));
    }

    #[test]
    fn lookups_from_json_object() {
        let lookups = Lookups::from_json(json!({"name__in": ["a", "b"], "age": null})).unwrap();
        assert_eq!(lookups.get("name__in"), Some(&Value::from(vec!["a", "b"])));
        assert_eq!(lookups.get("age"), Some(&Value::Null));
    }

    #[test]
    fn lookups_from_positional_json_fail() {
        for json in [json!(["name"]), json!("name"), json!(3)] {
            let err = Lookups::from_json(json).unwrap_err();
            assert!(matches!(err, SiftError::InvalidCallShape(_)));
        }
    }

    #[test]
    fn lookups_deserialize_in_order() {
        let lookups: Lookups = serde_json::from_str(r#"{"b": 1, "a": "x"}"#).unwrap();
        let specifiers: Vec<&str> = lookups.iter().map(|(s, _)| s).collect();
        assert_eq!(specifiers, vec!["b", "a"]);
    }

    #[test]
    fn select_one_contract() {
        let records = people();
        let config = LookupConfig::default();

        let john = select_one(&records, &lookups! { name = "john" }, &config).unwrap();
        assert_eq!(john, &records[0]);

        let err = select_one(&records, &lookups! { name = "barney" }, &config).unwrap_err();
        assert!(matches!(err, SiftError::NotFound { ref lookups } if lookups == r#"name="barney""#));

        let err = select_one(&records, &lookups! { age = 32 }, &config).unwrap_err();
        assert!(matches!(err, SiftError::MultipleResults { count: 2 }));

        let err = select_one(&records, &Lookups::new(), &config).unwrap_err();
        assert!(matches!(err, SiftError::InvalidCallShape(_)));
    }
}
