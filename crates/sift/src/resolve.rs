//! Key path resolution against nested records.

use crate::lookup::{KeyPath, Segment};
use crate::record::Record;
use crate::value::Value;

/// Outcome of walking a [`KeyPath`] into a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// A key was absent, or an intermediate value was not a record.
    NotFound,
    /// The value at the end of a plain path.
    One(&'a Value),
    /// Every value reached through an any-field segment.
    Any(Vec<&'a Value>),
}

impl<'a> Resolved<'a> {
    /// Returns `true` if the path could not be followed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolved::NotFound)
    }

    /// Returns the candidate values, none when not found.
    pub fn candidates(&self) -> &[&'a Value] {
        match self {
            Resolved::NotFound => &[],
            Resolved::One(value) => std::slice::from_ref(value),
            Resolved::Any(values) => values,
        }
    }
}

/// Resolves `path` against `record`.
///
/// Plain paths walk one key at a time and yield the terminal value, whatever
/// its type. Paths containing [`Segment::AnyField`] fan out over every value
/// at that level: a trailing marker collects them all, a marker in the middle
/// continues the rest of the path from each child that is itself a record.
///
/// # Example
///
/// ```
/// use sift::{resolve, KeyPath, Record, Resolved, Segment, Value};
///
/// let record: Record = Record::from([("facts", Value::from(Record::from([("movie", "Star Wars")])))]);
///
/// let path = KeyPath::new([Segment::key("facts"), Segment::key("movie")]).unwrap();
/// assert_eq!(resolve(&path, &record), Resolved::One(&Value::from("Star Wars")));
///
/// let missing = KeyPath::new([Segment::key("facts"), Segment::key("quote")]).unwrap();
/// assert!(resolve(&missing, &record).is_not_found());
/// ```
pub fn resolve<'a>(path: &KeyPath, record: &'a Record) -> Resolved<'a> {
    if path.has_any_field() {
        Resolved::Any(fan_out(path.segments(), record))
    } else {
        walk(path.segments(), record)
    }
}

fn walk<'a>(segments: &[Segment], record: &'a Record) -> Resolved<'a> {
    let mut current = record;
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        let Segment::Key(key) = segment else {
            return Resolved::NotFound;
        };
        let Some(value) = current.get(key) else {
            return Resolved::NotFound;
        };
        if i == last {
            return Resolved::One(value);
        }
        match value {
            Value::Record(nested) => current = nested,
            _ => return Resolved::NotFound,
        }
    }

    Resolved::NotFound
}

fn fan_out<'a>(segments: &[Segment], record: &'a Record) -> Vec<&'a Value> {
    let mut frontier: Vec<&'a Record> = vec![record];
    let mut found = Vec::new();
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        let reached: Vec<&'a Value> = match segment {
            Segment::Key(key) => frontier.iter().copied().filter_map(|r| r.get(key)).collect(),
            Segment::AnyField => frontier.iter().copied().flat_map(Record::values).collect(),
        };

        if i == last {
            found = reached;
            break;
        }

        frontier = reached.into_iter().filter_map(Value::as_record).collect();
        if frontier.is_empty() {
            break;
        }
    }

    found
}
