//! Validated record collections.
//!
//! A [`Collection`] owns an ordered list of records and guarantees every
//! element is a record: constructors and mutators that accept arbitrary
//! [`Value`]s reject anything else. Filtering borrows from the collection;
//! [`Matches`] shares the matching records instead of copying them.

use std::ops::Index;

use serde::Serialize;

use crate::config::LookupConfig;
use crate::error::{Result, SiftError};
use crate::query::{select_one, Filter, Lookups};
use crate::record::Record;
use crate::value::Value;

/// Ordered collection of records.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use sift::{lookups, Collection};
///
/// let people = Collection::from_json(json!([
///     {"name": "john", "age": 32, "facts": {"movie": "Star Wars"}},
///     {"name": "mary", "age": 32, "facts": {"movie": "Fight Club"}},
/// ]))
/// .unwrap();
///
/// let matched = people.filter(&lookups! { facts__movie__icontains = "star" }).unwrap();
/// assert_eq!(matched.len(), 1);
///
/// let mary = people.get_one(&lookups! { name__iexact = "MARY" }).unwrap();
/// assert_eq!(mary.get("name").and_then(|v| v.as_str()), Some("mary"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<Record>,
    #[serde(skip)]
    config: LookupConfig,
}

impl Collection {
    /// Creates an empty collection with the default lookup configuration.
    pub fn new() -> Self {
        Collection::default()
    }

    /// Replaces the configuration used by [`filter`](Self::filter) and friends.
    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration used to parse specifiers.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Builds a collection from dynamic values, all of which must be records.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                value
                    .into_record()
                    .map_err(|other| SiftError::InvalidCollection {
                        index,
                        found: other.kind(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Collection::from(records))
    }

    /// Builds a collection from a JSON array of objects.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Array(items) => {
                Collection::from_values(items.into_iter().map(Value::from))
            }
            other => Err(SiftError::InvalidDocument {
                found: Value::from(other).kind(),
            }),
        }
    }

    /// Parses JSON text holding an array of objects.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Collection::from_json(json)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Returns the record at `index` mutably, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The records as a slice.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Appends a record.
    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Appends a value, which must be a record.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let record = into_element(value.into())?;
        self.records.push(record);
        Ok(())
    }

    /// Inserts a value at `index`, shifting later records right.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let record = into_element(value.into())?;
        if index > self.records.len() {
            return Err(SiftError::IndexOutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        self.records.insert(index, record);
        Ok(())
    }

    /// Replaces the record at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Record> {
        let record = into_element(value.into())?;
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(SiftError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, record))
    }

    /// Returns the records matching every lookup, in their original order.
    ///
    /// No lookups returns every record.
    pub fn filter(&self, lookups: &Lookups) -> Result<Matches<'_>> {
        let filter = Filter::compile(lookups, &self.config)?;
        Ok(Matches {
            records: filter.select(&self.records),
            config: &self.config,
        })
    }

    /// Like [`filter`](Self::filter), but hands out mutable references.
    ///
    /// Changes made through the result are changes to this collection.
    pub fn filter_mut(&mut self, lookups: &Lookups) -> Result<Vec<&mut Record>> {
        let filter = Filter::compile(lookups, &self.config)?;
        Ok(self
            .records
            .iter_mut()
            .filter(|record| filter.matches(record))
            .collect())
    }

    /// Returns the single record matching every lookup.
    ///
    /// Fails with [`SiftError::InvalidCallShape`] when no lookups are given,
    /// [`SiftError::NotFound`] when nothing matches and
    /// [`SiftError::MultipleResults`] when more than one record does.
    pub fn get_one(&self, lookups: &Lookups) -> Result<&Record> {
        select_one(&self.records, lookups, &self.config)
    }
}

fn into_element(value: Value) -> Result<Record> {
    value
        .into_record()
        .map_err(|other| SiftError::InvalidElement {
            found: other.kind(),
        })
}

impl From<Vec<Record>> for Collection {
    fn from(records: Vec<Record>) -> Self {
        Collection {
            records,
            config: LookupConfig::default(),
        }
    }
}

impl TryFrom<Vec<Value>> for Collection {
    type Error = SiftError;

    fn try_from(values: Vec<Value>) -> Result<Self> {
        Collection::from_values(values)
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Collection::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Extend<Record> for Collection {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl Index<usize> for Collection {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Result of a filter call: the matching records, borrowed from the source.
///
/// The view can be filtered again, narrowing further, or turned into an
/// owned [`Collection`] with [`to_collection`](Self::to_collection).
#[derive(Debug, Clone, PartialEq)]
pub struct Matches<'a> {
    records: Vec<&'a Record>,
    config: &'a LookupConfig,
}

impl<'a> Matches<'a> {
    /// Number of matched records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the match at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&'a Record> {
        self.records.get(index).copied()
    }

    /// Returns the first match in collection order.
    pub fn first(&self) -> Option<&'a Record> {
        self.records.first().copied()
    }

    /// Iterates over the matches in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// The matched records, as references into the source collection.
    pub fn as_slice(&self) -> &[&'a Record] {
        &self.records
    }

    /// Narrows these matches further.
    pub fn filter(&self, lookups: &Lookups) -> Result<Matches<'a>> {
        let filter = Filter::compile(lookups, self.config)?;
        Ok(Matches {
            records: filter.select(self.records.iter().copied()),
            config: self.config,
        })
    }

    /// Returns the single match among these records.
    pub fn get_one(&self, lookups: &Lookups) -> Result<&'a Record> {
        select_one(self.records.iter().copied(), lookups, self.config)
    }

    /// Clones the matched records into a new collection with the same config.
    pub fn to_collection(&self) -> Collection {
        Collection {
            records: self.records.iter().map(|r| (*r).clone()).collect(),
            config: self.config.clone(),
        }
    }

    /// Unwraps the matches into a vector of references.
    pub fn into_vec(self) -> Vec<&'a Record> {
        self.records
    }
}

impl<'a> IntoIterator for Matches<'a> {
    type Item = &'a Record;
    type IntoIter = std::vec::IntoIter<&'a Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> Index<usize> for Matches<'a> {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        self.records[index]
    }
}

impl PartialEq<Collection> for Matches<'_> {
    fn eq(&self, other: &Collection) -> bool {
        self.records.len() == other.records.len()
            && self.records.iter().zip(other.iter()).all(|(a, b)| *a == b)
    }
}

impl PartialEq<Vec<Record>> for Matches<'_> {
    fn eq(&self, other: &Vec<Record>) -> bool {
        self.records.len() == other.len()
            && self.records.iter().zip(other.iter()).all(|(a, b)| *a == b)
    }
}
