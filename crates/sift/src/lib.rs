//! Sift - Lookup filters for in-memory collections of nested records.
//!
//! Sift filters lists of key-value records with named lookups of the form
//! `key__path__operator = target`. It supports:
//!
//! - Nested key paths, walked one record level at a time
//! - An `_any` wildcard segment matching any field at its level
//! - Seven operators: exact, iexact, in, regex, iregex, contains, icontains
//! - Conjunctive filtering that shares records with the source collection
//! - Single-record retrieval with not-found and ambiguity errors
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use sift::{lookups, Collection};
//!
//! let people = Collection::from_json(json!([
//!     {"name": "john", "age": 32, "facts": {"movie": "Star Wars"}, "pets": ["dog"]},
//!     {"name": "mary", "age": 32, "facts": {"movie": "Fight Club"}, "pets": []},
//!     {"name": "bob", "age": 40, "facts": {"quote": "meh"}, "pets": ["cat", "dog"]},
//! ]))
//! .unwrap();
//!
//! let thirty_two = people.filter(&lookups! { age = 32 }).unwrap();
//! assert_eq!(thirty_two.len(), 2);
//!
//! let dog_owners = people.filter(&lookups! { pets__contains = "dog" }).unwrap();
//! assert_eq!(dog_owners.len(), 2);
//!
//! let bob = people.get_one(&lookups! { facts___any__icontains = "MEH" }).unwrap();
//! assert_eq!(bob.get("name").and_then(|v| v.as_str()), Some("bob"));
//! ```
//!
//! # Specifiers
//!
//! A specifier is split on the delimiter (`__` by default). When there are
//! at least two segments and the last one names an operator, that segment is
//! the operator; otherwise the operator is `exact` and every segment is a key.
//!
//! ```text
//! name                 -> key path [name],           exact
//! facts__movie__iexact -> key path [facts, movie],   iexact
//! regex                -> key path [regex],          exact
//! _any__icontains      -> key path [*],              icontains
//! ```
//!
//! # Operators
//!
//! | Operator | Matches when the resolved value... |
//! |----------|-----------------------------------|
//! | `exact` | equals the target |
//! | `iexact` | equals the target, ignoring case for text |
//! | `in` | is an element of a target sequence, a substring of target text or a key of a target record |
//! | `regex` | is text containing a match of the target pattern |
//! | `iregex` | same as `regex`, case-insensitively |
//! | `contains` | is text containing the target, or a sequence holding it |
//! | `icontains` | is text containing the target text, ignoring case |
//!
//! A missing key never matches, whatever the operator. Type mismatches
//! between the resolved value and the target are non-matches, never errors.

mod clause;
mod collection;
mod config;
mod error;
mod lookup;
mod op;
mod query;
mod record;
mod resolve;
mod value;

// Re-export public API
pub use clause::LookupExpression;
pub use collection::{Collection, Matches};
pub use config::{LookupConfig, UnknownOperatorPolicy};
pub use error::{Result, SiftError};
pub use lookup::{parse_specifier, KeyPath, Segment};
pub use op::Operator;
pub use query::{Filter, Lookups};
pub use record::Record;
pub use resolve::{resolve, Resolved};
pub use value::{Number, Value};
