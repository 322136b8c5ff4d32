//! Dynamic values held by records.
//!
//! [`Value`] is the closed set of types a record field can hold: null, booleans,
//! numbers, text, sequences and nested records. Lookup operators inspect the
//! variant and treat anything they cannot handle as a non-match.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A record field value.
///
/// Equality is deep and structural. Numbers compare by value across their
/// integer and float representations, so `32` equals `32.0`. Records compare
/// as maps, ignoring key order. A boolean never equals a number.
///
/// # Example
///
/// ```
/// use sift::Value;
///
/// let v = Value::from(vec!["dog", "cat"]);
/// assert!(v.is_sequence());
/// assert_eq!(Value::from(32), Value::from(32.0));
/// assert_ne!(Value::from(true), Value::from(1));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null, present but empty.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    Text(String),
    /// Ordered sequence of values.
    Sequence(Vec<Value>),
    /// Nested record.
    Record(Record),
}

impl Value {
    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns `true` if this is a `Sequence` value.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns `true` if this is a nested `Record`.
    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Extracts the text, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the sequence elements, if present.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the nested record, if present.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Extracts the nested record mutably, if present.
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Converts into a record, handing the value back if it is not one.
    pub fn into_record(self) -> std::result::Result<Record, Value> {
        match self {
            Value::Record(r) => Ok(r),
            other => Err(other),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Sequence(_) => "sequence",
            Value::Record(_) => "record",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A number held by a record.
///
/// Integers keep their exact value: anything that fits `i64` is `I64`, larger
/// unsigned values are `U64`. Everything else is `F64`. Equality and ordering
/// work across variants by numeric value, so `I64(2) == F64(2.0)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Lossy conversion to a float.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(f) => f,
        }
    }

    /// Orders two numbers by exact value. `None` if either is NaN.
    ///
    /// Integers are never rounded through `f64`, so `2^53 + 1` does not
    /// equal `2^53 as f64`.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (Some(a), None) => compare_int_float(a, other.to_f64()),
            (None, Some(b)) => compare_int_float(b, self.to_f64()).map(Ordering::reverse),
            (None, None) => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    fn as_integer(self) -> Option<i128> {
        match self {
            Number::I64(i) => Some(i128::from(i)),
            Number::U64(u) => Some(i128::from(u)),
            Number::F64(_) => None,
        }
    }
}

/// Orders an integer against a float without losing precision.
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    // Every i64 and u64 lies in [-2^63, 2^64)
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    const UPPER: f64 = 18_446_744_073_709_551_616.0;

    if float.is_nan() {
        return None;
    }
    if float >= UPPER {
        return Some(Ordering::Less);
    }
    if float < LOWER {
        return Some(Ordering::Greater);
    }
    // In range, so the integral part converts exactly
    let whole = float.trunc();
    Some(int.cmp(&(whole as i128)).then(whole.partial_cmp(&float)?))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(*other), Some(Ordering::Equal))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(i) => write!(f, "{}", i),
            Number::U64(u) => write!(f, "{}", u),
            Number::F64(x) => write!(f, "{}", x),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $repr:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(<$repr>::from(n))
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, u8, u16, u32);
number_from!(F64 as f64: f32, f64);

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(Number::U64(u), Number::I64)
    }
}

impl From<usize> for Number {
    fn from(u: usize) -> Self {
        Number::from(u as u64)
    }
}

impl From<isize> for Number {
    fn from(i: isize) -> Self {
        Number::I64(i as i64)
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

// Conversions into Value

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(Number::from(&n)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(Number::I64(n)) => serde_json::Value::from(n),
            Value::Number(Number::U64(n)) => serde_json::Value::from(n),
            Value::Number(Number::F64(n)) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Record(r) => serde_json::Value::Object(
                r.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variant_predicates() {
        assert!(Value::Null.is_null());
        assert!(Value::from("test").is_text());
        assert!(Value::from(vec![1, 2]).is_sequence());
        assert!(Value::Record(Record::new()).is_record());
        assert!(!Value::from(0).is_null());
    }

    #[test]
    fn accessors_check_variant() {
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from(42).as_number(), Some(Number::I64(42)));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(
            Value::from(vec!["a"]).as_sequence(),
            Some(&[Value::from("a")][..])
        );

        assert_eq!(Value::from("test").as_number(), None);
        assert_eq!(Value::from(1).as_str(), None);
        assert!(Value::Null.as_record().is_none());
    }

    #[test]
    fn value_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from(1.5).kind(), "number");
        assert_eq!(Value::from("x").kind(), "text");
        assert_eq!(Value::Record(Record::new()).kind(), "record");
    }

    #[test]
    fn value_equality_is_structural() {
        assert_eq!(Value::from(32), Value::from(32.0));
        assert_eq!(Value::from(32u64), Value::from(32i8));
        assert_ne!(Value::from(true), Value::from(1));
        assert_ne!(Value::from("32"), Value::from(32));
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Null, Value::from(""));
        assert_eq!(
            Value::from(json!({"a": 1, "b": [1, 2]})),
            Value::from(json!({"b": [1, 2], "a": 1.0}))
        );
    }

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }

    #[test]
    fn numbers_order_by_value() {
        use Ordering::*;

        let cases = [
            (Number::I64(-3), Number::I64(7), Less),
            (Number::U64(u64::MAX), Number::U64(1), Greater),
            (Number::F64(0.5), Number::F64(0.25), Greater),
            (Number::I64(-1), Number::U64(u64::MAX), Less),
            (Number::U64(u64::MAX), Number::I64(i64::MAX), Greater),
            (Number::U64(9), Number::I64(9), Equal),
            (Number::I64(2), Number::F64(2.0), Equal),
            (Number::F64(1e20), Number::I64(i64::MAX), Greater),
            (Number::I64(9_007_199_254_740_993), Number::F64(9_007_199_254_740_992.0), Greater),
            (Number::F64(9_007_199_254_740_992.0), Number::I64(9_007_199_254_740_993), Less),
            (Number::U64(u64::MAX), Number::F64(18_446_744_073_709_551_616.0), Less),
            (Number::I64(i64::MIN), Number::F64(-9_223_372_036_854_775_808.0), Equal),
            (Number::I64(3), Number::F64(2.5), Greater),
            (Number::I64(-3), Number::F64(-2.5), Less),
            (Number::F64(-0.5), Number::I64(0), Less),
            (Number::I64(0), Number::F64(-0.0), Equal),
            (Number::U64(1), Number::F64(f64::INFINITY), Less),
            (Number::I64(1), Number::F64(f64::NEG_INFINITY), Greater),
        ];
        for (a, b, expected) in cases {
            assert_eq!(a.compare(b), Some(expected), "{a} vs {b}");
        }
    }

    #[test]
    fn large_integers_do_not_round_to_floats() {
        assert_ne!(
            Value::from(9_007_199_254_740_993i64),
            Value::from(9_007_199_254_740_992.0)
        );
        assert_eq!(
            Value::from(9_007_199_254_740_992i64),
            Value::from(9_007_199_254_740_992.0)
        );
        assert_ne!(Value::from(u64::MAX), Value::from(u64::MAX as f64));
        assert_ne!(Value::from(7), Value::from(7.000_001));
    }

    #[test]
    fn number_nan_never_equal() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
        assert_ne!(Number::F64(f64::NAN), Number::F64(f64::NAN));
    }

    #[test]
    fn unsigned_conversions_prefer_i64() {
        assert!(matches!(Number::from(42u64), Number::I64(42)));
        assert!(matches!(Number::from(u64::MAX), Number::U64(u64::MAX)));
    }

    #[test]
    fn json_conversion_keeps_key_order() {
        let value = Value::from(json!({"z": 1, "a": {"m": null, "b": "x"}}));
        let record = value.as_record().unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);

        let back: serde_json::Value = value.clone().into();
        assert_eq!(back, json!({"z": 1, "a": {"m": null, "b": "x"}}));
    }

    #[test]
    fn display_renders_json() {
        assert_eq!(Value::from("bob").to_string(), "\"bob\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");
    }

    #[test]
    fn deserializes_from_json_text() {
        let value: Value = serde_json::from_str(r#"{"age": 32, "tags": ["a"], "x": null}"#)
            .unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.get("age"), Some(&Value::from(32)));
        assert_eq!(record.get("tags"), Some(&Value::from(vec!["a"])));
        assert_eq!(record.get("x"), Some(&Value::Null));
    }
}
