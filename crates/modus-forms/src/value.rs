//! Submitted field values.
//!
//! [`Value`] is the scalar a form field can hold. [`SuppliedData`] is the
//! working set of a form: every declared field mapped to `Option<Value>`,
//! where `None` means the field was not submitted. `None` is kept distinct
//! from an empty string.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar form value.
///
/// # Examples
///
/// ```
/// use modus_forms::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
///
/// let v = Value::from("hello");
/// assert_eq!(v, Value::String("hello".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

impl Value {
    /// Converts a JSON value into a form value.
    ///
    /// `null` is treated as "not submitted", and arrays and objects are not
    /// scalars, so all three yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }

    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for strings that are empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::String(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

// ── Field value conversion ─────────────────────────────────────────────

/// Anything that can be written into a form field.
///
/// Scalars become a present value; `Option`s of them keep `None` as an
/// explicit "no value" entry.
///
/// # Examples
///
/// ```
/// use modus_forms::value::{IntoFieldValue, Value};
///
/// assert_eq!("x".into_field_value(), Some(Value::from("x")));
/// assert_eq!(None::<&str>.into_field_value(), None);
/// ```
pub trait IntoFieldValue {
    /// Converts `self` into a field entry.
    fn into_field_value(self) -> Option<Value>;
}

macro_rules! impl_into_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                fn into_field_value(self) -> Option<Value> {
                    Some(Value::from(self))
                }
            }

            impl IntoFieldValue for Option<$ty> {
                fn into_field_value(self) -> Option<Value> {
                    self.map(Value::from)
                }
            }
        )*
    };
}

impl_into_field_value!(bool, i32, i64, f64, String, &str);

impl IntoFieldValue for Value {
    fn into_field_value(self) -> Option<Value> {
        Some(self)
    }
}

impl IntoFieldValue for Option<Value> {
    fn into_field_value(self) -> Self {
        self
    }
}

/// The current field values held by a form.
///
/// Keys are exactly the fields the form has stored; a key mapped to `None`
/// is a field that is known but has no value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SuppliedData {
    values: HashMap<String, Option<Value>>,
}

impl SuppliedData {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `field`, replacing any previous entry.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<Value>) {
        self.values.insert(field.into(), value);
    }

    /// Returns the value of `field`, or `None` if it is unset or unknown.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).and_then(Option::as_ref)
    }

    /// Returns `true` if `field` has an entry, even one without a value.
    pub fn contains_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Iterates over the stored field names in arbitrary order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(field, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Returns the number of stored fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<K: Into<String>> FromIterator<(K, Option<Value>)> for SuppliedData {
    fn from_iter<I: IntoIterator<Item = (K, Option<Value>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
