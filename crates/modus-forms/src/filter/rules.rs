//! Built-in validation rules.
//!
//! A [`Rule`] checks one field value, with the whole data set available for
//! cross-field rules such as [`EqualToField`]. Blank values never reach a
//! rule unless it opts in through [`Rule::evaluates_blank`]; the owning
//! [`RuleSpec`](super::RuleSpec) decides what a blank value means.

use std::fmt;

use modus_forms_core::FormsError;

use crate::value::{SuppliedData, Value};

/// A trait for checking a field value.
///
/// # Examples
///
/// ```
/// use modus_forms::filter::rules::{Alnum, Rule};
/// use modus_forms::value::{SuppliedData, Value};
///
/// let data = SuppliedData::new();
/// assert!(Alnum.check(Some(&Value::from("abc123")), &data));
/// assert!(!Alnum.check(Some(&Value::from("abc 123")), &data));
/// ```
pub trait Rule: Send + Sync + fmt::Debug {
    /// Returns `true` if `value` satisfies this rule.
    fn check(&self, value: Option<&Value>, data: &SuppliedData) -> bool;

    /// Returns a short name used in default messages.
    fn name(&self) -> &str;

    /// Whether the rule runs on blank values instead of deferring to the spec.
    fn evaluates_blank(&self) -> bool {
        false
    }

    /// Builds the default failure message for `field`.
    fn message(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{field} should not have validated as {}", self.name())
        } else {
            format!("{field} should have validated as {}", self.name())
        }
    }
}

/// Every character is an ASCII letter or digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alnum;

impl Rule for Alnum {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        match value {
            Some(Value::String(s)) => !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()),
            Some(Value::Int(i)) => *i >= 0,
            _ => false,
        }
    }

    fn name(&self) -> &str {
        "alnum"
    }
}

/// The value is present and not whitespace only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotBlank;

impl Rule for NotBlank {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        value.is_some_and(|v| !v.is_blank())
    }

    fn name(&self) -> &str {
        "notBlank"
    }

    fn evaluates_blank(&self) -> bool {
        true
    }

    fn message(&self, field: &str, negated: bool) -> String {
        if negated {
            format!("{field} should have been blank")
        } else {
            format!("{field} should not have been blank")
        }
    }
}

/// The value equals the value of another field.
#[derive(Debug, Clone)]
pub struct EqualToField {
    other: String,
}

impl EqualToField {
    /// Creates a rule comparing against `other`.
    pub fn new(other: impl Into<String>) -> Self {
        Self {
            other: other.into(),
        }
    }
}

impl Rule for EqualToField {
    fn check(&self, value: Option<&Value>, data: &SuppliedData) -> bool {
        value.is_some() && value == data.get(&self.other)
    }

    fn name(&self) -> &str {
        "equalToField"
    }
}

/// The value's text matches a regular expression.
#[derive(Debug, Clone)]
pub struct Matches {
    regex: regex::Regex,
}

impl Matches {
    /// Compiles `pattern` into a rule.
    pub fn new(pattern: &str) -> Result<Self, FormsError> {
        let regex = regex::Regex::new(pattern)
            .map_err(|e| FormsError::ConfigurationError(format!("Invalid regex: {e}")))?;
        Ok(Self { regex })
    }
}

impl Rule for Matches {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        value.is_some_and(|v| self.regex.is_match(&v.to_string()))
    }

    fn name(&self) -> &str {
        "regex"
    }
}

/// The value's text has at least this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Rule for MinLength {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        value.is_some_and(|v| v.to_string().chars().count() >= self.0)
    }

    fn name(&self) -> &str {
        "strlenMin"
    }
}

/// The value's text has at most this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        value.is_some_and(|v| v.to_string().chars().count() <= self.0)
    }

    fn name(&self) -> &str {
        "strlenMax"
    }
}

/// The value's text is one of a fixed set of choices.
#[derive(Debug, Clone)]
pub struct InList {
    choices: Vec<String>,
}

impl InList {
    /// Creates a rule accepting any of `choices`.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for InList {
    fn check(&self, value: Option<&Value>, _data: &SuppliedData) -> bool {
        value.is_some_and(|v| {
            let text = v.to_string();
            self.choices.iter().any(|c| *c == text)
        })
    }

    fn name(&self) -> &str {
        "inValues"
    }
}

type CheckFn = dyn Fn(Option<&Value>, &SuppliedData) -> bool + Send + Sync;

/// A rule backed by a closure, for checks the built-ins do not cover.
pub struct Callback {
    name: String,
    check: Box<CheckFn>,
}

impl Callback {
    /// Wraps `check` under `name`.
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&Value>, &SuppliedData) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Rule for Callback {
    fn check(&self, value: Option<&Value>, data: &SuppliedData) -> bool {
        (self.check)(value, data)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
