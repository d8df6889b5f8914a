//! Failure records produced by a [`SubjectFilter`](super::SubjectFilter) run.

use serde::Serialize;

use crate::validator::ErrorMap;

/// A single failed rule for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// The field that failed.
    pub field: String,
    /// The human-readable message.
    pub message: String,
}

/// The ordered failures recorded by the most recent filter run.
///
/// Order is the order in which rules failed, which is also the order of the
/// messages reported for each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FailureCollection {
    failures: Vec<Failure>,
}

impl FailureCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(Failure {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Replaces every failure for `field` with a single one.
    ///
    /// The replacement takes the position of the field's first failure, or
    /// goes to the end if the field had none.
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        let failure = Failure {
            field: field.to_string(),
            message: message.into(),
        };
        match self.failures.iter().position(|f| f.field == field) {
            Some(first) => {
                self.failures[first] = failure;
                let mut index = 0;
                self.failures.retain(|f| {
                    let keep = index <= first || f.field != field;
                    index += 1;
                    keep
                });
            }
            None => self.failures.push(failure),
        }
    }

    /// Returns the failures recorded for `field`, in order.
    pub fn for_field(&self, field: &str) -> Vec<&Failure> {
        self.failures.iter().filter(|f| f.field == field).collect()
    }

    /// Returns the messages recorded for `field`, in order.
    pub fn messages_for_field(&self, field: &str) -> Vec<String> {
        self.failures
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.message.clone())
            .collect()
    }

    /// Returns `true` if `field` has at least one failure.
    pub fn has_field(&self, field: &str) -> bool {
        self.failures.iter().any(|f| f.field == field)
    }

    /// Groups every message by field.
    pub fn messages(&self) -> ErrorMap {
        let mut map = ErrorMap::new();
        for failure in &self.failures {
            map.entry(failure.field.clone())
                .or_default()
                .push(failure.message.clone());
        }
        map
    }

    /// Iterates over the failures in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Failure> {
        self.failures.iter()
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Removes every failure.
    pub fn clear(&mut self) {
        self.failures.clear();
    }
}

impl<'a> IntoIterator for &'a FailureCollection {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
