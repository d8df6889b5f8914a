//! The validator seam between forms and filter libraries.
//!
//! Forms only ever talk to a [`Validator`]. Filter libraries come in two API
//! shapes, and each shape gets one adapter:
//!
//! | Library shape | Trait | Adapter |
//! |---|---|---|
//! | Messages queried directly, per field or all at once | [`MessageQuery`] | [`MessageQueryAdapter`] |
//! | Failures exposed as a collection object | [`FailureReporting`] | [`FailureCollectionAdapter`] |
//!
//! Both adapters dereference to the wrapped filter so a form type can
//! register its rules on it.

use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;

use crate::filter::FailureCollection;
use crate::value::SuppliedData;

/// Error messages keyed by field name, in the order the fields first
/// failed. Fields without errors are absent.
pub type ErrorMap = IndexMap<String, Vec<String>>;

/// The interface a [`Form`](crate::form::Form) validates through.
///
/// `apply` is stateful: it replaces the failure state that the query methods
/// read. Before the first `apply` every query reports no errors.
pub trait Validator {
    /// Validates `data`, returning `true` if it passed.
    fn apply(&mut self, data: &SuppliedData) -> bool;

    /// Returns the messages for `field` from the last run, in order.
    fn messages_for(&self, field: &str) -> Vec<String>;

    /// Returns every field's messages from the last run.
    fn aggregate_messages(&self) -> ErrorMap;

    /// Returns `true` if `field` failed in the last run.
    fn field_has_failures(&self, field: &str) -> bool {
        !self.messages_for(field).is_empty()
    }
}

/// A filter whose messages are queried directly.
pub trait MessageQuery {
    /// Validates `data`, returning `true` if it passed.
    fn apply(&mut self, data: &SuppliedData) -> bool;

    /// Returns the messages for one field, or for every field when `field`
    /// is `None`.
    fn get_messages(&self, field: Option<&str>) -> ErrorMap;
}

/// A filter that reports its outcome as a [`FailureCollection`].
pub trait FailureReporting {
    /// Validates `data`, returning `true` if it passed.
    fn apply(&mut self, data: &SuppliedData) -> bool;

    /// Returns the failures of the last run.
    fn get_failures(&self) -> &FailureCollection;
}

/// Adapts a [`MessageQuery`] filter to [`Validator`].
#[derive(Debug, Default)]
pub struct MessageQueryAdapter<F> {
    filter: F,
}

impl<F: MessageQuery> MessageQueryAdapter<F> {
    /// Wraps `filter`.
    pub const fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Returns the wrapped filter.
    pub fn into_inner(self) -> F {
        self.filter
    }
}

impl<F: MessageQuery> Validator for MessageQueryAdapter<F> {
    fn apply(&mut self, data: &SuppliedData) -> bool {
        self.filter.apply(data)
    }

    fn messages_for(&self, field: &str) -> Vec<String> {
        self.filter
            .get_messages(Some(field))
            .shift_remove(field)
            .unwrap_or_default()
    }

    fn aggregate_messages(&self) -> ErrorMap {
        let mut messages = self.filter.get_messages(None);
        messages.retain(|_, list| !list.is_empty());
        messages
    }
}

impl<F> Deref for MessageQueryAdapter<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.filter
    }
}

impl<F> DerefMut for MessageQueryAdapter<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.filter
    }
}

/// Adapts a [`FailureReporting`] filter to [`Validator`].
#[derive(Debug, Default)]
pub struct FailureCollectionAdapter<F> {
    filter: F,
}

impl<F: FailureReporting> FailureCollectionAdapter<F> {
    /// Wraps `filter`.
    pub const fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Returns the wrapped filter.
    pub fn into_inner(self) -> F {
        self.filter
    }
}

impl<F: FailureReporting> Validator for FailureCollectionAdapter<F> {
    fn apply(&mut self, data: &SuppliedData) -> bool {
        self.filter.apply(data)
    }

    fn messages_for(&self, field: &str) -> Vec<String> {
        self.filter.get_failures().messages_for_field(field)
    }

    fn aggregate_messages(&self) -> ErrorMap {
        self.filter.get_failures().messages()
    }

    fn field_has_failures(&self, field: &str) -> bool {
        self.filter.get_failures().has_field(field)
    }
}

impl<F> Deref for FailureCollectionAdapter<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.filter
    }
}

impl<F> DerefMut for FailureCollectionAdapter<F> {
    fn deref_mut(&mut self) -> &mut F {
        &mut self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::rules::{Alnum, NotBlank};
    use crate::filter::SubjectFilter;
    use crate::value::Value;

    /// A legacy-style filter that reports empty lists for passing fields.
    #[derive(Debug, Default)]
    struct VerboseFilter {
        last: ErrorMap,
    }

    impl MessageQuery for VerboseFilter {
        fn apply(&mut self, data: &SuppliedData) -> bool {
            self.last.clear();
            for (field, value) in data.iter() {
                let messages = if value.is_none() {
                    vec![format!("{field} is required")]
                } else {
                    Vec::new()
                };
                self.last.insert(field.to_string(), messages);
            }
            self.last.values().all(Vec::is_empty)
        }

        fn get_messages(&self, field: Option<&str>) -> ErrorMap {
            match field {
                Some(f) => self
                    .last
                    .get_key_value(f)
                    .map(|(k, v)| ErrorMap::from([(k.clone(), v.clone())]))
                    .unwrap_or_default(),
                None => self.last.clone(),
            }
        }
    }

    fn data() -> SuppliedData {
        [("name", Some(Value::from("ok"))), ("email", None)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_message_query_adapter_drops_empty_lists() {
        let mut validator = MessageQueryAdapter::new(VerboseFilter::default());
        assert!(!validator.apply(&data()));

        let all = validator.aggregate_messages();
        assert_eq!(all.len(), 1);
        assert_eq!(all["email"], vec!["email is required"]);
        assert!(validator.field_has_failures("email"));
        assert!(!validator.field_has_failures("name"));
        assert!(validator.messages_for("unknown").is_empty());
    }

    #[test]
    fn test_adapters_agree_on_subject_filter() {
        let mut by_messages = MessageQueryAdapter::new(SubjectFilter::new());
        by_messages.validate("name").is(Alnum);
        by_messages.validate("email").is_not_blank();

        let mut by_failures = FailureCollectionAdapter::new(SubjectFilter::new());
        by_failures.validate("name").is(Alnum);
        by_failures.validate("email").is(NotBlank);

        let data = data();
        assert_eq!(by_messages.apply(&data), by_failures.apply(&data));
        assert_eq!(by_messages.aggregate_messages(), by_failures.aggregate_messages());
        assert_eq!(by_messages.messages_for("email"), by_failures.messages_for("email"));
        assert_eq!(
            by_messages.field_has_failures("name"),
            by_failures.field_has_failures("name")
        );
    }

    #[test]
    fn test_aggregate_messages_keep_failure_order() {
        let mut validator = FailureCollectionAdapter::new(SubjectFilter::new());
        validator.validate("zeta").is_not_blank();
        validator.validate("alpha").is_not_blank();
        validator.validate("mid").is_not_blank();

        assert!(!validator.apply(&SuppliedData::new()));
        let messages = validator.aggregate_messages();
        let fields: Vec<&str> = messages
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(fields, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_queries_before_apply_are_empty() {
        let validator = FailureCollectionAdapter::new(SubjectFilter::new());
        assert!(validator.aggregate_messages().is_empty());
        assert!(!validator.field_has_failures("name"));
        assert!(validator.into_inner().failures().is_empty());
    }
}
