//! The subject filter: per-field rule specs applied to a whole data set.

use std::collections::{HashMap, HashSet};

use crate::filter::failure::FailureCollection;
use crate::filter::rules::{NotBlank, Rule};
use crate::value::SuppliedData;
use crate::validator::{ErrorMap, FailureReporting, MessageQuery};

/// What happens after a rule fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleMode {
    /// Skip the remaining rules for this field.
    #[default]
    Hard,
    /// Keep evaluating the remaining rules for this field.
    Soft,
    /// Stop evaluating the whole filter.
    Stop,
}

/// One rule registered for one field.
#[derive(Debug)]
pub struct RuleSpec {
    field: String,
    rule: Box<dyn Rule>,
    negated: bool,
    allow_blank: bool,
    mode: RuleMode,
    message: Option<String>,
}

impl RuleSpec {
    fn new(field: String, rule: Box<dyn Rule>) -> Self {
        Self {
            field,
            rule,
            negated: false,
            allow_blank: false,
            mode: RuleMode::Hard,
            message: None,
        }
    }

    /// Keeps evaluating this field's later rules when this one fails.
    pub fn as_soft(&mut self) -> &mut Self {
        self.mode = RuleMode::Soft;
        self
    }

    /// Skips this field's later rules when this one fails (the default).
    pub fn as_hard(&mut self) -> &mut Self {
        self.mode = RuleMode::Hard;
        self
    }

    /// Stops the whole filter when this rule fails.
    pub fn as_stop(&mut self) -> &mut Self {
        self.mode = RuleMode::Stop;
        self
    }

    /// Replaces the rule's default failure message.
    pub fn with_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// The field this spec validates.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The failure mode.
    pub const fn mode(&self) -> RuleMode {
        self.mode
    }

    fn passes(&self, data: &SuppliedData) -> bool {
        let value = data.get(&self.field);
        let blank = value.map_or(true, |v| v.is_blank());
        if blank && !self.rule.evaluates_blank() {
            return self.allow_blank;
        }
        self.rule.check(value, data) != self.negated
    }

    fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.rule.message(&self.field, self.negated))
    }
}

/// Registers rule specs for a single field.
///
/// Returned by [`SubjectFilter::validate`]. Each terminal method registers
/// one spec and hands it back for further tuning.
#[derive(Debug)]
pub struct RuleSpecBuilder<'a> {
    filter: &'a mut SubjectFilter,
    field: String,
}

impl<'a> RuleSpecBuilder<'a> {
    /// The value must pass `rule`. Blank values fail.
    pub fn is(self, rule: impl Rule + 'static) -> &'a mut RuleSpec {
        self.push(Box::new(rule), false, false)
    }

    /// The value must fail `rule`. Blank values fail.
    pub fn is_not(self, rule: impl Rule + 'static) -> &'a mut RuleSpec {
        self.push(Box::new(rule), true, false)
    }

    /// The value must be blank or pass `rule`.
    pub fn is_blank_or(self, rule: impl Rule + 'static) -> &'a mut RuleSpec {
        self.push(Box::new(rule), false, true)
    }

    /// The value must be present and not blank.
    pub fn is_not_blank(self) -> &'a mut RuleSpec {
        self.push(Box::new(NotBlank), false, false)
    }

    fn push(self, rule: Box<dyn Rule>, negated: bool, allow_blank: bool) -> &'a mut RuleSpec {
        let Self { filter, field } = self;
        let mut spec = RuleSpec::new(field, rule);
        spec.negated = negated;
        spec.allow_blank = allow_blank;

        let index = filter.specs.len();
        filter.specs.push(spec);
        &mut filter.specs[index]
    }
}

/// A filter that validates a whole data set against per-field rules.
///
/// Rules run in registration order. After [`apply`](Self::apply) the
/// failures of that run are available until the next run replaces them.
///
/// # Examples
///
/// ```
/// use modus_forms::filter::rules::{Alnum, EqualToField};
/// use modus_forms::filter::SubjectFilter;
/// use modus_forms::value::{SuppliedData, Value};
///
/// let mut filter = SubjectFilter::new();
/// filter.validate("username").is(Alnum);
/// filter.validate("confirm").is(EqualToField::new("password"));
/// filter.use_field_message("confirm", "The passwords don't match!");
///
/// let data: SuppliedData = [
///     ("username", Some(Value::from("brandon"))),
///     ("password", Some(Value::from("abc"))),
///     ("confirm", Some(Value::from("abd"))),
/// ]
/// .into_iter()
/// .collect();
///
/// assert!(!filter.apply(&data));
/// assert_eq!(
///     filter.failures().messages_for_field("confirm"),
///     vec!["The passwords don't match!"]
/// );
/// ```
#[derive(Debug, Default)]
pub struct SubjectFilter {
    specs: Vec<RuleSpec>,
    field_messages: HashMap<String, String>,
    failures: FailureCollection,
}

impl SubjectFilter {
    /// Creates a filter with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts registering a rule for `field`.
    pub fn validate(&mut self, field: impl Into<String>) -> RuleSpecBuilder<'_> {
        RuleSpecBuilder {
            filter: self,
            field: field.into(),
        }
    }

    /// Reports `message` once, in place of individual rule messages, whenever
    /// `field` fails.
    pub fn use_field_message(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_messages.insert(field.into(), message.into());
    }

    /// Returns the registered specs in evaluation order.
    pub fn specs(&self) -> &[RuleSpec] {
        &self.specs
    }

    /// Validates `data`, replacing the failures of any previous run.
    ///
    /// Returns `true` if every rule passed.
    pub fn apply(&mut self, data: &SuppliedData) -> bool {
        self.failures.clear();
        let mut skipped: HashSet<&str> = HashSet::new();

        for spec in &self.specs {
            if skipped.contains(spec.field.as_str()) || spec.passes(data) {
                continue;
            }

            match self.field_messages.get(&spec.field) {
                Some(message) => self.failures.set(&spec.field, message.clone()),
                None => self.failures.add(spec.field.clone(), spec.failure_message()),
            }

            match spec.mode {
                RuleMode::Hard => {
                    skipped.insert(spec.field.as_str());
                }
                RuleMode::Soft => {}
                RuleMode::Stop => {
                    tracing::trace!(field = %spec.field, "stop rule failed, halting filter");
                    break;
                }
            }
        }

        self.failures.is_empty()
    }

    /// Returns the failures of the most recent run.
    pub fn failures(&self) -> &FailureCollection {
        &self.failures
    }
}

impl MessageQuery for SubjectFilter {
    fn apply(&mut self, data: &SuppliedData) -> bool {
        Self::apply(self, data)
    }

    fn get_messages(&self, field: Option<&str>) -> ErrorMap {
        match field {
            None => self.failures.messages(),
            Some(field) => {
                let messages = self.failures.messages_for_field(field);
                if messages.is_empty() {
                    ErrorMap::new()
                } else {
                    ErrorMap::from([(field.to_string(), messages)])
                }
            }
        }
    }
}

impl FailureReporting for SubjectFilter {
    fn apply(&mut self, data: &SuppliedData) -> bool {
        Self::apply(self, data)
    }

    fn get_failures(&self) -> &FailureCollection {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::rules::{Alnum, EqualToField, MinLength};
    use crate::value::Value;

    fn data(pairs: &[(&str, Option<&str>)]) -> SuppliedData {
        pairs
            .iter()
            .map(|(k, v)| (*k, v.map(Value::from)))
            .collect()
    }

    #[test]
    fn test_apply_passes_with_no_rules() {
        let mut filter = SubjectFilter::new();
        assert!(filter.apply(&SuppliedData::new()));
        assert!(filter.failures().is_empty());
    }

    #[test]
    fn test_default_messages() {
        let mut filter = SubjectFilter::new();
        filter.validate("username").is(Alnum);
        filter.validate("nickname").is_not(Alnum);

        assert!(!filter.apply(&data(&[
            ("username", Some("bad name")),
            ("nickname", Some("plain")),
        ])));
        let messages = filter.failures().messages();
        assert_eq!(messages["username"], vec!["username should have validated as alnum"]);
        assert_eq!(messages["nickname"], vec!["nickname should not have validated as alnum"]);
    }

    #[test]
    fn test_blank_fails_unless_allowed() {
        let mut filter = SubjectFilter::new();
        filter.validate("required").is(Alnum);
        filter.validate("optional").is_blank_or(Alnum);

        assert!(!filter.apply(&data(&[("required", None), ("optional", Some(" "))])));
        assert!(filter.failures().has_field("required"));
        assert!(!filter.failures().has_field("optional"));
    }

    #[test]
    fn test_hard_rule_skips_remaining_field_rules() {
        let mut filter = SubjectFilter::new();
        filter.validate("password").is_not_blank();
        filter.validate("password").is(MinLength(8));

        assert!(!filter.apply(&data(&[("password", None)])));
        assert_eq!(
            filter.failures().messages_for_field("password"),
            vec!["password should not have been blank"]
        );
    }

    #[test]
    fn test_soft_rule_keeps_evaluating() {
        let mut filter = SubjectFilter::new();
        filter.validate("password").is(Alnum).as_soft();
        filter
            .validate("password")
            .is(MinLength(8))
            .with_message("Use at least 8 characters.");

        assert!(!filter.apply(&data(&[("password", Some("a-b"))])));
        assert_eq!(
            filter.failures().messages_for_field("password"),
            vec![
                "password should have validated as alnum".to_string(),
                "Use at least 8 characters.".to_string(),
            ]
        );
    }

    #[test]
    fn test_stop_rule_halts_filter() {
        let mut filter = SubjectFilter::new();
        filter.validate("token").is_not_blank().as_stop();
        filter.validate("username").is(Alnum);

        assert!(!filter.apply(&data(&[("token", None), ("username", Some("!!"))])));
        assert_eq!(filter.failures().len(), 1);
        assert!(!filter.failures().has_field("username"));
        assert_eq!(filter.specs()[0].mode(), RuleMode::Stop);
    }

    #[test]
    fn test_field_message_replaces_rule_messages() {
        let mut filter = SubjectFilter::new();
        filter.validate("confirm").is(Alnum).as_soft();
        filter.validate("confirm").is(EqualToField::new("password"));
        filter.use_field_message("confirm", "The passwords don't match!");

        assert!(!filter.apply(&data(&[("password", Some("abc")), ("confirm", Some("a b"))])));
        assert_eq!(
            filter.failures().messages_for_field("confirm"),
            vec!["The passwords don't match!"]
        );
    }

    #[test]
    fn test_apply_replaces_previous_failures() {
        let mut filter = SubjectFilter::new();
        filter.validate("username").is(Alnum);

        assert!(!filter.apply(&data(&[("username", Some("a b"))])));
        assert!(filter.apply(&data(&[("username", Some("ab"))])));
        assert!(filter.failures().is_empty());
    }

    #[test]
    fn test_message_query_shape() {
        let mut filter = SubjectFilter::new();
        filter.validate("username").is(Alnum);
        assert!(!MessageQuery::apply(&mut filter, &data(&[("username", None)])));

        let one = filter.get_messages(Some("username"));
        assert_eq!(one.len(), 1);
        assert!(filter.get_messages(Some("password")).is_empty());
        assert_eq!(filter.get_messages(None), one);
    }

    #[test]
    fn test_failure_reporting_shape() {
        let mut filter = SubjectFilter::new();
        filter.validate("username").is(Alnum);
        assert!(FailureReporting::apply(&mut filter, &data(&[("username", Some("ok"))])));
        assert!(filter.get_failures().is_empty());
    }
}
