//! `FormSchema` trait and the `Form` base.
//!
//! A concrete form type implements [`FormSchema`]: it declares its fields and
//! registers its validation rules. [`Form`] does the rest. It keeps exactly
//! the declared fields of the submitted data, runs the validator on demand,
//! and answers error queries for rendering.
//!
//! Construction happens in two phases. The form is fully built first, and
//! only then is [`FormSchema::configure_validations`] called, exactly once.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use modus_forms_core::logging::form_span;
use modus_forms_core::{FormSettings, FormsError, FormsResult};

use crate::validator::{ErrorMap, Validator};
use crate::value::{IntoFieldValue, SuppliedData, Value};

/// The marker returned by [`Form::get_error_class`] unless a schema overrides it.
pub const DEFAULT_ERROR_CLASS: &str = "has-error";

/// The customization point of a concrete form type.
///
/// # Examples
///
/// ```
/// use modus_forms::filter::rules::Alnum;
/// use modus_forms::filter::SubjectFilter;
/// use modus_forms::validator::FailureCollectionAdapter;
/// use modus_forms::{Form, FormSchema};
///
/// struct LoginForm;
///
/// impl FormSchema for LoginForm {
///     type Validator = FailureCollectionAdapter<SubjectFilter>;
///
///     fn fields(&self) -> Vec<String> {
///         vec!["username".into(), "password".into()]
///     }
///
///     fn configure_validations(&self, validator: &mut Self::Validator) {
///         validator.validate("username").is(Alnum);
///         validator.validate("password").is_not_blank();
///     }
/// }
///
/// let mut form = Form::new(LoginForm, FailureCollectionAdapter::new(SubjectFilter::new())).unwrap();
/// form.populate_data([("username", "brandon"), ("password", "s3cret")]);
/// assert!(form.is_valid());
/// ```
pub trait FormSchema {
    /// The validator this form type drives.
    type Validator: Validator;

    /// The declared fields, in display order. Must not be empty.
    fn fields(&self) -> Vec<String>;

    /// Registers per-field rules on `validator`. Called once per form.
    fn configure_validations(&self, validator: &mut Self::Validator);

    /// The presentation marker for fields with errors.
    fn error_class(&self) -> &str {
        DEFAULT_ERROR_CLASS
    }

    /// A diagnostic name used in log spans.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// The shape in which a field's errors are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    /// All messages joined into one string.
    String,
    /// The messages as an ordered list.
    Array,
    /// A structured [`FieldErrorRecord`].
    Object,
}

impl ErrorFormat {
    /// The selector string for this format.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl FromStr for ErrorFormat {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(FormsError::InvalidArgument(format!(
                "Unknown error format '{other}', expected one of: string, array, object"
            ))),
        }
    }
}

impl fmt::Display for ErrorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field's errors as a structured record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorRecord {
    /// The field name.
    pub field: String,
    /// The messages, in the order the validator reported them.
    pub messages: Vec<String>,
    /// The error class, present only when there are messages.
    pub error_class: Option<String>,
}

/// A field's errors in the requested [`ErrorFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldError {
    /// Messages joined with the configured separator.
    Joined(String),
    /// Messages in order.
    List(Vec<String>),
    /// A structured record.
    Record(FieldErrorRecord),
}

impl FieldError {
    /// Returns `true` if there are no messages.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Joined(s) => s.is_empty(),
            Self::List(list) => list.is_empty(),
            Self::Record(record) => record.messages.is_empty(),
        }
    }

    /// Serializes the error for a rendering layer.
    pub fn to_json(&self) -> FormsResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The form base: declared fields, their submitted values, and a validator.
///
/// A `Form` is meant to live for one validation cycle (typically one
/// request) and be owned by a single caller.
pub struct Form<S: FormSchema> {
    schema: S,
    validator: S::Validator,
    fields: Vec<String>,
    supplied: SuppliedData,
    settings: FormSettings,
}

impl<S: FormSchema> Form<S> {
    /// Creates a form with default settings.
    ///
    /// Fails with [`FormsError::ConfigurationError`] if the schema declares
    /// no fields.
    pub fn new(schema: S, validator: S::Validator) -> FormsResult<Self> {
        Self::with_settings(schema, validator, FormSettings::default())
    }

    /// Creates a form with the given settings.
    pub fn with_settings(
        schema: S,
        validator: S::Validator,
        settings: FormSettings,
    ) -> FormsResult<Self> {
        let mut fields: Vec<String> = Vec::new();
        for field in schema.fields() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        if fields.is_empty() {
            return Err(FormsError::ConfigurationError(format!(
                "A list of fields is required for the form '{}'",
                schema.name()
            )));
        }

        let supplied = fields.iter().map(|f| (f.as_str(), None)).collect();
        let mut form = Self {
            schema,
            validator,
            fields,
            supplied,
            settings,
        };
        form.configure();
        Ok(form)
    }

    fn configure(&mut self) {
        self.schema.configure_validations(&mut self.validator);
        tracing::debug!(
            form = self.schema.name(),
            fields = ?self.fields,
            "form configured"
        );
    }

    /// Replaces the supplied data with the declared fields of `raw`.
    ///
    /// Values may be scalars or `Option`s of them; a `None` entry is kept as
    /// a declared field without a value. Declared fields missing from `raw`
    /// are stored without a value, and keys that are not declared are
    /// dropped.
    pub fn populate_data<I, K, V>(&mut self, raw: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoFieldValue,
    {
        let raw = raw
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_field_value()))
            .collect();
        self.replace_supplied(raw);
    }

    /// Like [`populate_data`](Self::populate_data), from a JSON object.
    ///
    /// `null`, arrays, and objects count as missing values.
    pub fn populate_json(&mut self, raw: &serde_json::Map<String, serde_json::Value>) {
        let raw = raw
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v)))
            .collect();
        self.replace_supplied(raw);
    }

    fn replace_supplied(&mut self, mut raw: HashMap<String, Option<Value>>) {
        let mut supplied = SuppliedData::new();
        for field in &self.fields {
            supplied.insert(field.clone(), raw.remove(field).flatten());
        }
        for key in raw.keys() {
            tracing::trace!(form = self.schema.name(), field = %key, "dropping undeclared field");
        }
        self.supplied = supplied;
    }

    /// Runs the validator against the current data.
    ///
    /// Every call re-validates and overwrites the failure state that the
    /// error queries read.
    pub fn validate(&mut self) -> bool {
        let _span = form_span(self.schema.name()).entered();
        let valid = self.validator.apply(&self.supplied);
        tracing::debug!(valid, "form validated");
        valid
    }

    /// Same as [`validate`](Self::validate); the result is not cached.
    pub fn is_valid(&mut self) -> bool {
        self.validate()
    }

    /// Returns the value of `field`, or `None` if it is unset or undeclared.
    pub fn get_value(&self, field: &str) -> Option<&Value> {
        self.supplied.get(field)
    }

    /// Sets `field` to `value`. Undeclared fields are ignored.
    ///
    /// Passing `None::<Value>` (or any `Option` that is `None`) leaves the
    /// field declared but without a value, like [`clear_value`](Self::clear_value).
    pub fn set_value(&mut self, field: &str, value: impl IntoFieldValue) {
        if self.is_declared(field) {
            self.supplied.insert(field, value.into_field_value());
        } else {
            tracing::trace!(form = self.schema.name(), field, "ignoring write to undeclared field");
        }
    }

    /// Removes the value of `field`, keeping it declared. Undeclared fields
    /// are ignored.
    pub fn clear_value(&mut self, field: &str) {
        self.set_value(field, None::<Value>);
    }

    /// Returns `true` if the last validation produced errors for `field`.
    pub fn has_error(&self, field: &str) -> bool {
        self.validator.field_has_failures(field)
    }

    /// Returns the errors for `field` in the format named by `format`:
    /// `"string"`, `"array"`, or `"object"`.
    ///
    /// Fails with [`FormsError::InvalidArgument`] for any other selector.
    pub fn get_error(&self, field: &str, format: &str) -> FormsResult<FieldError> {
        let format: ErrorFormat = format.parse()?;
        Ok(self.error(field, format))
    }

    /// Returns the errors for `field` in `format`.
    pub fn error(&self, field: &str, format: ErrorFormat) -> FieldError {
        let messages = self.validator.messages_for(field);
        match format {
            ErrorFormat::String => {
                FieldError::Joined(messages.join(self.settings.message_separator.as_str()))
            }
            ErrorFormat::Array => FieldError::List(messages),
            ErrorFormat::Object => {
                let error_class = (!messages.is_empty()).then(|| self.schema.error_class().to_string());
                FieldError::Record(FieldErrorRecord {
                    field: field.to_string(),
                    messages,
                    error_class,
                })
            }
        }
    }

    /// Returns every field that has errors, with its messages.
    pub fn get_errors(&self) -> ErrorMap {
        let mut errors = self.validator.aggregate_messages();
        errors.retain(|_, messages| !messages.is_empty());
        errors
    }

    /// Returns the schema's error class if `field` has errors.
    pub fn get_error_class(&self, field: &str) -> Option<&str> {
        self.has_error(field).then(|| self.schema.error_class())
    }

    /// Returns `true` if `field` is one of the declared fields.
    pub fn is_declared(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Returns the declared fields, in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the current supplied data.
    pub const fn supplied_data(&self) -> &SuppliedData {
        &self.supplied
    }

    /// Returns the schema.
    pub const fn schema(&self) -> &S {
        &self.schema
    }

    /// Returns the validator.
    pub const fn validator(&self) -> &S::Validator {
        &self.validator
    }

    /// Returns the settings this form was built with.
    pub const fn settings(&self) -> &FormSettings {
        &self.settings
    }
}

// The validator may hold rules and failure state; keep it out of debug output.
impl<S: FormSchema> fmt::Debug for Form<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields)
            .field("supplied_data", &self.supplied)
            .finish_non_exhaustive()
    }
}
