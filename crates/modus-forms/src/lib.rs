//! # modus-forms
//!
//! A small form base for web applications. A concrete form type declares its
//! fields and registers validation rules once; each [`Form`](form::Form)
//! instance then collects submitted values, hands them to a validator, and
//! reports per-field and aggregate error messages.
//!
//! ## Modules
//!
//! - [`value`] - Scalar values and the supplied-data map
//! - [`validator`] - The adapter trait forms validate through, with one adapter per filter API shape
//! - [`filter`] - A rule-based subject filter usable behind either adapter
//! - [`form`] - The [`FormSchema`](form::FormSchema) hook and the [`Form`](form::Form) base

pub mod filter;
pub mod form;
pub mod validator;
pub mod value;

pub use form::{ErrorFormat, FieldError, FieldErrorRecord, Form, FormSchema, DEFAULT_ERROR_CLASS};
pub use validator::{ErrorMap, Validator};
pub use value::{IntoFieldValue, SuppliedData, Value};

use modus_forms_core::logging::setup_logging;
use modus_forms_core::settings_loader;
use modus_forms_core::FormSettings;

/// Loads [`FormSettings`] from the `MODUS_FORMS_*` environment variables and
/// installs a tracing subscriber for them.
///
/// Call this once at startup in applications that do not configure
/// `tracing` themselves, then hand the returned settings to
/// [`Form::with_settings`]. If a subscriber is already installed it is left
/// untouched.
///
/// # Examples
///
/// ```
/// let settings = modus_forms::init();
/// assert!(!settings.log_level.is_empty());
/// ```
pub fn init() -> FormSettings {
    let settings = settings_loader::from_env();
    if setup_logging(&settings) {
        tracing::debug!(debug = settings.debug, log_level = %settings.log_level, "logging installed");
    }
    settings
}
