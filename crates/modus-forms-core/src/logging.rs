//! Logging integration for modus-forms.
//!
//! Forms only emit [`tracing`] events. An application that has no subscriber
//! of its own can install one from [`FormSettings`] with [`setup_logging`];
//! every form validation then logs inside a [`form_span`].

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::settings::{FormSettings, DEFAULT_LOG_LEVEL};

/// Installs a global tracing subscriber configured from `settings`.
///
/// `settings.log_level` is an [`EnvFilter`] directive such as `"debug"` or
/// `"modus_forms=trace,warn"`. An invalid directive falls back to
/// [`DEFAULT_LOG_LEVEL`] and is reported once the subscriber is up. Debug
/// mode writes human-readable lines with source locations; otherwise each
/// event is one JSON object.
///
/// Returns `false`, leaving the existing subscriber in place, if one was
/// already installed.
pub fn setup_logging(settings: &FormSettings) -> bool {
    let (filter, rejected) = match EnvFilter::try_new(&settings.log_level) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_LOG_LEVEL), Some(err)),
    };

    let installed = if settings.debug {
        fmt()
            .with_env_filter(filter)
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .is_ok()
    } else {
        fmt().with_env_filter(filter).json().try_init().is_ok()
    };

    if installed {
        if let Some(err) = rejected {
            tracing::warn!(
                log_level = %settings.log_level,
                error = %err,
                fallback = DEFAULT_LOG_LEVEL,
                "invalid log level"
            );
        }
    }
    installed
}

/// Creates a tracing span for one form's validation cycle.
///
/// # Examples
///
/// ```
/// use modus_forms_core::logging::form_span;
///
/// let span = form_span("UserForm");
/// let _guard = span.enter();
/// tracing::info!("validating");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::info_span!("form", name = form_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_subscriber_is_installed() {
        let settings = FormSettings {
            log_level: "not a directive ===".to_string(),
            ..FormSettings::default()
        };
        assert!(setup_logging(&settings));
        assert!(!setup_logging(&FormSettings::default()));
        assert!(!setup_logging(&FormSettings {
            debug: false,
            ..FormSettings::default()
        }));
    }
}
