//! Settings for modus-forms.
//!
//! [`FormSettings`] holds the knobs that are shared by every form instance in
//! an application: logging and the separator used when error messages are
//! joined into a single string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The separator used when joining a field's error messages.
pub const DEFAULT_MESSAGE_SEPARATOR: &str = " ";

/// The log directive used when none is configured or the configured one is
/// invalid.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The complete set of form settings.
///
/// # Examples
///
/// ```
/// use modus_forms_core::settings::FormSettings;
///
/// let settings = FormSettings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.message_separator, " ");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Error reporting ──────────────────────────────────────────────

    /// Joins a field's messages when they are requested as one string.
    pub message_separator: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            message_separator: DEFAULT_MESSAGE_SEPARATOR.to_string(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FormSettings::default();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.message_separator, DEFAULT_MESSAGE_SEPARATOR);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_keeps_extra() {
        let mut settings = FormSettings::default();
        settings
            .extra
            .insert("theme".to_string(), serde_json::json!("bootstrap"));

        let json = serde_json::to_string(&settings).unwrap();
        let back: FormSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
