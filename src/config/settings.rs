//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;

/// X11 clipboard utilities that may be named in `preferred_utility`.
const VALID_UTILITIES: [&str; 2] = ["xclip", "xsel"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Clipboard backend settings.
    #[serde(default)]
    pub clipboard: ClipboardConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref utility) = self.clipboard.preferred_utility {
            if !VALID_UTILITIES.contains(&utility.as_str()) {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Invalid clipboard utility '{utility}'. Must be one of: xclip, xsel"
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Clipboard backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClipboardConfig {
    /// Preferred X11 clipboard utility: "xclip" or "xsel".
    /// Default: try xclip first, then xsel.
    #[serde(default)]
    pub preferred_utility: Option<String>,

    /// Use wl-clipboard (`wl-copy`/`wl-paste`) when running under Wayland.
    #[serde(default = "default_true")]
    pub wayland_fallback: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            preferred_utility: None,
            wayland_fallback: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
