//! Startup error types.
//!
//! Everything that can go wrong before the server loop starts lives here;
//! faults raised while handling protocol traffic are a separate concern
//! ([`crate::mcp::errors`]) because they must surface as JSON-RPC errors,
//! never as process exits.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON (or has unknown fields).
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// A configuration value failed validation.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}
