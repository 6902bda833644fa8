//! # Error Handling
//!
//! This module defines the centralized error type for `mkvhost`. It uses
//! `thiserror` to derive an `Error` enum covering every failure the
//! provisioning pipeline can observe.
//!
//! Errors fall into two groups:
//!
//! - **Pre-flight errors** (`InvalidIdentifier`, `WorkingDirectoryMissing`,
//!   `Config`) stop the run before anything is written or executed.
//! - **Stage errors** (`InvalidReference`, `CommandSpawn`, `Io`, `Json`, ...)
//!   are caught by the orchestrator and recorded in the report of the stage
//!   that produced them. They never abort the pipeline.

use thiserror::Error;

/// Main error type for mkvhost operations
#[derive(Error, Debug)]
pub enum Error {
    /// The site name is empty or contains characters other than ASCII
    /// letters and digits.
    #[error("Invalid site name '{name}': site names must contain only alphanumeric characters")]
    InvalidIdentifier { name: String },

    /// A repository reference is not of the form `owner/name` or `name`.
    #[error("Invalid git repo format '{reference}'. Unable to clone repo")]
    InvalidReference { reference: String },

    /// The process working directory was removed before the run started.
    #[error("The current working directory does not exist: {message}")]
    WorkingDirectoryMissing { message: String },

    /// An external command could not be started at all.
    #[error("Failed to run `{command}`: {message}")]
    CommandSpawn { command: String, message: String },

    /// The configuration file could not be found or parsed.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error while writing or reading the manifest.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_identifier() {
        let error = Error::InvalidIdentifier {
            name: "my-site".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("my-site"));
        assert!(display.contains("alphanumeric"));
    }

    #[test]
    fn test_error_display_invalid_reference() {
        let error = Error::InvalidReference {
            reference: "a/b/c".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid git repo format"));
        assert!(display.contains("a/b/c"));
    }

    #[test]
    fn test_error_display_config_with_hint() {
        let error = Error::Config {
            message: "file not found".to_string(),
            hint: Some("pass --config with an existing file".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("--config"));
    }

    #[test]
    fn test_error_display_command_spawn() {
        let error = Error::CommandSpawn {
            command: "a2ensite demo.boldgrid.dev".to_string(),
            message: "No such file or directory (os error 2)".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("a2ensite demo.boldgrid.dev"));
        assert!(display.contains("os error 2"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        assert!(format!("{}", error).contains("I/O error"));
    }
}
