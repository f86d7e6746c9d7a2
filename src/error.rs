//! Error types for `sexcfg`
//!
//! The loader fails fast with a [`ConfigError`]; the collect-all diagnostics
//! path reports [`ValidationIssue`]s instead. [`SexcfgError`] aggregates
//! everything the CLI can hit and maps it onto a process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::resolved::Origin;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `sexcfg` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (malformed file, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `sexcfg` operations.
#[derive(Debug, Error)]
pub enum SexcfgError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid combination of command-line arguments
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SexcfgError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::MissingFile { .. } | ConfigError::Unreadable { .. })
            | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Config(ConfigError::InvalidOverride { .. }) | Self::Usage(_) => {
                ExitCode::USAGE_ERROR
            }
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Json(_) | Self::Yaml(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// Every variant tied to a single entry carries the [`Origin`] of that
/// entry so the message points at the offending line or override.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A non-blank line has no value after its key
    #[error("malformed line {line}: expected 'KEY value', got '{content}'")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// The offending line, trimmed
        content: String,
    },

    /// Key is not part of the parameter registry
    #[error("unknown parameter '{key}' ({at}){}", suggestion.as_ref().map_or_else(String::new, |s| format!("; did you mean '{s}'?")))]
    UnknownParameter {
        /// The unrecognised key
        key: String,
        /// Where the key was found
        at: Origin,
        /// Closest known parameter name, if any is close enough
        suggestion: Option<String>,
    },

    /// Value does not parse as the parameter's kind
    #[error("invalid value for '{key}' ({at}): got '{value}', expected {expected}")]
    TypeMismatch {
        /// Parameter name
        key: String,
        /// The raw value (or list element) that failed to convert
        value: String,
        /// Description of the expected shape
        expected: String,
        /// Where the value was found
        at: Origin,
    },

    /// Token is not one of the parameter's allowed values
    #[error("invalid value for '{key}' ({at}): '{value}' is not one of {}{}", allowed.join(", "), suggestion.as_ref().map_or_else(String::new, |s| format!("; did you mean '{s}'?")))]
    InvalidEnumValue {
        /// Parameter name
        key: String,
        /// The rejected token
        value: String,
        /// Tokens accepted by the parameter
        allowed: Vec<String>,
        /// Closest allowed token, if any is close enough
        suggestion: Option<String>,
        /// Where the value was found
        at: Origin,
    },

    /// Numeric value lies outside the parameter's inclusive range
    #[error("value for '{key}' ({at}) out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Parameter name
        key: String,
        /// The rejected value as written
        value: String,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
        /// Where the value was found
        at: Origin,
    },

    /// List has too few or too many elements
    #[error("'{key}' ({at}) takes {} value(s), got {count}", if min == max { min.to_string() } else { format!("{min} to {max}") })]
    ValueCount {
        /// Parameter name
        key: String,
        /// Number of elements given
        count: usize,
        /// Minimum number of elements
        min: usize,
        /// Maximum number of elements
        max: usize,
        /// Where the value was found
        at: Origin,
    },

    /// Key appears more than once in the same file
    #[error("duplicate parameter '{key}' at line {line} (first set at line {first_line})")]
    DuplicateParameter {
        /// Parameter name
        key: String,
        /// Line of the first occurrence
        first_line: usize,
        /// Line of the repeated occurrence
        line: usize,
    },

    /// A parameter without a default was not set
    #[error("missing required parameter '{key}'")]
    MissingRequired {
        /// Parameter name
        key: String,
    },

    /// Individually valid parameters contradict each other
    #[error("inconsistent parameters {}: {message}", keys.join(", "))]
    Inconsistent {
        /// Parameters involved
        keys: Vec<String>,
        /// What is wrong
        message: String,
    },

    /// Environment variable referenced with `${VAR:?msg}` is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location of the reference, with the user's message
        location: String,
    },

    /// `${` without a closing brace
    #[error("unclosed environment variable reference in '{key}' ({at})")]
    UnclosedEnvVar {
        /// Parameter name
        key: String,
        /// Where the value was found
        at: Origin,
    },

    /// Override is not of the form `KEY=VALUE`
    #[error("invalid override '{input}': expected KEY=VALUE")]
    InvalidOverride {
        /// The rejected override text
        input: String,
    },

    /// Configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exists but cannot be read as UTF-8 text
    #[error("cannot read {path}: {message}")]
    Unreadable {
        /// Path to the file
        path: PathBuf,
        /// Underlying reason
        message: String,
    },

    /// Configuration file exceeds the size limit
    #[error("{path} is {size} bytes, at most {limit} bytes allowed")]
    FileTooLarge {
        /// Path to the file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: usize,
    },

    /// One or more configuration files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

impl ConfigError {
    /// Returns the parameter this error concerns, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::UnknownParameter { key, .. }
            | Self::TypeMismatch { key, .. }
            | Self::InvalidEnumValue { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::ValueCount { key, .. }
            | Self::DuplicateParameter { key, .. }
            | Self::MissingRequired { key }
            | Self::UnclosedEnvVar { key, .. } => Some(key),
            Self::Inconsistent { keys, .. } => keys.first().map(String::as_str),
            _ => None,
        }
    }
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single issue found by the collect-all diagnostics pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationIssue {
    /// Parameter name or line the issue refers to (e.g. "DETECT_THRESH", "line 12")
    pub path: String,
    /// Description of the issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl ValidationIssue {
    /// Builds an error-severity issue from a loader error.
    #[must_use]
    pub fn from_error(err: &ConfigError) -> Self {
        let path = match err {
            ConfigError::MalformedLine { line, .. } => format!("line {line}"),
            other => other.key().unwrap_or("").to_string(),
        };
        Self {
            path,
            message: err.to_string(),
            severity: Severity::Error,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_empty() {
            write!(f, "{prefix}: {}", self.message)
        } else {
            write!(f, "{prefix}: {} at {}", self.message, self.path)
        }
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - validation failure that prevents configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}
