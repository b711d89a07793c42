//! Unified error types for creator analytics.
//!
//! Error codes:
//! - INPUT_001-003: Input decoding and record errors
//! - CONFIG_001: Configuration errors
//! - RANGE_001: Calendar arithmetic errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Input error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputErrorCode {
    /// INPUT_001: Source is not valid JSON / not an array
    MalformedJson,
    /// INPUT_002: Record failed field validation
    InvalidRecord,
    /// INPUT_003: Source could not be read
    Unreadable,
}

impl InputErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedJson => "INPUT_001",
            Self::InvalidRecord => "INPUT_002",
            Self::Unreadable => "INPUT_003",
        }
    }
}

/// Configuration error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// CONFIG_001: Configuration failed validation
    Invalid,
}

impl ConfigErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid => "CONFIG_001",
        }
    }
}

/// Unified error type for creator analytics.
#[derive(Debug, Error)]
pub enum Error {
    /// Input error with code.
    #[error("[{code}] {message}")]
    Input {
        code: &'static str,
        message: String,
    },

    /// Configuration error with code.
    #[error("[{code}] {message}")]
    Config {
        code: &'static str,
        message: String,
    },

    #[error("[RANGE_001] date out of range: {0}")]
    DateOutOfRange(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create an input error.
    pub fn input(code: InputErrorCode, msg: impl Into<String>) -> Self {
        Self::Input {
            code: code.code(),
            message: msg.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(code: ConfigErrorCode, msg: impl Into<String>) -> Self {
        Self::Config {
            code: code.code(),
            message: msg.into(),
        }
    }

    pub fn date_out_of_range(msg: impl Into<String>) -> Self {
        Self::DateOutOfRange(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Input { code, .. } => Some(*code),
            Self::Config { code, .. } => Some(*code),
            Self::DateOutOfRange(_) => Some("RANGE_001"),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::input(InputErrorCode::InvalidRecord, errors.to_string())
    }
}
