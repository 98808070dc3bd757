//! Error types for growable sequence operations.

use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use thiserror::Error;
use tracing::warn;

/// Result type using [`SeqError`].
pub type SeqResult<T> = Result<T, SeqError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Closed set of status codes reported by sequence operations.
///
/// Discriminants are stable and can be exchanged as raw integers; see
/// [`ErrorCode::from_raw`] and [`error_string`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The operation succeeded.
    NoError = 0,

    /// The handle is empty or was never constructed.
    InvalidObject = 1,

    /// The handle's signature does not match a live instance.
    InvalidSignature = 2,

    /// Backing storage could not be allocated.
    AllocationFailed = 3,

    /// The cursor is past the last stored element.
    EndOfSequence = 4,

    /// A raw code outside this enumeration was looked up.
    InvalidErrorCode = 5,
}

impl ErrorCode {
    /// Number of codes in the enumeration.
    pub const COUNT: usize = 6;

    /// Every code, in discriminant order.
    pub const ALL: [ErrorCode; Self::COUNT] = [
        ErrorCode::NoError,
        ErrorCode::InvalidObject,
        ErrorCode::InvalidSignature,
        ErrorCode::AllocationFailed,
        ErrorCode::EndOfSequence,
        ErrorCode::InvalidErrorCode,
    ];

    /// Convert a raw integer into a code.
    ///
    /// Values outside `0..COUNT` map to [`ErrorCode::InvalidErrorCode`].
    pub fn from_raw(raw: i32) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or(ErrorCode::InvalidErrorCode)
    }

    /// Raw integer value of this code.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Human-readable diagnostic string.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::NoError => "No error.",
            ErrorCode::InvalidObject => "Invalid object.",
            ErrorCode::InvalidSignature => "Invalid signature.",
            ErrorCode::AllocationFailed => "Allocation failed.",
            ErrorCode::EndOfSequence => "Last item.",
            ErrorCode::InvalidErrorCode => "Invalid error code.",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl<T> From<&SeqResult<T>> for ErrorCode {
    fn from(result: &SeqResult<T>) -> Self {
        match result {
            Ok(_) => ErrorCode::NoError,
            Err(err) => err.code(),
        }
    }
}

/// Look up the diagnostic string for a raw code.
///
/// Out-of-range codes yield the [`ErrorCode::InvalidErrorCode`] text.
pub fn error_string(raw: i32) -> &'static str {
    ErrorCode::from_raw(raw).description()
}

/// Failures returned by sequence operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqError {
    /// The handle is empty or was never constructed.
    #[error("Invalid object.")]
    InvalidObject,

    /// The handle was destroyed or its signature is corrupted.
    #[error("Invalid signature.")]
    InvalidSignature,

    /// Backing storage could not be allocated.
    #[error("Allocation failed.")]
    AllocationFailed,

    /// No element remains under the cursor.
    #[error("Last item.")]
    EndOfSequence,
}

impl SeqError {
    /// The status code corresponding to this failure.
    pub const fn code(self) -> ErrorCode {
        match self {
            SeqError::InvalidObject => ErrorCode::InvalidObject,
            SeqError::InvalidSignature => ErrorCode::InvalidSignature,
            SeqError::AllocationFailed => ErrorCode::AllocationFailed,
            SeqError::EndOfSequence => ErrorCode::EndOfSequence,
        }
    }

    /// Stale, empty, or corrupted handle. Not retryable.
    pub const fn is_usage_error(self) -> bool {
        matches!(self, SeqError::InvalidObject | SeqError::InvalidSignature)
    }

    /// Memory could not be obtained; the caller may free memory and retry.
    pub const fn is_resource_error(self) -> bool {
        matches!(self, SeqError::AllocationFailed)
    }

    /// Normal end of a cursor traversal.
    pub const fn is_end_of_sequence(self) -> bool {
        matches!(self, SeqError::EndOfSequence)
    }
}

/// Log a failed operation at its boundary and pass the result through.
///
/// `EndOfSequence` is a control signal and is not logged.
pub(crate) fn report<T>(op: &'static str, result: SeqResult<T>) -> SeqResult<T> {
    if let Err(err) = &result {
        if !err.is_end_of_sequence() {
            warn!(
                code = err.code().as_raw(),
                "Error {} in {}: {}",
                err.code().as_raw(),
                op,
                err
            );
        }
    }
    result
}

/// Errors that can occur while loading a [`SequenceConfig`](crate::config::SequenceConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting holds a value that cannot be used
    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue {
        /// Name of the setting
        key: String,
        /// The rejected value
        value: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Parsed document does not have the expected layout
    #[error("Invalid configuration structure: {0}")]
    InvalidStructure(String),
}
