//! Error types for igesrust library

use std::io;
use thiserror::Error;

/// Main error type for igesrust operations
#[derive(Debug, Error)]
pub enum IgesError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A physical line that cannot be placed in any section, or a parameter
    /// record addressed to a directory entry that does not exist
    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// A parameter loader indexed past the end of its field list
    #[error(
        "Parameter count mismatch in {entity} (DE {sequence}): field {index} requested, {available} available"
    )]
    ParameterCountMismatch {
        sequence: u32,
        entity: &'static str,
        index: usize,
        available: usize,
    },

    /// A parameter field that does not hold the expected kind of value
    #[error("Invalid parameter {index} of DE {sequence}: expected {expected}, found '{value}'")]
    InvalidParameter {
        sequence: u32,
        index: usize,
        value: String,
        expected: &'static str,
    },

    /// A transform or child pointer that names no registered directory entry
    #[error("Unresolved pointer {pointer} ({context}) referenced from DE {referrer}")]
    UnresolvedPointer {
        pointer: i64,
        referrer: u32,
        context: &'static str,
    },

    /// A transform chain or composite nesting that refers back to itself
    #[error("Circular reference through DE {sequence}")]
    CircularReference { sequence: u32 },

    /// Recognized entity type with a form number this library does not read
    #[error("Unsupported variant: entity type {entity_type} form {form}")]
    UnsupportedVariant { entity_type: i32, form: i32 },

    /// Error parsing IGES file format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for igesrust operations
pub type Result<T> = std::result::Result<T, IgesError>;

impl From<String> for IgesError {
    fn from(s: String) -> Self {
        IgesError::Custom(s)
    }
}

impl From<&str> for IgesError {
    fn from(s: &str) -> Self {
        IgesError::Custom(s.to_string())
    }
}

impl IgesError {
    /// Build a `MalformedRecord` error for a physical line
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        IgesError::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Whether this error aborts a load
    ///
    /// Only `UnsupportedVariant` is recoverable; the reader turns it into a
    /// notification and keeps going.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, IgesError::UnsupportedVariant { .. })
    }
}
