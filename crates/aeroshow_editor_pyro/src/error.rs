// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the pyro marker engine.

use thiserror::Error;

/// Errors raised while decoding or persisting pyro markers
#[derive(Debug, Error)]
pub enum MarkerError {
    /// A required field was absent from a marker record
    #[error("{0} field is missing")]
    MissingField(&'static str),

    /// The persisted registry string was not a valid JSON object
    #[error("malformed marker document: {0}")]
    MalformedDocument(String),

    /// A field could not be coerced to a number
    #[error("invalid number in {field}: {value}")]
    InvalidNumber {
        /// Name of the offending field
        field: &'static str,
        /// The value as found in the record
        value: String,
    },
}

/// Result type for marker operations
pub type Result<T> = std::result::Result<T, MarkerError>;
