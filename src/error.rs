//! Error types for the Sieve decoder.
//!
//! This module defines `SieveError`, the crate-level error type, and
//! `ConversionError`, the per-field error raised by field processors.
//!
//! # Policy
//!
//! The record parser never fails on malformed text. The only errors a caller
//! can see are configuration errors, an unsupported response shape code, and
//! field conversion failures. Conversion failures are collected per field by
//! the population driver instead of aborting the record.

use thiserror::Error;

/// Maximum number of characters of a raw value kept in error messages.
const MAX_VALUE_PREVIEW: usize = 80;

/// Unified error type for Sieve operations.
#[derive(Error, Debug)]
pub enum SieveError {
    /// Configuration error - an invalid environment variable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A response shape code that the parser does not know.
    #[error("unsupported response shape: {0:?}")]
    UnsupportedShape(String),

    /// A field value did not match the type its processor expects.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl SieveError {
    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SieveError::Config(message.into())
    }

    /// Creates an unsupported shape error.
    pub fn unsupported_shape(code: impl Into<String>) -> Self {
        SieveError::UnsupportedShape(code.into())
    }
}

/// A raw field value that could not be converted by its processor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert field {field:?}: expected {expected}, got {value:?}")]
pub struct ConversionError {
    /// The field name as it appeared on the wire.
    pub field: String,

    /// The offending raw value, truncated for display.
    pub value: String,

    /// Description of the accepted shape (e.g. "a numeric identifier").
    pub expected: &'static str,
}

impl ConversionError {
    /// Creates a conversion error, truncating long values.
    pub fn new(field: impl Into<String>, value: &str, expected: &'static str) -> Self {
        ConversionError {
            field: field.into(),
            value: preview(value),
            expected,
        }
    }
}

/// A conversion error attributed to the record it occurred in.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record {record_index}: {error}")]
pub struct FieldError {
    /// Zero-based position of the record in the parsed response.
    pub record_index: usize,

    /// The underlying conversion failure.
    #[source]
    pub error: ConversionError,
}

impl FieldError {
    /// Name of the field that failed to convert.
    pub fn field(&self) -> &str {
        &self.error.field
    }
}

/// Shortens a value for logs and error messages.
pub(crate) fn preview(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_PREVIEW {
        return value.to_string();
    }
    let mut short: String = value.chars().take(MAX_VALUE_PREVIEW).collect();
    short.push_str("...");
    short
}
