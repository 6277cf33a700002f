//! Configuration for the Sieve decoder.
//!
//! Every setting has an RT default, so `Config::default()` is enough for a
//! stock RT server. `Config::from_env()` lets deployments override the date
//! layouts and continuation rule without code changes. The resulting values
//! are passed into [`RecordParser`] and [`EntityMapper`] explicitly; nothing
//! here touches process-wide state.

use std::env;

use crate::error::SieveError;
use crate::fields::{ConversionOptions, EntityMapper};
use crate::parser::{ParserConfig, RecordParser};

/// `|`-separated chrono layouts for date/time fields.
pub const ENV_DATE_FORMATS: &str = "SIEVE_DATE_FORMATS";

/// Minimum leading whitespace for a continuation line.
pub const ENV_CONTINUATION_MIN_INDENT: &str = "SIEVE_CONTINUATION_MIN_INDENT";

/// Whether continuation indentation is stripped (`true`/`false`).
pub const ENV_CONTINUATION_STRIP_INDENT: &str = "SIEVE_CONTINUATION_STRIP_INDENT";

/// Whether an indented `key: value` line starts a new field (`true`/`false`).
pub const ENV_CONTINUATION_INDENTED_KEYS: &str = "SIEVE_CONTINUATION_INDENTED_KEYS";

/// Text meaning "unset" in date/time fields.
pub const ENV_UNSET_MARKER: &str = "SIEVE_UNSET_MARKER";

/// Parser and conversion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Record parser settings.
    pub parser: ParserConfig,

    /// Field conversion settings.
    pub conversion: ConversionOptions,
}

impl Config {
    /// Loads configuration from environment variables, falling back to the
    /// RT defaults for anything unset.
    ///
    /// # Optional Environment Variables
    ///
    /// - `SIEVE_DATE_FORMATS`: `|`-separated chrono layouts
    /// - `SIEVE_CONTINUATION_MIN_INDENT`: integer, at least 1
    /// - `SIEVE_CONTINUATION_STRIP_INDENT`: `true` or `false`
    /// - `SIEVE_CONTINUATION_INDENTED_KEYS`: `true` or `false`
    /// - `SIEVE_UNSET_MARKER`: non-empty text
    ///
    /// # Errors
    ///
    /// Returns `SieveError::Config` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, SieveError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SieveError> {
        let mut config = Config::default();

        if let Some(value) = Self::get_optional(&lookup, ENV_DATE_FORMATS) {
            config.conversion.date_formats = Self::parse_date_formats(&value)?;
        }

        if let Some(value) = Self::get_optional(&lookup, ENV_CONTINUATION_MIN_INDENT) {
            config.parser.continuation.min_indent = Self::parse_min_indent(&value)?;
        }

        if let Some(value) = Self::get_optional(&lookup, ENV_CONTINUATION_STRIP_INDENT) {
            config.parser.continuation.strip_indent =
                Self::parse_bool(ENV_CONTINUATION_STRIP_INDENT, &value)?;
        }

        if let Some(value) = Self::get_optional(&lookup, ENV_CONTINUATION_INDENTED_KEYS) {
            config.parser.continuation.indented_keys_start_fields =
                Self::parse_bool(ENV_CONTINUATION_INDENTED_KEYS, &value)?;
        }

        if let Some(value) = Self::get_optional(&lookup, ENV_UNSET_MARKER) {
            config.conversion.unset_marker = value;
        }

        tracing::debug!(
            date_formats = config.conversion.date_formats.len(),
            min_indent = config.parser.continuation.min_indent,
            strip_indent = config.parser.continuation.strip_indent,
            indented_keys = config.parser.continuation.indented_keys_start_fields,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Creates a record parser using this configuration.
    pub fn record_parser(&self) -> RecordParser {
        RecordParser::new(self.parser.clone())
    }

    /// Creates an entity mapper using this configuration.
    pub fn entity_mapper(&self) -> EntityMapper {
        EntityMapper::new(self.conversion.clone())
    }

    /// Gets an environment variable, treating empty values as unset.
    fn get_optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Splits and validates the date layout list.
    fn parse_date_formats(value: &str) -> Result<Vec<String>, SieveError> {
        let formats: Vec<String> = value
            .split('|')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        if formats.is_empty() {
            return Err(SieveError::invalid_config(format!(
                "{} must contain at least one layout",
                ENV_DATE_FORMATS
            )));
        }

        if let Some(bad) = formats.iter().find(|f| !f.contains('%')) {
            return Err(SieveError::invalid_config(format!(
                "{} entry {:?} has no format specifiers",
                ENV_DATE_FORMATS, bad
            )));
        }

        Ok(formats)
    }

    /// Validates the continuation indent threshold.
    fn parse_min_indent(value: &str) -> Result<usize, SieveError> {
        match value.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(SieveError::invalid_config(format!(
                "{} must be an integer of at least 1",
                ENV_CONTINUATION_MIN_INDENT
            ))),
        }
    }

    fn parse_bool(name: &str, value: &str) -> Result<bool, SieveError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(SieveError::invalid_config(format!(
                "{} must be true or false",
                name
            ))),
        }
    }
}
