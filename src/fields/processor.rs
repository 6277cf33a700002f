//! Typed conversion strategies for individual record fields.
//!
//! A [`FieldProcessor`] pairs a conversion rule with a setter for one
//! attribute of an entity. Processors are plain values (a variant plus a
//! function pointer), so the tables that hold them can be built once and
//! shared without locking.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::models::Entity;

/// RT's long timestamp layout, e.g. `Mon Jan 02 15:04:05 2012`.
pub const RT_LONG_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// RT's ISO-like timestamp layout used in history entries, e.g. `2012-01-02 15:04:05`.
pub const RT_ISO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The text RT prints for a date that has never been set.
pub const RT_UNSET_MARKER: &str = "Not set";

/// Settings that control how raw values are converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// chrono layouts tried in order for date/time fields.
    pub date_formats: Vec<String>,

    /// Text meaning "no value" in date/time fields.
    pub unset_marker: String,

    /// Separator between elements of list fields such as `Requestors`.
    pub list_separator: char,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            date_formats: vec![
                RT_LONG_DATE_FORMAT.to_string(),
                RT_ISO_DATE_FORMAT.to_string(),
            ],
            unset_marker: RT_UNSET_MARKER.to_string(),
            list_separator: ',',
        }
    }
}

/// Converts a raw field value and assigns it onto an entity.
///
/// Typed variants treat an empty value as "no value" and assign `None`
/// (or an empty set). A non-empty value that does not fit the type is a
/// [`ConversionError`] and leaves the attribute untouched.
pub enum FieldProcessor<E> {
    /// Trimmed free text.
    Text(fn(&mut E, Option<String>)),
    /// Numeric identifier, bare (`42`) or prefixed (`ticket/42`).
    Identifier(fn(&mut E, Option<u64>)),
    /// Signed integer, optionally followed by a `minutes` unit.
    Integer(fn(&mut E, Option<i64>)),
    /// Timestamp in one of the configured layouts.
    DateTime(fn(&mut E, Option<NaiveDateTime>)),
    /// Separator-delimited list of names or addresses.
    List(fn(&mut E, BTreeSet<String>)),
    /// Boolean flag (`1`/`0`, `true`/`false`, `yes`/`no`).
    Flag(fn(&mut E, Option<bool>)),
    /// No registered processor: handed to [`Entity::assign_unmapped`].
    PassThrough,
}

impl<E> Clone for FieldProcessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FieldProcessor<E> {}

impl<E> fmt::Debug for FieldProcessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

impl<E> FieldProcessor<E> {
    /// Short name of the conversion rule.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldProcessor::Text(_) => "text",
            FieldProcessor::Identifier(_) => "identifier",
            FieldProcessor::Integer(_) => "integer",
            FieldProcessor::DateTime(_) => "datetime",
            FieldProcessor::List(_) => "list",
            FieldProcessor::Flag(_) => "flag",
            FieldProcessor::PassThrough => "pass-through",
        }
    }
}

impl<E: Entity> FieldProcessor<E> {
    /// Converts `raw` and assigns it onto `entity`.
    ///
    /// Processing the same value twice leaves the entity in the same state.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if `raw` does not match the processor's type.
    pub fn process(
        &self,
        entity: &mut E,
        field: &str,
        raw: &str,
        options: &ConversionOptions,
    ) -> Result<(), ConversionError> {
        let value = raw.trim();
        match *self {
            FieldProcessor::Text(set) => set(entity, non_empty(value).map(str::to_string)),
            FieldProcessor::Identifier(set) => {
                let id = convert(value, parse_identifier)
                    .ok_or_else(|| ConversionError::new(field, raw, "a numeric identifier"))?;
                set(entity, id);
            }
            FieldProcessor::Integer(set) => {
                let n = convert(value, parse_integer)
                    .ok_or_else(|| ConversionError::new(field, raw, "an integer"))?;
                set(entity, n);
            }
            FieldProcessor::DateTime(set) => {
                let when = if value.eq_ignore_ascii_case(&options.unset_marker) {
                    None
                } else {
                    convert(value, |v| parse_datetime(v, &options.date_formats))
                        .ok_or_else(|| ConversionError::new(field, raw, "a date/time"))?
                };
                set(entity, when);
            }
            FieldProcessor::List(set) => set(entity, parse_list(value, options.list_separator)),
            FieldProcessor::Flag(set) => {
                let flag = convert(value, parse_flag)
                    .ok_or_else(|| ConversionError::new(field, raw, "a boolean flag"))?;
                set(entity, flag);
            }
            FieldProcessor::PassThrough => entity.assign_unmapped(field.trim(), value),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Empty input converts to `Some(None)`, bad input to `None`.
fn convert<T>(value: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<Option<T>> {
    match non_empty(value) {
        None => Some(None),
        Some(v) => parse(v).map(Some),
    }
}

/// Parses `42` or `<kind>/42`.
pub fn parse_identifier(value: &str) -> Option<u64> {
    let digits = match value.rsplit_once('/') {
        Some((kind, digits)) => {
            let valid_kind = !kind.is_empty()
                && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid_kind {
                return None;
            }
            digits
        }
        None => value,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses a signed integer, accepting a trailing `minutes`/`min` unit.
pub fn parse_integer(value: &str) -> Option<i64> {
    let number = ["minutes", "minute", "min"]
        .iter()
        .find_map(|unit| value.strip_suffix(*unit))
        .map(str::trim_end)
        .unwrap_or(value);
    number.parse().ok()
}

/// Tries each layout in order.
pub fn parse_datetime(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Splits on `separator`, trimming elements and dropping empty ones.
pub fn parse_list(value: &str, separator: char) -> BTreeSet<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses RT's boolean spellings.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
