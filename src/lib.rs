//! # Sieve
//!
//! Sieve decodes responses from the Request Tracker (RT) REST 1.0 interface
//! into typed tickets, users and history entries.
//!
//! RT answers in a loose line-oriented text format rather than JSON. Sieve
//! handles the part of talking to RT that has real structure: splitting that
//! text into records and mapping each record's fields onto typed entities.
//! Session handling and HTTP transport are left to the caller.
//!
//! ## Pipeline
//!
//! 1. [`parser::RecordParser`] turns a body plus a caller-chosen
//!    [`parser::ResponseShape`] into an ordered list of [`models::Record`]s.
//!    Malformed lines are skipped, never reported.
//! 2. [`fields::EntityMapper`] looks up a typed [`fields::FieldProcessor`] for
//!    every field in the static [`fields::FieldProcessorRegistry`] and applies
//!    it. Conversion failures are collected per field; the rest of the record
//!    is still applied.
//!
//! ## Modules
//!
//! - [`config`] - Parser and conversion settings, with environment overrides
//! - [`error`] - Error types
//! - [`parser`] - Record parser and response shapes
//! - [`fields`] - Field processors, registry and population driver
//! - [`models`] - Records and destination entities
//! - [`response`] - RT status lines and `# Ticket N created.` notices
//!
//! ## Example
//!
//! ```
//! use sieve::config::Config;
//! use sieve::models::Ticket;
//! use sieve::parser::ResponseShape;
//!
//! let config = Config::default();
//! let body = "RT/4.4.3 200 Ok\n\nid: ticket/42\nSubject: printer broken\nPriority: 10\n";
//!
//! let records = config.record_parser().parse(body, ResponseShape::MultiLine);
//! let tickets = config.entity_mapper().populate_all::<Ticket>(&records);
//!
//! assert!(tickets.is_complete());
//! assert_eq!(tickets.value[0].id, Some(42));
//! assert_eq!(tickets.value[0].display_subject(), "printer broken");
//! ```
//!
//! ## Configuration
//!
//! All settings default to what a stock RT server emits. Optional overrides:
//!
//! - `SIEVE_DATE_FORMATS`: `|`-separated chrono layouts for date fields
//! - `SIEVE_CONTINUATION_MIN_INDENT`: leading whitespace that marks a continuation line
//! - `SIEVE_CONTINUATION_STRIP_INDENT`: whether that whitespace is removed
//! - `SIEVE_UNSET_MARKER`: text that means "no date" (default `Not set`)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod fields;
pub mod models;
pub mod parser;
pub mod response;
