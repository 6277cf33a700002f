//! Record parser for RT REST 1.0 response bodies.
//!
//! RT answers every request with a loosely formatted text body. Depending on
//! the endpoint, the body is one of three physical layouts:
//!
//! - **Multi-line** (`ticket/<id>/show`, `ticket/<id>/history?format=l`,
//!   `user/<name>`): blocks of `Key: value` lines separated by `--` lines.
//!   A value may wrap onto following indented lines that carry no key.
//! - **Single-line** (`search/ticket?format=s`): one `id: subject` pair per line.
//! - **Search list** (`search/ticket?format=l` or `format=i`): multi-line blocks,
//!   or bare `ticket/<id>` lines with no colon at all.
//!
//! The parser is deliberately tolerant. Lines it cannot read are skipped,
//! never reported as errors, because RT mixes status lines, comments
//! (`# Ticket 7 does not exist.`) and stray blank lines into its output.
//!
//! # Example
//!
//! ```
//! use sieve::parser::{RecordParser, ResponseShape};
//!
//! let body = "id: ticket/42\nSubject: printer broken\n--\nid: ticket/43\nSubject: no network\n";
//! let records = RecordParser::default().parse(body, ResponseShape::MultiLine);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].get("subject"), Some("no network"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SieveError;
use crate::models::Record;

/// The line that terminates a record in multi-line bodies.
pub const RECORD_SEPARATOR: &str = "--";

/// Field name given to bare identifier lines in search-list bodies.
pub const ID_FIELD: &str = "id";

/// Physical layout of a response body, chosen by the caller from the
/// request it made. The parser never guesses the shape from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// One `key: value` pair per line, each line its own record.
    SingleLine,
    /// `--`-separated blocks of `key: value` lines with continuation lines.
    MultiLine,
    /// Multi-line blocks, plus bare identifier lines as `id` records.
    SearchList,
}

impl ResponseShape {
    /// Canonical name of the shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseShape::SingleLine => "single_line",
            ResponseShape::MultiLine => "multi_line",
            ResponseShape::SearchList => "search_list",
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseShape {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_line" => Ok(ResponseShape::SingleLine),
            "multi_line" => Ok(ResponseShape::MultiLine),
            "search_list" => Ok(ResponseShape::SearchList),
            _ => Err(SieveError::unsupported_shape(s)),
        }
    }
}

/// The `format` parameter of RT's `search/ticket` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFormat {
    /// `format=i`: one `ticket/<id>` per line.
    IdOnly,
    /// `format=s`: one `<id>: <subject>` per line.
    IdAndSubject,
    /// `format=l`: full multi-line ticket blocks.
    Multiline,
}

impl SearchFormat {
    /// The single-letter code RT expects in the query string.
    pub fn code(&self) -> &'static str {
        match self {
            SearchFormat::IdOnly => "i",
            SearchFormat::IdAndSubject => "s",
            SearchFormat::Multiline => "l",
        }
    }

    /// The response shape a search in this format produces.
    pub fn shape(&self) -> ResponseShape {
        match self {
            SearchFormat::IdOnly => ResponseShape::SearchList,
            SearchFormat::IdAndSubject => ResponseShape::SingleLine,
            SearchFormat::Multiline => ResponseShape::SearchList,
        }
    }
}

impl FromStr for SearchFormat {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "i" => Ok(SearchFormat::IdOnly),
            "s" => Ok(SearchFormat::IdAndSubject),
            "l" => Ok(SearchFormat::Multiline),
            _ => Err(SieveError::unsupported_shape(s)),
        }
    }
}

/// Which indented lines extend the previous field's value.
///
/// RT indents continuation text by the width of the key plus `": "`, but
/// older servers and some custom fields use a single space or a tab, so the
/// threshold is configurable.
///
/// Continuations only apply to [`ResponseShape::MultiLine`] bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuationRule {
    /// Minimum number of leading whitespace characters (spaces or tabs).
    pub min_indent: usize,

    /// Remove the leading whitespace from the continuation text.
    pub strip_indent: bool,

    /// An indented line that parses as `key: value` starts a new field.
    ///
    /// When false, any indented line after an open field is continuation
    /// text, even `From: alice` inside quoted message content.
    pub indented_keys_start_fields: bool,
}

impl Default for ContinuationRule {
    fn default() -> Self {
        Self {
            min_indent: 1,
            strip_indent: true,
            indented_keys_start_fields: true,
        }
    }
}

impl ContinuationRule {
    /// Returns true if a line with this many leading whitespace characters
    /// continues the previous value.
    fn applies(&self, indent: usize) -> bool {
        indent > 0 && indent >= self.min_indent
    }

    fn text<'a>(&self, line: &'a str) -> &'a str {
        if self.strip_indent {
            line.trim()
        } else {
            line.trim_end()
        }
    }
}

/// Settings for [`RecordParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Continuation line detection.
    #[serde(default)]
    pub continuation: ContinuationRule,
}

/// Decodes raw RT response bodies into ordered [`Record`]s.
///
/// The parser holds only its configuration and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct RecordParser {
    config: ParserConfig,
}

impl RecordParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `body` according to `shape`.
    ///
    /// Returns an empty vector for an empty or separator-only body.
    /// Never fails: malformed lines are skipped.
    pub fn parse(&self, body: &str, shape: ResponseShape) -> Vec<Record> {
        let records = match shape {
            ResponseShape::SingleLine => self.parse_single_line(body),
            ResponseShape::MultiLine | ResponseShape::SearchList => self.parse_blocks(body, shape),
        };

        tracing::debug!(
            shape = %shape,
            records = records.len(),
            "Parsed RT response body"
        );

        records
    }

    /// Parses a `--`-separated multi-line body.
    pub fn parse_multi_line(&self, body: &str) -> Vec<Record> {
        self.parse(body, ResponseShape::MultiLine)
    }

    /// Parses a body with one `key: value` record per line.
    pub fn parse_single_line(&self, body: &str) -> Vec<Record> {
        body.lines()
            .enumerate()
            .filter_map(|(index, line)| match split_field(line) {
                Some((key, value)) => {
                    let mut record = Record::new();
                    record.insert(key, value);
                    Some(record)
                }
                None => {
                    skip_line(index, line);
                    None
                }
            })
            .collect()
    }

    /// Parses a search result body in list or identifier-only form.
    pub fn parse_search_list(&self, body: &str) -> Vec<Record> {
        self.parse(body, ResponseShape::SearchList)
    }

    fn parse_blocks(&self, body: &str, shape: ResponseShape) -> Vec<Record> {
        let rule = &self.config.continuation;
        let continuations = shape == ResponseShape::MultiLine;
        let bare_ids = shape == ResponseShape::SearchList;
        let mut builder = BlockBuilder::default();

        for (index, line) in body.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == RECORD_SEPARATOR {
                builder.finish_record();
                continue;
            }

            let indent = leading_whitespace(line);
            let continues = continuations && rule.applies(indent) && builder.pending.is_some();
            if continues && !rule.indented_keys_start_fields {
                builder.continue_field(rule.text(line));
                continue;
            }

            match split_field(line) {
                Some((key, value)) => builder.start_field(key, value),
                None if continues => builder.continue_field(rule.text(line)),
                None => match (bare_ids && indent == 0)
                    .then(|| bare_identifier(trimmed))
                    .flatten()
                {
                    Some(id) => builder.push_identifier(id),
                    None => skip_line(index, line),
                },
            }
        }

        builder.finish()
    }
}

/// Accumulates records while walking a multi-line body.
#[derive(Default)]
struct BlockBuilder {
    records: Vec<Record>,
    current: Record,
    pending: Option<(String, String)>,
}

impl BlockBuilder {
    fn start_field(&mut self, key: String, value: String) {
        self.flush_field();
        self.pending = Some((key, value));
    }

    fn continue_field(&mut self, text: &str) {
        if let Some((_, value)) = self.pending.as_mut() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(text);
        }
    }

    fn push_identifier(&mut self, id: &str) {
        self.finish_record();
        self.current.insert(ID_FIELD.to_string(), id.to_string());
        self.finish_record();
    }

    fn flush_field(&mut self) {
        if let Some((key, value)) = self.pending.take() {
            self.current.insert(key, value);
        }
    }

    fn finish_record(&mut self) {
        self.flush_field();
        if !self.current.is_empty() {
            self.records.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<Record> {
        self.finish_record();
        self.records
    }
}

/// Splits a line at its first colon into a trimmed key and value.
///
/// Returns `None` when there is no colon or the key is empty.
fn split_field(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// A single whitespace-free token such as `ticket/42` or `42`.
fn bare_identifier(line: &str) -> Option<&str> {
    let is_token = !line.starts_with('#')
        && !line.contains(':')
        && !line.chars().any(char::is_whitespace);
    is_token.then_some(line)
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn skip_line(index: usize, line: &str) {
    tracing::trace!(
        line = index + 1,
        text = %crate::error::preview(line),
        "Skipping line without a key"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(record: &Record) -> Vec<(&str, &str)> {
        record.iter().collect()
    }

    #[test]
    fn test_multi_line_two_records() {
        let body = "id: ticket/42\nSubject: printer broken\n--\nid: ticket/43\nSubject: no network\n";
        let records = RecordParser::default().parse(body, ResponseShape::MultiLine);

        assert_eq!(records.len(), 2);
        assert_eq!(
            pairs(&records[0]),
            vec![("id", "ticket/42"), ("Subject", "printer broken")]
        );
        assert_eq!(
            pairs(&records[1]),
            vec![("id", "ticket/43"), ("Subject", "no network")]
        );
    }

    #[test]
    fn test_trailing_separator_does_not_add_record() {
        let body = "id: ticket/1\n--\nid: ticket/2\n--\n";
        let records = RecordParser::default().parse_multi_line(body);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_empty_and_separator_only_bodies() {
        let parser = RecordParser::default();
        for shape in [
            ResponseShape::SingleLine,
            ResponseShape::MultiLine,
            ResponseShape::SearchList,
        ] {
            assert!(parser.parse("", shape).is_empty());
            assert!(parser.parse("--\n  --  \n\n--", shape).is_empty());
        }
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let compact = "id: ticket/1\nQueue: General\n--\nid: ticket/2\n";
        let spaced = "\n\nid: ticket/1\n\n   \nQueue: General\n\n--\n\nid: ticket/2\n\n";
        let parser = RecordParser::default();
        assert_eq!(parser.parse_multi_line(compact), parser.parse_multi_line(spaced));
    }

    #[test]
    fn test_colon_in_value_is_not_split() {
        let records = RecordParser::default().parse_multi_line("Subject: re: fwd: help\n");
        assert_eq!(records[0].get("Subject"), Some("re: fwd: help"));
    }

    #[test]
    fn test_lines_without_key_are_skipped() {
        let body = "RT/4.4.3 200 Ok\n\n# Ticket 42 shown\n: orphan\nid: ticket/42\nno colon here\n";
        let records = RecordParser::default().parse_multi_line(body);
        assert_eq!(records.len(), 1);
        assert_eq!(pairs(&records[0]), vec![("id", "ticket/42")]);
    }

    #[test]
    fn test_continuation_lines_join_with_newline() {
        let body = "id: 17\nContent: first line\n         second line\n\tthird line\nCreator: root\n";
        let records = RecordParser::default().parse_multi_line(body);

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("Content"),
            Some("first line\nsecond line\nthird line")
        );
        assert_eq!(records[0].get("Creator"), Some("root"));
        assert_eq!(records[0].len(), 3);
    }

    #[test]
    fn test_indented_key_starts_new_field() {
        let records = RecordParser::default().parse_multi_line("Content: a\n  Owner: nobody\n");
        assert_eq!(
            pairs(&records[0]),
            vec![("Content", "a"), ("Owner", "nobody")]
        );
    }

    #[test]
    fn test_indented_key_continues_when_configured() {
        let parser = RecordParser::new(ParserConfig {
            continuation: ContinuationRule {
                indented_keys_start_fields: false,
                ..ContinuationRule::default()
            },
        });
        let body = "Content: forwarded mail\n         From: alice\nCreator: bob\n";
        let records = parser.parse_multi_line(body);
        assert_eq!(records[0].get("Content"), Some("forwarded mail\nFrom: alice"));
        assert_eq!(records[0].get("From"), None);
        assert_eq!(records[0].get("Creator"), Some("bob"));
    }

    #[test]
    fn test_continuation_keeps_indent_when_configured() {
        let parser = RecordParser::new(ParserConfig {
            continuation: ContinuationRule {
                strip_indent: false,
                ..ContinuationRule::default()
            },
        });
        let records = parser.parse_multi_line("Content: a\n  b\n");
        assert_eq!(records[0].get("Content"), Some("a\n  b"));
    }

    #[test]
    fn test_continuation_min_indent_threshold() {
        let parser = RecordParser::new(ParserConfig {
            continuation: ContinuationRule {
                min_indent: 4,
                ..ContinuationRule::default()
            },
        });
        let records = parser.parse_multi_line("Content: a\n  Owner: nobody\n    wrapped\n");
        // Two spaces is below the threshold, so the line starts a new field.
        assert_eq!(records[0].get("Owner"), Some("nobody\nwrapped"));
        assert_eq!(records[0].get("Content"), Some("a"));
    }

    #[test]
    fn test_indented_line_without_prior_field_is_a_field() {
        let records = RecordParser::default().parse_multi_line("   Queue: General\n");
        assert_eq!(records[0].get("queue"), Some("General"));
    }

    #[test]
    fn test_continuation_of_empty_value() {
        let body = "Attachments:\n             untitled (52b)\n";
        let records = RecordParser::default().parse_multi_line(body);
        assert_eq!(records[0].get("Attachments"), Some("untitled (52b)"));
    }

    #[test]
    fn test_separator_ends_continuation() {
        let body = "Content: a\n  b\n--\n  stray\nid: 2\n";
        let records = RecordParser::default().parse_multi_line(body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Content"), Some("a\nb"));
        assert_eq!(pairs(&records[1]), vec![("id", "2")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let body = "id: ticket/5\r\nSubject: windows\r\n--\r\nid: ticket/6\r\n";
        let records = RecordParser::default().parse_multi_line(body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("subject"), Some("windows"));
    }

    #[test]
    fn test_single_line_shape() {
        let records = RecordParser::default()
            .parse("42: fix printer\n43: fix network\n", ResponseShape::SingleLine);

        assert_eq!(records.len(), 2);
        assert_eq!(pairs(&records[0]), vec![("42", "fix printer")]);
        assert_eq!(pairs(&records[1]), vec![("43", "fix network")]);
    }

    #[test]
    fn test_single_line_ignores_separators_and_indentation() {
        let body = "1: one\n--\n    indented: two\nplain\n";
        let records = RecordParser::default().parse_single_line(body);
        assert_eq!(records.len(), 2);
        assert_eq!(pairs(&records[1]), vec![("indented", "two")]);
    }

    #[test]
    fn test_search_list_bare_identifiers() {
        let body = "RT/4.4.3 200 Ok\n\nticket/42\nticket/43\n";
        let records = RecordParser::default().parse_search_list(body);

        assert_eq!(records.len(), 2);
        assert_eq!(pairs(&records[0]), vec![("id", "ticket/42")]);
        assert_eq!(pairs(&records[1]), vec![("id", "ticket/43")]);
    }

    #[test]
    fn test_search_list_blocks() {
        let body = "id: ticket/1\nSubject: a\n--\nid: ticket/2\nSubject: b\n";
        let records = RecordParser::default().parse_search_list(body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("subject"), Some("b"));
    }

    #[test]
    fn test_search_list_has_no_continuations() {
        let body = "id: ticket/1\nSubject: a\n  b\n";
        let records = RecordParser::default().parse_search_list(body);
        assert_eq!(records.len(), 1);
        assert_eq!(pairs(&records[0]), vec![("id", "ticket/1"), ("Subject", "a")]);
    }

    #[test]
    fn test_rule_deserializes_with_missing_fields() {
        let rule: ContinuationRule = serde_json::from_str(r#"{"min_indent": 2}"#).unwrap();
        assert_eq!(rule.min_indent, 2);
        assert!(rule.strip_indent);
        assert!(rule.indented_keys_start_fields);
    }

    #[test]
    fn test_search_list_no_matches() {
        let records = RecordParser::default().parse_search_list("No matching results.\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_bare_identifier_not_accepted_in_multi_line() {
        let records = RecordParser::default().parse_multi_line("ticket/42\n");
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let body = "id: ticket/1\nContent: x\n  y\n--\nid: ticket/2\n";
        let parser = RecordParser::default();
        assert_eq!(parser.parse_multi_line(body), parser.parse_multi_line(body));
    }

    #[test]
    fn test_shape_from_str() {
        assert_eq!("multi_line".parse::<ResponseShape>().unwrap(), ResponseShape::MultiLine);
        assert_eq!("Single-Line".parse::<ResponseShape>().unwrap(), ResponseShape::SingleLine);
        assert_eq!("search_list".parse::<ResponseShape>().unwrap(), ResponseShape::SearchList);
        assert!(matches!(
            "tabular".parse::<ResponseShape>(),
            Err(SieveError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_search_format_codes() {
        assert_eq!("i".parse::<SearchFormat>().unwrap(), SearchFormat::IdOnly);
        assert_eq!(SearchFormat::IdAndSubject.code(), "s");
        assert_eq!(SearchFormat::IdAndSubject.shape(), ResponseShape::SingleLine);
        assert_eq!(SearchFormat::Multiline.shape(), ResponseShape::SearchList);
        assert!("x".parse::<SearchFormat>().is_err());
    }
}
