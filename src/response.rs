//! Status lines and confirmation messages in RT response bodies.
//!
//! Besides `key: value` records, RT bodies carry two kinds of out-of-band
//! text the DAO layer interprets:
//!
//! - A status line at the top (`RT/4.4.3 200 Ok`), separate from the HTTP
//!   status, which is `200` even for failed operations.
//! - `#` comment lines with the outcome of write operations
//!   (`# Ticket 99 created.`, `# Ticket 7 updated.`, `# Ticket 5 does not exist.`).
//!
//! The record parser skips both; these helpers extract them.

use std::fmt;

/// Prefix of RT's status line.
const STATUS_PREFIX: &str = "RT/";

/// Parsed `RT/<version> <code> <message>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Server version, e.g. `4.4.3`.
    pub version: String,

    /// RT status code (200, 401, 409, ...).
    pub code: u16,

    /// Reason text, e.g. `Ok` or `Credentials required`.
    pub message: String,
}

impl StatusLine {
    /// Parses a single status line.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix(STATUS_PREFIX)?;
        let (version, rest) = rest.split_once(char::is_whitespace)?;
        let rest = rest.trim_start();
        let (code, message) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        Some(Self {
            version: version.to_string(),
            code: code.parse().ok()?,
            message: message.trim().to_string(),
        })
    }

    /// Returns true for RT's `200` status.
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {} {}", STATUS_PREFIX, self.version, self.code, self.message)
    }
}

/// Splits the status line off the front of `body`.
///
/// Leading blank lines are skipped. If the first non-blank line is not a
/// status line the body is returned unchanged.
pub fn split_status_line(body: &str) -> (Option<StatusLine>, &str) {
    let start = body.len() - body.trim_start().len();
    let rest = &body[start..];
    let (first, remainder) = rest.split_once('\n').unwrap_or((rest, ""));
    match StatusLine::parse(first) {
        Some(status) => (Some(status), remainder),
        None => (None, body),
    }
}

/// Outcome messages RT prints as `# Ticket <id> ...` comment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketNotice {
    /// `# Ticket <id> created.`
    Created(u64),
    /// `# Ticket <id> updated.`
    Updated(u64),
    /// `# Ticket <id> does not exist.`
    NotFound(u64),
}

impl TicketNotice {
    /// Parses a single comment line.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix('#')?.trim_start();
        let rest = rest.strip_prefix("Ticket ")?;
        let (id, outcome) = rest.split_once(' ')?;
        let id = id.parse().ok()?;
        match outcome.trim() {
            "created." => Some(TicketNotice::Created(id)),
            "updated." => Some(TicketNotice::Updated(id)),
            "does not exist." => Some(TicketNotice::NotFound(id)),
            _ => None,
        }
    }

    /// The ticket the notice refers to.
    pub fn ticket_id(&self) -> u64 {
        match *self {
            TicketNotice::Created(id) | TicketNotice::Updated(id) | TicketNotice::NotFound(id) => id,
        }
    }
}

/// Returns every ticket notice in `body`, in order.
pub fn ticket_notices(body: &str) -> Vec<TicketNotice> {
    body.lines().filter_map(TicketNotice::parse).collect()
}

/// Returns the ID from a `# Ticket <id> created.` confirmation, if present.
pub fn created_ticket_id(body: &str) -> Option<u64> {
    ticket_notices(body).into_iter().find_map(|notice| match notice {
        TicketNotice::Created(id) => Some(id),
        _ => None,
    })
}

/// Returns the `#` comment lines of `body` with the marker stripped.
pub fn comments(body: &str) -> impl Iterator<Item = &str> {
    body.lines()
        .filter_map(|line| line.trim().strip_prefix('#'))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_parse() {
        let status = StatusLine::parse("RT/4.4.3 200 Ok").unwrap();
        assert_eq!(status.version, "4.4.3");
        assert_eq!(status.code, 200);
        assert_eq!(status.message, "Ok");
        assert!(status.is_success());
        assert_eq!(status.to_string(), "RT/4.4.3 200 Ok");
    }

    #[test]
    fn test_status_line_multi_word_message() {
        let status = StatusLine::parse("RT/3.8.7 401 Credentials required").unwrap();
        assert_eq!(status.code, 401);
        assert_eq!(status.message, "Credentials required");
        assert!(!status.is_success());
    }

    #[test]
    fn test_status_line_rejects_other_text() {
        assert!(StatusLine::parse("id: ticket/1").is_none());
        assert!(StatusLine::parse("RT/4.4.3 abc Ok").is_none());
        assert!(StatusLine::parse("RT/").is_none());
    }

    #[test]
    fn test_split_status_line() {
        let (status, rest) = split_status_line("RT/4.4.3 200 Ok\n\nid: ticket/1\n");
        assert_eq!(status.map(|s| s.code), Some(200));
        assert_eq!(rest, "\nid: ticket/1\n");

        let (status, rest) = split_status_line("id: ticket/1\n");
        assert!(status.is_none());
        assert_eq!(rest, "id: ticket/1\n");
    }

    #[test]
    fn test_created_ticket_id() {
        assert_eq!(created_ticket_id("# Ticket 99 created.\n"), Some(99));
        assert_eq!(
            created_ticket_id("RT/4.4.3 200 Ok\n\n# Ticket 1234 created.\n\n"),
            Some(1234)
        );
        assert_eq!(created_ticket_id("# Ticket 99 updated.\n"), None);
        assert_eq!(created_ticket_id("# Could not create ticket.\n"), None);
    }

    #[test]
    fn test_ticket_notices() {
        let body = "RT/4.4.3 200 Ok\n\n# Ticket 7 updated.\n# Ticket 8 does not exist.\n";
        assert_eq!(
            ticket_notices(body),
            vec![TicketNotice::Updated(7), TicketNotice::NotFound(8)]
        );
        assert_eq!(TicketNotice::NotFound(8).ticket_id(), 8);
    }

    #[test]
    fn test_comments() {
        let body = "RT/4.4.3 200 Ok\n# 2/2 (id/31/total)\nid: 31\n#   No matching results.\n";
        let found: Vec<_> = comments(body).collect();
        assert_eq!(found, vec!["2/2 (id/31/total)", "No matching results."]);
    }
}
