//! Ticket model for RT.
//!
//! Mirrors the fields RT prints for `ticket/<id>/show` and for
//! `search/ticket?format=l`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fields::{FieldProcessor, FieldProcessorRegistry, FieldTable};
use crate::models::{Entity, EntityKind};

/// A ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Numeric ticket ID (`id: ticket/42`).
    pub id: Option<u64>,

    /// Queue name.
    pub queue: Option<String>,

    /// Owner username (`Nobody` when unowned).
    pub owner: Option<String>,

    /// Username of whoever created the ticket.
    pub creator: Option<String>,

    /// Subject line.
    pub subject: Option<String>,

    /// Status (`new`, `open`, `stalled`, `resolved`, ...).
    pub status: Option<String>,

    /// Current priority.
    pub priority: Option<i64>,

    /// Priority at creation.
    pub initial_priority: Option<i64>,

    /// Priority the ticket escalates towards.
    pub final_priority: Option<i64>,

    /// Requestor addresses.
    #[serde(default)]
    pub requestors: BTreeSet<String>,

    /// Cc watchers.
    #[serde(default)]
    pub cc: BTreeSet<String>,

    /// AdminCc watchers.
    #[serde(default)]
    pub admin_cc: BTreeSet<String>,

    /// Creation time.
    pub created: Option<NaiveDateTime>,

    /// Scheduled start.
    pub starts: Option<NaiveDateTime>,

    /// Actual start.
    pub started: Option<NaiveDateTime>,

    /// Due date.
    pub due: Option<NaiveDateTime>,

    /// Resolution time.
    pub resolved: Option<NaiveDateTime>,

    /// Last time the requestor was contacted.
    pub told: Option<NaiveDateTime>,

    /// Last update time.
    pub last_updated: Option<NaiveDateTime>,

    /// Estimated effort in minutes.
    pub time_estimated: Option<i64>,

    /// Effort spent in minutes.
    pub time_worked: Option<i64>,

    /// Remaining effort in minutes.
    pub time_left: Option<i64>,

    /// Custom field values keyed by field name (`CF.{Team}` -> `Team`).
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

impl Ticket {
    /// Returns the subject or a placeholder.
    pub fn display_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or("(No subject)")
    }

    /// Returns the status or "Unknown".
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or("Unknown")
    }

    /// Returns the owner, treating RT's `Nobody` as unassigned.
    pub fn display_owner(&self) -> &str {
        match self.owner.as_deref() {
            None | Some("Nobody") => "Unassigned",
            Some(owner) => owner,
        }
    }

    /// Looks up a custom field value by name.
    pub fn custom_field(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}

/// Extracts the name from `CF.{Name}`, `CF-Name` or `CF.Name`.
fn custom_field_name(field: &str) -> Option<&str> {
    let prefix = field.get(..3)?;
    if !prefix.eq_ignore_ascii_case("cf.") && !prefix.eq_ignore_ascii_case("cf-") {
        return None;
    }
    let rest = &field[3..];
    let name = rest
        .strip_prefix('{')
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(rest)
        .trim();
    (!name.is_empty()).then_some(name)
}

impl Entity for Ticket {
    const KIND: EntityKind = EntityKind::Ticket;

    fn field_table() -> FieldTable<Self> {
        let mut table: FieldTable<Self> = FieldTable::new();
        table
            .register("id", FieldProcessor::Identifier(|t, v| t.id = v))
            .register("Queue", FieldProcessor::Text(|t, v| t.queue = v))
            .register("Owner", FieldProcessor::Text(|t, v| t.owner = v))
            .register("Creator", FieldProcessor::Text(|t, v| t.creator = v))
            .register("Subject", FieldProcessor::Text(|t, v| t.subject = v))
            .register("Status", FieldProcessor::Text(|t, v| t.status = v))
            .register("Priority", FieldProcessor::Integer(|t, v| t.priority = v))
            .register(
                "InitialPriority",
                FieldProcessor::Integer(|t, v| t.initial_priority = v),
            )
            .register(
                "FinalPriority",
                FieldProcessor::Integer(|t, v| t.final_priority = v),
            )
            .register("Requestors", FieldProcessor::List(|t, v| t.requestors = v))
            .register("Cc", FieldProcessor::List(|t, v| t.cc = v))
            .register("AdminCc", FieldProcessor::List(|t, v| t.admin_cc = v))
            .register("Created", FieldProcessor::DateTime(|t, v| t.created = v))
            .register("Starts", FieldProcessor::DateTime(|t, v| t.starts = v))
            .register("Started", FieldProcessor::DateTime(|t, v| t.started = v))
            .register("Due", FieldProcessor::DateTime(|t, v| t.due = v))
            .register("Resolved", FieldProcessor::DateTime(|t, v| t.resolved = v))
            .register("Told", FieldProcessor::DateTime(|t, v| t.told = v))
            .register(
                "LastUpdated",
                FieldProcessor::DateTime(|t, v| t.last_updated = v),
            )
            .register(
                "TimeEstimated",
                FieldProcessor::Integer(|t, v| t.time_estimated = v),
            )
            .register("TimeWorked", FieldProcessor::Integer(|t, v| t.time_worked = v))
            .register("TimeLeft", FieldProcessor::Integer(|t, v| t.time_left = v));
        table
    }

    fn select_table(registry: &FieldProcessorRegistry) -> &FieldTable<Self> {
        registry.tickets()
    }

    fn assign_unmapped(&mut self, field: &str, value: &str) {
        let Some(name) = custom_field_name(field) else {
            return;
        };
        if value.is_empty() {
            self.custom_fields.remove(name);
        } else {
            self.custom_fields.insert(name.to_string(), value.to_string());
        }
    }
}
