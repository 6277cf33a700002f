//! Ticket history entries (`ticket/<id>/history?format=l`).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::fields::{FieldProcessor, FieldProcessorRegistry, FieldTable};
use crate::models::{Entity, EntityKind};

/// One transaction in a ticket's history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Transaction ID.
    pub id: Option<u64>,

    /// ID of the ticket the transaction belongs to.
    pub ticket: Option<u64>,

    /// Minutes recorded against this transaction.
    pub time_taken: Option<i64>,

    /// Transaction type (`Create`, `Correspond`, `Comment`, `Status`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Changed field, for `Set`-style transactions.
    pub field: Option<String>,

    /// Value before the change.
    pub old_value: Option<String>,

    /// Value after the change.
    pub new_value: Option<String>,

    /// Extra transaction data.
    pub data: Option<String>,

    /// One-line description (`Ticket created by root`).
    pub description: Option<String>,

    /// Message body, possibly several lines.
    pub content: Option<String>,

    /// Username of the actor.
    pub creator: Option<String>,

    /// When the transaction happened.
    pub created: Option<NaiveDateTime>,

    /// Attachment listing as printed by RT.
    pub attachments: Option<String>,
}

impl HistoryEntry {
    /// Returns true for transactions that carry a message.
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|c| c != "This transaction appears to have no content")
    }
}

impl Entity for HistoryEntry {
    const KIND: EntityKind = EntityKind::History;

    fn field_table() -> FieldTable<Self> {
        let mut table: FieldTable<Self> = FieldTable::new();
        table
            .register("id", FieldProcessor::Identifier(|h, v| h.id = v))
            .register("Ticket", FieldProcessor::Identifier(|h, v| h.ticket = v))
            .register("TimeTaken", FieldProcessor::Integer(|h, v| h.time_taken = v))
            .register("Type", FieldProcessor::Text(|h, v| h.kind = v))
            .register("Field", FieldProcessor::Text(|h, v| h.field = v))
            .register("OldValue", FieldProcessor::Text(|h, v| h.old_value = v))
            .register("NewValue", FieldProcessor::Text(|h, v| h.new_value = v))
            .register("Data", FieldProcessor::Text(|h, v| h.data = v))
            .register("Description", FieldProcessor::Text(|h, v| h.description = v))
            .register("Content", FieldProcessor::Text(|h, v| h.content = v))
            .register("Creator", FieldProcessor::Text(|h, v| h.creator = v))
            .register("Created", FieldProcessor::DateTime(|h, v| h.created = v))
            .register("Attachments", FieldProcessor::Text(|h, v| h.attachments = v));
        table
    }

    fn select_table(registry: &FieldProcessorRegistry) -> &FieldTable<Self> {
        registry.history()
    }
}
