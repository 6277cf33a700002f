//! Data models for RT REST responses.
//!
//! This module contains the raw [`Record`] produced by the parser and the
//! typed destination entities (tickets, users, history entries) that records
//! are mapped onto.

mod history;
mod record;
mod ticket;
mod user;

pub use history::*;
pub use record::*;
pub use ticket::*;
pub use user::*;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::{FieldProcessorRegistry, FieldTable};

/// The entity types the field processor registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A ticket (`ticket/<id>/show`).
    Ticket,
    /// A user (`user/<name>`).
    User,
    /// A ticket history entry (`ticket/<id>/history?format=l`).
    History,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Ticket => "ticket",
            EntityKind::User => "user",
            EntityKind::History => "history",
        })
    }
}

/// A destination type that records can be mapped onto.
///
/// Each entity declares its settable attributes as a [`FieldTable`] of
/// typed processors. Fields without an entry reach [`assign_unmapped`]
/// (ignored unless the entity overrides it).
///
/// [`assign_unmapped`]: Entity::assign_unmapped
pub trait Entity: Default + Sized + 'static {
    /// Registry key for this entity type.
    const KIND: EntityKind;

    /// Builds the processor table for this entity. Called once, when the
    /// global registry is initialized.
    fn field_table() -> FieldTable<Self>;

    /// Picks this entity's table out of the registry.
    fn select_table(registry: &FieldProcessorRegistry) -> &FieldTable<Self>;

    /// Receives a field that has no registered processor.
    fn assign_unmapped(&mut self, _field: &str, _value: &str) {}
}
