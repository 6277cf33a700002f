//! Process-wide lookup table from `(entity, field name)` to processor.
//!
//! The registry is built on first use behind a [`LazyLock`] and never
//! changes afterwards, so concurrent readers need no synchronization.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::fields::FieldProcessor;
use crate::models::{Entity, EntityKind, HistoryEntry, Ticket, User};

static REGISTRY: LazyLock<FieldProcessorRegistry> = LazyLock::new(FieldProcessorRegistry::build);

/// Normalizes a field name for table lookups (trimmed, ASCII lower-case).
pub fn normalize_field_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Processors for one entity type, keyed by normalized field name.
pub struct FieldTable<E> {
    processors: HashMap<String, FieldProcessor<E>>,
}

impl<E> Default for FieldTable<E> {
    fn default() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }
}

impl<E> FieldTable<E> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `processor` for `name`. A later registration for the same
    /// normalized name replaces the earlier one.
    pub fn register(&mut self, name: &str, processor: FieldProcessor<E>) -> &mut Self {
        self.processors.insert(normalize_field_name(name), processor);
        self
    }

    /// Looks up the processor registered for `name`.
    pub fn get(&self, name: &str) -> Option<FieldProcessor<E>> {
        self.processors.get(&normalize_field_name(name)).copied()
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Returns true if no fields are registered.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

/// Field processor tables for every entity type.
pub struct FieldProcessorRegistry {
    tickets: FieldTable<Ticket>,
    users: FieldTable<User>,
    history: FieldTable<HistoryEntry>,
}

impl FieldProcessorRegistry {
    /// Returns the shared registry, building it on first call.
    pub fn global() -> &'static FieldProcessorRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let registry = Self {
            tickets: Ticket::field_table(),
            users: User::field_table(),
            history: HistoryEntry::field_table(),
        };

        tracing::debug!(
            tickets = registry.tickets.len(),
            users = registry.users.len(),
            history = registry.history.len(),
            "Field processor registry initialized"
        );

        registry
    }

    /// Returns the table for entity type `E`.
    pub fn table<E: Entity>(&self) -> &FieldTable<E> {
        E::select_table(self)
    }

    /// Resolves the processor for `name` on entity type `E`.
    ///
    /// Never fails: unknown names resolve to [`FieldProcessor::PassThrough`].
    pub fn resolve<E: Entity>(&self, name: &str) -> FieldProcessor<E> {
        let processor = self.table::<E>().get(name);
        if processor.is_none() {
            tracing::trace!(entity = %E::KIND, field = name, "No processor registered, passing through");
        }
        processor.unwrap_or(FieldProcessor::PassThrough)
    }

    /// Resolves using an entity instance to pick the table.
    pub fn processor_for<E: Entity>(&self, _entity: &E, name: &str) -> FieldProcessor<E> {
        self.resolve::<E>(name)
    }

    pub(crate) fn tickets(&self) -> &FieldTable<Ticket> {
        &self.tickets
    }

    pub(crate) fn users(&self) -> &FieldTable<User> {
        &self.users
    }

    pub(crate) fn history(&self) -> &FieldTable<HistoryEntry> {
        &self.history
    }

    /// Number of registered fields for the given entity kind.
    pub fn field_count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Ticket => self.tickets.len(),
            EntityKind::User => self.users.len(),
            EntityKind::History => self.history.len(),
        }
    }
}
