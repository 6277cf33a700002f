//! Entity population driver.
//!
//! [`EntityMapper`] walks a [`Record`], resolves a processor for every field
//! and applies it. A field that fails to convert is logged and collected as
//! a [`FieldError`]; the remaining fields of the record are still applied and
//! the failed attribute keeps whatever value it had before.

use crate::error::{FieldError, preview};
use crate::fields::{ConversionOptions, FieldProcessorRegistry};
use crate::models::{Entity, Record};

/// An entity plus the field errors hit while populating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Populated<T> {
    /// The (possibly partially) populated value.
    pub value: T,

    /// Conversion failures, in the order they occurred.
    pub errors: Vec<FieldError>,
}

impl<T> Populated<T> {
    /// Returns true if every field converted.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the value, or the errors if any field failed.
    pub fn into_result(self) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(self.errors)
        }
    }
}

/// Projects records onto entities using the field processor registry.
#[derive(Debug, Clone)]
pub struct EntityMapper {
    options: ConversionOptions,
}

impl Default for EntityMapper {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

impl EntityMapper {
    /// Creates a mapper with the given conversion options.
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Returns the conversion options.
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Builds a fresh entity from `record`.
    ///
    /// `record_index` is only used to attribute errors.
    pub fn populate<E: Entity>(&self, record: &Record, record_index: usize) -> Populated<E> {
        let mut entity = E::default();
        let errors = self.populate_into(&mut entity, record, record_index);
        Populated {
            value: entity,
            errors,
        }
    }

    /// Applies every field of `record` onto an existing entity.
    ///
    /// A field that fails to convert leaves its attribute untouched, so an
    /// entity populated earlier keeps its previous value rather than the
    /// default.
    pub fn populate_into<E: Entity>(
        &self,
        entity: &mut E,
        record: &Record,
        record_index: usize,
    ) -> Vec<FieldError> {
        let registry = FieldProcessorRegistry::global();
        let mut errors = Vec::new();

        for (field, raw) in record.iter() {
            let processor = registry.resolve::<E>(field);
            if let Err(error) = processor.process(entity, field, raw, &self.options) {
                tracing::warn!(
                    entity = %E::KIND,
                    record = record_index,
                    field = field,
                    value = %preview(raw),
                    "Field conversion failed, keeping previous value"
                );
                errors.push(FieldError {
                    record_index,
                    error,
                });
            }
        }

        errors
    }

    /// Builds one entity per record, in record order.
    pub fn populate_all<E: Entity>(&self, records: &[Record]) -> Populated<Vec<E>> {
        let mut value = Vec::with_capacity(records.len());
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let populated = self.populate::<E>(record, index);
            value.push(populated.value);
            errors.extend(populated.errors);
        }

        if !errors.is_empty() {
            tracing::debug!(
                entity = %E::KIND,
                records = records.len(),
                errors = errors.len(),
                "Populated entities with field errors"
            );
        }

        Populated { value, errors }
    }
}
