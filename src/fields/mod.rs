//! Field processing: typed conversion of raw record values onto entities.
//!
//! - [`processor`] - conversion strategies and their options
//! - [`registry`] - the static `(entity, field name)` lookup table
//! - [`populate`] - the driver that applies a whole record to an entity

mod populate;
mod processor;
mod registry;

pub use populate::*;
pub use processor::*;
pub use registry::*;
