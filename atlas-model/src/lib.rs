//! Workspace resource model for Atlas.
//!
//! Defines the store-agnostic types shared by the store bindings and the
//! reconciliation engine:
//! - [`ResourceId`] / [`ResourceKind`] — opaque remote ids and page/collection kinds
//! - [`NamedResource`] — a page or collection resolved by name
//! - [`CollectionSchema`] — ordered property layout supplied at collection creation
//! - [`Properties`] / [`Record`] — typed row values and rows
//! - [`ChangeEntry`] / [`AuditEntry`] — the two payloads the bootstrap writes
//!
//! The [`atlas`] module holds the fixed page names and schemas of the Atlas
//! workspace.

pub mod atlas;
mod entry;
mod ids;
mod record;
mod resource;
mod schema;

pub use entry::{AuditEntry, ChangeEntry, ChangeStatus, TIMESTAMP_FORMAT};
pub use ids::{ResourceId, ResourceKind};
pub use record::{Properties, PropertyValue, Record};
pub use resource::{normalize_title, titles_match, NamedResource};
pub use schema::{CollectionSchema, PropertySpec, PropertyType, SelectColor, SelectOption};

/// Errors raised while building or validating model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("unknown status: {0} (expected Proposed, Active or Archived)")]
    UnknownStatus(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("empty natural key: {0}")]
    EmptyKey(String),
}
