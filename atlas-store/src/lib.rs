//! Workspace store bindings for Atlas.
//!
//! [`WorkspaceStore`] is the only surface the reconciliation engine uses.
//! Two implementations are provided:
//! - [`NotionStore`] — the Notion REST API over `reqwest`
//! - [`MemoryStore`] — a process-local workspace with call counters and
//!   failure injection

pub mod error;
pub mod memory;
pub mod notion;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, Operation, OperationCounts};
pub use notion::{NotionConfig, NotionStore};
pub use store::{Candidate, KeyFilter, Parent, WorkspaceStore};
