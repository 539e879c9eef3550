//! Idempotent reconciliation of the Atlas workspace.
//!
//! Four components over a [`WorkspaceStore`](atlas_store::WorkspaceStore):
//! - [`Locator`] — finds pages and collections by exact (case-insensitive) title
//! - [`Ensurer`] — get-or-create for pages and collections
//! - [`RecordUpserter`] — insert-or-update of records by natural key
//! - [`AuditLogger`] — append-only event records
//!
//! [`Orchestrator`] runs them as the five-stage bootstrap and returns a
//! [`BootstrapSummary`]. Convergence comes from search-before-write, not
//! from locks: concurrent runs can still create duplicates, which later runs
//! report as [`Ambiguity`] (or reject under [`DuplicatePolicy::Strict`]).

pub mod audit;
pub mod ensurer;
pub mod error;
pub mod layout;
pub mod locator;
pub mod orchestrator;
pub mod report;
pub mod summary;
pub mod upserter;

pub use audit::AuditLogger;
pub use ensurer::{Ensured, Ensurer, ResourceShape};
pub use error::{ReconcileError, ReconcileResult};
pub use layout::{AuditLayout, CollectionLayout, WorkspaceLayout};
pub use locator::{exact_matches, Located, Locator};
pub use orchestrator::{audit_details, BootstrapRequest, Orchestrator, Stage};
pub use report::{
    Ambiguity, DuplicatePolicy, EnsureOutcome, MatchScope, ReconcileConfig, UpsertOutcome,
};
pub use summary::{BootstrapSummary, ResolvedRecord, ResolvedResource};
pub use upserter::{NaturalKey, RecordUpserter, Upserted};
