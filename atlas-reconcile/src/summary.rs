//! The terminal state of a bootstrap run.

use crate::ensurer::Ensured;
use crate::report::{Ambiguity, EnsureOutcome, UpsertOutcome};
use crate::upserter::Upserted;
use atlas_model::{titles_match, ResourceId, ResourceKind};
use serde::Serialize;

/// A page or collection the run resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
    pub name: String,
    pub kind: ResourceKind,
    pub id: ResourceId,
    pub outcome: EnsureOutcome,
}

impl From<&Ensured> for ResolvedResource {
    fn from(ensured: &Ensured) -> Self {
        Self {
            name: ensured.resource.name.clone(),
            kind: ensured.resource.kind,
            id: ensured.resource.id.clone(),
            outcome: ensured.outcome,
        }
    }
}

/// The change log record the run inserted or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRecord {
    pub key: String,
    pub id: ResourceId,
    pub outcome: UpsertOutcome,
}

impl ResolvedRecord {
    pub(crate) fn from_upsert(key: &str, upserted: &Upserted) -> Self {
        Self {
            key: key.to_string(),
            id: upserted.record.id.clone(),
            outcome: upserted.outcome,
        }
    }
}

/// Every identifier a completed run resolved, plus any ambiguous matches
/// it resolved by picking the first result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapSummary {
    /// Top-level pages in layout order.
    pub pages: Vec<ResolvedResource>,
    pub change_log: ResolvedResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_entry: Option<ResolvedRecord>,
    pub memory: ResolvedResource,
    pub audit_record_id: ResourceId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguities: Vec<Ambiguity>,
    /// Name of the store the run talked to.
    pub provider: String,
}

impl BootstrapSummary {
    /// The resolved page titled `name`.
    pub fn page(&self, name: &str) -> Option<&ResolvedResource> {
        self.pages.iter().find(|p| titles_match(&p.name, name))
    }

    /// Pages and collections in the order they were ensured.
    pub fn resources(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.pages
            .iter()
            .chain([&self.change_log, &self.memory])
    }

    /// Number of resources of `kind` this run created.
    pub fn created(&self, kind: ResourceKind) -> usize {
        self.resources()
            .filter(|r| r.kind == kind && r.outcome == EnsureOutcome::Created)
            .count()
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguities.is_empty()
    }
}
