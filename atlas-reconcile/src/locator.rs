//! Resource lookup by name over approximate search.

use crate::error::{ReconcileError, ReconcileResult};
use crate::report::{Ambiguity, DuplicatePolicy, MatchScope};
use atlas_model::{titles_match, NamedResource, ResourceId, ResourceKind};
use atlas_store::{Candidate, WorkspaceStore};
use std::sync::Arc;
use tracing::{debug, warn};

/// A resource found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub resource: NamedResource,
    /// Set when more than one exact match was seen.
    pub ambiguity: Option<Ambiguity>,
}

/// Keeps the candidates whose title equals `name` (case-insensitive,
/// trimmed), in result order. Untitled candidates never match.
pub fn exact_matches(candidates: Vec<Candidate>, name: &str) -> Vec<NamedResource> {
    candidates
        .into_iter()
        .filter(|c| c.title.as_deref().is_some_and(|t| titles_match(t, name)))
        .filter_map(Candidate::into_resource)
        .collect()
}

/// Finds existing pages and collections by title.
pub struct Locator {
    store: Arc<dyn WorkspaceStore>,
    policy: DuplicatePolicy,
}

impl Locator {
    pub fn new(store: Arc<dyn WorkspaceStore>, policy: DuplicatePolicy) -> Self {
        Self { store, policy }
    }

    /// Finds the resource of `kind` titled `name`. Issues one search, never writes.
    pub async fn locate(&self, name: &str, kind: ResourceKind) -> ReconcileResult<Option<Located>> {
        self.locate_near(name, kind, None).await
    }

    /// Like [`Locator::locate`], but when several exact matches exist one
    /// whose parent is `preferred_parent` is chosen first.
    pub async fn locate_near(
        &self,
        name: &str,
        kind: ResourceKind,
        preferred_parent: Option<&ResourceId>,
    ) -> ReconcileResult<Option<Located>> {
        if name.trim().is_empty() {
            return Err(ReconcileError::Layout("resource name is empty".to_string()));
        }

        let candidates = self.store.search(name.trim(), kind).await?;
        let seen = candidates.len();
        let mut matches = exact_matches(candidates, name);
        debug!(
            "Locate {} {:?}: {} candidates, {} exact",
            kind,
            name,
            seen,
            matches.len()
        );

        if matches.is_empty() {
            return Ok(None);
        }

        let chosen_index = preferred_parent
            .and_then(|parent| {
                matches
                    .iter()
                    .position(|m| m.parent_id.as_ref() == Some(parent))
            })
            .unwrap_or(0);

        let ambiguity = (matches.len() > 1).then(|| Ambiguity {
            scope: MatchScope::Resource { kind },
            name: name.to_string(),
            chosen: matches[chosen_index].id.clone(),
            candidates: matches.iter().map(|m| m.id.clone()).collect(),
        });

        if let Some(ambiguity) = &ambiguity {
            if self.policy == DuplicatePolicy::Strict {
                return Err(ReconcileError::AmbiguousMatch(ambiguity.clone()));
            }
            warn!("Ambiguous match: {}; using {}", ambiguity, ambiguity.chosen);
        }

        Ok(Some(Located {
            resource: matches.swap_remove(chosen_index),
            ambiguity,
        }))
    }
}
