//! Get-or-create for pages and collections.
//!
//! `ensure` is search-then-create. Two runs that both miss the search will
//! both create, leaving two resources with the same title; the store offers
//! no create-if-absent to close that window. Later runs then see an
//! ambiguous match, which the locator reports.

use crate::error::ReconcileResult;
use crate::locator::Locator;
use crate::report::{Ambiguity, DuplicatePolicy, EnsureOutcome};
use atlas_model::{normalize_title, CollectionSchema, NamedResource, ResourceId, ResourceKind};
use atlas_store::{Parent, WorkspaceStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// The resource to create when none exists.
#[derive(Debug, Clone, Copy)]
pub enum ResourceShape<'a> {
    Page,
    Collection(&'a CollectionSchema),
}

impl ResourceShape<'_> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceShape::Page => ResourceKind::Page,
            ResourceShape::Collection(_) => ResourceKind::Collection,
        }
    }

    fn schema(&self) -> Option<&CollectionSchema> {
        match self {
            ResourceShape::Page => None,
            ResourceShape::Collection(schema) => Some(*schema),
        }
    }
}

/// Result of an ensure call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ensured {
    pub resource: NamedResource,
    pub outcome: EnsureOutcome,
    pub ambiguity: Option<Ambiguity>,
}

/// Ensures named resources exist, at most one create per call.
///
/// Resolutions are cached by kind and normalized name for the lifetime of
/// the ensurer, so one ensurer should be used per run.
pub struct Ensurer {
    store: Arc<dyn WorkspaceStore>,
    locator: Locator,
    resolved: RwLock<HashMap<(ResourceKind, String), NamedResource>>,
}

impl Ensurer {
    pub fn new(store: Arc<dyn WorkspaceStore>, policy: DuplicatePolicy) -> Self {
        Self {
            locator: Locator::new(store.clone(), policy),
            store,
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the existing resource titled `name`, or creates it under
    /// `parent` (workspace root when `None`).
    ///
    /// An existing resource is returned as is: its properties or schema are
    /// never brought in line with `shape`.
    pub async fn ensure(
        &self,
        name: &str,
        shape: ResourceShape<'_>,
        parent: Option<&ResourceId>,
    ) -> ReconcileResult<Ensured> {
        let kind = shape.kind();
        let key = (kind, normalize_title(name));

        if let Some(resource) = self.resolved.read().await.get(&key) {
            debug!("Ensure {} {:?}: cached ({})", kind, name, resource.id);
            return Ok(Ensured {
                resource: resource.clone(),
                outcome: EnsureOutcome::Cached,
                ambiguity: None,
            });
        }

        if let Some(located) = self.locator.locate_near(name, kind, parent).await? {
            debug!("Ensure {} {:?}: found {}", kind, name, located.resource.id);
            self.remember(key, &located.resource).await;
            return Ok(Ensured {
                resource: located.resource,
                outcome: EnsureOutcome::Found,
                ambiguity: located.ambiguity,
            });
        }

        if let Some(schema) = shape.schema() {
            schema.validate()?;
        }

        let created = self
            .store
            .create_resource(&Parent::from_page(parent), kind, name.trim(), shape.schema())
            .await?;
        info!("Created {} {:?} ({})", kind, name, created.id);
        self.remember(key, &created).await;

        Ok(Ensured {
            resource: created,
            outcome: EnsureOutcome::Created,
            ambiguity: None,
        })
    }

    /// Shorthand for ensuring a page.
    pub async fn ensure_page(&self, name: &str, parent: Option<&ResourceId>) -> ReconcileResult<Ensured> {
        self.ensure(name, ResourceShape::Page, parent).await
    }

    /// Shorthand for ensuring a collection under `parent`.
    pub async fn ensure_collection(
        &self,
        name: &str,
        schema: &CollectionSchema,
        parent: &ResourceId,
    ) -> ReconcileResult<Ensured> {
        self.ensure(name, ResourceShape::Collection(schema), Some(parent))
            .await
    }

    async fn remember(&self, key: (ResourceKind, String), resource: &NamedResource) {
        self.resolved.write().await.insert(key, resource.clone());
    }
}
