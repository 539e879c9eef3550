//! Workspace store abstraction.
//!
//! The reconciliation engine only ever talks to the remote workspace through
//! these primitives. None of them is conditional: there is no create-if-absent
//! or compare-and-swap, so every get-or-create built on top of them is a
//! check-then-act sequence that concurrent runs can interleave.

use crate::error::StoreResult;
use async_trait::async_trait;
use atlas_model::{
    CollectionSchema, NamedResource, Properties, PropertyType, Record, ResourceId, ResourceKind,
};
use serde::{Deserialize, Serialize};

/// Where a new resource is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parent {
    /// The workspace root.
    Workspace,
    /// A child of an existing page.
    Page(ResourceId),
}

impl Parent {
    /// Parent of `page`, or the workspace root when absent.
    pub fn from_page(page: Option<&ResourceId>) -> Self {
        page.map_or(Parent::Workspace, |id| Parent::Page(id.clone()))
    }

    pub fn page_id(&self) -> Option<&ResourceId> {
        match self {
            Parent::Workspace => None,
            Parent::Page(id) => Some(id),
        }
    }
}

/// One entry of an approximate search result.
///
/// `title` is `None` when the store returned no readable title; such
/// candidates never match a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub title: Option<String>,
    pub parent_id: Option<ResourceId>,
}

impl Candidate {
    /// Converts to a resolved resource, if the candidate has a title.
    pub fn into_resource(self) -> Option<NamedResource> {
        let title = self.title?;
        Some(NamedResource {
            name: title,
            kind: self.kind,
            id: self.id,
            parent_id: self.parent_id,
        })
    }
}

/// Exact-equality filter on one record property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilter {
    pub property: String,
    pub property_type: PropertyType,
    pub equals: String,
}

impl KeyFilter {
    /// Filter on the collection's title property.
    pub fn title(property: &str, equals: &str) -> Self {
        Self {
            property: property.to_string(),
            property_type: PropertyType::Title,
            equals: equals.to_string(),
        }
    }

    /// Returns true if `record` satisfies the filter.
    pub fn matches(&self, record: &Record) -> bool {
        record.text(&self.property) == Some(self.equals.as_str())
    }
}

/// A remote hierarchical workspace reachable through search, create, query
/// and update primitives.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Returns the name of the store provider.
    fn provider_name(&self) -> &'static str;

    /// Approximate full-text search restricted to one resource kind.
    ///
    /// Results are unordered and may contain near-matches.
    async fn search(&self, query: &str, kind: ResourceKind) -> StoreResult<Vec<Candidate>>;

    /// Creates a page or collection. `schema` is required for collections
    /// and ignored for pages.
    async fn create_resource(
        &self,
        parent: &Parent,
        kind: ResourceKind,
        title: &str,
        schema: Option<&CollectionSchema>,
    ) -> StoreResult<NamedResource>;

    /// Returns every record of a collection matching `filter`.
    async fn query_records(
        &self,
        collection_id: &ResourceId,
        filter: &KeyFilter,
    ) -> StoreResult<Vec<Record>>;

    /// Inserts a record into a collection.
    async fn create_record(
        &self,
        collection_id: &ResourceId,
        fields: &Properties,
    ) -> StoreResult<Record>;

    /// Overwrites the named properties of a record; other properties are untouched.
    async fn update_record(&self, record_id: &ResourceId, fields: &Properties)
        -> StoreResult<Record>;
}
