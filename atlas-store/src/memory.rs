//! In-memory workspace store.
//!
//! Behaves like the remote store where the engine can observe it: search is
//! approximate (substring, case-insensitive) and returns results in
//! insertion order, nothing enforces unique names or keys, and record
//! updates are partial. Every call is counted, and a single failure can be
//! injected per operation.

use crate::error::{StoreError, StoreResult};
use crate::store::{Candidate, KeyFilter, Parent, WorkspaceStore};
use async_trait::async_trait;
use atlas_model::{
    normalize_title, CollectionSchema, NamedResource, Properties, Record, ResourceId, ResourceKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A store primitive, for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    CreateResource,
    QueryRecords,
    CreateRecord,
    UpdateRecord,
}

/// Number of calls per primitive since the store was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    pub searches: usize,
    pub pages_created: usize,
    pub collections_created: usize,
    pub queries: usize,
    pub records_created: usize,
    pub records_updated: usize,
}

impl OperationCounts {
    /// Total number of writes.
    pub fn mutations(&self) -> usize {
        self.pages_created + self.collections_created + self.records_created + self.records_updated
    }
}

#[derive(Debug, Clone)]
struct StoredResource {
    candidate: Candidate,
    schema: Option<CollectionSchema>,
}

#[derive(Debug, Default)]
struct MemoryState {
    resources: Vec<StoredResource>,
    records: Vec<Record>,
    counts: OperationCounts,
    failures: HashMap<Operation, String>,
}

impl MemoryState {
    fn take_failure(&mut self, op: Operation) -> StoreResult<()> {
        match self.failures.remove(&op) {
            Some(message) => Err(StoreError::Injected(message)),
            None => Ok(()),
        }
    }

    fn resource(&self, id: &ResourceId) -> Option<&StoredResource> {
        self.resources.iter().find(|r| &r.candidate.id == id)
    }
}

/// In-memory implementation of [`WorkspaceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(prefix: &str) -> ResourceId {
        ResourceId::new(format!("{prefix}-{}", Uuid::new_v4().simple()))
    }

    /// Adds a resource directly, bypassing counters. Duplicate names and
    /// missing titles are allowed.
    pub async fn seed_resource(&self, candidate: Candidate, schema: Option<CollectionSchema>) {
        self.state
            .write()
            .await
            .resources
            .push(StoredResource { candidate, schema });
    }

    /// Adds a titled page at the workspace root and returns its id.
    pub async fn seed_page(&self, title: &str) -> ResourceId {
        let id = Self::mint_id("page");
        self.seed_resource(
            Candidate {
                id: id.clone(),
                kind: ResourceKind::Page,
                title: Some(title.to_string()),
                parent_id: None,
            },
            None,
        )
        .await;
        id
    }

    /// Adds a record directly, bypassing counters and key checks.
    pub async fn seed_record(&self, collection_id: &ResourceId, properties: Properties) -> Record {
        let record = Record {
            id: Self::mint_id("rec"),
            collection_id: collection_id.clone(),
            properties,
        };
        self.state.write().await.records.push(record.clone());
        record
    }

    /// Makes the next call of `op` fail with an injected error.
    pub async fn fail_next(&self, op: Operation, message: &str) {
        self.state
            .write()
            .await
            .failures
            .insert(op, message.to_string());
    }

    pub async fn counts(&self) -> OperationCounts {
        self.state.read().await.counts
    }

    /// All resources of `kind`, in creation order.
    pub async fn resources(&self, kind: ResourceKind) -> Vec<Candidate> {
        self.state
            .read()
            .await
            .resources
            .iter()
            .filter(|r| r.candidate.kind == kind)
            .map(|r| r.candidate.clone())
            .collect()
    }

    /// The schema a collection was created with.
    pub async fn schema_of(&self, collection_id: &ResourceId) -> Option<CollectionSchema> {
        self.state
            .read()
            .await
            .resource(collection_id)
            .and_then(|r| r.schema.clone())
    }

    /// All records of a collection, in creation order.
    pub async fn records(&self, collection_id: &ResourceId) -> Vec<Record> {
        self.state
            .read()
            .await
            .records
            .iter()
            .filter(|r| &r.collection_id == collection_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    fn provider_name(&self) -> &'static str {
        "Memory"
    }

    async fn search(&self, query: &str, kind: ResourceKind) -> StoreResult<Vec<Candidate>> {
        let mut state = self.state.write().await;
        state.take_failure(Operation::Search)?;
        state.counts.searches += 1;

        let needle = normalize_title(query);
        Ok(state
            .resources
            .iter()
            .filter(|r| r.candidate.kind == kind)
            .filter(|r| match &r.candidate.title {
                Some(title) => normalize_title(title).contains(&needle),
                None => true,
            })
            .map(|r| r.candidate.clone())
            .collect())
    }

    async fn create_resource(
        &self,
        parent: &Parent,
        kind: ResourceKind,
        title: &str,
        schema: Option<&CollectionSchema>,
    ) -> StoreResult<NamedResource> {
        let mut state = self.state.write().await;
        state.take_failure(Operation::CreateResource)?;

        if let Parent::Page(page_id) = parent {
            match state.resource(page_id) {
                Some(r) if r.candidate.kind == ResourceKind::Page => {}
                _ => return Err(StoreError::NotFound(format!("parent page {page_id}"))),
            }
        }

        let (id, schema) = match kind {
            ResourceKind::Page => {
                state.counts.pages_created += 1;
                (Self::mint_id("page"), None)
            }
            ResourceKind::Collection => {
                let schema = schema.ok_or_else(|| {
                    StoreError::InvalidRequest(format!("collection {title:?} needs a schema"))
                })?;
                if parent.page_id().is_none() {
                    return Err(StoreError::InvalidRequest(format!(
                        "collection {title:?} must be created under a page"
                    )));
                }
                state.counts.collections_created += 1;
                (Self::mint_id("db"), Some(schema.clone()))
            }
        };

        let candidate = Candidate {
            id: id.clone(),
            kind,
            title: Some(title.to_string()),
            parent_id: parent.page_id().cloned(),
        };
        state.resources.push(StoredResource {
            candidate: candidate.clone(),
            schema,
        });
        debug!("Memory store created {} {:?} ({})", kind, title, id);

        Ok(NamedResource {
            name: title.to_string(),
            kind,
            id,
            parent_id: candidate.parent_id,
        })
    }

    async fn query_records(
        &self,
        collection_id: &ResourceId,
        filter: &KeyFilter,
    ) -> StoreResult<Vec<Record>> {
        let mut state = self.state.write().await;
        state.take_failure(Operation::QueryRecords)?;
        state.counts.queries += 1;

        if state.resource(collection_id).is_none() {
            return Err(StoreError::NotFound(format!("collection {collection_id}")));
        }

        Ok(state
            .records
            .iter()
            .filter(|r| &r.collection_id == collection_id && filter.matches(r))
            .cloned()
            .collect())
    }

    async fn create_record(
        &self,
        collection_id: &ResourceId,
        fields: &Properties,
    ) -> StoreResult<Record> {
        let mut state = self.state.write().await;
        state.take_failure(Operation::CreateRecord)?;

        let schema = match state.resource(collection_id) {
            Some(r) if r.candidate.kind == ResourceKind::Collection => r.schema.clone(),
            _ => return Err(StoreError::NotFound(format!("collection {collection_id}"))),
        };
        if let Some(schema) = &schema {
            reject_unknown_properties(schema, fields)?;
        }

        state.counts.records_created += 1;
        let record = Record {
            id: Self::mint_id("rec"),
            collection_id: collection_id.clone(),
            properties: fields.clone(),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        record_id: &ResourceId,
        fields: &Properties,
    ) -> StoreResult<Record> {
        let mut state = self.state.write().await;
        state.take_failure(Operation::UpdateRecord)?;

        let collection_id = state
            .records
            .iter()
            .find(|r| &r.id == record_id)
            .map(|r| r.collection_id.clone())
            .ok_or_else(|| StoreError::NotFound(format!("record {record_id}")))?;
        if let Some(schema) = state.resource(&collection_id).and_then(|r| r.schema.clone()) {
            reject_unknown_properties(&schema, fields)?;
        }

        state.counts.records_updated += 1;
        let record = state
            .records
            .iter_mut()
            .find(|r| &r.id == record_id)
            .ok_or_else(|| StoreError::NotFound(format!("record {record_id}")))?;
        record.properties.merge(fields);
        Ok(record.clone())
    }
}

fn reject_unknown_properties(schema: &CollectionSchema, fields: &Properties) -> StoreResult<()> {
    for (name, _) in fields.iter() {
        if schema.get(name).is_none() {
            return Err(StoreError::Api {
                status: 400,
                code: "validation_error".to_string(),
                message: format!("{name} is not a property that exists"),
            });
        }
    }
    Ok(())
}
