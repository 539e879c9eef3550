//! Natural-key upsert of collection records.
//!
//! Query-then-write, like ensure: two upserts of an unseen key that both
//! query before either inserts produce two records. Nothing here prevents
//! that; subsequent upserts update the first record the store returns.

use crate::error::{ReconcileError, ReconcileResult};
use crate::report::{Ambiguity, DuplicatePolicy, MatchScope, UpsertOutcome};
use atlas_model::{Properties, PropertyValue, Record, ResourceId};
use atlas_store::{KeyFilter, WorkspaceStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The identity of a record within one collection: a title property and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    pub property: String,
    pub value: String,
}

impl NaturalKey {
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub record: Record,
    pub outcome: UpsertOutcome,
    pub ambiguity: Option<Ambiguity>,
}

/// Inserts or updates records identified by a natural key.
pub struct RecordUpserter {
    store: Arc<dyn WorkspaceStore>,
    policy: DuplicatePolicy,
}

impl RecordUpserter {
    pub fn new(store: Arc<dyn WorkspaceStore>, policy: DuplicatePolicy) -> Self {
        Self { store, policy }
    }

    /// Updates the record keyed by `key` with `fields`, or inserts one.
    ///
    /// Properties absent from `fields` keep their stored values on update.
    /// The key property is always written as the trimmed key value, so a
    /// conflicting value in `fields` is replaced.
    pub async fn upsert(
        &self,
        collection_id: &ResourceId,
        key: &NaturalKey,
        fields: &Properties,
    ) -> ReconcileResult<Upserted> {
        let value = key.value.trim();
        if value.is_empty() {
            return Err(atlas_model::ModelError::EmptyKey(key.property.clone()).into());
        }

        let mut fields = fields.clone();
        fields.set(&key.property, PropertyValue::Title(value.to_string()));

        let filter = KeyFilter::title(&key.property, value);
        let existing = self.store.query_records(collection_id, &filter).await?;
        debug!(
            "Upsert {} = {:?} in {}: {} existing",
            key.property,
            value,
            collection_id,
            existing.len()
        );

        let Some(first) = existing.first() else {
            let record = self.store.create_record(collection_id, &fields).await?;
            info!("Inserted record {} ({} = {:?})", record.id, key.property, value);
            return Ok(Upserted {
                record,
                outcome: UpsertOutcome::Inserted,
                ambiguity: None,
            });
        };

        let ambiguity = (existing.len() > 1).then(|| Ambiguity {
            scope: MatchScope::Record {
                collection_id: collection_id.clone(),
                property: key.property.clone(),
            },
            name: value.to_string(),
            chosen: first.id.clone(),
            candidates: existing.iter().map(|r| r.id.clone()).collect(),
        });
        if let Some(ambiguity) = &ambiguity {
            if self.policy == DuplicatePolicy::Strict {
                return Err(ReconcileError::AmbiguousMatch(ambiguity.clone()));
            }
            warn!("Ambiguous match: {}; updating {}", ambiguity, ambiguity.chosen);
        }

        let record = self.store.update_record(&first.id, &fields).await?;
        info!("Updated record {} ({} = {:?})", record.id, key.property, value);
        Ok(Upserted {
            record,
            outcome: UpsertOutcome::Updated,
            ambiguity,
        })
    }
}
