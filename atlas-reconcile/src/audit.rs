//! Append-only event log.

use crate::error::ReconcileResult;
use atlas_model::{AuditEntry, Record, ResourceId};
use atlas_store::WorkspaceStore;
use std::sync::Arc;
use tracing::debug;

/// Writes audit entries. Every call inserts; nothing is deduplicated.
pub struct AuditLogger {
    store: Arc<dyn WorkspaceStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self { store }
    }

    /// Appends an entry stamped with the current local time.
    pub async fn append<S: AsRef<str>>(
        &self,
        collection_id: &ResourceId,
        actor: &str,
        event: &str,
        details: &str,
        tags: &[S],
    ) -> ReconcileResult<Record> {
        let entry = AuditEntry::now(actor, event, details, tags);
        self.append_entry(collection_id, &entry).await
    }

    /// Appends a prepared entry as is.
    pub async fn append_entry(
        &self,
        collection_id: &ResourceId,
        entry: &AuditEntry,
    ) -> ReconcileResult<Record> {
        let record = self
            .store
            .create_record(collection_id, &entry.to_properties())
            .await?;
        debug!("Appended {:?} at {} as {}", entry.event, entry.timestamp, record.id);
        Ok(record)
    }
}
