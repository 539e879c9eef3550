use atlas_model::atlas::{self, memory};
use atlas_model::{AuditEntry, PropertyValue, ResourceId, ResourceKind, TIMESTAMP_FORMAT};
use atlas_reconcile::{AuditLogger, ReconcileError};
use atlas_store::{MemoryStore, Operation, Parent, WorkspaceStore};
use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn memory_store() -> (MemoryStore, ResourceId) {
    let store = MemoryStore::new();
    let page = store.seed_page("ATLAS NOTION").await;
    let db = store
        .create_resource(
            &Parent::Page(page),
            ResourceKind::Collection,
            "Atlas Persistent Memory",
            Some(&atlas::memory_schema()),
        )
        .await
        .unwrap();
    (store, db.id)
}

#[tokio::test]
async fn append_writes_all_fields() {
    let (store, db) = memory_store().await;
    let record = AuditLogger::new(Arc::new(store.clone()))
        .append(&db, "Atlas", "Bootstrap Completed", "details", &["bootstrap", "atlas"])
        .await
        .unwrap();

    assert_eq!(record.text(memory::ACTOR), Some("Atlas"));
    assert_eq!(record.text(memory::EVENT), Some("Bootstrap Completed"));
    assert_eq!(record.text(memory::DETAILS), Some("details"));
    assert_eq!(
        record.properties.get(memory::TAGS),
        Some(&PropertyValue::MultiSelect(vec![
            "bootstrap".into(),
            "atlas".into()
        ]))
    );

    let timestamp = record.text(memory::TIMESTAMP).unwrap();
    assert!(NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).is_ok());
    assert_eq!(timestamp.len(), "2025-01-15T10:30:00".len());
}

#[tokio::test]
async fn identical_appends_are_not_deduplicated() {
    let (store, db) = memory_store().await;
    let logger = AuditLogger::new(Arc::new(store.clone()));
    let first = logger.append(&db, "Atlas", "Ping", "same", &["t"]).await.unwrap();
    let second = logger.append(&db, "Atlas", "Ping", "same", &["t"]).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(store.records(&db).await.len(), 2);
    assert_eq!(store.counts().await.queries, 0);
}

#[tokio::test]
async fn append_entry_writes_entry_verbatim() {
    let (store, db) = memory_store().await;
    let entry = AuditEntry {
        timestamp: "2025-01-15T10:30:00".into(),
        actor: "Owner".into(),
        event: "Manual Note".into(),
        details: String::new(),
        tags: Vec::new(),
    };

    let record = AuditLogger::new(Arc::new(store.clone()))
        .append_entry(&db, &entry)
        .await
        .unwrap();
    assert_eq!(record.properties, entry.to_properties());
}

#[tokio::test]
async fn append_failure_propagates() {
    let (store, db) = memory_store().await;
    store.fail_next(Operation::CreateRecord, "rate limited").await;

    let tags: [&str; 0] = [];
    let result = AuditLogger::new(Arc::new(store.clone()))
        .append(&db, "Atlas", "Ping", "", &tags)
        .await;
    assert!(matches!(result, Err(ReconcileError::Store(_))));
    assert!(store.records(&db).await.is_empty());
}
