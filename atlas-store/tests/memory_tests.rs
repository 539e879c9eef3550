use atlas_model::atlas;
use atlas_model::{Properties, PropertyValue, ResourceId, ResourceKind};
use atlas_store::{
    Candidate, KeyFilter, MemoryStore, Operation, Parent, StoreError, WorkspaceStore,
};
use pretty_assertions::assert_eq;

fn version(v: &str) -> Properties {
    Properties::new().with("Version", PropertyValue::Title(v.into()))
}

async fn store_with_change_log() -> (MemoryStore, ResourceId) {
    let store = MemoryStore::new();
    let page = store.seed_page("HOC Access").await;
    let db = store
        .create_resource(
            &Parent::Page(page),
            ResourceKind::Collection,
            "Change Log",
            Some(&atlas::change_log_schema()),
        )
        .await
        .unwrap();
    (store, db.id)
}

#[test]
fn provider_name() {
    assert_eq!(MemoryStore::new().provider_name(), "Memory");
}

#[tokio::test]
async fn search_is_approximate_and_kind_scoped() {
    let store = MemoryStore::new();
    store.seed_page("HOC Access").await;
    store.seed_page("HOC Access Archive").await;
    store.seed_page("RUBY NOTION").await;

    let found = store.search("hoc access", ResourceKind::Page).await.unwrap();
    let titles: Vec<_> = found.iter().filter_map(|c| c.title.as_deref()).collect();
    assert_eq!(titles, vec!["HOC Access", "HOC Access Archive"]);

    let none = store.search("HOC Access", ResourceKind::Collection).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn search_returns_untitled_candidates() {
    let store = MemoryStore::new();
    store
        .seed_resource(
            Candidate {
                id: ResourceId::new("untitled"),
                kind: ResourceKind::Page,
                title: None,
                parent_id: None,
            },
            None,
        )
        .await;

    let found = store.search("anything", ResourceKind::Page).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].title.is_none());
}

#[tokio::test]
async fn create_resource_counts_by_kind_and_keeps_schema() {
    let (store, db) = store_with_change_log().await;

    let counts = store.counts().await;
    assert_eq!(counts.pages_created, 0);
    assert_eq!(counts.collections_created, 1);
    assert_eq!(store.schema_of(&db).await, Some(atlas::change_log_schema()));
}

#[tokio::test]
async fn create_under_unknown_parent_fails() {
    let store = MemoryStore::new();
    let err = store
        .create_resource(
            &Parent::Page(ResourceId::new("nope")),
            ResourceKind::Page,
            "Child",
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn collection_requires_schema_and_page_parent() {
    let store = MemoryStore::new();
    let err = store
        .create_resource(&Parent::Workspace, ResourceKind::Collection, "X", Some(&atlas::memory_schema()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRequest(_)));

    let page = store.seed_page("P").await;
    let err = store
        .create_resource(&Parent::Page(page), ResourceKind::Collection, "X", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidRequest(_)));
    assert_eq!(store.counts().await.mutations(), 0);
}

#[tokio::test]
async fn query_matches_exact_key_only() {
    let (store, db) = store_with_change_log().await;
    store.create_record(&db, &version("3.1")).await.unwrap();
    store.create_record(&db, &version("3.10")).await.unwrap();

    let rows = store.query_records(&db, &KeyFilter::title("Version", "3.1")).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("Version"), Some("3.1"));
}

#[tokio::test]
async fn update_is_partial() {
    let (store, db) = store_with_change_log().await;
    let created = store
        .create_record(
            &db,
            &version("3.1")
                .with("Author", PropertyValue::Text("A".into()))
                .with("Change Summary", PropertyValue::Text("S".into())),
        )
        .await
        .unwrap();

    let updated = store
        .update_record(
            &created.id,
            &Properties::new().with("Change Summary", PropertyValue::Text("S2".into())),
        )
        .await
        .unwrap();

    assert_eq!(updated.text("Change Summary"), Some("S2"));
    assert_eq!(updated.text("Author"), Some("A"));
    assert_eq!(store.records(&db).await, vec![updated]);
}

#[tokio::test]
async fn unknown_property_is_a_validation_error() {
    let (store, db) = store_with_change_log().await;
    let err = store
        .create_record(&db, &Properties::new().with("Nope", PropertyValue::Text("x".into())))
        .await
        .unwrap_err();
    match err {
        StoreError::Api { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, "validation_error");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn nothing_enforces_unique_keys() {
    let (store, db) = store_with_change_log().await;
    store.create_record(&db, &version("3.1")).await.unwrap();
    store.create_record(&db, &version("3.1")).await.unwrap();

    let rows = store.query_records(&db, &KeyFilter::title("Version", "3.1")).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn injected_failure_fires_once() {
    let store = MemoryStore::new();
    store.fail_next(Operation::Search, "boom").await;

    let err = store.search("x", ResourceKind::Page).await.unwrap_err();
    assert!(matches!(err, StoreError::Injected(ref m) if m == "boom"));
    assert!(store.search("x", ResourceKind::Page).await.is_ok());
    assert_eq!(store.counts().await.searches, 1);
}

#[tokio::test]
async fn update_of_unknown_record_is_not_found() {
    let store = MemoryStore::new();
    let err = store
        .update_record(&ResourceId::new("missing"), &Properties::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
