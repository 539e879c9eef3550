use atlas_model::atlas;
use atlas_model::{CollectionSchema, PropertySpec, ResourceId, ResourceKind};
use atlas_reconcile::{DuplicatePolicy, EnsureOutcome, Ensurer, ReconcileError};
use atlas_store::{Candidate, MemoryStore, Operation};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn ensurer(store: &MemoryStore) -> Ensurer {
    Ensurer::new(Arc::new(store.clone()), DuplicatePolicy::FirstMatch)
}

// ── Pages ───────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_page_creates_when_missing() {
    let store = MemoryStore::new();
    let ensured = ensurer(&store).ensure_page("ATLAS NOTION", None).await.unwrap();

    assert_eq!(ensured.outcome, EnsureOutcome::Created);
    assert_eq!(ensured.resource.name, "ATLAS NOTION");
    assert_eq!(ensured.resource.kind, ResourceKind::Page);
    assert!(ensured.resource.parent_id.is_none());
    assert_eq!(store.counts().await.pages_created, 1);
}

#[tokio::test]
async fn ensure_page_is_idempotent_across_ensurers() {
    let store = MemoryStore::new();
    let first = ensurer(&store).ensure_page("ATLAS NOTION", None).await.unwrap();
    let second = ensurer(&store).ensure_page("ATLAS NOTION", None).await.unwrap();

    assert_eq!(second.outcome, EnsureOutcome::Found);
    assert_eq!(first.resource.id, second.resource.id);
    assert_eq!(store.counts().await.pages_created, 1);
    assert_eq!(store.resources(ResourceKind::Page).await.len(), 1);
}

#[tokio::test]
async fn ensure_finds_existing_page_regardless_of_case() {
    let store = MemoryStore::new();
    let existing = store.seed_page("HOC Access").await;

    let ensured = ensurer(&store).ensure_page("hoc access", None).await.unwrap();
    assert_eq!(ensured.outcome, EnsureOutcome::Found);
    assert_eq!(ensured.resource.id, existing);
    assert_eq!(store.counts().await.pages_created, 0);
}

#[tokio::test]
async fn ensure_trims_the_created_title() {
    let store = MemoryStore::new();
    ensurer(&store).ensure_page("  RUBY NOTION ", None).await.unwrap();

    let pages = store.resources(ResourceKind::Page).await;
    assert_eq!(pages[0].title.as_deref(), Some("RUBY NOTION"));
}

#[tokio::test]
async fn repeated_ensure_in_one_run_is_cached() {
    let store = MemoryStore::new();
    let ensurer = ensurer(&store);
    let first = ensurer.ensure_page("ATLAS NOTION", None).await.unwrap();
    let again = ensurer.ensure_page("atlas notion", None).await.unwrap();

    assert_eq!(again.outcome, EnsureOutcome::Cached);
    assert_eq!(again.resource.id, first.resource.id);
    assert_eq!(store.counts().await.searches, 1);
}

#[tokio::test]
async fn cache_is_kind_scoped() {
    let store = MemoryStore::new();
    let ensurer = ensurer(&store);
    let page = ensurer.ensure_page("Change Log", None).await.unwrap();
    let collection = ensurer
        .ensure_collection("Change Log", &atlas::change_log_schema(), &page.resource.id)
        .await
        .unwrap();

    assert_eq!(collection.outcome, EnsureOutcome::Created);
    assert_ne!(collection.resource.id, page.resource.id);
}

// ── Collections ─────────────────────────────────────────────────

#[tokio::test]
async fn ensure_collection_creates_with_exact_schema() {
    let store = MemoryStore::new();
    let parent = store.seed_page("HOC Access").await;
    let schema = atlas::change_log_schema();

    let ensured = ensurer(&store)
        .ensure_collection("Change Log", &schema, &parent)
        .await
        .unwrap();

    assert_eq!(ensured.outcome, EnsureOutcome::Created);
    assert_eq!(ensured.resource.parent_id, Some(parent));
    assert_eq!(store.schema_of(&ensured.resource.id).await, Some(schema));
}

#[tokio::test]
async fn existing_collection_schema_is_not_reconciled() {
    let store = MemoryStore::new();
    let parent = store.seed_page("ATLAS NOTION").await;
    let old_schema = CollectionSchema::new().with(PropertySpec::title("Event"));
    let existing = ResourceId::new("db-old");
    store
        .seed_resource(
            Candidate {
                id: existing.clone(),
                kind: ResourceKind::Collection,
                title: Some("Atlas Persistent Memory".into()),
                parent_id: Some(parent.clone()),
            },
            Some(old_schema.clone()),
        )
        .await;

    let ensured = ensurer(&store)
        .ensure_collection("Atlas Persistent Memory", &atlas::memory_schema(), &parent)
        .await
        .unwrap();

    assert_eq!(ensured.outcome, EnsureOutcome::Found);
    assert_eq!(ensured.resource.id, existing);
    assert_eq!(store.schema_of(&existing).await, Some(old_schema));
    assert_eq!(store.counts().await.mutations(), 0);
}

#[tokio::test]
async fn invalid_schema_is_rejected_before_create() {
    let store = MemoryStore::new();
    let parent = store.seed_page("HOC Access").await;
    let schema = CollectionSchema::new().with(PropertySpec::text("Notes"));

    let result = ensurer(&store)
        .ensure_collection("Notes", &schema, &parent)
        .await;
    assert!(matches!(result, Err(ReconcileError::Invalid(_))));
    assert_eq!(store.counts().await.mutations(), 0);
}

#[tokio::test]
async fn create_failure_propagates_and_is_not_cached() {
    let store = MemoryStore::new();
    store.fail_next(Operation::CreateResource, "quota").await;
    let ensurer = ensurer(&store);

    let failed = ensurer.ensure_page("ATLAS NOTION", None).await;
    assert!(matches!(failed, Err(ReconcileError::Store(_))));

    let retried = ensurer.ensure_page("ATLAS NOTION", None).await.unwrap();
    assert_eq!(retried.outcome, EnsureOutcome::Created);
    assert_eq!(store.resources(ResourceKind::Page).await.len(), 1);
}

#[tokio::test]
async fn duplicates_are_reported_not_created() {
    let store = MemoryStore::new();
    let first = store.seed_page("ATLAS NOTION").await;
    store.seed_page("ATLAS NOTION").await;

    let ensured = ensurer(&store).ensure_page("ATLAS NOTION", None).await.unwrap();
    assert_eq!(ensured.resource.id, first);
    assert_eq!(ensured.ambiguity.unwrap().candidates.len(), 2);
    assert_eq!(store.counts().await.pages_created, 0);
}

#[tokio::test]
async fn concurrent_first_runs_can_duplicate() {
    // Both searches run before either create: nothing stops the second create.
    let store = MemoryStore::new();
    let a = ensurer(&store);
    let b = ensurer(&store);

    let (left, right) = tokio::join!(
        a.ensure_page("ATLAS NOTION", None),
        b.ensure_page("ATLAS NOTION", None)
    );
    let left = left.unwrap();
    let right = right.unwrap();

    let pages = store.resources(ResourceKind::Page).await;
    assert!(pages.len() == 1 || pages.len() == 2);
    if pages.len() == 2 {
        assert_ne!(left.resource.id, right.resource.id);
    }
}
