use atlas_model::{ResourceId, ResourceKind};
use atlas_reconcile::{exact_matches, DuplicatePolicy, Locator, MatchScope, ReconcileError};
use atlas_store::{Candidate, MemoryStore, WorkspaceStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn candidate(id: &str, title: Option<&str>) -> Candidate {
    Candidate {
        id: ResourceId::new(id),
        kind: ResourceKind::Page,
        title: title.map(str::to_string),
        parent_id: None,
    }
}

fn locator(store: &MemoryStore, policy: DuplicatePolicy) -> Locator {
    Locator::new(Arc::new(store.clone()), policy)
}

// ── exact_matches ───────────────────────────────────────────────

#[test]
fn exact_matches_ignores_case_and_surrounding_space() {
    let matches = exact_matches(
        vec![
            candidate("a", Some("HOC Access Archive")),
            candidate("b", Some("  HOC Access ")),
            candidate("c", Some("hoc access")),
        ],
        "hoc access",
    );
    let ids: Vec<_> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn exact_matches_skips_untitled_candidates() {
    let matches = exact_matches(
        vec![candidate("untitled", None), candidate("named", Some("RUBY NOTION"))],
        "RUBY NOTION",
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id.as_str(), "named");
}

// ── Locator ─────────────────────────────────────────────────────

#[tokio::test]
async fn locate_is_case_insensitive() {
    let store = MemoryStore::new();
    let id = store.seed_page("HOC Access").await;

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("hoc access", ResourceKind::Page)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(located.resource.id, id);
    assert_eq!(located.resource.name, "HOC Access");
    assert!(located.ambiguity.is_none());
}

#[tokio::test]
async fn locate_ignores_near_matches() {
    let store = MemoryStore::new();
    store.seed_page("HOC Access Archive").await;

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("HOC Access", ResourceKind::Page)
        .await
        .unwrap();
    assert!(located.is_none());
}

#[tokio::test]
async fn locate_is_kind_scoped() {
    let store = MemoryStore::new();
    store.seed_page("Change Log").await;

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("Change Log", ResourceKind::Collection)
        .await
        .unwrap();
    assert!(located.is_none());
}

#[tokio::test]
async fn locate_skips_untitled_results() {
    let store = MemoryStore::new();
    store.seed_resource(candidate("untitled", None), None).await;
    let id = store.seed_page("ATLAS NOTION").await;

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("ATLAS NOTION", ResourceKind::Page)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(located.resource.id, id);
}

#[tokio::test]
async fn locate_never_writes() {
    let store = MemoryStore::new();
    locator(&store, DuplicatePolicy::FirstMatch)
        .locate("ATLAS NOTION", ResourceKind::Page)
        .await
        .unwrap();

    let counts = store.counts().await;
    assert_eq!(counts.searches, 1);
    assert_eq!(counts.mutations(), 0);
}

#[tokio::test]
async fn locate_rejects_empty_name() {
    let store = MemoryStore::new();
    let result = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("   ", ResourceKind::Page)
        .await;
    assert!(matches!(result, Err(ReconcileError::Layout(_))));
    assert_eq!(store.counts().await.searches, 0);
}

#[tokio::test]
async fn duplicate_match_picks_first_and_reports() {
    let store = MemoryStore::new();
    let first = store.seed_page("RUBY NOTION").await;
    let second = store.seed_page("ruby notion").await;

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("RUBY NOTION", ResourceKind::Page)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(located.resource.id, first);

    let ambiguity = located.ambiguity.unwrap();
    assert_eq!(
        ambiguity.scope,
        MatchScope::Resource {
            kind: ResourceKind::Page
        }
    );
    assert_eq!(ambiguity.chosen, first);
    assert_eq!(ambiguity.candidates, vec![first, second]);
}

#[tokio::test]
async fn duplicate_match_fails_under_strict_policy() {
    let store = MemoryStore::new();
    store.seed_page("RUBY NOTION").await;
    store.seed_page("RUBY NOTION").await;

    let result = locator(&store, DuplicatePolicy::Strict)
        .locate("RUBY NOTION", ResourceKind::Page)
        .await;
    match result {
        Err(ReconcileError::AmbiguousMatch(ambiguity)) => {
            assert_eq!(ambiguity.candidates.len(), 2);
            assert_eq!(ambiguity.name, "RUBY NOTION");
        }
        other => panic!("expected AmbiguousMatch, got {other:?}"),
    }
}

#[tokio::test]
async fn preferred_parent_breaks_ties() {
    let store = MemoryStore::new();
    let parent = store.seed_page("HOC Access").await;
    let elsewhere = store.seed_page("Archive").await;
    let mut seeded = Vec::new();
    for owner in [&elsewhere, &parent] {
        let id = ResourceId::new(format!("db-under-{owner}"));
        store
            .seed_resource(
                Candidate {
                    id: id.clone(),
                    kind: ResourceKind::Collection,
                    title: Some("Change Log".into()),
                    parent_id: Some(owner.clone()),
                },
                None,
            )
            .await;
        seeded.push(id);
    }

    let located = locator(&store, DuplicatePolicy::FirstMatch)
        .locate_near("Change Log", ResourceKind::Collection, Some(&parent))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(located.resource.id, seeded[1]);
    assert_eq!(located.ambiguity.unwrap().chosen, seeded[1]);
}

#[tokio::test]
async fn search_failure_propagates() {
    let store = MemoryStore::new();
    store
        .fail_next(atlas_store::Operation::Search, "search unavailable")
        .await;

    let result = locator(&store, DuplicatePolicy::FirstMatch)
        .locate("ATLAS NOTION", ResourceKind::Page)
        .await;
    assert!(matches!(result, Err(ReconcileError::Store(_))));
    assert_eq!(store.provider_name(), "Memory");
}
