use atlas_model::{normalize_title, titles_match, NamedResource, ResourceId, ResourceKind};
use proptest::prelude::*;
use std::str::FromStr;

// ── Title matching ───────────────────────────────────────────────

#[test]
fn match_ignores_case() {
    assert!(titles_match("HOC Access", "hoc access"));
}

#[test]
fn match_ignores_surrounding_whitespace() {
    assert!(titles_match("  Change Log\n", "Change Log"));
}

#[test]
fn substring_is_not_a_match() {
    assert!(!titles_match("Change Log Archive", "Change Log"));
    assert!(!titles_match("Change", "Change Log"));
}

#[test]
fn interior_whitespace_must_match() {
    assert!(!titles_match("HOC  Access", "HOC Access"));
}

proptest! {
    #[test]
    fn match_is_symmetric(a in "[ a-zA-Z]{0,12}", b in "[ a-zA-Z]{0,12}") {
        prop_assert_eq!(titles_match(&a, &b), titles_match(&b, &a));
    }

    #[test]
    fn padded_case_variants_match(title in "[a-zA-Z][a-zA-Z ]{0,10}[a-zA-Z]", pad in " {0,3}") {
        let variant = format!("{pad}{}{pad}", title.to_uppercase());
        prop_assert!(titles_match(&variant, &title));
    }

    #[test]
    fn normalize_is_idempotent(title in "[ a-zA-Z0-9_.-]{0,20}") {
        let once = normalize_title(&title);
        prop_assert_eq!(normalize_title(&once), once);
    }
}

// ── Ids and kinds ────────────────────────────────────────────────

#[test]
fn resource_id_is_opaque() {
    let id = ResourceId::new("1f2e-abc");
    assert_eq!(id.as_str(), "1f2e-abc");
    assert_eq!(id.to_string(), "1f2e-abc");
    assert_eq!(ResourceId::from("1f2e-abc"), id);
}

#[test]
fn resource_kind_parses_database_alias() {
    assert_eq!(ResourceKind::from_str("Page").unwrap(), ResourceKind::Page);
    assert_eq!(ResourceKind::from_str("database").unwrap(), ResourceKind::Collection);
    assert!(ResourceKind::from_str("block").is_err());
}

#[test]
fn named_resource_with_parent() {
    let r = NamedResource::new("Change Log", ResourceKind::Collection, "db-1").with_parent("page-1");
    assert_eq!(r.parent_id, Some(ResourceId::new("page-1")));
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["kind"], "collection");
    assert_eq!(json["parent_id"], "page-1");
}
