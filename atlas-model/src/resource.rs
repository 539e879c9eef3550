use crate::ids::{ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};

/// A named, addressable resource in the remote workspace.
///
/// Identity is the name, compared with [`titles_match`]. The store itself
/// enforces no uniqueness, so two resources may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub kind: ResourceKind,
    pub id: ResourceId,
    /// Parent page id; `None` for workspace-level resources or when the
    /// store did not report one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ResourceId>,
}

impl NamedResource {
    pub fn new(name: impl Into<String>, kind: ResourceKind, id: impl Into<ResourceId>) -> Self {
        Self {
            name: name.into(),
            kind,
            id: id.into(),
            parent_id: None,
        }
    }

    /// Sets the parent page id.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<ResourceId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Canonical form of a title for identity comparison: trimmed and lower-cased.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Returns true when two titles name the same resource.
///
/// Comparison ignores case and leading/trailing whitespace only; interior
/// whitespace and punctuation must match exactly.
pub fn titles_match(candidate: &str, wanted: &str) -> bool {
    normalize_title(candidate) == normalize_title(wanted)
}
