//! The declared workspace the bootstrap reconciles against.

use crate::error::{ReconcileError, ReconcileResult};
use atlas_model::atlas;
use atlas_model::{titles_match, CollectionSchema};
use serde::{Deserialize, Serialize};

/// A collection and the page it lives under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLayout {
    pub name: String,
    /// Title of one of the layout's top-level pages.
    pub parent_page: String,
    pub schema: CollectionSchema,
    /// Natural key property for upserts; must be the schema's title property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_property: Option<String>,
}

/// Fixed fields of the audit entry written at the end of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLayout {
    pub actor: String,
    pub event: String,
    pub tags: Vec<String>,
}

/// Pages, collections and audit fields of a bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    /// Top-level pages, ensured at the workspace root in this order.
    pub pages: Vec<String>,
    pub change_log: CollectionLayout,
    pub memory: CollectionLayout,
    pub audit: AuditLayout,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self {
            pages: vec![
                atlas::ATLAS_NOTION.to_string(),
                atlas::RUBY_NOTION.to_string(),
                atlas::HOC_ACCESS.to_string(),
            ],
            change_log: CollectionLayout {
                name: atlas::CHANGE_LOG.to_string(),
                parent_page: atlas::HOC_ACCESS.to_string(),
                schema: atlas::change_log_schema(),
                key_property: Some(atlas::change_log::VERSION.to_string()),
            },
            memory: CollectionLayout {
                name: atlas::PERSISTENT_MEMORY.to_string(),
                parent_page: atlas::ATLAS_NOTION.to_string(),
                schema: atlas::memory_schema(),
                key_property: None,
            },
            audit: AuditLayout {
                actor: "Atlas".to_string(),
                event: "Bootstrap Completed".to_string(),
                tags: vec![
                    "bootstrap".to_string(),
                    "change-log".to_string(),
                    "atlas".to_string(),
                ],
            },
        }
    }
}

impl WorkspaceLayout {
    /// Checks the layout is internally consistent before any remote call.
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.pages.iter().any(|p| p.trim().is_empty()) {
            return Err(ReconcileError::Layout("empty page name".to_string()));
        }
        for (i, page) in self.pages.iter().enumerate() {
            if self.pages[..i].iter().any(|p| titles_match(p, page)) {
                return Err(ReconcileError::Layout(format!("page {page:?} declared twice")));
            }
        }

        for collection in [&self.change_log, &self.memory] {
            if collection.name.trim().is_empty() {
                return Err(ReconcileError::Layout("empty collection name".to_string()));
            }
            if self.page_index(&collection.parent_page).is_none() {
                return Err(ReconcileError::Layout(format!(
                    "collection {:?} is parented under undeclared page {:?}",
                    collection.name, collection.parent_page
                )));
            }
            collection.schema.validate()?;
            if let Some(key) = &collection.key_property {
                let title = collection.schema.title_property().map(|p| p.name.as_str());
                if title != Some(key.as_str()) {
                    return Err(ReconcileError::Layout(format!(
                        "key {:?} of {:?} is not its title property",
                        key, collection.name
                    )));
                }
            }
        }
        if self.change_log.key_property.is_none() {
            return Err(ReconcileError::Layout(format!(
                "collection {:?} needs a key property",
                self.change_log.name
            )));
        }
        Ok(())
    }

    /// Position of a page in `pages`, matched like remote titles.
    pub fn page_index(&self, title: &str) -> Option<usize> {
        self.pages.iter().position(|p| titles_match(p, title))
    }
}
