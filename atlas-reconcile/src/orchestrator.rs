//! The bootstrap run: five sequential stages over the engine components.
//!
//! Each stage is awaited before the next starts. The first failure stops the
//! run and is returned wrapped in [`ReconcileError::Stage`]; writes made by
//! earlier stages stay in place. Rerunning starts again at the first stage
//! and relies on ensure and upsert converging.

use crate::audit::AuditLogger;
use crate::ensurer::{Ensured, Ensurer};
use crate::error::{ReconcileError, ReconcileResult};
use crate::layout::{CollectionLayout, WorkspaceLayout};
use crate::report::{Ambiguity, ReconcileConfig};
use crate::summary::{BootstrapSummary, ResolvedRecord, ResolvedResource};
use crate::upserter::{NaturalKey, RecordUpserter};
use atlas_model::{ChangeEntry, NamedResource};
use atlas_store::WorkspaceStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// A step of the bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    EnsurePages,
    #[serde(rename = "ENSURE_CHANGELOG")]
    EnsureChangeLog,
    UpsertEntry,
    EnsureMemory,
    AppendAudit,
}

impl Stage {
    /// Stages in execution order.
    pub const ALL: [Stage; 5] = [
        Self::EnsurePages,
        Self::EnsureChangeLog,
        Self::UpsertEntry,
        Self::EnsureMemory,
        Self::AppendAudit,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnsurePages => "ENSURE_PAGES",
            Self::EnsureChangeLog => "ENSURE_CHANGELOG",
            Self::UpsertEntry => "UPSERT_ENTRY",
            Self::EnsureMemory => "ENSURE_MEMORY",
            Self::AppendAudit => "APPEND_AUDIT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapRequest {
    /// Change log entry to upsert. The upsert stage is skipped without one.
    #[serde(default)]
    pub change: Option<ChangeEntry>,
}

impl BootstrapRequest {
    pub fn with_change(change: ChangeEntry) -> Self {
        Self {
            change: Some(change),
        }
    }
}

/// Details text of the audit entry closing a run.
pub fn audit_details(change: Option<&ChangeEntry>) -> String {
    let tail = match change {
        Some(change) => format!("upserted v{}.", change.key()),
        None => "no change entry supplied.".to_string(),
    };
    format!("Initialized RW foundation; ensured Change Log and Persistent Memory; {tail}")
}

fn at(stage: Stage) -> impl FnOnce(ReconcileError) -> ReconcileError {
    move |source| {
        warn!("Stage {} failed: {}", stage, source);
        ReconcileError::Stage {
            stage,
            source: Box::new(source),
        }
    }
}

/// Runs the bootstrap against one store.
pub struct Orchestrator {
    store: Arc<dyn WorkspaceStore>,
    config: ReconcileConfig,
    layout: WorkspaceLayout,
}

impl Orchestrator {
    /// Creates an orchestrator for the default Atlas layout.
    pub fn new(store: Arc<dyn WorkspaceStore>, config: ReconcileConfig) -> Self {
        Self {
            store,
            config,
            layout: WorkspaceLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: WorkspaceLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Executes all stages and returns the resolved identifiers.
    ///
    /// The layout and the change entry are validated before the first
    /// remote call.
    pub async fn run(&self, request: &BootstrapRequest) -> ReconcileResult<BootstrapSummary> {
        self.layout.validate()?;
        if let Some(change) = &request.change {
            change.validate()?;
        }

        let policy = self.config.duplicate_policy;
        let ensurer = Ensurer::new(self.store.clone(), policy);
        let mut ambiguities: Vec<Ambiguity> = Vec::new();
        info!(
            "Bootstrap started against {} ({:?} duplicates)",
            self.store.provider_name(),
            policy
        );

        // ENSURE_PAGES
        let mut pages: Vec<Ensured> = Vec::with_capacity(self.layout.pages.len());
        for name in &self.layout.pages {
            let ensured = ensurer
                .ensure_page(name, None)
                .await
                .map_err(at(Stage::EnsurePages))?;
            ambiguities.extend(ensured.ambiguity.clone());
            pages.push(ensured);
        }
        info!("Stage {} done: {} pages", Stage::EnsurePages, pages.len());

        // ENSURE_CHANGELOG
        let change_log = self
            .ensure_collection(&ensurer, &pages, &self.layout.change_log)
            .await
            .map_err(at(Stage::EnsureChangeLog))?;
        ambiguities.extend(change_log.ambiguity.clone());
        info!(
            "Stage {} done: {} ({})",
            Stage::EnsureChangeLog,
            change_log.resource.id,
            change_log.outcome.as_str()
        );

        // UPSERT_ENTRY
        let change_entry = match (&request.change, &self.layout.change_log.key_property) {
            (Some(change), Some(key_property)) => {
                let key = NaturalKey::new(key_property, change.key());
                let upserted = RecordUpserter::new(self.store.clone(), policy)
                    .upsert(&change_log.resource.id, &key, &change.to_properties())
                    .await
                    .map_err(at(Stage::UpsertEntry))?;
                info!(
                    "Stage {} done: v{} {}",
                    Stage::UpsertEntry,
                    change.key(),
                    upserted.outcome.as_str()
                );
                ambiguities.extend(upserted.ambiguity.clone());
                Some(ResolvedRecord::from_upsert(change.key(), &upserted))
            }
            _ => {
                info!("Stage {} skipped: no change entry", Stage::UpsertEntry);
                None
            }
        };

        // ENSURE_MEMORY
        let memory = self
            .ensure_collection(&ensurer, &pages, &self.layout.memory)
            .await
            .map_err(at(Stage::EnsureMemory))?;
        ambiguities.extend(memory.ambiguity.clone());
        info!(
            "Stage {} done: {} ({})",
            Stage::EnsureMemory,
            memory.resource.id,
            memory.outcome.as_str()
        );

        // APPEND_AUDIT
        let audit = &self.layout.audit;
        let record = AuditLogger::new(self.store.clone())
            .append(
                &memory.resource.id,
                &audit.actor,
                &audit.event,
                &audit_details(request.change.as_ref()),
                &audit.tags,
            )
            .await
            .map_err(at(Stage::AppendAudit))?;
        info!("Stage {} done: {}", Stage::AppendAudit, record.id);

        if !ambiguities.is_empty() {
            warn!("Bootstrap resolved {} ambiguous matches", ambiguities.len());
        }

        Ok(BootstrapSummary {
            pages: pages.iter().map(ResolvedResource::from).collect(),
            change_log: ResolvedResource::from(&change_log),
            change_entry,
            memory: ResolvedResource::from(&memory),
            audit_record_id: record.id,
            ambiguities,
            provider: self.store.provider_name().to_string(),
        })
    }

    async fn ensure_collection(
        &self,
        ensurer: &Ensurer,
        pages: &[Ensured],
        collection: &CollectionLayout,
    ) -> ReconcileResult<Ensured> {
        let parent = self.parent_page(pages, &collection.parent_page)?;
        ensurer
            .ensure_collection(&collection.name, &collection.schema, &parent.id)
            .await
    }

    fn parent_page<'a>(&self, pages: &'a [Ensured], title: &str) -> ReconcileResult<&'a NamedResource> {
        self.layout
            .page_index(title)
            .and_then(|i| pages.get(i))
            .map(|ensured| &ensured.resource)
            .ok_or_else(|| ReconcileError::Layout(format!("page {title:?} was not ensured")))
    }
}
