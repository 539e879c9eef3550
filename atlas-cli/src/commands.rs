//! Subcommand implementations over an injected store.

use crate::cli::{BootstrapArgs, LocateArgs};
use crate::settings::Settings;
use anyhow::{Context, Result};
use atlas_reconcile::{
    BootstrapRequest, BootstrapSummary, DuplicatePolicy, Located, Locator, Orchestrator,
    ReconcileConfig,
};
use atlas_store::{NotionStore, WorkspaceStore};
use std::sync::Arc;
use tracing::info;

fn policy(strict: bool) -> DuplicatePolicy {
    if strict {
        DuplicatePolicy::Strict
    } else {
        DuplicatePolicy::FirstMatch
    }
}

/// Builds the Notion client from settings.
pub fn connect(settings: &Settings) -> Result<Arc<dyn WorkspaceStore>> {
    let store = NotionStore::new(settings.notion.clone())
        .context("Failed to create Notion client")?;
    info!(
        "Using Notion at {} (version {})",
        settings.notion.api_base_url, settings.notion.notion_version
    );
    Ok(Arc::new(store))
}

/// Runs the bootstrap. Arguments are validated before any remote call.
pub async fn bootstrap(
    store: Arc<dyn WorkspaceStore>,
    args: &BootstrapArgs,
    owner: &str,
) -> Result<BootstrapSummary> {
    let request = BootstrapRequest {
        change: args
            .change_entry(owner)
            .context("Invalid change entry")?,
    };
    let config = ReconcileConfig {
        duplicate_policy: policy(args.strict),
    };

    Orchestrator::new(store, config)
        .run(&request)
        .await
        .context("Bootstrap failed")
}

/// Looks up one resource by title.
pub async fn locate(store: Arc<dyn WorkspaceStore>, args: &LocateArgs) -> Result<Option<Located>> {
    Locator::new(store, policy(args.strict))
        .locate(&args.name, args.kind)
        .await
        .with_context(|| format!("Failed to locate {} {:?}", args.kind, args.name))
}
