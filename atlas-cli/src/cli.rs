//! Command-line arguments.

use atlas_model::{ChangeEntry, ChangeStatus, ModelError, ResourceKind};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atlas-bootstrap")]
#[command(about = "Idempotent bootstrap of the Atlas Notion workspace")]
pub struct Cli {
    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Read settings from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure pages and collections, upsert a change entry, append an audit record
    Bootstrap(BootstrapArgs),
    /// Look up a page or collection by title without writing anything
    Locate(LocateArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct BootstrapArgs {
    /// Change log version to upsert (e.g. 3.1)
    #[arg(long = "version", alias = "v", value_name = "VERSION")]
    pub version: Option<String>,

    /// Change date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Change author (defaults to OWNER_NAME)
    #[arg(long)]
    pub author: Option<String>,

    /// Change summary
    #[arg(long, default_value = "")]
    pub summary: String,

    /// Linked sections
    #[arg(long, default_value = "")]
    pub linked: String,

    /// Change status: Proposed, Active or Archived
    #[arg(long, default_value = "Active")]
    pub status: String,

    /// Fail instead of picking the first of several exact matches
    #[arg(long)]
    pub strict: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl BootstrapArgs {
    /// The change entry to upsert, if a version was given.
    pub fn change_entry(&self, owner: &str) -> Result<Option<ChangeEntry>, ModelError> {
        let Some(version) = &self.version else {
            return Ok(None);
        };

        let entry = ChangeEntry {
            version: version.trim().to_string(),
            date: self
                .date
                .clone()
                .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string()),
            author: self.author.clone().unwrap_or_else(|| owner.to_string()),
            summary: self.summary.clone(),
            linked_sections: self.linked.clone(),
            status: self.status.parse::<ChangeStatus>()?,
        };
        entry.validate()?;
        Ok(Some(entry))
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct LocateArgs {
    /// Title to look up (case-insensitive, exact)
    pub name: String,

    /// Resource kind: page or collection
    #[arg(long, default_value = "page")]
    pub kind: ResourceKind,

    /// Fail instead of picking the first of several exact matches
    #[arg(long)]
    pub strict: bool,
}
