//! Outcome and ambiguity reporting shared by the engine components.

use atlas_model::{ResourceId, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when more than one exact match exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Use the first match in result order and report the ambiguity.
    #[default]
    FirstMatch,
    /// Fail with `AmbiguousMatch`.
    Strict,
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub duplicate_policy: DuplicatePolicy,
}

/// Where an ambiguous match was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum MatchScope {
    /// Several pages or collections share a title.
    Resource { kind: ResourceKind },
    /// Several records of one collection share a natural key.
    Record {
        collection_id: ResourceId,
        property: String,
    },
}

/// Several exact matches for one name or key. `chosen` is the one used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ambiguity {
    pub scope: MatchScope,
    pub name: String,
    pub chosen: ResourceId,
    pub candidates: Vec<ResourceId>,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            MatchScope::Resource { kind } => write!(
                f,
                "{} {}s titled {:?}",
                self.candidates.len(),
                kind,
                self.name
            ),
            MatchScope::Record {
                collection_id,
                property,
            } => write!(
                f,
                "{} records with {} = {:?} in {}",
                self.candidates.len(),
                property,
                self.name,
                collection_id
            ),
        }
    }
}

/// How an ensure call resolved its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsureOutcome {
    /// Found by search.
    Found,
    /// Resolved earlier in the same run.
    Cached,
    Created,
}

impl EnsureOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Cached => "cached",
            Self::Created => "created",
        }
    }
}

/// How an upsert resolved its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl UpsertOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
        }
    }
}
