use crate::atlas::{change_log, memory};
use crate::record::{Properties, PropertyValue};
use crate::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Local wall-clock format of audit timestamps (second precision, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lifecycle state of a change log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    Proposed,
    #[default]
    Active,
    Archived,
}

impl ChangeStatus {
    pub const ALL: [ChangeStatus; 3] = [Self::Proposed, Self::Active, Self::Archived];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::Active => "Active",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// A versioned change description, upserted into the Change Log by version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub version: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub author: String,
    pub summary: String,
    pub linked_sections: String,
    #[serde(default)]
    pub status: ChangeStatus,
}

impl ChangeEntry {
    /// The version as stored and matched: surrounding whitespace removed.
    pub fn key(&self) -> &str {
        self.version.trim()
    }

    /// Checks the entry can be written: non-empty version and an ISO date.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.key().is_empty() {
            return Err(ModelError::EmptyKey(change_log::VERSION.into()));
        }
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| ModelError::InvalidDate(format!("{}: {e}", self.date)))?;
        Ok(())
    }

    /// Change Log property values for this entry.
    pub fn to_properties(&self) -> Properties {
        Properties::new()
            .with(change_log::VERSION, PropertyValue::Title(self.key().to_string()))
            .with(change_log::DATE, PropertyValue::Date(self.date.clone()))
            .with(change_log::AUTHOR, PropertyValue::Text(self.author.clone()))
            .with(change_log::SUMMARY, PropertyValue::Text(self.summary.clone()))
            .with(
                change_log::LINKED_SECTIONS,
                PropertyValue::Text(self.linked_sections.clone()),
            )
            .with(
                change_log::STATUS,
                PropertyValue::Select(self.status.as_str().to_string()),
            )
    }
}

/// One append-only event in the persistent memory collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Local wall-clock time in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    pub actor: String,
    pub event: String,
    pub details: String,
    pub tags: Vec<String>,
}

impl AuditEntry {
    /// Builds an entry stamped with the current local time.
    pub fn now<S: AsRef<str>>(actor: &str, event: &str, details: &str, tags: &[S]) -> Self {
        Self {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            actor: actor.to_string(),
            event: event.to_string(),
            details: details.to_string(),
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    /// Memory collection property values for this entry.
    pub fn to_properties(&self) -> Properties {
        Properties::new()
            .with(memory::TIMESTAMP, PropertyValue::Date(self.timestamp.clone()))
            .with(memory::ACTOR, PropertyValue::Text(self.actor.clone()))
            .with(memory::EVENT, PropertyValue::Title(self.event.clone()))
            .with(memory::DETAILS, PropertyValue::Text(self.details.clone()))
            .with(memory::TAGS, PropertyValue::MultiSelect(self.tags.clone()))
    }
}
