//! The fixed Atlas workspace layout: page names, collection names and the
//! two collection schemas.

use crate::schema::{CollectionSchema, PropertySpec, SelectColor, SelectOption};

pub const ATLAS_NOTION: &str = "ATLAS NOTION";
pub const RUBY_NOTION: &str = "RUBY NOTION";
pub const HOC_ACCESS: &str = "HOC Access";

pub const CHANGE_LOG: &str = "Change Log";
pub const PERSISTENT_MEMORY: &str = "Atlas Persistent Memory";

/// Property names of the Change Log collection.
pub mod change_log {
    pub const VERSION: &str = "Version";
    pub const DATE: &str = "Date";
    pub const AUTHOR: &str = "Author";
    pub const SUMMARY: &str = "Change Summary";
    pub const LINKED_SECTIONS: &str = "Linked Sections";
    pub const STATUS: &str = "Status";
}

/// Property names of the persistent memory collection.
pub mod memory {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const ACTOR: &str = "Actor";
    pub const EVENT: &str = "Event";
    pub const DETAILS: &str = "Details";
    pub const TAGS: &str = "Tags";
}

/// Schema of the Change Log collection, keyed by `Version`.
pub fn change_log_schema() -> CollectionSchema {
    CollectionSchema::new()
        .with(PropertySpec::title(change_log::VERSION))
        .with(PropertySpec::date(change_log::DATE))
        .with(PropertySpec::text(change_log::AUTHOR))
        .with(PropertySpec::text(change_log::SUMMARY))
        .with(PropertySpec::text(change_log::LINKED_SECTIONS))
        .with(PropertySpec::select(
            change_log::STATUS,
            vec![
                SelectOption::new("Proposed", SelectColor::Yellow),
                SelectOption::new("Active", SelectColor::Green),
                SelectOption::new("Archived", SelectColor::Gray),
            ],
        ))
}

/// Schema of the append-only persistent memory collection.
pub fn memory_schema() -> CollectionSchema {
    CollectionSchema::new()
        .with(PropertySpec::date(memory::TIMESTAMP))
        .with(PropertySpec::text(memory::ACTOR))
        .with(PropertySpec::title(memory::EVENT))
        .with(PropertySpec::text(memory::DETAILS))
        .with(PropertySpec::multi_select(memory::TAGS))
}
