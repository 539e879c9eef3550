//! Command-line front end for the Atlas bootstrap.
//!
//! Usage:
//!   atlas-bootstrap bootstrap --version 3.1 --date 2025-08-26 --summary "..." --linked "..."
//!   atlas-bootstrap locate "HOC Access" --kind page
//!
//! Settings come from the environment (`NOTION_TOKEN`, `NOTION_API_BASE_URL`,
//! `NOTION_VERSION`, `OWNER_NAME`) and an optional `.env` file.

pub mod cli;
pub mod commands;
pub mod output;
pub mod settings;

pub use cli::{BootstrapArgs, Cli, Commands, LocateArgs};
pub use settings::Settings;
