//! Settings from the process environment and an optional `.env` file.

use anyhow::{Context, Result};
use atlas_store::{NotionConfig, StoreError, StoreResult};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

pub const NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const NOTION_API_BASE_URL: &str = "NOTION_API_BASE_URL";
pub const NOTION_VERSION: &str = "NOTION_VERSION";
pub const OWNER_NAME: &str = "OWNER_NAME";

pub const DEFAULT_OWNER: &str = "Owner";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub notion: NotionConfig,
    /// Default change author, shown in the summary.
    pub owner_name: String,
}

impl Settings {
    /// Builds settings from `(name, value)` pairs; later pairs win.
    ///
    /// A missing or blank `NOTION_TOKEN` is a missing-configuration error.
    pub fn from_vars<I>(vars: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let token = get(NOTION_TOKEN).ok_or_else(|| {
            StoreError::MissingConfiguration(format!("{NOTION_TOKEN} is not set"))
        })?;

        let mut notion = NotionConfig {
            token,
            ..Default::default()
        };
        if let Some(url) = get(NOTION_API_BASE_URL) {
            notion.api_base_url = url;
        }
        if let Some(version) = get(NOTION_VERSION) {
            notion.notion_version = version;
        }

        Ok(Self {
            notion,
            owner_name: get(OWNER_NAME).unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        })
    }

    /// Loads settings from the process environment, with `env_file` values
    /// underneath it. Without `env_file`, `./.env` is used when present.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let mut vars: Vec<(String, String)> = Vec::new();

        match env_file {
            Some(path) => vars.extend(read_env_file(path)?),
            None => {
                let default = Path::new(".env");
                if default.exists() {
                    vars.extend(read_env_file(default)?);
                }
            }
        }
        vars.extend(utf8_vars(std::env::vars_os()));

        Ok(Self::from_vars(vars)?)
    }
}

/// Keeps the environment pairs that are valid UTF-8; others are skipped.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(name, value)| {
        let name = name.into_string().ok()?;
        match value.into_string() {
            Ok(value) => Some((name, value)),
            Err(_) => {
                debug!("Skipping {name}: value is not valid UTF-8");
                None
            }
        }
    })
}

/// Parses a dotenv file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    iter.map(|item| item.with_context(|| format!("Failed to parse {}", path.display())))
        .collect()
}
