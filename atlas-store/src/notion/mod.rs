//! Notion workspace store.
//!
//! Uses the Notion REST API (`/v1/search`, `/v1/pages`, `/v1/databases`)
//! with an internal integration token.

mod wire;

use crate::error::{StoreError, StoreResult};
use crate::store::{Candidate, KeyFilter, Parent, WorkspaceStore};
use async_trait::async_trait;
use atlas_model::{CollectionSchema, NamedResource, Properties, Record, ResourceId, ResourceKind};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Notion specific configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Internal integration token.
    #[serde(skip_serializing)]
    pub token: String,
    /// Base URL for the Notion API (e.g. `https://api.notion.com`).
    pub api_base_url: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Per-request transport timeout.
    pub timeout_secs: u64,
    /// Results requested per page for search and query (Notion maximum is 100).
    pub page_size: u32,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_secs: 60,
            page_size: 100,
        }
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base_url", &self.api_base_url)
            .field("notion_version", &self.notion_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Notion implementation of [`WorkspaceStore`].
pub struct NotionStore {
    config: NotionConfig,
    client: Client,
}

impl NotionStore {
    /// Creates a store client. Fails if no token is configured.
    pub fn new(config: NotionConfig) -> StoreResult<Self> {
        if config.token.trim().is_empty() {
            return Err(StoreError::MissingConfiguration(
                "Notion integration token is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &NotionConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, method: Method, path: &str, body: &Value) -> StoreResult<Value> {
        debug!("Notion {} {}", method, path);

        let response = self
            .client
            .request(method.clone(), self.url(path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.notion_version)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Network(format!("{method} {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(StoreError::from_response(status.as_u16(), &error));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("{method} {path}: {e}")))
    }

    /// POSTs `body` to a paginated endpoint and collects every result.
    async fn collect_pages(&self, path: &str, mut body: Value) -> StoreResult<Vec<Value>> {
        let mut results = Vec::new();

        loop {
            let page: wire::ListResponse =
                serde_json::from_value(self.send(Method::POST, path, &body).await?)?;
            results.extend(page.results);

            match page.next_cursor {
                Some(cursor) if page.has_more => {
                    if let Some(fields) = body.as_object_mut() {
                        fields.insert("start_cursor".to_string(), Value::String(cursor));
                    }
                }
                _ => break,
            }
        }

        Ok(results)
    }
}

#[async_trait]
impl WorkspaceStore for NotionStore {
    fn provider_name(&self) -> &'static str {
        "Notion"
    }

    async fn search(&self, query: &str, kind: ResourceKind) -> StoreResult<Vec<Candidate>> {
        let body = wire::search_body(query, kind, self.config.page_size);
        let results = self.collect_pages("/v1/search", body).await?;

        let candidates: Vec<Candidate> = results
            .iter()
            .filter_map(|r| wire::decode_candidate(r, kind))
            .collect();
        debug!(
            "Search {:?} ({}) returned {} candidates",
            query,
            kind,
            candidates.len()
        );
        Ok(candidates)
    }

    async fn create_resource(
        &self,
        parent: &Parent,
        kind: ResourceKind,
        title: &str,
        schema: Option<&CollectionSchema>,
    ) -> StoreResult<NamedResource> {
        let (path, body) = match kind {
            ResourceKind::Page => ("/v1/pages", wire::page_create_body(parent, title)),
            ResourceKind::Collection => {
                let schema = schema.ok_or_else(|| {
                    StoreError::InvalidRequest(format!("collection {title:?} needs a schema"))
                })?;
                let page_id = parent.page_id().ok_or_else(|| {
                    StoreError::InvalidRequest(format!(
                        "collection {title:?} must be created under a page"
                    ))
                })?;
                ("/v1/databases", wire::database_create_body(page_id, title, schema))
            }
        };

        let created = self.send(Method::POST, path, &body).await?;
        let id = created
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidResponse(format!("{path}: missing id")))?;

        info!("Created {} {:?} (id: {})", kind, title, id);
        let resource = NamedResource::new(title, kind, id);
        Ok(match parent.page_id() {
            Some(page_id) => resource.with_parent(page_id.clone()),
            None => resource,
        })
    }

    async fn query_records(
        &self,
        collection_id: &ResourceId,
        filter: &KeyFilter,
    ) -> StoreResult<Vec<Record>> {
        let path = format!("/v1/databases/{collection_id}/query");
        let body = wire::query_body(filter, self.config.page_size);
        let results = self.collect_pages(&path, body).await?;

        Ok(results
            .iter()
            .filter_map(|r| wire::decode_record(r, Some(collection_id)))
            .collect())
    }

    async fn create_record(
        &self,
        collection_id: &ResourceId,
        fields: &Properties,
    ) -> StoreResult<Record> {
        let body = wire::record_create_body(collection_id, fields);
        let created = self.send(Method::POST, "/v1/pages", &body).await?;

        let record = wire::decode_record(&created, Some(collection_id))
            .ok_or_else(|| StoreError::InvalidResponse("/v1/pages: missing id".to_string()))?;
        debug!("Created record {} in {}", record.id, collection_id);
        Ok(record)
    }

    async fn update_record(
        &self,
        record_id: &ResourceId,
        fields: &Properties,
    ) -> StoreResult<Record> {
        let path = format!("/v1/pages/{record_id}");
        let body = serde_json::json!({"properties": wire::properties_json(fields)});
        let updated = self.send(Method::PATCH, &path, &body).await?;

        let record = wire::decode_record(&updated, None)
            .ok_or_else(|| StoreError::InvalidResponse(format!("{path}: missing id or parent")))?;
        debug!("Updated record {}", record.id);
        Ok(record)
    }
}
