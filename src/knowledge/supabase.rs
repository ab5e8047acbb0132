//! PostgREST (Supabase) datastore client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::RequestBuilder;
use tracing::debug;
use tracing::warn;

use super::ChatLogEntry;
use super::KnowledgeEntry;
use super::KnowledgeStore;
use crate::config::AppConfig;
use crate::errors::ConvoError;
use crate::errors::Result;

/// Knowledge and chat-log tables behind a Supabase REST endpoint
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    base_url: String,
    service_key: String,
    knowledge_table: String,
    log_table: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        knowledge_table: impl Into<String>,
        log_table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvoError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            knowledge_table: knowledge_table.into(),
            log_table: log_table.into(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.datastore.url.clone(),
            config.datastore.service_key.clone(),
            config.datastore.knowledge_table.clone(),
            config.datastore.log_table.clone(),
            config.request_timeout(),
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn insert<T: serde::Serialize + Sync>(&self, table: &str, row: &T) -> Result<()> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ConvoError::DatastoreError(format!(
                "insert into {table} failed ({status}): {text}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for SupabaseStore {
    async fn entries_for(&self, client_id: &str) -> Result<Vec<KnowledgeEntry>> {
        let filter = format!("eq.{client_id}");
        let response = self
            .authorized(self.client.get(self.table_url(&self.knowledge_table)))
            .query(&[("select", "*"), ("client_id", filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ConvoError::DatastoreError(format!(
                "select from {} failed ({status}): {text}",
                self.knowledge_table
            )));
        }

        // Decode row by row so one bad row cannot sink the whole result
        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ConvoError::DatastoreError(format!("Failed to parse rows: {e}")))?;

        let total = rows.len();
        let entries: Vec<KnowledgeEntry> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping undecodable knowledge row for '{}': {}", client_id, e);
                    None
                }
            })
            .collect();

        debug!(
            "Fetched {}/{} knowledge rows for client '{}'",
            entries.len(),
            total,
            client_id
        );
        Ok(entries)
    }

    async fn insert_entry(&self, entry: &KnowledgeEntry) -> Result<()> {
        self.insert(&self.knowledge_table, entry).await
    }

    async fn append_chat_log(&self, entry: &ChatLogEntry) -> Result<()> {
        self.insert(&self.log_table, entry).await
    }
}
