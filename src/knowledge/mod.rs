//! Knowledge rows and chat-log storage
//!
//! The datastore is an external service. This module defines the row shapes and
//! the [`KnowledgeStore`] trait; [`SupabaseStore`] talks to a PostgREST
//! endpoint and [`InMemoryKnowledgeStore`] keeps everything in process.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
pub use memory::InMemoryKnowledgeStore;
use serde::Deserialize;
use serde::Serialize;
pub use supabase::SupabaseStore;

use crate::errors::Result;

/// One fact in a tenant's knowledge base.
///
/// `embedding` is kept as raw JSON: rows written by different ingestion
/// tools store it either as a number array or as a bracketed string, and a
/// malformed value must only disqualify its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub client_id: String,
    pub content: String,
    pub embedding: serde_json::Value,
}

impl KnowledgeEntry {
    pub fn new(client_id: impl Into<String>, content: impl Into<String>, embedding: &[f32]) -> Self {
        Self {
            client_id: client_id.into(),
            content: content.into(),
            embedding: serde_json::Value::from(embedding.to_vec()),
        }
    }
}

/// Append-only transcript record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub name: String,
    pub email: String,
    /// Stored verbatim; its shape is owned by the chat widget
    pub chat_log: serde_json::Value,
    pub client_id: String,
    pub timestamp: String,
}

impl ChatLogEntry {
    /// Build an entry stamped with the current UTC time
    pub fn now(
        name: impl Into<String>,
        email: impl Into<String>,
        chat_log: serde_json::Value,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            chat_log,
            client_id: client_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        }
    }
}

/// Datastore operations used by the backend
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// All knowledge rows belonging to one tenant, in storage order
    async fn entries_for(&self, client_id: &str) -> Result<Vec<KnowledgeEntry>>;

    /// Store a new knowledge row
    async fn insert_entry(&self, entry: &KnowledgeEntry) -> Result<()>;

    /// Append one chat transcript
    async fn append_chat_log(&self, entry: &ChatLogEntry) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_embedding_is_json_array() {
        let entry = KnowledgeEntry::new("acme", "fact", &[0.5, 1.0]);
        assert_eq!(entry.embedding, serde_json::json!([0.5, 1.0]));
    }

    #[test]
    fn test_chat_log_timestamp_is_utc() {
        let entry = ChatLogEntry::now("Ann", "ann@example.com", serde_json::json!("hi"), "acme");
        assert!(entry.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }
}
