//! In-process knowledge store

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ChatLogEntry;
use super::KnowledgeEntry;
use super::KnowledgeStore;
use crate::errors::Result;

/// Knowledge store held entirely in memory; contents vanish with the process
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeStore {
    entries: RwLock<Vec<KnowledgeEntry>>,
    chat_logs: RwLock<Vec<ChatLogEntry>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            chat_logs: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of every stored chat log
    pub async fn chat_logs(&self) -> Vec<ChatLogEntry> {
        self.chat_logs.read().await.clone()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn entries_for(&self, client_id: &str) -> Result<Vec<KnowledgeEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, entry: &KnowledgeEntry) -> Result<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn append_chat_log(&self, entry: &ChatLogEntry) -> Result<()> {
        self.chat_logs.write().await.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_filtered_by_client() {
        let store = InMemoryKnowledgeStore::with_entries(vec![
            KnowledgeEntry::new("acme", "a1", &[1.0]),
            KnowledgeEntry::new("globex", "g1", &[1.0]),
            KnowledgeEntry::new("acme", "a2", &[1.0]),
        ]);

        let acme = store.entries_for("acme").await.unwrap();
        let contents: Vec<_> = acme.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "a2"]);
        assert!(store.entries_for("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_then_read() {
        let store = InMemoryKnowledgeStore::new();
        store
            .insert_entry(&KnowledgeEntry::new("acme", "fact", &[0.1, 0.2]))
            .await
            .unwrap();
        assert_eq!(store.entries_for("acme").await.unwrap().len(), 1);
    }
}
