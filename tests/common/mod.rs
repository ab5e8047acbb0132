//! Shared fakes for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use convo247::api::AppState;
use convo247::errors::FetchError;
use convo247::knowledge::ChatLogEntry;
use convo247::knowledge::InMemoryKnowledgeStore;
use convo247::knowledge::KnowledgeEntry;
use convo247::knowledge::KnowledgeStore;
use convo247::llm::ChatMessage;
use convo247::llm::LanguageModel;
use convo247::rag::ChatService;
use convo247::rate_limit::RateLimiter;
use convo247::tenant::Credential;
use convo247::tenant::EnvCredentialStore;
use convo247::tenant::TenantConfig;
use convo247::tenant::TenantConfigSource;
use convo247::tenant::TenantResolver;
use convo247::ConvoError;
use convo247::Result;

pub const TOKEN: &str = "test-token";

/// Unit vector whose cosine similarity with `[1, 0]` is exactly `score`
pub fn at_similarity(score: f32) -> Vec<f32> {
    vec![score, (1.0 - score * score).sqrt()]
}

/// Query embedding every fake question maps to
pub fn query_vector() -> Vec<f32> {
    vec![1.0, 0.0]
}

/// Language model that returns fixed embeddings and a canned reply,
/// recording every prompt it is sent
pub struct FakeModel {
    reply: String,
    fail: bool,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
    pub embedded: Mutex<Vec<String>>,
    pub keys_seen: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail: false,
            delay: None,
            prompts: Mutex::new(Vec::new()),
            embedded: Mutex::new(Vec::new()),
            keys_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::replying("")
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying("late")
        }
    }

    pub fn completion_calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn embed(&self, credential: &Credential, text: &str) -> Result<Vec<f32>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ConvoError::EmbeddingError("upstream unavailable".to_string()));
        }
        self.keys_seen
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        self.embedded.lock().unwrap().push(text.to_string());
        Ok(query_vector())
    }

    async fn complete(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String> {
        if self.fail {
            return Err(ConvoError::LlmError("upstream unavailable".to_string()));
        }
        self.keys_seen
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(format!("  {}  ", self.reply))
    }
}

/// Config source serving a fixed set of tenants
pub struct StaticConfigSource(pub HashMap<String, TenantConfig>);

impl StaticConfigSource {
    pub fn with(configs: &[TenantConfig]) -> Self {
        Self(
            configs
                .iter()
                .map(|c| (c.client_id.clone(), c.clone()))
                .collect(),
        )
    }
}

#[async_trait]
impl TenantConfigSource for StaticConfigSource {
    async fn fetch(&self, client_id: &str) -> std::result::Result<TenantConfig, FetchError> {
        self.0
            .get(client_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(client_id.to_string()))
    }
}

/// Store whose writes always fail
pub struct BrokenStore;

#[async_trait]
impl KnowledgeStore for BrokenStore {
    async fn entries_for(&self, _client_id: &str) -> Result<Vec<KnowledgeEntry>> {
        Err(ConvoError::DatastoreError("connection refused".to_string()))
    }

    async fn insert_entry(&self, _entry: &KnowledgeEntry) -> Result<()> {
        Err(ConvoError::DatastoreError("connection refused".to_string()))
    }

    async fn append_chat_log(&self, _entry: &ChatLogEntry) -> Result<()> {
        Err(ConvoError::DatastoreError("connection refused".to_string()))
    }
}

pub fn acme_config() -> TenantConfig {
    TenantConfig {
        client_id: "acme".to_string(),
        chatbot_name: "Ava".to_string(),
        brand_name: "Acme".to_string(),
        support_url: "https://acme.test/help".to_string(),
    }
}

/// Chat service over in-process collaborators
pub fn chat_service(
    store: Arc<dyn KnowledgeStore>,
    llm: Arc<dyn LanguageModel>,
    keys: &[(&str, &str)],
    call_timeout: Duration,
) -> ChatService {
    let vars = keys
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let resolver = TenantResolver::new(
        Arc::new(StaticConfigSource::with(&[acme_config()])),
        Arc::new(EnvCredentialStore::from_map("OPENAI_API_KEY", vars)),
    );
    ChatService::new(resolver, store, llm, call_timeout)
}

pub fn memory_store(entries: Vec<KnowledgeEntry>) -> Arc<InMemoryKnowledgeStore> {
    Arc::new(InMemoryKnowledgeStore::with_entries(entries))
}

/// Application state with a shared default key and the given collaborators
pub fn app_state(
    store: Arc<dyn KnowledgeStore>,
    llm: Arc<dyn LanguageModel>,
    configs_dir: &Path,
) -> AppState {
    AppState {
        chat_service: Arc::new(chat_service(
            store,
            llm,
            &[("OPENAI_API_KEY", "sk-default")],
            Duration::from_secs(5),
        )),
        rate_limiter: Arc::new(RateLimiter::default()),
        api_token: Arc::from(TOKEN),
        configs_dir: configs_dir.to_path_buf(),
    }
}
