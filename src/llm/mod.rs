//! Language-model access
//!
//! Embeddings and chat completions both go through the [`LanguageModel`]
//! trait so the chat pipeline can be driven by a fake in tests. The
//! production implementation is [`OpenAiClient`], which speaks the
//! OpenAI-compatible REST API.

pub mod client;
pub mod prompts;

use async_trait::async_trait;
pub use client::OpenAiClient;
pub use prompts::PromptTemplate;
pub use prompts::TenantPrompts;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;
use crate::tenant::Credential;

/// A single message in a chat-completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Hosted model operations needed by the chat pipeline
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Embed a single text with the given tenant credential
    async fn embed(&self, credential: &Credential, text: &str) -> Result<Vec<f32>>;

    /// Run a chat completion and return the raw text of the first choice
    async fn complete(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String>;
}
