//! OpenAI-compatible API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::LanguageModel;
use crate::config::AppConfig;
use crate::errors::ConvoError;
use crate::errors::Result;
use crate::tenant::Credential;

/// Client for the embeddings and chat-completions endpoints.
///
/// The API key is supplied per call, so one client serves every tenant.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    endpoint: String,
    embedding_model: String,
    chat_model: String,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid TLS backend configuration)
    pub fn new(
        endpoint: impl Into<String>,
        embedding_model: impl Into<String>,
        chat_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConvoError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
            client,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.llm.endpoint.clone(),
            config.llm.embedding_model.clone(),
            config.llm.chat_model.clone(),
            config.request_timeout(),
        )
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("API error ({status}): {text}")
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn embed(&self, credential: &Credential, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct EmbeddingRequest<'a> {
            input: [&'a str; 1],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling embeddings API: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .json(&EmbeddingRequest {
                input: [text],
                model: &self.embedding_model,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvoError::EmbeddingError(Self::error_body(response).await));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ConvoError::EmbeddingError(format!("Failed to parse response: {e}")))?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ConvoError::EmbeddingError("No embedding in response".to_string()))
    }

    async fn complete(&self, credential: &Credential, messages: &[ChatMessage]) -> Result<String> {
        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} ({} messages)", url, messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential.expose())
            .json(&CompletionRequest {
                model: &self.chat_model,
                messages,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConvoError::LlmError(Self::error_body(response).await));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ConvoError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ConvoError::LlmError("No completion in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = OpenAiClient::new(
            "http://localhost:9999/v1/",
            "emb",
            "chat",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.endpoint, "http://localhost:9999/v1");
    }

    #[tokio::test]
    #[ignore = "Requires API key"]
    async fn test_openai_embedding() {
        let key = std::env::var("OPENAI_API_KEY").unwrap();
        let client = OpenAiClient::new(
            "https://api.openai.com/v1",
            "text-embedding-ada-002",
            "gpt-3.5-turbo",
            Duration::from_secs(30),
        )
        .unwrap();

        let embedding = client
            .embed(&Credential::new(key), "Hello, world!")
            .await
            .unwrap();
        assert_eq!(embedding.len(), 1536);
    }
}
