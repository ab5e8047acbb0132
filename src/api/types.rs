//! API request and response types
//!
//! Request bodies are decoded into these structs and validated in one step
//! before anything reaches the chat pipeline or the datastore.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use crate::knowledge::ChatLogEntry;

/// Reply for an empty question
pub const EMPTY_QUESTION_REPLY: &str = "Please ask a question 🙂";

/// Reply when anything goes wrong while answering
pub const GENERIC_FAILURE_REPLY: &str = "Something went wrong. Please try again later.";

/// Reply after a transcript has been stored
pub const SUMMARY_SAVED: &str = "Chat summary saved.";

/// Reply for a body that is not a JSON object
pub const INVALID_BODY: &str = "Invalid request body";

/// Decode any JSON value into a string: `null` becomes empty, strings are
/// taken as-is, anything else is rendered as JSON text. A wrongly typed
/// field then fails validation instead of body decoding.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// POST /chat body
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
}

/// A chat request that passed token and tenant checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidChat {
    pub client_id: String,
    /// Trimmed; may be empty
    pub question: String,
}

impl ChatRequest {
    pub fn validate(self, expected_token: &str) -> Result<ValidChat, ApiError> {
        if self.token != expected_token {
            return Err(ApiError::Unauthorized);
        }

        let client_id = self.client_id.trim();
        if client_id.is_empty() {
            return Err(ApiError::BadRequest("Missing client_id".to_string()));
        }

        Ok(ValidChat {
            client_id: client_id.to_string(),
            question: self.question.trim().to_string(),
        })
    }
}

/// POST /summary body
#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    /// Opaque transcript; any non-empty JSON value is accepted
    #[serde(default)]
    pub chat_log: Value,
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: String,
}

impl SummaryRequest {
    /// Check the token and required fields, producing the row to store
    pub fn validate(self, expected_token: &str) -> Result<ChatLogEntry, ApiError> {
        if self.token != expected_token {
            return Err(ApiError::Unauthorized);
        }

        let name = self.name.trim();
        let email = self.email.trim();
        let client_id = self.client_id.trim();
        if name.is_empty() || email.is_empty() || client_id.is_empty() || is_blank(&self.chat_log)
        {
            return Err(ApiError::BadRequest("Missing required fields".to_string()));
        }

        Ok(ChatLogEntry::now(name, email, self.chat_log, client_id))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// POST /chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Status-only response used by /summary, / and /health
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}
