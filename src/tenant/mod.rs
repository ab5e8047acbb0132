//! Tenant resolution
//!
//! A tenant is identified by its `client_id`. Resolving one yields:
//! - its [`TenantConfig`] (persona name, brand, support URL), fetched on every
//!   request from a [`TenantConfigSource`] and replaced by defaults on failure
//! - its language-model [`Credential`], read from a [`CredentialStore`]

pub mod credentials;
pub mod source;

use std::sync::Arc;

pub use credentials::Credential;
pub use credentials::CredentialStore;
pub use credentials::EnvCredentialStore;
use serde::Deserialize;
use serde::Serialize;
pub use source::HttpConfigSource;
pub use source::TenantConfigSource;
use tracing::debug;
use tracing::warn;

use crate::errors::ConvoError;
use crate::errors::Result;

/// Per-tenant persona and support settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    #[serde(default, rename = "client_id")]
    pub client_id: String,
    #[serde(default = "default_chatbot_name")]
    pub chatbot_name: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default = "default_support_url")]
    pub support_url: String,
}

fn default_chatbot_name() -> String {
    "Chatbot".to_string()
}

fn default_support_url() -> String {
    "#".to_string()
}

impl TenantConfig {
    /// Hard-coded configuration used when a tenant's config cannot be fetched
    pub fn fallback(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            chatbot_name: default_chatbot_name(),
            brand_name: String::new(),
            support_url: default_support_url(),
        }
    }
}

/// Where a resolved config came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Fetched,
    Defaulted,
}

/// Resolves tenant configuration and credentials
#[derive(Clone)]
pub struct TenantResolver {
    source: Arc<dyn TenantConfigSource>,
    credentials: Arc<dyn CredentialStore>,
}

impl TenantResolver {
    pub fn new(
        source: Arc<dyn TenantConfigSource>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            source,
            credentials,
        }
    }

    /// Resolve a tenant's config, substituting defaults on any fetch failure
    pub async fn resolve_config(&self, client_id: &str) -> (TenantConfig, ConfigOrigin) {
        match self.source.fetch(client_id).await {
            Ok(mut config) => {
                if config.client_id.is_empty() {
                    config.client_id = client_id.to_string();
                }
                debug!("Loaded config for client '{}': {}", client_id, config.chatbot_name);
                (config, ConfigOrigin::Fetched)
            }
            Err(e) => {
                warn!("Using default config for client '{}': {}", client_id, e);
                (TenantConfig::fallback(client_id), ConfigOrigin::Defaulted)
            }
        }
    }

    /// Resolve a tenant's language-model credential.
    ///
    /// A missing credential is a configuration error, not a transient one.
    pub fn resolve_credential(&self, client_id: &str) -> Result<Credential> {
        self.credentials
            .get(client_id)
            .ok_or_else(|| ConvoError::MissingCredential(client_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::FetchError;

    struct StaticSource(Option<TenantConfig>);

    #[async_trait]
    impl TenantConfigSource for StaticSource {
        async fn fetch(&self, client_id: &str) -> std::result::Result<TenantConfig, FetchError> {
            self.0
                .clone()
                .ok_or_else(|| FetchError::NotFound(client_id.to_string()))
        }
    }

    fn resolver(config: Option<TenantConfig>, keys: &[(&str, &str)]) -> TenantResolver {
        let vars: HashMap<String, String> = keys
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        TenantResolver::new(
            Arc::new(StaticSource(config)),
            Arc::new(EnvCredentialStore::from_map("OPENAI_API_KEY", vars)),
        )
    }

    #[test]
    fn test_config_json_shape() {
        let config: TenantConfig = serde_json::from_str(
            r#"{"chatbotName":"Ava","brandName":"Acme","supportUrl":"https://acme.test/help","theme":"dark"}"#,
        )
        .unwrap();
        assert_eq!(config.chatbot_name, "Ava");
        assert_eq!(config.brand_name, "Acme");
        assert_eq!(config.support_url, "https://acme.test/help");
        assert!(config.client_id.is_empty());
    }

    #[test]
    fn test_partial_config_gets_defaults() {
        let config: TenantConfig = serde_json::from_str(r#"{"brandName":"Acme"}"#).unwrap();
        assert_eq!(config.chatbot_name, "Chatbot");
        assert_eq!(config.support_url, "#");
    }

    #[tokio::test]
    async fn test_resolve_config_fetched() {
        let fetched = TenantConfig {
            client_id: String::new(),
            chatbot_name: "Ava".to_string(),
            brand_name: "Acme".to_string(),
            support_url: "https://acme.test".to_string(),
        };
        let (config, origin) = resolver(Some(fetched), &[]).resolve_config("acme").await;
        assert_eq!(origin, ConfigOrigin::Fetched);
        assert_eq!(config.client_id, "acme");
        assert_eq!(config.chatbot_name, "Ava");
    }

    #[tokio::test]
    async fn test_resolve_config_defaults_on_failure() {
        let (config, origin) = resolver(None, &[]).resolve_config("acme").await;
        assert_eq!(origin, ConfigOrigin::Defaulted);
        assert_eq!(config, TenantConfig::fallback("acme"));
    }

    #[test]
    fn test_resolve_credential_missing_is_error() {
        let err = resolver(None, &[]).resolve_credential("acme").unwrap_err();
        assert!(matches!(err, ConvoError::MissingCredential(id) if id == "acme"));
    }

    #[test]
    fn test_resolve_credential_prefers_tenant_key() {
        let r = resolver(
            None,
            &[("OPENAI_API_KEY", "global"), ("OPENAI_API_KEY_ACME", "tenant")],
        );
        assert_eq!(r.resolve_credential("acme").unwrap().expose(), "tenant");
        assert_eq!(r.resolve_credential("other").unwrap().expose(), "global");
    }
}
