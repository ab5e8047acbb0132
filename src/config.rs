use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Directory holding `<client_id>.json` tenant config files
    #[serde(default = "default_configs_dir")]
    pub configs_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_configs_dir() -> String {
    "configs".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            configs_dir: default_configs_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret every chat/summary request must carry
    #[serde(default)]
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub service_key: String,
    #[serde(default = "default_knowledge_table")]
    pub knowledge_table: String,
    #[serde(default = "default_log_table")]
    pub log_table: String,
}

fn default_knowledge_table() -> String {
    "client_knowledge_base".to_string()
}

fn default_log_table() -> String {
    "client_conversations".to_string()
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            knowledge_table: default_knowledge_table(),
            log_table: default_log_table(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantsConfig {
    /// Base URL; a tenant's config lives at `<base>/<client_id>.json`
    #[serde(default = "default_config_url_base")]
    pub config_url_base: String,
}

fn default_config_url_base() -> String {
    "https://two47convo.onrender.com/configs".to_string()
}

impl Default for TenantsConfig {
    fn default() -> Self {
        Self {
            config_url_base: default_config_url_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Environment variable prefix used to look up per-tenant keys
    #[serde(default = "default_key_env_prefix")]
    pub key_env_prefix: String,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_key_env_prefix() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            embedding_model: default_embedding_model(),
            chat_model: default_chat_model(),
            request_timeout_secs: default_request_timeout_secs(),
            key_env_prefix: default_key_env_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per key within one period
    #[serde(default = "default_rate_limit")]
    pub limit: usize,
    /// Window length in seconds
    #[serde(default = "default_rate_period")]
    pub period_secs: u64,
}

fn default_rate_limit() -> usize {
    30
}

fn default_rate_period() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_rate_limit(),
            period_secs: default_rate_period(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub datastore: DatastoreConfig,
    #[serde(default)]
    pub tenants: TenantsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default file locations, then apply
    /// environment overrides.
    ///
    /// `config.toml` wins over `config.example.toml`; with neither present the
    /// built-in defaults are used and the environment must supply the rest.
    pub fn load() -> crate::Result<Self> {
        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit path, then apply environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from an environment-style lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SUPABASE_URL") {
            self.datastore.url = v;
        }
        if let Some(v) = get("SUPABASE_SERVICE_ROLE_KEY") {
            self.datastore.service_key = v;
        }
        if let Some(v) = get("SUPABASE_TABLE_NAME_KB") {
            self.datastore.knowledge_table = v;
        }
        if let Some(v) = get("SUPABASE_TABLE_NAME_LOG") {
            self.datastore.log_table = v;
        }
        if let Some(v) = get("API_TOKEN") {
            self.auth.api_token = v;
        }
        if let Some(v) = get("CONFIG_URL_BASE") {
            self.tenants.config_url_base = v;
        }
        if let Some(v) = get("CONVO_HOST") {
            self.server.host = v;
        }
        if let Some(port) = get("CONVO_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let mut missing = Vec::new();
        if self.datastore.url.is_empty() {
            missing.push("SUPABASE_URL");
        }
        if self.datastore.service_key.is_empty() {
            missing.push("SUPABASE_SERVICE_ROLE_KEY");
        }
        if self.auth.api_token.is_empty() {
            missing.push("API_TOKEN");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(crate::ConvoError::ConfigError(format!(
                "missing critical settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// Get the shared API token
    pub fn api_token(&self) -> &str {
        &self.auth.api_token
    }

    /// Get the datastore base URL
    pub fn datastore_url(&self) -> &str {
        &self.datastore.url
    }

    /// Get the LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get the outbound request timeout
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.llm.request_timeout_secs)
    }
}

/// Mask a secret for display, keeping the first and last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        "NONE".to_string()
    } else if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}
