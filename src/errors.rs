use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No language-model credential configured for client '{0}'")]
    MissingCredential(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Datastore error: {0}")]
    DatastoreError(String),

    #[error("Tenant config error: {0}")]
    TenantConfig(#[from] FetchError),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<reqwest::Error> for ConvoError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

/// Failure to retrieve a tenant's configuration document.
///
/// Kept separate from [`ConvoError`] so the resolver's caller can tell a
/// fetched config apart from one that fell back to defaults.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed config body: {0}")]
    Malformed(String),

    #[error("config not found for client '{0}'")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ConvoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvoError::MissingCredential("acme".to_string());
        assert_eq!(
            err.to_string(),
            "No language-model credential configured for client 'acme'"
        );

        let err = ConvoError::Timeout(30);
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }

    #[test]
    fn test_fetch_error_converts() {
        let err: ConvoError = FetchError::Status {
            status: 404,
            url: "http://configs/acme.json".to_string(),
        }
        .into();
        assert!(matches!(err, ConvoError::TenantConfig(_)));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConvoError = io.into();
        assert!(matches!(err, ConvoError::Io(_)));
    }
}
