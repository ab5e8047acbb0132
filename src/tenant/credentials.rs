//! Per-tenant language-model credentials

use std::collections::HashMap;
use std::fmt;

/// A language-model API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building an authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential")
            .field(&crate::config::mask_secret(&self.0))
            .finish()
    }
}

/// Lookup of a tenant's credential
pub trait CredentialStore: Send + Sync {
    fn get(&self, client_id: &str) -> Option<Credential>;
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Credential store keyed by environment-variable naming convention.
///
/// Tenant `acme-corp` with prefix `OPENAI_API_KEY` is looked up as
/// `OPENAI_API_KEY_ACME_CORP`, then as plain `OPENAI_API_KEY`.
pub struct EnvCredentialStore {
    prefix: String,
    lookup: Lookup,
}

impl EnvCredentialStore {
    /// Read keys from the process environment at lookup time
    pub fn from_env(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Read keys from a fixed map of variable names
    pub fn from_map(prefix: impl Into<String>, vars: HashMap<String, String>) -> Self {
        Self {
            prefix: prefix.into(),
            lookup: Box::new(move |key| vars.get(key).cloned()),
        }
    }

    /// Variable name holding a specific tenant's key
    pub fn tenant_key_name(&self, client_id: &str) -> String {
        format!("{}_{}", self.prefix, normalize_client_id(client_id))
    }

    fn read(&self, key: &str) -> Option<Credential> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Credential::new)
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get(&self, client_id: &str) -> Option<Credential> {
        self.read(&self.tenant_key_name(client_id))
            .or_else(|| self.read(&self.prefix))
    }
}

/// Upper-case the id and replace every non-alphanumeric character with `_`
pub fn normalize_client_id(client_id: &str) -> String {
    client_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
