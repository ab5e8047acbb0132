//! Complete chat pipeline: Resolve -> Embed -> Match -> Respond

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::matcher::best_match;
use super::policy::ResponseBranch;
use super::policy::ResponsePolicy;
use crate::config::AppConfig;
use crate::errors::ConvoError;
use crate::errors::Result;
use crate::knowledge::KnowledgeEntry;
use crate::knowledge::KnowledgeStore;
use crate::knowledge::SupabaseStore;
use crate::llm::LanguageModel;
use crate::llm::OpenAiClient;
use crate::tenant::ConfigOrigin;
use crate::tenant::EnvCredentialStore;
use crate::tenant::HttpConfigSource;
use crate::tenant::TenantResolver;

/// Result of one chat turn
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub answer: String,
    pub branch: ResponseBranch,
    pub score: f64,
    pub config_origin: ConfigOrigin,
}

/// Chat service wiring the resolver, datastore and language model together
#[derive(Clone)]
pub struct ChatService {
    resolver: TenantResolver,
    store: Arc<dyn KnowledgeStore>,
    llm: Arc<dyn LanguageModel>,
    policy: ResponsePolicy,
    call_timeout: Duration,
}

impl ChatService {
    pub fn new(
        resolver: TenantResolver,
        store: Arc<dyn KnowledgeStore>,
        llm: Arc<dyn LanguageModel>,
        call_timeout: Duration,
    ) -> Self {
        let policy = ResponsePolicy::new(llm.clone());
        Self {
            resolver,
            store,
            llm,
            policy,
            call_timeout,
        }
    }

    /// Build the production service from configuration
    ///
    /// # Errors
    /// - HTTP client construction failures
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = config.request_timeout();
        let resolver = TenantResolver::new(
            Arc::new(HttpConfigSource::new(
                config.tenants.config_url_base.clone(),
                timeout,
            )?),
            Arc::new(EnvCredentialStore::from_env(config.llm.key_env_prefix.clone())),
        );
        let store: Arc<dyn KnowledgeStore> = Arc::new(SupabaseStore::from_config(config)?);
        let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::from_config(config)?);

        // Slightly above the HTTP client timeout so the client reports first
        Ok(Self::new(resolver, store, llm, timeout + Duration::from_secs(5)))
    }

    /// The datastore this service reads from
    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    /// Answer one question for one tenant
    ///
    /// # Errors
    /// - Missing credential for the tenant
    /// - Embedding, datastore or completion failures, including timeouts
    pub async fn answer(&self, client_id: &str, question: &str) -> Result<ChatOutcome> {
        info!("Processing chat for client '{}'", client_id);

        let (config, config_origin) = self.resolver.resolve_config(client_id).await;
        let credential = self.resolver.resolve_credential(client_id)?;

        // Both must finish before the scan; they are independent of each other
        debug!("Embedding question and loading knowledge rows");
        let (query_embedding, entries) = tokio::try_join!(
            self.bounded("embedding", self.llm.embed(&credential, question)),
            self.bounded("knowledge fetch", self.store.entries_for(client_id)),
        )?;

        let matched = best_match(&query_embedding, &entries);
        debug!(
            "Best match for client '{}' over {} rows: {:.3}",
            client_id,
            entries.len(),
            matched.score
        );

        let (branch, answer) = self
            .bounded(
                "completion",
                self.policy.answer(&credential, question, &config, &matched),
            )
            .await?;

        info!("Answered client '{}' via {:?} branch", client_id, branch);

        Ok(ChatOutcome {
            answer,
            branch,
            score: matched.score,
            config_origin,
        })
    }

    /// Embed `content` with the tenant's credential and store it as a new row
    pub async fn ingest(&self, client_id: &str, content: &str) -> Result<KnowledgeEntry> {
        let credential = self.resolver.resolve_credential(client_id)?;
        let embedding = self
            .bounded("embedding", self.llm.embed(&credential, content))
            .await?;

        let entry = KnowledgeEntry::new(client_id, content, &embedding);
        self.bounded("knowledge insert", self.store.insert_entry(&entry))
            .await?;

        info!(
            "Ingested {} chars ({} dims) for client '{}'",
            content.len(),
            embedding.len(),
            client_id
        );
        Ok(entry)
    }

    async fn bounded<T>(&self, what: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} timed out after {:?}", what, self.call_timeout);
                Err(ConvoError::Timeout(self.call_timeout.as_secs()))
            }
        }
    }
}
