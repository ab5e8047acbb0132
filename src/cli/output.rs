//! CLI output formatting utilities

use crate::config::mask_secret;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

pub fn print_info(message: &str) {
    println!("ℹ️  {message}");
}

pub fn print_success(message: &str) {
    println!("✅ {message}");
}

pub fn print_warning(message: &str) {
    println!("⚠️  {message}");
}

/// Print the effective configuration, masking every secret
pub fn print_config(config: &AppConfig) {
    println!("📋 Configuration:");
    println!("  Server:            {}:{}", config.server.host, config.server.port);
    println!("  Static dir:        {}", config.server.static_dir);
    println!("  Configs dir:       {}", config.server.configs_dir);
    println!("  API token:         {}", mask_secret(config.api_token()));
    println!("  Datastore URL:     {}", config.datastore_url());
    println!(
        "  Datastore key:     {}",
        mask_secret(&config.datastore.service_key)
    );
    println!("  Knowledge table:   {}", config.datastore.knowledge_table);
    println!("  Log table:         {}", config.datastore.log_table);
    println!("  Tenant config URL: {}", config.tenants.config_url_base);
    println!("  LLM endpoint:      {}", config.llm_endpoint());
    println!("  Embedding model:   {}", config.llm.embedding_model);
    println!("  Chat model:        {}", config.llm.chat_model);
    println!("  Request timeout:   {}s", config.llm.request_timeout_secs);
    println!("  Key env prefix:    {}", config.llm.key_env_prefix);
    println!(
        "  Rate limit:        {} requests / {}s",
        config.rate_limit.limit, config.rate_limit.period_secs
    );
    println!("  Log level:         {}", config.logging.level);
}
