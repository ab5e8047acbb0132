use convo247::config::mask_secret;
use convo247::tenant::credentials::normalize_client_id;
use convo247::AppConfig;
use convo247::Result;

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    println!("🔍 Checking configuration...");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ Configuration error: {e}");
            println!("\n💡 To fix this:");
            println!("  1. Copy config.example.toml to config.toml");
            println!("  2. Fill in the datastore and token settings (or export them as env vars)");
            println!("  3. Run this check again");
            return Err(e);
        }
    };

    println!("📋 Configuration details:");
    println!("  Datastore: {}", mask_url(config.datastore_url()));
    println!("  Datastore key: {}", mask_secret(&config.datastore.service_key));
    println!("  API token: {}", mask_secret(config.api_token()));
    println!("  Tenant configs: {}", config.tenants.config_url_base);
    println!("  LLM endpoint: {}", config.llm_endpoint());

    let prefix = &config.llm.key_env_prefix;
    match std::env::var(prefix) {
        Ok(key) if !key.trim().is_empty() => {
            println!("  Default LLM key ({prefix}): {}", mask_secret(&key));
        }
        _ => println!("  Default LLM key ({prefix}): not set, every tenant needs its own"),
    }

    // Report tenant-specific keys by naming convention
    let tenant_prefix = format!("{prefix}_");
    let mut tenant_keys: Vec<String> = std::env::vars()
        .map(|(name, _)| name)
        .filter(|name| name.starts_with(&tenant_prefix))
        .collect();
    tenant_keys.sort();
    for name in &tenant_keys {
        println!("  Tenant key: {name}");
    }
    if let Ok(id) = std::env::var("CHECK_CLIENT_ID") {
        println!(
            "  Key for '{id}' would be read from {prefix}_{}",
            normalize_client_id(&id)
        );
    }

    config.validate()?;
    println!("\n🎉 Configuration check completed successfully!");
    Ok(())
}

/// Mask a URL for display (hide credentials and path)
fn mask_url(url: &str) -> String {
    if url.is_empty() {
        return "❌ not set".to_string();
    }
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}", parsed.scheme(), host),
            None => "***masked***".to_string(),
        },
        Err(_) => "***invalid***".to_string(),
    }
}
