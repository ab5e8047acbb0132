//! API server handlers

use crate::AppConfig;
use crate::Result;

pub async fn handle_serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    use crate::api::serve_api;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("🚀 Starting convo247 API Server");
    println!("===============================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!(
        "🚦 Rate limit: {} requests / {}s per IP",
        config.rate_limit.limit, config.rate_limit.period_secs
    );
    println!();

    serve_api(config, host, port).await
}
