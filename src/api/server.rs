//! HTTP server implementation

use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::mask_secret;
use crate::config::AppConfig;
use crate::rag::ChatService;
use crate::rate_limit::RateLimiter;
use crate::Result;

/// Assemble the full application: API routes, static assets, CORS and tracing
pub fn build_app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    // Any origin, no credentials, so browsers accept the wildcard header
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_routes(state)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16) -> Result<()> {
    info!("🚀 Starting convo247 API server...");
    config.validate()?;

    info!(
        "🔧 Datastore {} | KB table {} | Log table {} | API token {}",
        config.datastore_url(),
        config.datastore.knowledge_table,
        config.datastore.log_table,
        mask_secret(config.api_token())
    );
    info!("🧩 Tenant configs from {}", config.tenants.config_url_base);

    let state = AppState {
        chat_service: Arc::new(ChatService::from_config(config)?),
        rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
        api_token: Arc::from(config.api_token()),
        configs_dir: PathBuf::from(&config.server.configs_dir),
    };

    let app = build_app(state, &config.server.static_dir);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /                     - Liveness");
    info!("  GET  /health               - Health check");
    info!("  POST /chat                 - Ask a tenant's chatbot");
    info!("  POST /summary              - Store a chat transcript");
    info!("  GET  /configs/<id>.json    - Tenant widget config");
    info!("  GET  /static/*             - Widget assets");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("👋 API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
