use anyhow::Context;
use clap::Parser;
use convo247::cli::handle_ask;
use convo247::cli::handle_config;
use convo247::cli::handle_ingest;
use convo247::cli::handle_serve;
use convo247::cli::Cli;
use convo247::cli::Commands;
use convo247::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in deployed environments
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    // Initialize logging
    if cli.verbose {
        convo247::logging::init_logging_with_level("debug")?;
    } else {
        convo247::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve { host, port } => handle_serve(&config, host, port).await?,
        Commands::Ingest { client_id, file } => handle_ingest(&config, &client_id, &file).await?,
        Commands::Ask {
            client_id,
            question,
        } => handle_ask(&config, &client_id, &question, cli.verbose).await?,
        Commands::Config => handle_config(&config)?,
    }

    Ok(())
}
