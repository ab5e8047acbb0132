//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "convo247")]
#[command(about = "Multi-tenant knowledge-base chatbot backend")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Embed a knowledge file and store it for a client
    Ingest {
        /// Client (tenant) identifier
        #[arg(long)]
        client_id: String,
        /// Text file whose content becomes one knowledge entry
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Ask a client's chatbot a question from the terminal
    Ask {
        /// Client (tenant) identifier
        #[arg(long)]
        client_id: String,
        /// The question to ask
        question: String,
    },
    /// Show current configuration with secrets masked
    Config,
}
