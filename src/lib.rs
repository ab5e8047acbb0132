pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod rag;
pub mod rate_limit;
pub mod tenant;

pub use config::AppConfig;
pub use errors::*;
