//! CLI command handlers module
//!
//! - serve: API server
//! - ingest: Knowledge ingestion
//! - ask: One-shot questions through the chat pipeline
//! - info: Configuration display

pub mod ask;
pub mod info;
pub mod ingest;
pub mod serve;

// Re-export all public handlers
pub use ask::*;
pub use info::*;
pub use ingest::*;
pub use serve::*;
