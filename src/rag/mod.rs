//! Retrieval and answer selection
//!
//! - [`matcher`]: cosine-similarity scan over a tenant's knowledge rows
//! - [`policy`]: grounded / greeting / fallback decision and prompt assembly
//! - [`pipeline`]: the end-to-end chat turn built on the two above
//!
//! # Examples
//!
//! ```rust,no_run
//! use convo247::config::AppConfig;
//! use convo247::rag::ChatService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = ChatService::from_config(&config)?;
//!
//!     let outcome = service.answer("acme", "What is your return window?").await?;
//!     println!("{} ({:?})", outcome.answer, outcome.branch);
//!
//!     Ok(())
//! }
//! ```

pub mod matcher;
pub mod pipeline;
pub mod policy;

pub use matcher::best_match;
pub use matcher::MatchResult;
pub use pipeline::ChatOutcome;
pub use pipeline::ChatService;
pub use policy::is_greeting;
pub use policy::ResponseBranch;
pub use policy::ResponsePolicy;
pub use policy::SIM_THRESHOLD;
