//! CLI module for the `convo247` binary
//!
//! - Command line argument parsing
//! - Command handlers (one per subcommand in handlers/)
//! - Output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::*;
pub use handlers::*;
