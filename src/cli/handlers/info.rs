//! Information display handlers

use crate::cli::output::print_config;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::AppConfig;
use crate::Result;

pub fn handle_config(config: &AppConfig) -> Result<()> {
    print_config(config);
    println!();
    match config.validate() {
        Ok(()) => print_success("Configuration is ready to serve"),
        Err(e) => print_warning(&e.to_string()),
    }
    Ok(())
}
