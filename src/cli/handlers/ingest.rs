//! Knowledge ingestion handler

use std::path::Path;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::truncate_str;
use crate::errors::ConvoError;
use crate::rag::ChatService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ingest(config: &AppConfig, client_id: &str, file: &Path) -> Result<()> {
    let content = tokio::fs::read_to_string(file).await?;
    let content = content.trim();
    if content.is_empty() {
        return Err(ConvoError::Custom(format!(
            "{} is empty, nothing to ingest",
            file.display()
        )));
    }

    print_info(&format!(
        "Creating embedding for {} ({} chars) as client '{client_id}'...",
        file.display(),
        content.chars().count()
    ));

    print_info(&format!("Preview: {}", truncate_str(content, 80)));

    let service = ChatService::from_config(config)?;
    let entry = service.ingest(client_id, content).await?;

    let dims = entry.embedding.as_array().map_or(0, Vec::len);
    print_success(&format!(
        "Uploaded to {} ({dims}-dimensional embedding)",
        config.datastore.knowledge_table
    ));
    Ok(())
}
