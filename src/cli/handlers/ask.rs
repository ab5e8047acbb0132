//! One-shot chat handler

use crate::cli::output::print_info;
use crate::cli::output::print_warning;
use crate::rag::ChatService;
use crate::tenant::ConfigOrigin;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask(config: &AppConfig, client_id: &str, question: &str, verbose: bool) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        print_warning("Please ask a question 🙂");
        return Ok(());
    }

    let service = ChatService::from_config(config)?;
    let outcome = service.answer(client_id, question).await?;

    if outcome.config_origin == ConfigOrigin::Defaulted {
        print_warning(&format!(
            "No config could be fetched for '{client_id}', defaults were used"
        ));
    }
    if verbose {
        print_info(&format!(
            "Branch: {:?} | best similarity: {:.3}",
            outcome.branch, outcome.score
        ));
    }

    println!("\n🤖 {}", outcome.answer);
    Ok(())
}
