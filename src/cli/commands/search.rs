//! Search command handler

use crate::config::Config;
use crate::search::SearchFilter;
use crate::state::SharedState;

const PREVIEW_CHARS: usize = 100;

pub async fn cmd_search(
    config: &Config,
    query: &str,
    company: Option<String>,
    document_type: Option<String>,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let filter = SearchFilter {
        term: Some(query.to_string()),
        company,
        document_type,
    };
    let outcome = state.phrase_service.search(&filter).await?;

    println!("Companies:      {}", outcome.facets.companies.join(", "));
    println!("Document types: {}", outcome.facets.document_types.join(", "));
    println!();

    if outcome.results.is_empty() {
        println!("No phrases found matching '{query}'");
        return Ok(());
    }

    println!("Results ({} total)", outcome.total);
    println!("{:-<70}", "");

    for phrase in &outcome.results {
        println!(
            "[{}] {} | {} | {}",
            phrase.id, phrase.company, phrase.document_type, phrase.reason
        );

        let preview: String = phrase.content.chars().take(PREVIEW_CHARS).collect();
        if phrase.content.chars().count() > PREVIEW_CHARS {
            println!("    {preview}...");
        } else {
            println!("    {preview}");
        }
    }

    Ok(())
}
