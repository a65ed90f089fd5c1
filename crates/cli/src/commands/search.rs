//! Search command handler.
//!
//! Shows retrieval results without calling the generator.

use super::open_assistant;
use clap::Args;
use localrag_core::{config::AppConfig, AppResult};

/// Show the documents most similar to a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Maximum number of results (default: retrieval.top_n)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let mut assistant = open_assistant(config).await?;
        let top_n = self.top_n.unwrap_or_else(|| assistant.default_top_n());
        let hits = assistant.search(&self.query, top_n).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&hits)?);
            return Ok(());
        }

        if hits.is_empty() {
            println!("No matching documents");
            return Ok(());
        }

        for (rank, hit) in hits.iter().enumerate() {
            println!("{}. {} (score: {:.3})", rank + 1, hit.identity, hit.score);
        }

        Ok(())
    }
}
