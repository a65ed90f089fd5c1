//! Ask command handler.
//!
//! Answers a question with the best matching documents as context.

use super::open_assistant;
use clap::Args;
use localrag_core::{config::AppConfig, AppError, AppResult};

/// Answer a question from the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Number of documents placed in the context (default: retrieval.top_n)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Print the prompt sent to the generator before the answer
    #[arg(long)]
    pub show_prompt: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        if self.question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let mut assistant = open_assistant(config).await?;
        let top_n = self.top_n.unwrap_or_else(|| assistant.default_top_n());

        let answer = assistant.query_detailed(&self.question, top_n).await?;

        if self.json {
            let output = serde_json::to_value(&answer)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if self.show_prompt {
            println!("Prompt:");
            println!("{}", answer.prompt);
            println!();
        }

        println!("{}", answer.text);

        if !answer.sources.is_empty() {
            println!();
            println!("Sources:");
            for hit in &answer.sources {
                println!("- {} ({:.3})", hit.identity, hit.score);
            }
        }

        Ok(())
    }
}
