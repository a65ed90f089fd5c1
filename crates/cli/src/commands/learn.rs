//! Learn command handler.
//!
//! Appends text to a completions file inside the data directory so later
//! questions can retrieve it.

use super::{open_assistant, print_report};
use clap::Args;
use localrag_core::{config::AppConfig, AppError, AppResult};

/// Append text to the completions file and re-index
#[derive(Args, Debug)]
pub struct LearnCommand {
    /// Text to remember
    pub text: String,

    /// Completions file name inside the data directory
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LearnCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing learn command");

        let mut assistant = open_assistant(config).await?;
        let outcome = assistant
            .add_completion(&self.text, self.file.as_deref())
            .await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else if let Some(report) = &outcome.rebuild {
            print_report(report);
        }

        if !outcome.persisted {
            return Err(AppError::Other(format!(
                "Failed to append to {}",
                self.file.as_deref().unwrap_or(&config.completions_file)
            )));
        }

        Ok(())
    }
}
