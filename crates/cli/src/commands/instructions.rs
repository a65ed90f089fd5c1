//! Instructions command handler.

use clap::{Args, Subcommand};
use localrag_core::{config::AppConfig, AppError, AppResult};
use localrag_prompt::Instructions;

/// Show or replace the assistant instructions
#[derive(Args, Debug)]
pub struct InstructionsCommand {
    #[command(subcommand)]
    pub action: Option<InstructionsAction>,
}

#[derive(Subcommand, Debug)]
pub enum InstructionsAction {
    /// Print the current instructions (default)
    Show,
    /// Replace the instructions and save them
    Set {
        /// New instruction text
        text: String,
    },
}

impl InstructionsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut instructions = Instructions::load(config.instructions_path());

        match &self.action {
            None | Some(InstructionsAction::Show) => {
                println!("{}", instructions.text());
            }
            Some(InstructionsAction::Set { text }) => {
                if !instructions.set(text) {
                    return Err(AppError::Other(format!(
                        "Failed to save instructions to {:?}",
                        instructions.path()
                    )));
                }
                println!("Instructions saved to {}", instructions.path().display());
            }
        }

        Ok(())
    }
}
