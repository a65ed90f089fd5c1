//! Index command handler.

use super::print_report;
use clap::Args;
use localrag_core::{config::AppConfig, AppResult};
use localrag_knowledge::{create_provider, MemoryIndex};

/// Rebuild the index and report what was indexed or skipped
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// List every skipped file with its reason
    #[arg(long)]
    pub details: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command over {:?}", config.data_dir);

        let embedder = create_provider(&config.embedding)?;
        let mut index = MemoryIndex::new(embedder, config.index.clone());
        let report = index.rebuild(&config.data_dir).await?;

        if self.json {
            let output = serde_json::json!({
                "dataDir": config.data_dir,
                "dimensions": index.dimensions(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        print_report(&report);

        if self.details {
            for skipped in &report.skipped {
                println!("  {} ({})", skipped.path.display(), skipped.reason);
            }
        }

        Ok(())
    }
}
