//! Formats command handler.

use clap::Args;
use localrag_core::{config::AppConfig, AppResult};
use localrag_knowledge::{extract::UNSUPPORTED_EXTENSIONS, TextExtractor};

/// List the document formats this build can read
#[derive(Args, Debug)]
pub struct FormatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FormatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let extractor = TextExtractor::new(config.index.max_file_size);
        let formats: Vec<_> = extractor
            .registry()
            .supported_formats()
            .into_iter()
            .map(|format| (format.as_str(), format.extensions()))
            .collect();

        if self.json {
            let output = serde_json::json!({
                "maxFileSize": extractor.max_file_size(),
                "formats": formats
                    .iter()
                    .map(|(name, extensions)| serde_json::json!({
                        "format": name,
                        "extensions": extensions,
                    }))
                    .collect::<Vec<_>>(),
                "unsupported": UNSUPPORTED_EXTENSIONS,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Readable formats:");
        for (name, extensions) in &formats {
            println!("  {:<14} .{}", name, extensions.join(", ."));
        }
        println!(
            "Recognized but not readable: .{}",
            UNSUPPORTED_EXTENSIONS.join(", .")
        );
        println!("Files over {} bytes are skipped", extractor.max_file_size());

        Ok(())
    }
}
