//! Command handlers for the localrag CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod formats;
pub mod index;
pub mod instructions;
pub mod learn;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use formats::FormatsCommand;
pub use index::IndexCommand;
pub use instructions::InstructionsCommand;
pub use learn::LearnCommand;
pub use search::SearchCommand;

use localrag_core::{
    config::{AppConfig, RefreshPolicy},
    AppResult,
};
use localrag_knowledge::{create_provider, Assistant, AssistantOptions, RebuildReport};
use localrag_llm::{create_client, Generator};

/// Build an assistant from the resolved configuration.
///
/// Each invocation is a single operation, so the index built during
/// initialization is never refreshed again.
pub async fn open_assistant(config: &AppConfig) -> AppResult<Assistant> {
    let embedder = create_provider(&config.embedding)?;

    let client = create_client(
        &config.generation.provider,
        config.generation.endpoint.as_deref(),
    )?;
    let generator = Generator::new(client, &config.generation.model)
        .with_max_tokens(config.generation.max_tokens)
        .with_temperature(config.generation.temperature);

    let options = AssistantOptions::from_config(config)?.with_refresh(RefreshPolicy::Manual);

    Assistant::initialize(options, embedder, generator).await
}

/// Print a rebuild summary with per-reason skip counts.
pub fn print_report(report: &RebuildReport) {
    println!(
        "Indexed {} file(s) in {:.2}s",
        report.indexed,
        report.duration.as_secs_f64()
    );

    if report.ignored_extensions > 0 {
        println!(
            "Ignored {} file(s) with unrecognized extensions",
            report.ignored_extensions
        );
    }

    if !report.skipped.is_empty() {
        println!("Skipped {} file(s):", report.skipped.len());
        for (kind, count) in report.skip_counts() {
            println!("  {}: {}", kind, count);
        }
    }
}
