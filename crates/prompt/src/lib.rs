//! Prompt system for localrag.
//!
//! This crate provides:
//! - The retrieval-augmented prompt layout (Handlebars template)
//! - Optional YAML template overrides
//! - Instruction text persistence

pub mod builder;
pub mod instructions;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, format_context};
pub use instructions::{load_instructions, save_instructions, Instructions, DEFAULT_INSTRUCTIONS};
pub use loader::load_template;
pub use types::{BuiltPrompt, ContextDocument, PromptTemplate, DEFAULT_TEMPLATE};
