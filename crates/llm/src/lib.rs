//! Generation provider integration for localrag.
//!
//! This crate provides a provider-agnostic abstraction for the causal language
//! model that turns a composed prompt into an answer. The assistant only
//! depends on the narrow [`Generator`] contract: prompt in, text out, with
//! failures degraded to a fixed sentinel string.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//!
//! # Example
//! ```no_run
//! use localrag_llm::{Generator, OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let generator = Generator::new(Arc::new(OllamaClient::new()), "mistral");
//! let answer = generator.generate("Question: What is Rust?\nAnswer:").await;
//! println!("{}", answer);
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generator;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use generator::{Generator, GENERATION_ERROR};
pub use providers::OllamaClient;
pub use types::ProviderType;
