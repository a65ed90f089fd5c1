//! Generation client factory.
//!
//! Resolves a provider name from configuration into a client implementation.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use crate::types::ProviderType;
use localrag_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let client = match endpoint {
                Some(base_url) => OllamaClient::with_base_url(base_url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        None => Err(AppError::Config(format!(
            "Unknown generation provider: {}",
            provider
        ))),
    }
}
