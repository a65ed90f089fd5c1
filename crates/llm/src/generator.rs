//! Prompt-in, text-out generation contract used by the assistant.

use crate::client::{LlmClient, LlmRequest};
use localrag_core::AppResult;
use std::sync::Arc;

/// Returned in place of an answer when the generation call fails.
pub const GENERATION_ERROR: &str = "Error generating completion.";

/// Default generation length, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 200;

/// Wraps an [`LlmClient`] with the assistant's generation policy.
///
/// Exactly one sequence is requested. Providers that echo the prompt have the
/// echoed prefix removed, and any failure degrades to [`GENERATION_ERROR`].
#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn LlmClient>,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl Generator {
    /// Create a generator for a model with the default generation length.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model identifier used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Provider name of the wrapped client.
    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Generate a completion for `prompt`. Never fails.
    pub async fn generate(&self, prompt: &str) -> String {
        tracing::info!(
            "Generating completion with prompt of length {}",
            prompt.len()
        );

        match self.try_generate(prompt).await {
            Ok(completion) => {
                tracing::debug!("Generated completion: {}", completion);
                completion
            }
            Err(e) => {
                tracing::error!("Error during text generation: {}", e);
                GENERATION_ERROR.to_string()
            }
        }
    }

    async fn try_generate(&self, prompt: &str) -> AppResult<String> {
        let mut request = LlmRequest::new(prompt, &self.model).with_max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.client.complete(&request).await?;
        let text = response.first().ok_or_else(|| {
            localrag_core::AppError::Llm("Provider returned no sequences".to_string())
        })?;

        Ok(strip_echoed_prompt(text, prompt))
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("provider", &self.client.provider_name())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Remove the prompt if the provider echoed it in front of the completion.
fn strip_echoed_prompt(generated: &str, prompt: &str) -> String {
    generated
        .strip_prefix(prompt)
        .unwrap_or(generated)
        .trim()
        .to_string()
}
