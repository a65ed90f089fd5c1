//! Behavior tests spanning extraction, indexing and answering.


use async_trait::async_trait;
use localrag_core::{AppError, AppResult};
use localrag_llm::{Generator, LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::sync::{Arc, Mutex};

/// Generation client that echoes the prompt followed by a fixed answer, or
/// fails on demand. Records every prompt it receives.
pub(crate) struct EchoClient {
    answer: String,
    fail: bool,
    prompts: Mutex<Vec<String>>,
}

impl EchoClient {
    pub(crate) fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: String::new(),
            fail: true,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for EchoClient {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if self.fail {
            return Err(AppError::Llm("model runtime unavailable".to_string()));
        }
        Ok(LlmResponse {
            sequences: vec![format!("{} {}", request.prompt, self.answer)],
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

pub(crate) fn generator(client: Arc<EchoClient>) -> Generator {
    Generator::new(client, "test-model")
}
