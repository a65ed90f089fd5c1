//! Prompt types for localrag.

use serde::{Deserialize, Serialize};

/// The prompt layout used when no override is configured.
pub const DEFAULT_TEMPLATE: &str =
    "Instructions: {{instructions}}\n\nContext: {{context}}\n\nQuestion: {{question}}\nAnswer:";

/// A prompt template, either built-in or loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptTemplate {
    /// Template identifier
    pub id: String,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,

    /// Template string with Handlebars syntax.
    ///
    /// Available variables: `instructions`, `context`, `question`.
    pub template: String,
}

fn default_api_version() -> String {
    "1.0".to_string()
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            id: "rag.default".to_string(),
            title: "Retrieval-augmented answer".to_string(),
            api_version: default_api_version(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// One retrieved document placed in the prompt context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextDocument<'a> {
    /// Document identity (file path)
    pub identity: &'a str,

    /// Extracted text
    pub content: &'a str,
}

/// A fully built prompt ready for generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Source template ID
    #[serde(rename = "templateId")]
    pub template_id: String,

    /// Number of context documents included
    #[serde(rename = "documentCount")]
    pub document_count: usize,
}
