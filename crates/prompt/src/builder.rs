//! Prompt builder for rendering the retrieval-augmented prompt.

use crate::types::{BuiltPrompt, ContextDocument, PromptTemplate};
use handlebars::Handlebars;
use localrag_core::{AppError, AppResult};
use std::collections::HashMap;

/// Format retrieved documents as the prompt context.
///
/// Each document becomes `File: {identity}\nContent:\n{content}`; blocks are
/// separated by a blank line.
pub fn format_context(documents: &[ContextDocument<'_>]) -> String {
    documents
        .iter()
        .map(|doc| format!("File: {}\nContent:\n{}", doc.identity, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build a prompt from instructions, retrieved documents and the question.
///
/// # Example
/// ```
/// use localrag_prompt::{build_prompt, ContextDocument, PromptTemplate};
///
/// let docs = [ContextDocument { identity: "/notes/a.txt", content: "alpha" }];
/// let built = build_prompt(&PromptTemplate::default(), "Be terse.", &docs, "What is a?").unwrap();
/// assert!(built.text.starts_with("Instructions: Be terse."));
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    instructions: &str,
    documents: &[ContextDocument<'_>],
    question: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        "Building prompt '{}' with {} context documents",
        template.id,
        documents.len()
    );

    let mut variables = HashMap::new();
    variables.insert("instructions", instructions.to_string());
    variables.insert("context", format_context(documents));
    variables.insert("question", question.to_string());

    let text = render_template(&template.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        template_id: template.id.clone(),
        document_count: documents.len(),
    })
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<&str, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
