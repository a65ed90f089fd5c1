//! Loader for YAML prompt template overrides.

use crate::types::PromptTemplate;
use localrag_core::{AppError, AppResult};
use std::path::Path;

impl PromptTemplate {
    /// Load a prompt template definition from a YAML file.
    ///
    /// # Example
    /// ```no_run
    /// use localrag_prompt::PromptTemplate;
    /// use std::path::Path;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let template = PromptTemplate::from_file(Path::new(".localrag/prompt.yaml"))?;
    /// println!("Loaded template: {}", template.id);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file(path: &Path) -> AppResult<Self> {
        tracing::debug!("Loading prompt template from: {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
        })?;

        let template: PromptTemplate = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
        })?;

        validate_template(&template)?;

        tracing::info!("Loaded prompt template: {} ({})", template.id, template.title);

        Ok(template)
    }
}

/// Load the template override at `path`, or the built-in template when absent.
///
/// A file that exists but is invalid is an error so that a typo never silently
/// falls back to the default layout.
pub fn load_template(path: &Path) -> AppResult<PromptTemplate> {
    if path.exists() {
        PromptTemplate::from_file(path)
    } else {
        Ok(PromptTemplate::default())
    }
}

fn validate_template(template: &PromptTemplate) -> AppResult<()> {
    if template.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if template.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !template.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            template.api_version
        )));
    }

    Ok(())
}
