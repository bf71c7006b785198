//! Prompt types for docqa.

use docqa_core::Mode;
use serde::{Deserialize, Serialize};

/// A prompt definition, built in or loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Mode this prompt answers in
    pub mode: Mode,

    /// System instruction sent alongside the rendered template
    #[serde(default)]
    pub system: Option<String>,

    /// Template string with Handlebars syntax (`{{question}}`, `{{context}}`)
    pub template: String,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Mode the prompt was rendered for
    pub mode: Mode,
}
