//! Prompt table for rendering mode-specific templates.
//!
//! Templates are compiled into a single Handlebars registry when the table is
//! built, so answering a question only renders; it never parses.

use crate::defaults::default_definition;
use crate::types::{BuiltPrompt, PromptDefinition};
use docqa_core::{AppError, AppResult, Mode};
use handlebars::Handlebars;
use serde::Serialize;

/// Variables available to every template.
#[derive(Serialize)]
struct TemplateData<'a> {
    question: &'a str,
    context: &'a str,
}

/// Compiled instruction templates, one per mode.
pub struct PromptTable {
    registry: Handlebars<'static>,
    fact_system: Option<String>,
    summary_system: Option<String>,
    analysis_system: Option<String>,
}

impl PromptTable {
    /// Build the table from the built-in definitions.
    pub fn new() -> AppResult<Self> {
        Self::with_overrides(Vec::new())
    }

    /// Build the table, replacing built-in definitions with `overrides`.
    ///
    /// Each override replaces the definition for its own `mode`; modes with
    /// no override keep the built-in template.
    pub fn with_overrides(overrides: Vec<PromptDefinition>) -> AppResult<Self> {
        let mut fact = default_definition(Mode::Fact);
        let mut summary = default_definition(Mode::Summary);
        let mut analysis = default_definition(Mode::Analysis);

        for definition in overrides {
            tracing::debug!("Using prompt override {} for {}", definition.id, definition.mode);
            match definition.mode {
                Mode::Fact => fact = definition,
                Mode::Summary => summary = definition,
                Mode::Analysis => analysis = definition,
            }
        }

        let mut registry = Handlebars::new();

        // Disable HTML escaping for plain text
        registry.register_escape_fn(handlebars::no_escape);

        for definition in [&fact, &summary, &analysis] {
            registry
                .register_template_string(definition.mode.as_str(), &definition.template)
                .map_err(|e| {
                    AppError::Prompt(format!(
                        "Failed to register template {}: {}",
                        definition.id, e
                    ))
                })?;
        }

        Ok(Self {
            registry,
            fact_system: fact.system,
            summary_system: summary.system,
            analysis_system: analysis.system,
        })
    }

    /// System instruction for `mode`.
    pub fn system(&self, mode: Mode) -> Option<&str> {
        match mode {
            Mode::Fact => self.fact_system.as_deref(),
            Mode::Summary => self.summary_system.as_deref(),
            Mode::Analysis => self.analysis_system.as_deref(),
        }
    }

    /// Render the template for `mode` with the question and context block.
    pub fn render(&self, mode: Mode, question: &str, context: &str) -> AppResult<BuiltPrompt> {
        let user = self
            .registry
            .render(mode.as_str(), &TemplateData { question, context })
            .map_err(|e| AppError::Prompt(format!("Failed to render {} template: {}", mode, e)))?;

        Ok(BuiltPrompt {
            system: self.system(mode).map(str::to_string),
            user,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(mode: Mode, template: &str) -> PromptDefinition {
        PromptDefinition {
            id: format!("test.{}", mode),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            mode,
            system: None,
            template: template.to_string(),
        }
    }

    #[test]
    fn test_render_default_fact_prompt() {
        let table = PromptTable::new().unwrap();
        let built = table
            .render(Mode::Fact, "When is the meeting?", "The meeting is on March 3rd.")
            .unwrap();

        assert_eq!(built.mode, Mode::Fact);
        assert!(built.user.contains("When is the meeting?"));
        assert!(built.user.contains("The meeting is on March 3rd."));
        assert!(built.system.is_some());
    }

    #[test]
    fn test_context_is_not_html_escaped() {
        let table = PromptTable::new().unwrap();
        let built = table
            .render(Mode::Summary, "Summarize", "revenue < costs & \"margins\"")
            .unwrap();
        assert!(built.user.contains("revenue < costs & \"margins\""));
    }

    #[test]
    fn test_override_replaces_only_its_mode() {
        let overrides = vec![custom(Mode::Analysis, "A: {{question}} / {{context}}")];
        let table = PromptTable::with_overrides(overrides).unwrap();

        let analysis = table.render(Mode::Analysis, "q", "c").unwrap();
        assert_eq!(analysis.user, "A: q / c");
        assert!(analysis.system.is_none());

        let fact = table.render(Mode::Fact, "q", "c").unwrap();
        assert!(fact.user.starts_with("Based on the following documents"));
    }

    #[test]
    fn test_invalid_template_is_rejected_at_build() {
        let result = PromptTable::with_overrides(vec![custom(Mode::Fact, "{{#if}}")]);
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }
}
