//! Built-in prompt definitions, one per mode.

use docqa_core::Mode;

use crate::types::PromptDefinition;

const FACT_SYSTEM: &str = "You answer questions using only the supplied document excerpts. \
Be precise and quote figures, names and dates exactly as they appear. \
If the excerpts do not contain the answer, say so plainly instead of guessing.";

const FACT_TEMPLATE: &str = "Based on the following documents, answer this specific question: {{question}}

Context from documents:
{{context}}

Provide a direct, factual answer based on the information in the documents. If the information is not available, say so clearly.";

const SUMMARY_SYSTEM: &str = "You write organized summaries of the supplied document excerpts. \
Cover the material comprehensively and do not add facts that are not in the excerpts.";

const SUMMARY_TEMPLATE: &str = "Based on the following documents, provide a comprehensive summary that addresses: {{question}}

Context from documents:
{{context}}

Provide a well-structured summary with key points and insights from the documents.";

const ANALYSIS_SYSTEM: &str = "You analyze the supplied document excerpts from several perspectives. \
Ground every claim in the excerpts and point out where they are silent.";

const ANALYSIS_TEMPLATE: &str = "Based on the following documents, analyze: {{question}}

Context from documents:
{{context}}

Consider the question from multiple perspectives, weigh the evidence in the documents against each other, and explain the implications. Note any gaps where the documents do not support a conclusion.";

/// The built-in definition for `mode`.
pub fn default_definition(mode: Mode) -> PromptDefinition {
    let (system, template) = match mode {
        Mode::Fact => (FACT_SYSTEM, FACT_TEMPLATE),
        Mode::Summary => (SUMMARY_SYSTEM, SUMMARY_TEMPLATE),
        Mode::Analysis => (ANALYSIS_SYSTEM, ANALYSIS_TEMPLATE),
    };

    PromptDefinition {
        id: format!("docqa.{}.default", mode),
        title: format!("Default {} prompt", mode),
        api_version: "1.0".to_string(),
        created_by: "docqa".to_string(),
        mode,
        system: Some(system.to_string()),
        template: template.to_string(),
    }
}
