//! Answer generation from retrieved context.

use crate::rag::retriever::RetrievedContext;
use crate::rag::types::Answer;
use docqa_core::config::GenerationConfig;
use docqa_core::{AppError, AppResult, Mode};
use docqa_llm::{LlmClient, LlmRequest};
use docqa_prompt::PromptTable;
use std::sync::Arc;

/// Fixed response when there is no usable context.
pub const NOT_FOUND_ANSWER: &str =
    "I couldn't find enough information in the documents to answer that.";

/// Separator placed between chunk texts in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Model and sampling settings for each generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            model: model.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Produces one answer per question from a single model call.
pub struct Generator {
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptTable>,
    settings: GenerationSettings,
}

impl Generator {
    pub fn new(
        client: Arc<dyn LlmClient>,
        prompts: Arc<PromptTable>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            prompts,
            settings,
        }
    }

    /// Generate an answer for `question` in `mode` from `context`.
    ///
    /// An empty context, or one whose chunks are all blank, yields the
    /// not-found answer without contacting the model. Backend failures
    /// surface as `AppError::Generation`.
    pub async fn generate(
        &self,
        question: &str,
        mode: Mode,
        context: &RetrievedContext,
    ) -> AppResult<Answer> {
        if context.chunks().all(|chunk| chunk.text.trim().is_empty()) {
            tracing::info!("No usable context retrieved, returning not-found answer");
            return Ok(Answer::not_found(NOT_FOUND_ANSWER, mode));
        }

        let context_block = build_context(context);
        let prompt = self.prompts.render(mode, question, &context_block)?;

        let mut request = LlmRequest::new(prompt.user, self.settings.model.as_str())
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);
        if let Some(system) = prompt.system {
            request = request.with_system(system);
        }

        tracing::debug!(
            "Generating {} answer with {} (model: {}, {} chunks)",
            mode,
            self.client.provider_name(),
            self.settings.model,
            context.len()
        );

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        tracing::debug!(
            "Model returned {} characters ({} tokens)",
            response.content.len(),
            response.usage.total_tokens
        );

        let chunks: Vec<_> = context.chunks().cloned().collect();
        Ok(Answer::generated(response.content, mode, &chunks))
    }
}

/// Join chunk texts in retrieved order.
pub fn build_context(context: &RetrievedContext) -> String {
    context
        .chunks()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    #[test]
    fn test_build_context_keeps_order() {
        let context = RetrievedContext::from(vec![
            Chunk {
                text: "second best".to_string(),
                origin: "b".to_string(),
                sequence_index: 4,
            },
            Chunk {
                text: "first best".to_string(),
                origin: "a".to_string(),
                sequence_index: 0,
            },
        ]);

        assert_eq!(build_context(&context), "second best\n\n---\n\nfirst best");
    }

    #[test]
    fn test_settings_from_config() {
        let settings = GenerationSettings::new("llama3.2", &GenerationConfig::default());
        assert_eq!(settings.model, "llama3.2");
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_tokens, 1000);
    }
}
