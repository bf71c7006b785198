//! Question answering pipeline.
//!
//! Each call runs a linear sequence of stages over one question:
//! classify, retrieve, generate. Nothing is carried between calls; the index
//! is supplied by the caller every time.

use crate::classifier;
use crate::rag::generator::Generator;
use crate::rag::retriever::{retrieve, RetrievalSizes, RetrievedContext};
use crate::rag::types::Answer;
use crate::vector_index::VectorIndex;
use docqa_core::{AppResult, Mode};
use tracing::Instrument;

/// Progress of one `answer` call.
#[derive(Debug)]
enum Stage {
    Start,
    Classified(Mode),
    Retrieved(Mode, RetrievedContext),
    Done(Answer),
}

/// Classifier, retriever and generator wired together.
pub struct Pipeline {
    generator: Generator,
    sizes: RetrievalSizes,
}

impl Pipeline {
    pub fn new(generator: Generator, sizes: RetrievalSizes) -> Self {
        Self { generator, sizes }
    }

    pub fn sizes(&self) -> &RetrievalSizes {
        &self.sizes
    }

    /// Answer `question` against `index`.
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> AppResult<Answer> {
        let mut stage = Stage::Start;

        loop {
            stage = match stage {
                Stage::Start => {
                    let span = tracing::info_span!("stage", stage = "classify");
                    let mode = span.in_scope(|| classifier::classify(question));
                    Stage::Classified(mode)
                }
                Stage::Classified(mode) => {
                    let context = retrieve(index, question, mode, &self.sizes)
                        .instrument(tracing::info_span!("stage", stage = "retrieve"))
                        .await?;
                    Stage::Retrieved(mode, context)
                }
                Stage::Retrieved(mode, context) => {
                    let answer = self
                        .generator
                        .generate(question, mode, &context)
                        .instrument(tracing::info_span!("stage", stage = "generate"))
                        .await?;
                    Stage::Done(answer)
                }
                Stage::Done(answer) => {
                    tracing::info!(
                        "Answered {} question ({} sources)",
                        answer.mode,
                        answer.sources.len()
                    );
                    return Ok(answer);
                }
            };
        }
    }
}
