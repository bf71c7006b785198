//! Classify command handler.

use clap::Args;
use docqa_core::{AppError, AppResult};
use docqa_knowledge::classifier;

/// Show how a question would be classified
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// The question to classify
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClassifyCommand {
    pub fn execute(&self) -> AppResult<()> {
        let scores = classifier::score(&self.question);
        let mode = scores.mode();

        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "mode": mode,
                "scores": scores,
            });
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", mode);
            println!(
                "  fact: {}  summary: {}  analysis: {}",
                scores.fact, scores.summary, scores.analysis
            );
        }

        Ok(())
    }
}
