//! Ask command handler.
//!
//! Indexes the given documents and answers a single question.

use super::session;
use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_knowledge::Answer;
use std::path::PathBuf;

/// Index documents and answer one question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Files or directories to index
    #[arg(short, long = "file", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let (qa, build) = session::open(config, &self.files).await?;
        let answer = qa.answer(&build.index, &self.question).await?;

        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "answer": answer,
                "index": {
                    "documentsLoaded": build.stats.documents_loaded,
                    "filesSkipped": build.stats.files_skipped,
                    "chunksIndexed": build.stats.chunks_indexed,
                    "bytesProcessed": build.stats.bytes_processed,
                    "durationSecs": build.stats.duration_secs,
                    "embedding": build.index.embedding_signature().to_string(),
                },
                "warnings": build.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            });
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            print_answer(&answer);
        }

        Ok(())
    }
}

/// Print an answer followed by its sources.
pub fn print_answer(answer: &Answer) {
    println!("{}", answer.text);

    if !answer.sources.is_empty() {
        println!();
        println!("Sources ({} mode):", answer.mode);
        for source in &answer.sources {
            println!(
                "  - {} #{}: {}",
                source.source, source.sequence_index, source.snippet
            );
        }
    }
}
