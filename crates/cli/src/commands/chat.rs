//! Chat command handler.
//!
//! Builds the index once, then answers one question per stdin line.

use super::{ask::print_answer, session};
use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Index documents once, then answer questions read from stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Files or directories to index
    #[arg(short, long = "file", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let (qa, build) = session::open(config, &self.files).await?;
        eprintln!(
            "Indexed {} documents ({} chunks). Ask a question, or type 'exit' to quit.",
            build.stats.documents_loaded, build.stats.chunks_indexed
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") {
                break;
            }

            match qa.answer(&build.index, question).await {
                Ok(answer) => {
                    print_answer(&answer);
                    println!();
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Question failed: {}", e);
                    eprintln!("error: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

fn prompt() -> AppResult<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ").map_err(AppError::Io)?;
    stdout.flush().map_err(AppError::Io)
}
