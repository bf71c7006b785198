//! Response modes.
//!
//! A `Mode` is the classified intent of a question. It decides how many
//! chunks are retrieved and which instruction template drives generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The kind of answer a question needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Precise lookup of a specific fact.
    Fact,
    /// Organized overview of the material.
    Summary,
    /// Multi-perspective reasoning over the material.
    Analysis,
}

impl Mode {
    /// Every mode, in retrieval-size order.
    pub const ALL: [Mode; 3] = [Mode::Fact, Mode::Summary, Mode::Analysis];

    /// Get the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Fact => "fact",
            Mode::Summary => "summary",
            Mode::Analysis => "analysis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fact" => Ok(Mode::Fact),
            "summary" => Ok(Mode::Summary),
            "analysis" => Ok(Mode::Analysis),
            other => Err(AppError::Config(format!(
                "Unknown mode: '{}'. Expected one of: fact, summary, analysis",
                other
            ))),
        }
    }
}
