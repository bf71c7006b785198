//! Keyword-based intent classification.
//!
//! A question is scored against three disjoint hint families and mapped to a
//! [`Mode`]. Analysis wins whenever any analysis hint is present; otherwise
//! summary must strictly outscore fact, so ties and questions with no hints
//! at all resolve to fact.
//!
//! Hints are matched as plain substrings, not whole words, so "date" also
//! counts inside "update" and "who" inside "whole". This is the intended rule.

use docqa_core::Mode;
use serde::{Deserialize, Serialize};

/// Phrases that ask for an overview of the material.
pub const SUMMARY_HINTS: &[&str] = &[
    "summarize",
    "summary",
    "overview",
    "key points",
    "bullet",
    "synthesize",
];

/// Phrases that ask for a specific fact.
pub const FACT_HINTS: &[&str] = &[
    "when",
    "date",
    "who",
    "where",
    "amount",
    "total",
    "price",
    "figure",
    "specific",
    "exact",
    "how many",
];

/// Phrases that ask for reasoning across the material.
pub const ANALYSIS_HINTS: &[&str] = &[
    "analyze",
    "analysis",
    "compare",
    "comparison",
    "contrast",
    "pros and cons",
    "implications",
    "impact",
    "evaluate",
];

/// Per-family hint counts for one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintScores {
    pub fact: usize,
    pub summary: usize,
    pub analysis: usize,
}

impl HintScores {
    /// Apply the decision rule to these counts.
    pub fn mode(&self) -> Mode {
        if self.analysis > 0 {
            Mode::Analysis
        } else if self.summary > self.fact {
            Mode::Summary
        } else {
            Mode::Fact
        }
    }
}

/// Count hint occurrences in `question`, case-insensitively.
pub fn score(question: &str) -> HintScores {
    let lowered = question.to_lowercase();
    let count = |hints: &[&str]| -> usize {
        hints
            .iter()
            .map(|hint| lowered.matches(hint).count())
            .sum()
    };

    HintScores {
        fact: count(FACT_HINTS),
        summary: count(SUMMARY_HINTS),
        analysis: count(ANALYSIS_HINTS),
    }
}

/// Select the response mode for a question.
pub fn classify(question: &str) -> Mode {
    let scores = score(question);
    let mode = scores.mode();

    tracing::debug!(
        fact = scores.fact,
        summary = scores.summary,
        analysis = scores.analysis,
        "Classified question as {}",
        mode
    );

    mode
}
