//! Result Synthesizer
//!
//! Combines the recorded step outputs into one final text by sending a
//! single summary prompt to the analysis backend.

use crate::llm::{CompletionBackend, Message};
use crate::orchestrator::types::StepResult;
use anyhow::Result;
use std::sync::Arc;

/// Output-token cap for the synthesis request
const SYNTHESIS_MAX_TOKENS: u32 = 4000;

/// Per-step preview length fed into the synthesis prompt, in characters.
/// Truncation is deliberately word-boundary-unaware.
const PREVIEW_CHARS: usize = 200;

pub struct ResultSynthesizer {
    backend: Arc<dyn CompletionBackend>,
}

impl ResultSynthesizer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Synthesize all step results into one final text.
    ///
    /// Each result contributes exactly its first 200 characters of output
    /// (failed results contribute their error detail instead). Backend
    /// failures propagate to the caller.
    pub async fn synthesize(&self, results: &[StepResult]) -> Result<String> {
        let summary = build_summary(results);

        let messages = vec![Message::user(format!(
            "Synthesize these results into a final cohesive output:\n\n{}",
            summary
        ))];

        let output = self.backend.complete(&messages, SYNTHESIS_MAX_TOKENS).await?;
        Ok(output)
    }
}

/// Build the joined preview block for the synthesis prompt
fn build_summary(results: &[StepResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let text = result
                .output
                .as_deref()
                .or(result.error.as_deref())
                .unwrap_or("");
            format!("Step {}: {}...", i + 1, preview(text))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// First `PREVIEW_CHARS` characters of the text, counted in chars so a
/// multi-byte boundary can never split a code point.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
