//! Step Dispatcher
//!
//! Routes a step to one of four handlers by its action tag and drives the
//! backend completion call for it. The tag mapping is closed: anything that
//! is not exactly "analyze", "generate", or "research" dispatches to the
//! generic handler, which behaves like analysis.

use crate::llm::{self, CompletionBackend, Message};
use crate::orchestrator::types::{Step, StepResult, TaskContext};
use std::sync::Arc;
use tracing::debug;

/// Closed set of step actions.
///
/// Raw tags map through [`Action::from_tag`]; unrecognized or missing tags
/// become `Generic` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Analyze,
    Generate,
    Research,
    Generic,
}

impl Action {
    /// Map a raw action tag to the closed action set
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("analyze") => Action::Analyze,
            Some("generate") => Action::Generate,
            Some("research") => Action::Research,
            _ => Action::Generic,
        }
    }
}

/// Output-token caps per handler
const ANALYZE_MAX_TOKENS: u32 = 4000;
const GENERATE_MAX_TOKENS: u32 = 3000;
const RESEARCH_MAX_TOKENS: u32 = 8000;

const GENERATION_PERSONA: &str = "You are a helpful AI assistant.";

/// Executes individual steps against the completion backends.
///
/// Holds both backend identities: analysis (used by the analyze, research,
/// and generic handlers) and generation (used by the generate handler).
pub struct StepDispatcher {
    analysis: Arc<dyn CompletionBackend>,
    generation: Arc<dyn CompletionBackend>,
}

impl StepDispatcher {
    pub fn new(analysis: Arc<dyn CompletionBackend>, generation: Arc<dyn CompletionBackend>) -> Self {
        Self {
            analysis,
            generation,
        }
    }

    /// Execute a single step.
    ///
    /// On success returns a completed `StepResult` carrying the raw backend
    /// output, the model identity used, and a completion timestamp. A
    /// backend failure surfaces as `Err(BackendError)` unchanged; converting
    /// it into a failed result is the caller's decision.
    pub async fn execute_step(
        &self,
        step: &Step,
        context: &TaskContext,
    ) -> llm::Result<StepResult> {
        let action = Action::from_tag(step.action.as_deref());
        debug!(?action, "dispatching step");

        match action {
            Action::Analyze | Action::Generic => self.run_analysis(step, context).await,
            Action::Generate => self.run_generation(step, context).await,
            Action::Research => self.run_research(step, context).await,
        }
    }

    async fn run_analysis(&self, step: &Step, context: &TaskContext) -> llm::Result<StepResult> {
        let prompt = prompt_with_context(step, context);
        let messages = vec![Message::user(prompt)];

        let output = self.analysis.complete(&messages, ANALYZE_MAX_TOKENS).await?;

        Ok(StepResult::completed(
            step.clone(),
            output,
            self.analysis.model_id(),
        ))
    }

    async fn run_generation(&self, step: &Step, context: &TaskContext) -> llm::Result<StepResult> {
        let prompt = prompt_with_context(step, context);
        let messages = vec![Message::system(GENERATION_PERSONA), Message::user(prompt)];

        let output = self
            .generation
            .complete(&messages, GENERATE_MAX_TOKENS)
            .await?;

        Ok(StepResult::completed(
            step.clone(),
            output,
            self.generation.model_id(),
        ))
    }

    async fn run_research(&self, step: &Step, context: &TaskContext) -> llm::Result<StepResult> {
        let prompt = format!(
            "Research and provide comprehensive information about: {}",
            prompt_with_context(step, context)
        );
        let messages = vec![Message::user(prompt)];

        let output = self.analysis.complete(&messages, RESEARCH_MAX_TOKENS).await?;

        Ok(StepResult::completed(
            step.clone(),
            output,
            self.analysis.model_id(),
        ))
    }
}

/// Resolve the step's prompt text and append serialized previous results
/// when the execution context carries them.
fn prompt_with_context(step: &Step, context: &TaskContext) -> String {
    let mut prompt = step.prompt_text().to_string();

    if let Some(previous) = context.get("previous_results") {
        prompt.push_str(&format!("\n\nPrevious results: {}", previous));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_routing_table() {
        assert_eq!(Action::from_tag(Some("analyze")), Action::Analyze);
        assert_eq!(Action::from_tag(Some("generate")), Action::Generate);
        assert_eq!(Action::from_tag(Some("research")), Action::Research);

        // Missing and unrecognized tags both land on the generic handler
        assert_eq!(Action::from_tag(None), Action::Generic);
        assert_eq!(Action::from_tag(Some("frobnicate")), Action::Generic);
        assert_eq!(Action::from_tag(Some("Analyze")), Action::Generic);
        assert_eq!(Action::from_tag(Some("")), Action::Generic);
    }

    #[test]
    fn test_prompt_includes_previous_results() {
        let step = Step::new("analyze", "look at the data");

        let mut context = TaskContext::new();
        context.insert(
            "previous_results".to_string(),
            serde_json::json!({"step_1": "ok"}),
        );

        let prompt = prompt_with_context(&step, &context);
        assert!(prompt.starts_with("look at the data"));
        assert!(prompt.contains("Previous results: "));
        assert!(prompt.contains(r#"{"step_1":"ok"}"#));
    }

    #[test]
    fn test_prompt_without_previous_results() {
        let step = Step::new("analyze", "look at the data");
        let prompt = prompt_with_context(&step, &TaskContext::new());
        assert_eq!(prompt, "look at the data");
    }
}
