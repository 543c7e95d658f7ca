//! Plan Generator
//!
//! Turns a task plus caller context into an ordered `Plan` by asking the
//! analysis backend for a JSON array of step descriptors.

use crate::llm::{CompletionBackend, Message};
use crate::orchestrator::types::{Plan, Step, TaskContext};
use anyhow::Result;
use std::sync::Arc;

/// Output-token cap for the planning request
const PLANNING_MAX_TOKENS: u32 = 2000;

const PLANNING_PERSONA: &str =
    "You are a planning assistant. Break the user's task into discrete steps \
     and always plan according to the given guidelines.";

pub struct PlanGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl PlanGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Generate a plan for a task.
    ///
    /// Sends one completion request embedding the task and the serialized
    /// context. If the response parses as a JSON array of steps, that array
    /// becomes the plan verbatim (field order and unknown fields preserved).
    /// Any parse failure falls back to a deterministic single-step plan; a
    /// backend failure is not caught here and propagates to the caller.
    pub async fn create_plan(&self, task: &str, context: &TaskContext) -> Result<Plan> {
        let context_json = serde_json::to_string(context)?;

        let messages = vec![
            Message::system(PLANNING_PERSONA),
            Message::user(format!(
                "Create a step-by-step plan to accomplish this task: {}\n\n\
                 Context: {}\n\n\
                 Respond with a JSON array of steps. Each step is an object with \
                 an \"action\" field (one of \"analyze\", \"generate\", \"research\") \
                 and a \"description\" field.",
                task, context_json
            )),
        ];

        let plan_text = self.backend.complete(&messages, PLANNING_MAX_TOKENS).await?;

        match serde_json::from_str::<Vec<Step>>(&plan_text) {
            Ok(steps) if !steps.is_empty() => Ok(Plan::new(steps)),
            _ => {
                tracing::warn!("Planning response was not a JSON step array, using fallback plan");
                Ok(Self::fallback_plan(task))
            }
        }
    }

    /// Single-step plan used whenever the planning response is malformed
    fn fallback_plan(task: &str) -> Plan {
        Plan::new(vec![Step::new("execute", task)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_plan_shape() {
        let plan = PlanGenerator::fallback_plan("Summarize the report");
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].action.as_deref(), Some("execute"));
        assert_eq!(
            plan.steps[0].description.as_deref(),
            Some("Summarize the report")
        );
    }

    #[test]
    fn test_valid_array_parses_verbatim() {
        let json = r#"[
            {"action": "research", "topic": "rust async"},
            {"action": "generate", "description": "write the summary", "reviewer": "sam"}
        ]"#;
        let steps: Vec<Step> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action.as_deref(), Some("research"));
        assert_eq!(steps[0].topic.as_deref(), Some("rust async"));
        assert_eq!(
            steps[1].extra.get("reviewer"),
            Some(&serde_json::json!("sam"))
        );
    }

    #[test]
    fn test_non_array_json_is_rejected() {
        // A top-level object is not a plan even though it is valid JSON
        assert!(serde_json::from_str::<Vec<Step>>(r#"{"steps": []}"#).is_err());
        assert!(serde_json::from_str::<Vec<Step>>("not json at all").is_err());
    }
}
