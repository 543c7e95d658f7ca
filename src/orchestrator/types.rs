//! Orchestration data model
//!
//! Plans, steps, and results exchanged between the planner, dispatcher,
//! executor, and synthesizer. Steps deserialize loosely on purpose: the
//! planning backend decides which of the optional fields it fills in, and
//! any fields this crate does not know about are preserved verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arbitrary key→value execution context supplied by the caller.
///
/// The well-known key `previous_results` is appended to handler prompts
/// when present; everything else is passed through untouched.
pub type TaskContext = serde_json::Map<String, serde_json::Value>;

/// One unit of work in a plan.
///
/// All content fields are optional by design. The prompt a handler sends is
/// resolved via [`Step::prompt_text`] with the documented precedence
/// description → prompt → topic.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Step {
    /// Action tag: "analyze", "generate", "research", or anything else
    /// (unrecognized tags dispatch to the generic handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// What this step should accomplish
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Alternate prompt text, used when no description is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Topic for research steps, lowest prompt precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Any extra planner/caller-supplied fields, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Step {
    /// Build a step carrying only an action tag and a description
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Resolve the prompt text with the fixed precedence
    /// description → prompt → topic, falling back to the empty string.
    pub fn prompt_text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.prompt.as_deref())
            .or(self.topic.as_deref())
            .unwrap_or("")
    }
}

/// Ordered, non-empty sequence of steps.
///
/// Invariant: `steps` always holds at least one entry. A malformed planning
/// response is corrected to a single fallback step, never to an empty plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Unique plan id
    pub id: String,

    /// The steps, in execution order
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            steps,
        }
    }
}

/// Outcome status of a single step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Failed,
}

/// Recorded outcome of executing one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// The step this result belongs to
    pub step: Step,

    /// Completed or failed
    pub status: StepStatus,

    /// Raw completion text, set on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Identity of the model that served the step
    pub model: String,

    /// When the step finished
    pub timestamp: DateTime<Utc>,

    /// Error detail, set on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    /// Build a completed result for a step
    pub fn completed(step: Step, output: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Completed,
            output: Some(output.into()),
            model: model.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Build a failed result for a step
    pub fn failed(step: Step, error: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            output: None,
            model: model.into(),
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }
}

/// Overall status of a task run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Completed,
    Failed,
}

/// Full record of one `run` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// The task goal as given by the caller
    pub task: String,

    /// The plan that was executed
    pub plan: Plan,

    /// Step results in execution order. If any entry is failed it is the
    /// last one; execution stops there.
    pub steps: Vec<StepResult>,

    /// Synthesized output, set only when every step completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_output: Option<String>,

    /// Terminal once set to completed or failed
    pub status: TaskStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Full record of one `collaborate` call.
///
/// Unlike [`TaskResult`], every role of the roster is recorded even when
/// some fail; collaboration never short-circuits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationResult {
    /// The task all roles worked on
    pub task: String,

    /// Role name → result, in roster order
    pub results: Vec<(String, StepResult)>,

    /// Synthesis across all role results
    pub synthesis: String,

    /// When the collaboration finished
    pub timestamp: DateTime<Utc>,
}

impl CollaborationResult {
    /// Look up the result recorded for a role
    pub fn result_for(&self, role: &str) -> Option<&StepResult> {
        self.results
            .iter()
            .find(|(name, _)| name == role)
            .map(|(_, result)| result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_precedence() {
        let mut step = Step {
            description: Some("desc".to_string()),
            prompt: Some("prompt".to_string()),
            topic: Some("topic".to_string()),
            ..Step::default()
        };
        assert_eq!(step.prompt_text(), "desc");

        step.description = None;
        assert_eq!(step.prompt_text(), "prompt");

        step.prompt = None;
        assert_eq!(step.prompt_text(), "topic");

        step.topic = None;
        assert_eq!(step.prompt_text(), "");
    }

    #[test]
    fn test_step_preserves_unknown_fields() {
        let json = r#"{"action":"analyze","description":"look at it","priority":3,"owner":"alice"}"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert_eq!(step.action.as_deref(), Some("analyze"));
        assert_eq!(step.extra.get("priority"), Some(&serde_json::json!(3)));
        assert_eq!(step.extra.get("owner"), Some(&serde_json::json!("alice")));

        // Round-trips with the extras intact
        let back = serde_json::to_value(&step).unwrap();
        assert_eq!(back.get("priority"), Some(&serde_json::json!(3)));
        assert_eq!(back.get("owner"), Some(&serde_json::json!("alice")));
    }

    #[test]
    fn test_collaboration_result_lookup() {
        let result = CollaborationResult {
            task: "t".to_string(),
            results: vec![
                (
                    "analyzer".to_string(),
                    StepResult::completed(Step::new("analyze", "x"), "out", "m"),
                ),
                (
                    "validator".to_string(),
                    StepResult::failed(Step::new("generate", "y"), "boom", "m"),
                ),
            ],
            synthesis: "s".to_string(),
            timestamp: Utc::now(),
        };

        assert_eq!(
            result.result_for("analyzer").unwrap().status,
            StepStatus::Completed
        );
        assert_eq!(
            result.result_for("validator").unwrap().status,
            StepStatus::Failed
        );
        assert!(result.result_for("ghost").is_none());
    }
}
