//! Orchestration Pipeline
//!
//! Wires the planner, step dispatcher, synthesizer, task executor, and
//! collaboration coordinator around a pair of completion backends, and
//! owns the conversation history.

pub mod collaboration;
pub mod dispatch;
pub mod executor;
pub mod history;
pub mod planner;
pub mod synthesizer;
pub mod types;

pub use collaboration::{CollaborationCoordinator, DEFAULT_ROLES};
pub use dispatch::{Action, StepDispatcher};
pub use executor::TaskExecutor;
pub use history::{ConversationHistory, HistoryEntry};
pub use planner::PlanGenerator;
pub use synthesizer::ResultSynthesizer;
pub use types::{
    CollaborationResult, Plan, Step, StepResult, StepStatus, TaskContext, TaskResult, TaskStatus,
};

use crate::llm::CompletionBackend;
use crate::notify::Notifier;
use anyhow::Result;
use std::sync::Arc;

/// Facade over the whole pipeline.
///
/// Holds one analysis backend (planning, analyze/research/generic steps,
/// synthesis) and one generation backend (generate steps). Construction is
/// explicit: backends arrive fully configured, credentials included, with
/// no defaults anywhere in this crate.
///
/// One logical thread of control per instance; `run` and `collaborate` are
/// not meant to be invoked concurrently on the same instance.
pub struct Orchestrator {
    executor: TaskExecutor,
    coordinator: CollaborationCoordinator,
    history: ConversationHistory,
}

impl Orchestrator {
    pub fn new(
        analysis: Arc<dyn CompletionBackend>,
        generation: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self::with_notifier(analysis, generation, None)
    }

    /// Construct with an optional observability notifier
    pub fn with_notifier(
        analysis: Arc<dyn CompletionBackend>,
        generation: Arc<dyn CompletionBackend>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let planner = PlanGenerator::new(Arc::clone(&analysis));
        let dispatcher = Arc::new(StepDispatcher::new(Arc::clone(&analysis), generation));
        let synthesizer = Arc::new(ResultSynthesizer::new(analysis));

        let executor = TaskExecutor::new(
            planner,
            Arc::clone(&dispatcher),
            Arc::clone(&synthesizer),
            notifier,
        );
        let coordinator = CollaborationCoordinator::new(dispatcher, synthesizer);

        Self {
            executor,
            coordinator,
            history: ConversationHistory::new(),
        }
    }

    /// Run one task through plan → execute → synthesize
    pub async fn run(&self, task: &str, context: &TaskContext) -> Result<TaskResult> {
        self.executor.run(task, context).await
    }

    /// Run the default role roster over a task
    pub async fn collaborate(&self, task: &str) -> Result<CollaborationResult> {
        self.collaborate_with(task, &DEFAULT_ROLES).await
    }

    /// Run a caller-supplied role roster over a task
    pub async fn collaborate_with(
        &self,
        task: &str,
        roles: &[&str],
    ) -> Result<CollaborationResult> {
        self.coordinator.collaborate(task, roles).await
    }

    /// Append a dialogue entry to the conversation history
    pub fn add_to_history(&mut self, role: impl Into<String>, content: impl Into<String>) {
        self.history.append(role, content);
    }

    /// Read-only view of the conversation history
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Empty the conversation history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
