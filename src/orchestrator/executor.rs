//! Task Executor
//!
//! Sequential state machine driving one task from planning through step
//! execution to synthesis. Steps run strictly in order: a later step's
//! context may depend on an earlier step's recorded results, so ordering
//! is a correctness requirement, not an optimization choice.

use crate::notify::{Event, Notifier};
use crate::orchestrator::dispatch::StepDispatcher;
use crate::orchestrator::planner::PlanGenerator;
use crate::orchestrator::synthesizer::ResultSynthesizer;
use crate::orchestrator::types::{StepResult, StepStatus, TaskContext, TaskResult, TaskStatus};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct TaskExecutor {
    planner: PlanGenerator,
    dispatcher: Arc<StepDispatcher>,
    synthesizer: Arc<ResultSynthesizer>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl TaskExecutor {
    pub fn new(
        planner: PlanGenerator,
        dispatcher: Arc<StepDispatcher>,
        synthesizer: Arc<ResultSynthesizer>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            planner,
            dispatcher,
            synthesizer,
            notifier,
        }
    }

    /// Run a task end to end: plan, execute each step in order, synthesize.
    ///
    /// The first failed step result terminates the run: its result is the
    /// last one recorded, the task status becomes failed, and synthesis
    /// never happens. A backend failure during a step is converted into a
    /// failed step result and handled the same way. Planning and synthesis
    /// backend failures remain fatal and propagate as `Err`.
    pub async fn run(&self, task: &str, context: &TaskContext) -> Result<TaskResult> {
        let started_at = Utc::now();
        info!(task, "starting task");
        self.notify(Event::task_started(task)).await;

        let plan = self
            .planner
            .create_plan(task, context)
            .await
            .context("planning failed")?;
        info!(steps = plan.steps.len(), "plan created");

        let mut result = TaskResult {
            task: task.to_string(),
            plan: plan.clone(),
            steps: Vec::new(),
            final_output: None,
            status: TaskStatus::InProgress,
            started_at,
            completed_at: None,
        };

        for (i, step) in plan.steps.iter().enumerate() {
            let step_result = match self.dispatcher.execute_step(step, context).await {
                Ok(step_result) => step_result,
                Err(e) => {
                    // Transport/auth failures become failed step results so
                    // the short-circuit below handles them uniformly.
                    warn!(step = i + 1, error = %e, "backend call failed");
                    StepResult::failed(step.clone(), e.to_string(), "unavailable")
                }
            };

            let failed = step_result.status == StepStatus::Failed;
            result.steps.push(step_result);

            if failed {
                warn!(step = i + 1, total = plan.steps.len(), "task failed");
                result.status = TaskStatus::Failed;
                result.completed_at = Some(Utc::now());
                self.notify(Event::task_failed(task, i + 1)).await;
                return Ok(result);
            }
        }

        let final_output = self
            .synthesizer
            .synthesize(&result.steps)
            .await
            .context("synthesis failed")?;

        result.final_output = Some(final_output);
        result.status = TaskStatus::Completed;
        result.completed_at = Some(Utc::now());

        info!(steps = result.steps.len(), "task completed");
        self.notify(Event::task_completed(task)).await;

        Ok(result)
    }

    /// Fire an observability event; delivery failure never affects the task
    async fn notify(&self, event: Event) {
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(&event).await {
                warn!(error = %e, "notification delivery failed");
            }
        }
    }
}
