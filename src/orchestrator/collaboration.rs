//! Collaboration Coordinator
//!
//! Runs a roster of named roles over the same task, one dispatch per role,
//! and synthesizes across all of them. Unlike the task executor this never
//! short-circuits: a failing role is recorded and the remaining roles still
//! run.

use crate::orchestrator::dispatch::StepDispatcher;
use crate::orchestrator::synthesizer::ResultSynthesizer;
use crate::orchestrator::types::{CollaborationResult, Step, StepResult, TaskContext};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Roster used when the caller does not supply one.
///
/// Note that only the role named exactly "analyzer" maps to the analyze
/// action; every other role, the "validator" included, maps to generate.
pub const DEFAULT_ROLES: [&str; 3] = ["analyzer", "generator", "validator"];

pub struct CollaborationCoordinator {
    dispatcher: Arc<StepDispatcher>,
    synthesizer: Arc<ResultSynthesizer>,
}

impl CollaborationCoordinator {
    pub fn new(dispatcher: Arc<StepDispatcher>, synthesizer: Arc<ResultSynthesizer>) -> Self {
        Self {
            dispatcher,
            synthesizer,
        }
    }

    /// Run every role of the roster against the task and synthesize.
    ///
    /// Each role gets a synthetic step with the role name folded into the
    /// description and a context carrying the role. All results are
    /// recorded in roster order, failures included. Only a synthesis
    /// backend failure aborts the call.
    pub async fn collaborate(&self, task: &str, roles: &[&str]) -> Result<CollaborationResult> {
        info!(task, roles = roles.len(), "starting collaboration");

        let mut results: Vec<(String, StepResult)> = Vec::with_capacity(roles.len());

        for role in roles {
            let step = Self::role_step(role, task);

            let mut context = TaskContext::new();
            context.insert("role".to_string(), serde_json::json!(role));

            let result = match self.dispatcher.execute_step(&step, &context).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(role, error = %e, "role execution failed");
                    StepResult::failed(step, e.to_string(), "unavailable")
                }
            };

            results.push((role.to_string(), result));
        }

        let all_results: Vec<StepResult> =
            results.iter().map(|(_, result)| result.clone()).collect();
        let synthesis = self
            .synthesizer
            .synthesize(&all_results)
            .await
            .context("collaboration synthesis failed")?;

        Ok(CollaborationResult {
            task: task.to_string(),
            results,
            synthesis,
            timestamp: Utc::now(),
        })
    }

    /// Build the synthetic step for one role
    fn role_step(role: &str, task: &str) -> Step {
        let action = if role == "analyzer" {
            "analyze"
        } else {
            "generate"
        };
        Step::new(action, format!("As {}, work on: {}", role, task))
    }
}
