// Maestro task orchestrator
// Main entry point for the maestro binary

use clap::Parser;
use maestro::cli::{Cli, Command};
use maestro::config::Config;
use maestro::llm::{anthropic::AnthropicBackend, openai::OpenAiBackend, CompletionBackend};
use maestro::notify::{Notifier, WebhookNotifier};
use maestro::orchestrator::{Orchestrator, TaskContext, TaskStatus};
use maestro::telemetry::{init_telemetry, init_telemetry_with_level};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Basic telemetry first, before config is loaded
    init_telemetry();

    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize with the config-driven log level
    // (only takes effect if RUST_LOG env var is not set)
    init_telemetry_with_level(&config.core.log_level);

    // Credentials are injected from the environment, never compiled in
    let anthropic_key = std::env::var("ANTHROPIC_API_KEY")
        .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))?;
    let openai_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;

    let analysis: Arc<dyn CompletionBackend> = Arc::new(AnthropicBackend::new(
        config.llm.anthropic.clone(),
        anthropic_key,
    ));
    let generation: Arc<dyn CompletionBackend> =
        Arc::new(OpenAiBackend::new(config.llm.openai.clone(), openai_key));

    let notifier: Option<Arc<dyn Notifier>> = config
        .notifier
        .webhook_url
        .as_deref()
        .map(|url| Arc::new(WebhookNotifier::new(url)) as Arc<dyn Notifier>);

    let orchestrator = Orchestrator::with_notifier(analysis, generation, notifier);

    match cli.command {
        Command::Run { task, context } => {
            let context: TaskContext = match context {
                Some(raw) => serde_json::from_str(&raw)?,
                None => TaskContext::new(),
            };

            let result = orchestrator.run(&task, &context).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Task: {}", result.task);
                println!("Status: {:?}", result.status);
                match result.status {
                    TaskStatus::Completed => {
                        println!(
                            "\nFinal Output:\n{}",
                            result.final_output.as_deref().unwrap_or("")
                        );
                    }
                    _ => {
                        if let Some(failed) = result.steps.last() {
                            println!(
                                "\nFailed at step {}: {}",
                                result.steps.len(),
                                failed.error.as_deref().unwrap_or("unknown error")
                            );
                        }
                    }
                }
            }
        }

        Command::Collaborate { task, roles } => {
            let result = if roles.is_empty() {
                orchestrator.collaborate(&task).await?
            } else {
                let roles: Vec<&str> = roles.iter().map(String::as_str).collect();
                orchestrator.collaborate_with(&task, &roles).await?
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Task: {}", result.task);
                for (role, step_result) in &result.results {
                    println!("[{}] {:?}", role, step_result.status);
                }
                println!("\nSynthesis:\n{}", result.synthesis);
            }
        }
    }

    Ok(())
}
