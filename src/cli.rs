//! CLI interface for maestro
//!
//! This module provides the command-line interface using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Maestro task orchestrator
///
/// Coordinates multi-step task execution over external LLM completion
/// backends: plan, execute each step in order, synthesize a final result.
#[derive(Parser, Debug)]
#[command(name = "maestro")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output the full result record as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan and execute a task, printing the synthesized output
    Run {
        /// The task to execute
        task: String,

        /// Extra context as a JSON object
        #[arg(long, value_name = "JSON")]
        context: Option<String>,
    },

    /// Run a roster of roles over a task and synthesize across them
    Collaborate {
        /// The task all roles work on
        task: String,

        /// Role names (defaults to analyzer, generator, validator)
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,
    },
}
