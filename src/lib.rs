//! Maestro Library
//!
//! Coordinates multi-step task execution by delegating individual steps to
//! external LLM completion backends: generate a plan, execute its steps
//! strictly in order, synthesize a final result. Also provides a
//! multi-role collaboration mode and an append-only conversation history.

/// Configuration management module
pub mod config;

/// Crate-level error types
pub mod errors;

/// Completion backend abstraction layer
pub mod llm;

/// Notification extension point
pub mod notify;

/// Orchestration pipeline module
pub mod orchestrator;

/// Telemetry and observability
pub mod telemetry;

/// CLI interface module
pub mod cli;
