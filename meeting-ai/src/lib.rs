//! Meeting AI abstraction layer for the collaborators of the summarization pipeline.
//!
//! This crate provides trait-based abstractions for:
//! - Execution engines that run an LLM task asynchronously and report completion
//! - Calendar services that receive one event per action item
//! - Notification services that tell an assignee about a new task
//!
//! The design is provider-agnostic, enabling applications to swap between
//! different service providers (Julep, Google Calendar, MailerSend, etc.) without
//! changing the pipeline. Enable the `mock` feature to get `mockall` doubles of
//! every trait for use in downstream tests.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::Error;
pub use types::execution::{Execution, Status as ExecutionStatus, TaskDefinition};
