//! Execution engine provider trait.

use crate::types::execution::{Execution, TaskDefinition};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for services that run an LLM task asynchronously.
///
/// A task is registered once, then executed against an input. Executions run
/// remotely for seconds to minutes; callers poll `get_execution` until the status
/// is terminal. Supports Julep today; any engine with the same
/// create/execute/poll shape fits.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Register a task document and return the engine's task ID.
    async fn create_task(&self, definition: &TaskDefinition) -> std::result::Result<String, Error>;

    /// Start one execution of a registered task with the given input.
    ///
    /// Returns immediately with the execution ID; the work runs in the background.
    async fn create_execution(
        &self,
        task_id: &str,
        input: &serde_json::Value,
    ) -> std::result::Result<String, Error>;

    /// Retrieve the current status and, once terminal, the output or error.
    async fn get_execution(&self, execution_id: &str) -> std::result::Result<Execution, Error>;

    /// Ask the engine to stop an execution nobody is waiting on anymore.
    async fn cancel_execution(&self, execution_id: &str) -> std::result::Result<(), Error>;

    /// Return unique identifier for this provider (e.g., "julep").
    fn provider_id(&self) -> &str;
}
