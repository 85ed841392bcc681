//! Submission of summarization tasks to the execution engine and polling of the
//! resulting execution until it reaches a terminal state.

use crate::error::{pipeline_error, Error, PipelineErrorKind};
use crate::prompt::TaskSpec;
use log::*;
use meeting_ai::traits::execution::Provider as ExecutionProvider;
use meeting_ai::ExecutionStatus;
use serde_json::Value;
use service::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// Upper bound on the best-effort cancel request sent when polling is abandoned.
const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifies one remote execution. Owned by the poller for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionHandle {
    pub task_id: String,
    pub execution_id: String,
}

/// Pipeline view of an engine status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl ExecutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Succeeded | ExecutionState::Failed)
    }
}

impl From<ExecutionStatus> for ExecutionState {
    fn from(status: ExecutionStatus) -> Self {
        match status {
            ExecutionStatus::Queued | ExecutionStatus::Starting => ExecutionState::Pending,
            // Statuses this service does not know are assumed to still be in flight.
            ExecutionStatus::Running
            | ExecutionStatus::AwaitingInput
            | ExecutionStatus::Unknown => ExecutionState::Running,
            ExecutionStatus::Succeeded => ExecutionState::Succeeded,
            ExecutionStatus::Failed | ExecutionStatus::Cancelled => ExecutionState::Failed,
        }
    }
}

/// What a finished execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Success { raw_output: String },
    Failure { error_detail: String },
}

/// Timing and retry bounds for [`Poller::await_completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_transport_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
            max_transport_retries: 3,
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.poll_timeout(),
            max_transport_retries: config.poll_max_transport_retries,
        }
    }
}

/// Registers one unit of remote work per request.
#[derive(Clone)]
pub struct Submitter {
    engine: Arc<dyn ExecutionProvider>,
}

impl Submitter {
    pub fn new(engine: Arc<dyn ExecutionProvider>) -> Self {
        Self { engine }
    }

    /// Create the task and start one execution of it. Nothing is retried here.
    pub async fn submit(&self, spec: &TaskSpec, input: &Value) -> Result<ExecutionHandle, Error> {
        let task_id = self
            .engine
            .create_task(&spec.to_definition())
            .await
            .map_err(|e| {
                warn!("Failed to create task \"{}\": {}", spec.name(), e);
                pipeline_error(PipelineErrorKind::Submission, e)
            })?;

        let execution_id = self
            .engine
            .create_execution(&task_id, input)
            .await
            .map_err(|e| {
                warn!("Failed to start execution of task {}: {}", task_id, e);
                pipeline_error(PipelineErrorKind::Submission, e)
            })?;

        info!("Started execution {} of task {}", execution_id, task_id);
        Ok(ExecutionHandle {
            task_id,
            execution_id,
        })
    }
}

/// Observes an execution until it finishes, the caller gives up or time runs out.
#[derive(Clone)]
pub struct Poller {
    engine: Arc<dyn ExecutionProvider>,
}

enum Stopped {
    Cancelled,
    TimedOut,
}

impl Poller {
    pub fn new(engine: Arc<dyn ExecutionProvider>) -> Self {
        Self { engine }
    }

    /// Poll `handle` every `policy.interval` until its state is terminal.
    ///
    /// The first status query is sent immediately. When polling stops without a
    /// terminal state, the engine is asked to cancel the execution.
    pub async fn await_completion(
        &self,
        handle: &ExecutionHandle,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, Error> {
        let polling = tokio::time::timeout(policy.timeout, self.poll_until_terminal(handle, policy));

        let stopped = tokio::select! {
            biased;
            _ = cancel.cancelled() => Stopped::Cancelled,
            outcome = polling => match outcome {
                Ok(result) => return result,
                Err(_) => Stopped::TimedOut,
            },
        };

        self.release(handle).await;
        match stopped {
            Stopped::Cancelled => {
                info!("Stopped polling execution {}: request cancelled", handle.execution_id);
                Err(pipeline_error(
                    PipelineErrorKind::Cancelled,
                    format!("execution {}", handle.execution_id),
                ))
            }
            Stopped::TimedOut => {
                warn!(
                    "Execution {} did not finish within {:?}",
                    handle.execution_id, policy.timeout
                );
                Err(pipeline_error(
                    PipelineErrorKind::Timeout,
                    format!(
                        "execution {} still running after {}s",
                        handle.execution_id,
                        policy.timeout.as_secs()
                    ),
                ))
            }
        }
    }

    async fn poll_until_terminal(
        &self,
        handle: &ExecutionHandle,
        policy: &PollPolicy,
    ) -> Result<ExecutionResult, Error> {
        let mut consecutive_failures: u32 = 0;

        loop {
            match self.engine.get_execution(&handle.execution_id).await {
                Ok(execution) => {
                    consecutive_failures = 0;
                    match ExecutionState::from(execution.status) {
                        ExecutionState::Succeeded => {
                            debug!("Execution {} succeeded", handle.execution_id);
                            return Ok(ExecutionResult::Success {
                                raw_output: raw_output(execution.output),
                            });
                        }
                        ExecutionState::Failed => {
                            let error_detail = execution.error.unwrap_or_else(|| {
                                format!("execution ended with status {:?}", execution.status)
                            });
                            warn!("Execution {} failed: {}", handle.execution_id, error_detail);
                            return Ok(ExecutionResult::Failure { error_detail });
                        }
                        state => {
                            trace!("Execution {} is {:?}", handle.execution_id, state);
                        }
                    }
                }
                Err(e) if e.is_transient() => {
                    consecutive_failures += 1;
                    if consecutive_failures > policy.max_transport_retries {
                        warn!(
                            "Giving up on execution {} after {} failed status queries: {}",
                            handle.execution_id, consecutive_failures, e
                        );
                        return Err(pipeline_error(PipelineErrorKind::Polling, e));
                    }
                    debug!(
                        "Status query {} for execution {} failed, retrying: {}",
                        consecutive_failures, handle.execution_id, e
                    );
                }
                Err(e) => {
                    warn!("Failed to query execution {}: {}", handle.execution_id, e);
                    return Err(pipeline_error(PipelineErrorKind::Polling, e));
                }
            }

            tokio::time::sleep(policy.interval).await;
        }
    }

    async fn release(&self, handle: &ExecutionHandle) {
        match tokio::time::timeout(
            RELEASE_TIMEOUT,
            self.engine.cancel_execution(&handle.execution_id),
        )
        .await
        {
            Ok(Ok(())) => debug!("Released execution {}", handle.execution_id),
            Ok(Err(e)) => warn!("Failed to release execution {}: {}", handle.execution_id, e),
            Err(_) => warn!("Timed out releasing execution {}", handle.execution_id),
        }
    }
}

/// Completion text of a finished execution.
///
/// Prompt steps with `unwrap` yield a bare string. A full chat response is
/// reduced to its first choice; any other shape is passed on as JSON text.
fn raw_output(output: Option<Value>) -> String {
    match output {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(value) => match value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
            Some(content) => content.to_string(),
            None => value.to_string(),
        },
    }
}
