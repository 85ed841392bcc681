//! Types for asynchronous task execution.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an execution as reported by the engine.
///
/// Executions typically progress Queued → Starting → Running → Succeeded.
/// Failed and Cancelled may be reached from any non-terminal state. Statuses
/// added by a provider after this enum was written decode as `Unknown` and are
/// treated as still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    Starting,
    Running,
    AwaitingInput,
    Succeeded,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl Status {
    /// True when no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Succeeded | Status::Failed | Status::Cancelled)
    }
}

/// Author of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Single chat message sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// A prompt step: the messages sent to the model in one call.
///
/// With `unwrap` set the step output is the bare completion text instead of the
/// full chat response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptStep {
    pub prompt: Vec<Message>,
    pub unwrap: bool,
}

/// One step of a task workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Prompt(PromptStep),
}

/// Declarative task document registered with the engine before execution.
///
/// Tasks carry no executable logic of their own; every step is data the engine
/// interprets. Tools are left empty because the summarizer needs none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<serde_json::Value>,
    pub main: Vec<Step>,
}

/// Snapshot of an execution returned by a status query.
///
/// `output` is populated once status is Succeeded; `error` once it is Failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub status: Status,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}
