//! Request-scoped values that flow through the summarization pipeline.

use crate::error::{validation_error, Error};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A transcript accepted for summarization. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRequest {
    transcript: String,
}

impl TranscriptRequest {
    pub fn new(transcript: Option<&str>) -> Result<Self, Error> {
        match transcript {
            Some(text) if !text.trim().is_empty() => Ok(Self {
                transcript: text.to_string(),
            }),
            _ => Err(validation_error("No transcript provided")),
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Input document handed to the execution engine alongside the task.
    pub fn to_input(&self) -> serde_json::Value {
        serde_json::json!({ "transcript": self.transcript })
    }
}

/// A single task assignment extracted from the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActionItem {
    pub task: String,
    pub assignee: String,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub due_date: NaiveDate,
}

/// Summary and action items decoded from the model output.
///
/// Action items keep the order the model listed them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParsedOutcome {
    pub summary: String,
    pub action_items: Vec<ActionItem>,
}

/// Result of one connector call for one action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ConnectorStatus {
    Ok,
    Failed(String),
}

impl ConnectorStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConnectorStatus::Ok)
    }
}

/// Side-effect results for the action item at `index` in the parsed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub index: usize,
    pub task: String,
    pub calendar: ConnectorStatus,
    pub notification: ConnectorStatus,
}

impl DispatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.calendar.is_ok() && self.notification.is_ok()
    }
}
