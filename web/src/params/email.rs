use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /generate_email`, one action item to draft a follow-up for.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"task": "Send report", "assignee": "Alice", "due_date": "2024-05-01"}))]
pub(crate) struct GenerateEmailParams {
    pub(crate) task: Option<String>,
    pub(crate) assignee: Option<String>,
    pub(crate) due_date: Option<String>,
}
