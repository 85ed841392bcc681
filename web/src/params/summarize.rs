use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /summarize`
///
/// # Fields
///
/// * `transcript` - The meeting transcript to summarize
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"transcript": "Alice will send the report by 2024-05-01."}))]
pub(crate) struct SummarizeParams {
    pub(crate) transcript: Option<String>,
}
