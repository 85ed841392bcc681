use crate::params::summarize::SummarizeParams;
use crate::{AppState, Error};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use domain::summary::TranscriptRequest;
use domain::CancellationToken;
use log::*;

/// POST summarize a meeting transcript and dispatch its action items
///
/// Calendar and notification failures for individual action items are logged
/// and never change the response.
#[utoipa::path(
    post,
    path = "/summarize",
    request_body = SummarizeParams,
    responses(
        (status = 200, description = "Summary and action items of the meeting", body = domain::ParsedOutcome),
        (status = 400, description = "No transcript provided or unreadable body"),
        (status = 500, description = "The execution engine failed or returned unparseable output"),
    ),
    tag = "meeting_summarizer"
)]
pub async fn summarize(
    State(app_state): State<AppState>,
    payload: Result<Json<SummarizeParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) =
        payload.map_err(|rejection| Error::from_rejection(rejection, "No transcript provided"))?;
    let request = TranscriptRequest::new(params.transcript.as_deref())?;

    let summarizer = app_state.summarizer().ok_or_else(|| {
        error!("Summarize request received but the execution engine is not configured");
        Error::server("Execution engine is not configured")
    })?;

    debug!(
        "POST summarize transcript of {} characters",
        request.transcript().len()
    );

    // Dropping this handler (client disconnect) cancels the running pipeline,
    // which releases the execution on the engine.
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    let report = tokio::spawn(async move {
        summarizer
            .summarize(request.transcript(), &cancel)
            .await
    })
    .await
    .map_err(|e| Error::internal("Summarization task failed", e))??;

    let failed = report
        .dispatch
        .iter()
        .filter(|outcome| !outcome.is_complete())
        .count();
    if failed > 0 {
        warn!(
            "{} of {} action items were not fully dispatched",
            failed,
            report.dispatch.len()
        );
    }

    Ok(Json(report.outcome))
}
