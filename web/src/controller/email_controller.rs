use crate::params::email::GenerateEmailParams;
use crate::Error;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;
use domain::emails;
use log::*;

/// POST draft a follow-up email for one action item
#[utoipa::path(
    post,
    path = "/generate_email",
    request_body = GenerateEmailParams,
    responses(
        (status = 200, description = "Subject and body of the drafted email", body = domain::emails::FollowUpEmail),
        (status = 400, description = "Missing required data"),
    ),
    tag = "meeting_summarizer"
)]
pub async fn generate_email(
    payload: Result<Json<GenerateEmailParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) =
        payload.map_err(|rejection| Error::from_rejection(rejection, "Missing required data"))?;
    debug!("POST generate follow-up email for task: {:?}", params.task);

    let email = emails::follow_up_email(
        params.task.as_deref(),
        params.assignee.as_deref(),
        params.due_date.as_deref(),
    )?;

    Ok(Json(email))
}
