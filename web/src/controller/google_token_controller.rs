use crate::params::google_token::{VerifyTokenParams, VerifyTokenResponse};
use crate::{AppState, Error};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::{DomainErrorKind, InternalErrorKind};
use log::*;

/// POST verify a Google ID token issued to the web client
#[utoipa::path(
    post,
    path = "/verify_google_token",
    request_body = VerifyTokenParams,
    responses(
        (status = 200, description = "The token is valid for this application", body = VerifyTokenResponse),
        (status = 400, description = "The token is invalid", body = VerifyTokenResponse),
        (status = 500, description = "Token verification is not configured or unavailable"),
    ),
    tag = "meeting_summarizer"
)]
pub async fn verify(
    State(app_state): State<AppState>,
    payload: Result<Json<VerifyTokenParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let token = match payload {
        Ok(Json(params)) => params.token.unwrap_or_default(),
        Err(rejection) => {
            debug!("Rejected token body: {}", rejection.body_text());
            String::new()
        }
    };

    match app_state.token_verifier().verify(&token).await {
        Ok(identity) => Ok((
            StatusCode::OK,
            Json(VerifyTokenResponse::verified(identity.user_id, identity.email)),
        )),
        Err(err) if err.error_kind == DomainErrorKind::Internal(InternalErrorKind::Validation) => {
            Ok((
                StatusCode::BAD_REQUEST,
                Json(VerifyTokenResponse::rejected(err.to_string())),
            ))
        }
        Err(err) => Err(err.into()),
    }
}
