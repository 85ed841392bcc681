use std::error::Error as StdError;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

extern crate log;
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl Error {
    /// An error the caller sees verbatim with a 400 status.
    pub(crate) fn bad_request(message: &str) -> Self {
        Self(domain::error::validation_error(message))
    }

    /// A request body that is not the JSON object an endpoint expects.
    pub(crate) fn from_rejection(rejection: JsonRejection, message: &str) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(message)
    }

    /// A 500 whose message is shown to the caller as-is.
    pub(crate) fn server(message: &str) -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(message.to_string())),
        })
    }

    /// A failure inside this service that is not tied to a domain operation.
    pub(crate) fn internal<E>(message: &str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(DomainError {
            source: Some(Box::new(source)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(message.to_string())),
        })
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self.0.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// Every failure is reported as `{"error": "<message>"}`. Only caller mistakes are 400s.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            info!("Request rejected: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
