//! HTTP adapters for the collaborators of the summarization pipeline.
//!
//! Each adapter implements one `meeting_ai` provider trait. The helpers below
//! translate transport failures and HTTP statuses into `meeting_ai::Error` so the
//! pipeline can tell transient failures from permanent ones.

pub mod google_calendar;
pub mod google_oauth;
pub mod julep;
pub mod mailersend;

use log::*;
use meeting_ai::Error as ProviderError;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

// Used when a 429 carries no usable Retry-After header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Map an error raised before any response arrived.
pub(crate) fn transport_error(provider: &str, err: reqwest_middleware::Error) -> ProviderError {
    warn!("{} request failed: {:?}", provider, err);
    match err {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
            ProviderError::Timeout(format!("{provider}: {e}"))
        }
        other => ProviderError::Network(format!("{provider}: {other}")),
    }
}

/// Pass successful responses through and turn every other status into an error.
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let error_text = response.text().await.unwrap_or_default();
    warn!("{} API error: {} - {}", provider, status, error_text);

    let detail = format!("{provider} returned {status}: {error_text}");
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(detail),
        StatusCode::NOT_FOUND => ProviderError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => ProviderError::Network(detail),
        _ => ProviderError::Provider(detail),
    })
}

/// Check the status and decode a JSON body.
pub(crate) async fn decode<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let response = check_status(provider, response).await?;
    response.json::<T>().await.map_err(|e| {
        warn!("Failed to parse {} response: {:?}", provider, e);
        ProviderError::Deserialization(format!("{provider}: {e}"))
    })
}
