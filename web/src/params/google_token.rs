use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /verify_google_token`
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct VerifyTokenParams {
    /// Google ID token issued to the web client
    pub(crate) token: Option<String>,
}

/// Outcome of a token verification. `userid` and `email` are set on success,
/// `error` otherwise.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct VerifyTokenResponse {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) userid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl VerifyTokenResponse {
    pub(crate) fn verified(userid: String, email: String) -> Self {
        Self {
            success: true,
            userid: Some(userid),
            email: Some(email),
            error: None,
        }
    }

    pub(crate) fn rejected(error: String) -> Self {
        Self {
            success: false,
            userid: None,
            email: None,
            error: Some(error),
        }
    }
}
