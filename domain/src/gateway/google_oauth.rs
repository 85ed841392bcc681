//! Google ID token verification.
//!
//! Tokens are checked against Google's tokeninfo endpoint, which validates the
//! signature and expiry. This client then checks that the token was issued by
//! Google for the configured OAuth client.

use crate::error::{config_error, validation_error, DomainErrorKind, Error, ExternalErrorKind};
use log::*;
use serde::Deserialize;
use service::config::Config;
use std::time::Duration;

const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Claims of a verified ID token as returned by tokeninfo
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    iss: String,
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// The Google account an ID token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    pub user_id: String,
    pub email: String,
}

pub struct TokenVerifier {
    client: reqwest::Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

impl TokenVerifier {
    pub fn new(tokeninfo_url: &str, client_id: Option<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            tokeninfo_url: tokeninfo_url.to_string(),
            client_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            config.google_tokeninfo_url(),
            config.google_client_id(),
            config.http_timeout(),
        )
    }

    /// Verify `token` and return the account it identifies.
    ///
    /// Any token Google does not accept, or that was issued for another client,
    /// is a validation error.
    pub async fn verify(&self, token: &str) -> Result<GoogleIdentity, Error> {
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            warn!("Google client ID is not configured");
            config_error("GOOGLE_CLIENT_ID is not set")
        })?;

        if token.trim().is_empty() {
            return Err(validation_error("Invalid token"));
        }

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google tokeninfo: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_server_error() {
            warn!("Google tokeninfo error: {}", response.status());
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Google token verification is unavailable".to_string(),
                )),
            });
        }
        if !response.status().is_success() {
            debug!("Google rejected ID token: {}", response.status());
            return Err(validation_error("Invalid token"));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            warn!("Failed to parse Google tokeninfo response: {:?}", e);
            validation_error("Invalid token")
        })?;

        if info.aud != client_id || !ISSUERS.contains(&info.iss.as_str()) {
            warn!("ID token issued for another client or issuer: {}", info.iss);
            return Err(validation_error("Invalid token"));
        }
        let email = info.email.ok_or_else(|| validation_error("Invalid token"))?;

        info!("Verified Google ID token for user {}", info.sub);
        Ok(GoogleIdentity {
            user_id: info.sub,
            email,
        })
    }
}
