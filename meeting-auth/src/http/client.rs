//! Builder for the HTTP clients the provider gateways talk through.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientBuilder;
use reqwest_retry::RetryTransientMiddleware;

use super::Backoff;
use crate::api_key::ProviderAuth;
use crate::error::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRIES: u32 = 3;

/// HTTP client with the retry middleware installed.
pub type AuthenticatedClient = reqwest_middleware::ClientWithMiddleware;

/// Builds an [`AuthenticatedClient`].
///
/// The credential becomes a sensitive default header, so every request made
/// through the client is authenticated and the secret never appears in debug
/// output. Transient failures are retried on the configured [`Backoff`].
pub struct AuthenticatedClientBuilder {
    auth: Option<Box<dyn ProviderAuth>>,
    timeout: Duration,
    backoff: Backoff,
}

impl AuthenticatedClientBuilder {
    pub fn new() -> Self {
        Self {
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            backoff: Backoff::new(DEFAULT_RETRIES),
        }
    }

    pub fn with_auth(mut self, auth: Box<dyn ProviderAuth>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Per-attempt timeout, covering connect through reading the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry transient failures up to `max_retries` times on the default schedule.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.backoff = Backoff::new(max_retries);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fails when the credential cannot be turned into a header or the
    /// TLS backend cannot be initialized.
    pub fn build(self) -> Result<AuthenticatedClient, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("meeting-summarizer/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(auth) = &self.auth {
            let (name, value) = auth.header()?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        Ok(ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(self.backoff))
            .build())
    }
}

impl Default for AuthenticatedClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
