//! Credentials for service providers.
//!
//! Provides the trait the HTTP client builder uses to attach credentials to every
//! request, and the bearer implementation all current providers share.

mod bearer;

use reqwest::header::{HeaderName, HeaderValue};

use crate::error::Error;

pub use bearer::BearerTokenAuth;

/// Known credentialed providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyProvider {
    Julep,
    GoogleCalendar,
    MailerSend,
}

impl ApiKeyProvider {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyProvider::Julep => "julep",
            ApiKeyProvider::GoogleCalendar => "google_calendar",
            ApiKeyProvider::MailerSend => "mailersend",
        }
    }
}

/// Trait for credentials that authenticate every request of a client.
///
/// The header is produced once, when the client is built, and installed as a
/// sensitive default header so it never shows up in debug output.
pub trait ProviderAuth: Send + Sync {
    /// Get the provider identifier.
    fn provider(&self) -> ApiKeyProvider;

    /// Build the header carrying the credential.
    fn header(&self) -> Result<(HeaderName, HeaderValue), Error>;
}
