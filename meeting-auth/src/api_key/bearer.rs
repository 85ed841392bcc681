//! Standard Bearer token authentication.

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use super::{ApiKeyProvider, ProviderAuth};
use crate::error::{api_key_error, ApiKeyErrorKind, Error};

/// Standard Bearer token authentication.
///
/// Uses the standard `Authorization: Bearer <token>` header pattern.
pub struct BearerTokenAuth {
    provider: ApiKeyProvider,
    token: SecretString,
}

impl BearerTokenAuth {
    /// Create a new Bearer token authenticator.
    pub fn new(provider: ApiKeyProvider, token: SecretString) -> Self {
        Self { provider, token }
    }

    /// Get a reference to the token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl ProviderAuth for BearerTokenAuth {
    fn provider(&self) -> ApiKeyProvider {
        self.provider
    }

    fn header(&self) -> Result<(HeaderName, HeaderValue), Error> {
        let token = self.token.expose_secret();
        if token.trim().is_empty() {
            return Err(api_key_error(
                ApiKeyErrorKind::Missing,
                &format!("empty {} token", self.provider.as_str()),
            ));
        }

        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            api_key_error(
                ApiKeyErrorKind::InvalidFormat,
                &format!("{} token is not a valid header value", self.provider.as_str()),
            )
        })?;
        value.set_sensitive(true);

        Ok((AUTHORIZATION, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bearer_header_is_sensitive() {
        let auth = BearerTokenAuth::new(
            ApiKeyProvider::Julep,
            SecretString::from("test_token".to_string()),
        );

        let (name, value) = auth.header().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer test_token");
        assert!(value.is_sensitive());
        assert_eq!(auth.provider(), ApiKeyProvider::Julep);
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let auth = BearerTokenAuth::new(
            ApiKeyProvider::MailerSend,
            SecretString::from("  ".to_string()),
        );

        let err = auth.header().unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::ApiKey(ApiKeyErrorKind::Missing));
    }

    #[test]
    fn test_token_with_newline_is_invalid_format() {
        let auth = BearerTokenAuth::new(
            ApiKeyProvider::GoogleCalendar,
            SecretString::from("abc\ndef".to_string()),
        );

        let err = auth.header().unwrap_err();
        assert_eq!(
            err.error_kind,
            ErrorKind::ApiKey(ApiKeyErrorKind::InvalidFormat)
        );
    }
}
