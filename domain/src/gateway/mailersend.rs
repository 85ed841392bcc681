use super::{check_status, transport_error};
use crate::error::Error;
use async_trait::async_trait;
use email_address::EmailAddress;
use log::*;
use meeting_ai::traits::notification::Provider;
use meeting_ai::types::notification::{Message, Receipt};
use meeting_ai::Error as ProviderError;
use meeting_auth::api_key::{ApiKeyProvider, BearerTokenAuth};
use meeting_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder, Backoff};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

const PROVIDER_ID: &str = "mailersend";

#[derive(Debug, Clone)]
pub struct MailerSendSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub sender: EmailSender,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl MailerSendSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.mailersend_base_url().to_string(),
            api_key: config.mailersend_api_key(),
            sender: EmailSender {
                email: config.notification_sender_email().to_string(),
                name: Some(config.notification_sender_name().to_string()),
            },
            timeout: Backoff::new(config.connector_max_retries)
                .attempt_timeout(config.connector_timeout()),
            max_retries: config.connector_max_retries,
        }
    }
}

/// MailerSend API client for sending transactional emails
pub struct MailerSendClient {
    // None when no API key is configured; every send then fails.
    client: Option<AuthenticatedClient>,
    base_url: String,
    sender: EmailSender,
}

/// Email recipient with name and email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecipient {
    pub email: String,
    pub name: Option<String>,
}

/// Email sender with name and email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSender {
    pub email: String,
    pub name: Option<String>,
}

/// Request payload for sending an email via MailerSend
#[derive(Debug, Serialize)]
pub struct SendEmailRequest {
    pub from: EmailSender,
    pub to: Vec<EmailRecipient>,
    pub subject: String,
    pub text: String,
}

impl MailerSendClient {
    pub fn new(settings: MailerSendSettings) -> Result<Self, Error> {
        let client = match settings.api_key {
            Some(api_key) if !api_key.trim().is_empty() => Some(
                AuthenticatedClientBuilder::new()
                    .with_auth(Box::new(BearerTokenAuth::new(
                        ApiKeyProvider::MailerSend,
                        SecretString::new(api_key),
                    )))
                    .with_timeout(settings.timeout)
                    .with_max_retries(settings.max_retries)
                    .build()?,
            ),
            _ => {
                warn!("MailerSend API key is not configured, notifications will not be sent");
                None
            }
        };

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            sender: settings.sender,
        })
    }

    /// Send an email using MailerSend API
    pub async fn send_email(&self, request: SendEmailRequest) -> Result<Receipt, ProviderError> {
        let client = self.client.as_ref().ok_or_else(|| {
            ProviderError::Configuration("no MailerSend API key configured".to_string())
        })?;

        // Validate email addresses before sending
        if !is_valid_email(&request.from.email) {
            warn!("Invalid sender email: {}", request.from.email);
            return Err(ProviderError::Configuration(format!(
                "Invalid sender email address: {}",
                request.from.email
            )));
        }

        for recipient in &request.to {
            if !is_valid_email(&recipient.email) {
                warn!("Invalid recipient email: {}", recipient.email);
                return Err(ProviderError::Provider(format!(
                    "Invalid recipient email address: {}",
                    recipient.email
                )));
            }
        }

        info!("Sending email to {} recipients", request.to.len());
        debug!("Email subject: {}", request.subject);

        let response = client
            .post(format!("{}/email", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        let response = check_status(PROVIDER_ID, response).await?;

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        info!("Email sent successfully, message_id: {:?}", message_id);
        Ok(Receipt { message_id })
    }
}

#[async_trait]
impl Provider for MailerSendClient {
    async fn send(&self, message: &Message) -> Result<Receipt, ProviderError> {
        self.send_email(SendEmailRequest {
            from: self.sender.clone(),
            to: vec![EmailRecipient {
                email: message.recipient.email.clone(),
                name: message.recipient.name.clone(),
            }],
            subject: message.subject.clone(),
            text: message.body.clone(),
        })
        .await
    }

    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }
}

/// Validate email address format using email_address crate
pub fn is_valid_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}
