//! Google Calendar v3 client that places action items on a calendar as all-day
//! events.

use super::{decode, transport_error};
use crate::error::Error;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use log::*;
use meeting_ai::traits::calendar::Provider;
use meeting_ai::types::calendar::{CreatedEvent, Event};
use meeting_ai::Error as ProviderError;
use meeting_auth::api_key::{ApiKeyProvider, BearerTokenAuth};
use meeting_auth::http::{AuthenticatedClient, AuthenticatedClientBuilder, Backoff};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

const PROVIDER_ID: &str = "google_calendar";

#[derive(Debug, Clone)]
pub struct GoogleCalendarSettings {
    pub base_url: String,
    pub calendar_id: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl GoogleCalendarSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.google_calendar_base_url().to_string(),
            calendar_id: config.google_calendar_id().to_string(),
            access_token: config.google_calendar_access_token(),
            timeout: Backoff::new(config.connector_max_retries)
                .attempt_timeout(config.connector_timeout()),
            max_retries: config.connector_max_retries,
        }
    }
}

/// Request payload for inserting an event
#[derive(Debug, Serialize)]
struct EventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventDate,
    end: EventDate,
}

/// All-day event boundary
#[derive(Debug, Serialize)]
struct EventDate {
    date: NaiveDate,
}

/// Response from inserting an event
#[derive(Debug, Deserialize)]
struct EventResponse {
    id: String,
    #[serde(rename = "htmlLink", default)]
    html_link: Option<String>,
}

pub struct GoogleCalendarClient {
    // None when no access token is configured; every call then fails.
    client: Option<AuthenticatedClient>,
    events_url: String,
}

impl GoogleCalendarClient {
    pub fn new(settings: GoogleCalendarSettings) -> Result<Self, Error> {
        let client = match settings.access_token {
            Some(token) if !token.trim().is_empty() => Some(
                AuthenticatedClientBuilder::new()
                    .with_auth(Box::new(BearerTokenAuth::new(
                        ApiKeyProvider::GoogleCalendar,
                        SecretString::new(token),
                    )))
                    .with_timeout(settings.timeout)
                    .with_max_retries(settings.max_retries)
                    .build()?,
            ),
            _ => {
                warn!("Google Calendar access token is not configured, events will not be created");
                None
            }
        };

        let events_url = format!(
            "{}/calendars/{}/events",
            settings.base_url.trim_end_matches('/'),
            urlencoding::encode(&settings.calendar_id)
        );

        Ok(Self { client, events_url })
    }
}

#[async_trait]
impl Provider for GoogleCalendarClient {
    async fn create_event(&self, event: &Event) -> Result<CreatedEvent, ProviderError> {
        let client = self.client.as_ref().ok_or_else(|| {
            ProviderError::Authentication("no Google Calendar access token configured".to_string())
        })?;

        // All-day events end on the following day, exclusive.
        let end = event.date.checked_add_days(Days::new(1)).ok_or_else(|| {
            ProviderError::Configuration(format!("no day after {}", event.date))
        })?;
        let request = EventRequest {
            summary: &event.title,
            description: &event.description,
            start: EventDate { date: event.date },
            end: EventDate { date: end },
        };

        debug!("Creating calendar event \"{}\" on {}", event.title, event.date);
        let response = client
            .post(&self.events_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_ID, e))?;
        let created: EventResponse = decode(PROVIDER_ID, response).await?;
        info!("Event created: {:?}", created.html_link);

        Ok(CreatedEvent {
            id: created.id,
            html_link: created.html_link,
        })
    }

    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }
}
