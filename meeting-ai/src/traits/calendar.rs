//! Calendar provider trait.

use crate::types::calendar::{CreatedEvent, Event};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for calendar services that receive action item due dates.
///
/// Implementations need a credential with write access to the target calendar.
/// Supports Google Calendar; Outlook or CalDAV adapters fit the same shape.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create an all-day event and return the provider's event ID.
    async fn create_event(&self, event: &Event) -> std::result::Result<CreatedEvent, Error>;

    /// Return unique identifier for this provider (e.g., "google_calendar").
    fn provider_id(&self) -> &str;
}
