//! Notification provider trait.

use crate::types::notification::{Message, Receipt};
use crate::Error;
use async_trait::async_trait;

/// Abstraction for services that deliver a message to an assignee.
///
/// Supports transactional email APIs such as MailerSend.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Deliver a plain-text message.
    async fn send(&self, message: &Message) -> std::result::Result<Receipt, Error>;

    /// Return unique identifier for this provider (e.g., "mailersend").
    fn provider_id(&self) -> &str;
}
