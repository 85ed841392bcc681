//! Types for calendar operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// All-day event placed on a calendar for an action item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Identifier and link of an event the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
    pub html_link: Option<String>,
}
