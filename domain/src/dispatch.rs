//! Fans each extracted action item out to the calendar and notification
//! connectors.
//!
//! Every connector call runs as its own tokio task and is awaited for at most
//! `connector_timeout`. Errors, panics and timeouts are recorded per call in a
//! [`DispatchOutcome`]; none of them stops the other calls or fails the request.

use crate::emails::assignment_notification;
use crate::summary::{ActionItem, ConnectorStatus, DispatchOutcome, ParsedOutcome};
use futures::stream::{self, StreamExt};
use log::*;
use meeting_ai::traits::calendar::Provider as CalendarProvider;
use meeting_ai::traits::notification::Provider as NotificationProvider;
use meeting_ai::types::calendar::Event;
use meeting_ai::Error as ProviderError;
use service::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Action items in flight at once.
    pub concurrency: usize,
    pub connector_timeout: Duration,
    /// Domain of the mailbox derived from each assignee name.
    pub recipient_domain: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            connector_timeout: Duration::from_secs(10),
            recipient_domain: "yourcompany.com".to_string(),
        }
    }
}

impl DispatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.dispatch_concurrency,
            connector_timeout: config.connector_timeout(),
            recipient_domain: config.recipient_email_domain().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    calendar: Arc<dyn CalendarProvider>,
    notifier: Arc<dyn NotificationProvider>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        notifier: Arc<dyn NotificationProvider>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            calendar,
            notifier,
            settings,
        }
    }

    /// Run the side effects of every action item and hand `outcome` back
    /// untouched, with one [`DispatchOutcome`] per item in item order.
    pub async fn dispatch(&self, outcome: ParsedOutcome) -> (ParsedOutcome, Vec<DispatchOutcome>) {
        let items = outcome.action_items.clone().into_iter().enumerate();
        let results: Vec<DispatchOutcome> = stream::iter(items)
            .map(|(index, item)| self.dispatch_item(index, item))
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let incomplete = results.iter().filter(|r| !r.is_complete()).count();
        if incomplete > 0 {
            warn!(
                "{} of {} action items were not fully dispatched",
                incomplete,
                results.len()
            );
        } else {
            info!("Dispatched {} action items", results.len());
        }

        (outcome, results)
    }

    async fn dispatch_item(&self, index: usize, item: ActionItem) -> DispatchOutcome {
        let event = calendar_event(&item);
        let calendar = self.calendar.clone();
        let calendar_call = tokio::spawn(async move { calendar.create_event(&event).await });

        let notification = async {
            match assignment_notification(&item, &self.settings.recipient_domain) {
                Ok(message) => {
                    let notifier = self.notifier.clone();
                    let call = tokio::spawn(async move { notifier.send(&message).await });
                    self.settle("notification", index, call).await
                }
                Err(e) => ConnectorStatus::Failed(e.to_string()),
            }
        };

        let (calendar, notification) =
            tokio::join!(self.settle("calendar", index, calendar_call), notification);

        DispatchOutcome {
            index,
            task: item.task,
            calendar,
            notification,
        }
    }

    // Dropping the handle on timeout detaches the call; it may still complete.
    async fn settle<T>(
        &self,
        connector: &str,
        index: usize,
        call: JoinHandle<Result<T, ProviderError>>,
    ) -> ConnectorStatus {
        match tokio::time::timeout(self.settings.connector_timeout, call).await {
            Ok(Ok(Ok(_))) => {
                debug!("Action item {}: {} call succeeded", index, connector);
                ConnectorStatus::Ok
            }
            Ok(Ok(Err(e))) => {
                warn!("Action item {}: {} call failed: {}", index, connector, e);
                ConnectorStatus::Failed(e.to_string())
            }
            Ok(Err(e)) => {
                error!("Action item {}: {} call aborted: {}", index, connector, e);
                ConnectorStatus::Failed(if e.is_panic() {
                    "connector call panicked".to_string()
                } else {
                    "connector call was cancelled".to_string()
                })
            }
            Err(_) => {
                warn!(
                    "Action item {}: {} call still pending after {:?}",
                    index, connector, self.settings.connector_timeout
                );
                ConnectorStatus::Failed(format!(
                    "no response within {}s",
                    self.settings.connector_timeout.as_secs()
                ))
            }
        }
    }
}

fn calendar_event(item: &ActionItem) -> Event {
    Event {
        title: item.task.clone(),
        description: format!("Assigned to: {}", item.assignee),
        date: item.due_date,
    }
}
