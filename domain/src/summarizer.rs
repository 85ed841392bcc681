//! The summarization pipeline: build the task, run it on the execution engine,
//! extract the result and dispatch the action items.

use crate::dispatch::{DispatchSettings, Dispatcher};
use crate::error::{pipeline_error, Error, PipelineErrorKind};
use crate::execution::{ExecutionResult, PollPolicy, Poller, Submitter};
use crate::extraction;
use crate::gateway::google_calendar::{GoogleCalendarClient, GoogleCalendarSettings};
use crate::gateway::julep::{JulepClient, JulepSettings};
use crate::gateway::mailersend::{MailerSendClient, MailerSendSettings};
use crate::prompt;
use crate::summary::{DispatchOutcome, ParsedOutcome, TranscriptRequest};
use log::*;
use meeting_ai::traits::calendar::Provider as CalendarProvider;
use meeting_ai::traits::execution::Provider as ExecutionProvider;
use meeting_ai::traits::notification::Provider as NotificationProvider;
use service::config::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of one summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryReport {
    pub outcome: ParsedOutcome,
    pub dispatch: Vec<DispatchOutcome>,
}

/// Immutable pipeline shared by all requests.
pub struct Summarizer {
    submitter: Submitter,
    poller: Poller,
    policy: PollPolicy,
    dispatcher: Dispatcher,
}

impl Summarizer {
    pub fn new(
        engine: Arc<dyn ExecutionProvider>,
        calendar: Arc<dyn CalendarProvider>,
        notifier: Arc<dyn NotificationProvider>,
        policy: PollPolicy,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            submitter: Submitter::new(engine.clone()),
            poller: Poller::new(engine),
            policy,
            dispatcher: Dispatcher::new(calendar, notifier, settings),
        }
    }

    /// Connect the configured providers. Creates the engine agent.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let engine = JulepClient::connect(JulepSettings::from_config(config)).await?;
        let calendar = GoogleCalendarClient::new(GoogleCalendarSettings::from_config(config))?;
        let notifier = MailerSendClient::new(MailerSendSettings::from_config(config))?;

        info!(
            "Summarizer ready: engine={} calendar={} notifications={}",
            engine.provider_id(),
            calendar.provider_id(),
            notifier.provider_id()
        );

        Ok(Self::new(
            Arc::new(engine),
            Arc::new(calendar),
            Arc::new(notifier),
            PollPolicy::from_config(config),
            DispatchSettings::from_config(config),
        ))
    }

    /// Summarize `transcript` and dispatch its action items.
    ///
    /// Every failure up to extraction fails the request. Connector failures are
    /// only recorded in the report.
    pub async fn summarize(
        &self,
        transcript: &str,
        cancel: &CancellationToken,
    ) -> Result<SummaryReport, Error> {
        let request = TranscriptRequest::new(Some(transcript))?;
        let spec = prompt::build(request.transcript())?;

        let handle = self.submitter.submit(&spec, &request.to_input()).await?;
        let raw_output = match self
            .poller
            .await_completion(&handle, &self.policy, cancel)
            .await?
        {
            ExecutionResult::Success { raw_output } => raw_output,
            ExecutionResult::Failure { error_detail } => {
                return Err(pipeline_error(PipelineErrorKind::EngineFailure, error_detail));
            }
        };

        let outcome = extraction::extract(&raw_output).inspect_err(|_| {
            debug!(
                "Unparseable output of execution {}: {}",
                handle.execution_id, raw_output
            );
        })?;

        let (outcome, dispatch) = self.dispatcher.dispatch(outcome).await;
        Ok(SummaryReport { outcome, dispatch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind, OutputFormatErrorKind};
    use chrono::NaiveDate;
    use meeting_ai::traits::calendar::MockProvider as MockCalendar;
    use meeting_ai::traits::execution::MockProvider as MockEngine;
    use meeting_ai::traits::notification::MockProvider as MockNotifier;
    use meeting_ai::types::calendar::CreatedEvent;
    use meeting_ai::types::notification::Receipt;
    use meeting_ai::{Execution, ExecutionStatus};
    use serde_json::json;

    const STUB_OUTPUT: &str = "```yaml
summary: \"Alice to send report\"
action_items:
- task: \"Send report\"
  assignee: \"Alice\"
  due_date: \"2024-05-01\"
```";

    fn engine_finishing_with(execution: Execution) -> MockEngine {
        let mut engine = MockEngine::new();
        engine
            .expect_create_task()
            .times(1)
            .returning(|_| Ok("task_1".to_string()));
        engine
            .expect_create_execution()
            .times(1)
            .returning(|_, _| Ok("ex_1".to_string()));
        engine
            .expect_get_execution()
            .times(1)
            .returning(move |_| Ok(execution.clone()));
        engine
    }

    fn summarizer(engine: MockEngine, calendar: MockCalendar, notifier: MockNotifier) -> Summarizer {
        Summarizer::new(
            Arc::new(engine),
            Arc::new(calendar),
            Arc::new(notifier),
            PollPolicy::default(),
            DispatchSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_single_action_item() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Succeeded,
            output: Some(json!(STUB_OUTPUT)),
            error: None,
        });
        let mut calendar = MockCalendar::new();
        calendar.expect_create_event().times(1).returning(|_| {
            Ok(CreatedEvent {
                id: "evt_1".to_string(),
                html_link: None,
            })
        });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Ok(Receipt::default()));

        let report = summarizer(engine, calendar, notifier)
            .summarize(
                "Alice will send the report by 2024-05-01.",
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&report.outcome).unwrap(),
            json!({
                "summary": "Alice to send report",
                "action_items": [
                    {"task": "Send report", "assignee": "Alice", "due_date": "2024-05-01"}
                ]
            })
        );
        assert_eq!(report.dispatch.len(), 1);
        assert!(report.dispatch[0].is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connector_failures_still_return_outcome() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Succeeded,
            output: Some(json!(STUB_OUTPUT)),
            error: None,
        });
        let mut calendar = MockCalendar::new();
        calendar.expect_create_event().times(1).returning(|_| {
            Err(meeting_ai::Error::Authentication("token expired".to_string()))
        });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Err(meeting_ai::Error::Network("smtp down".to_string())));

        let report = summarizer(engine, calendar, notifier)
            .summarize("Alice will send the report by 2024-05-01.", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            report.outcome.action_items[0].due_date,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(!report.dispatch[0].calendar.is_ok());
        assert!(!report.dispatch[0].notification.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_engine_failure_is_fatal() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Failed,
            output: None,
            error: Some("context length exceeded".to_string()),
        });
        let mut calendar = MockCalendar::new();
        calendar.expect_create_event().never();

        let err = summarizer(engine, calendar, MockNotifier::new())
            .summarize("Bob: hello", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Pipeline(PipelineErrorKind::EngineFailure)
        );
        assert_eq!(err.to_string(), "Execution failed: context length exceeded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_output_dispatches_nothing() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Succeeded,
            output: Some(json!("I could not find any action items.")),
            error: None,
        });

        let err = summarizer(engine, MockCalendar::new(), MockNotifier::new())
            .summarize("Bob: hello", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Pipeline(PipelineErrorKind::OutputFormat(
                OutputFormatErrorKind::MissingFence
            ))
        );
    }

    #[tokio::test]
    async fn test_blank_transcript_never_reaches_engine() {
        let mut engine = MockEngine::new();
        engine.expect_create_task().never();

        let err = summarizer(engine, MockCalendar::new(), MockNotifier::new())
            .summarize("   ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Validation)
        );
    }
}
