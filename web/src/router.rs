use crate::controller::{
    email_controller, google_token_controller, health_check_controller, summarize_controller,
};
use crate::{params, AppState};
use axum::{
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Summarizer API"
        ),
        paths(
            summarize_controller::summarize,
            email_controller::generate_email,
            google_token_controller::verify,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::ActionItem,
                domain::ParsedOutcome,
                domain::emails::FollowUpEmail,
                params::summarize::SummarizeParams,
                params::email::GenerateEmailParams,
                params::google_token::VerifyTokenParams,
                params::google_token::VerifyTokenResponse,
            )
        ),
        tags(
            (name = "meeting_summarizer", description = "Meeting transcript summarization API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(summarize_routes(app_state.clone()))
        .merge(email_routes())
        .merge(google_token_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn summarize_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/summarize", post(summarize_controller::summarize))
        .with_state(app_state)
}

fn email_routes() -> Router {
    Router::new().route("/generate_email", post(email_controller::generate_email))
}

fn google_token_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/verify_google_token",
            post(google_token_controller::verify),
        )
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use domain::dispatch::DispatchSettings;
    use domain::execution::PollPolicy;
    use domain::gateway::google_oauth::TokenVerifier;
    use domain::Summarizer;
    use meeting_ai::traits::calendar::MockProvider as MockCalendar;
    use meeting_ai::traits::execution::MockProvider as MockEngine;
    use meeting_ai::traits::notification::MockProvider as MockNotifier;
    use meeting_ai::types::calendar::CreatedEvent;
    use meeting_ai::types::notification::Receipt;
    use meeting_ai::{Execution, ExecutionStatus};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const STUB_OUTPUT: &str = "```yaml
summary: \"Alice to send report\"
action_items:
- task: \"Send report\"
  assignee: \"Alice\"
  due_date: \"2024-05-01\"
```";

    // Nothing listens on port 9; tests that reach the network would fail loudly.
    fn token_verifier() -> TokenVerifier {
        TokenVerifier::new(
            "http://127.0.0.1:9/tokeninfo",
            Some("client-1".to_string()),
            Duration::from_secs(1),
        )
        .unwrap()
    }

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

    fn app(engine: Option<MockEngine>, calendar: MockCalendar, notifier: MockNotifier) -> Router {
        let summarizer = engine.map(|engine| {
            Summarizer::new(
                Arc::new(engine),
                Arc::new(calendar),
                Arc::new(notifier),
                PollPolicy::default(),
                DispatchSettings::default(),
            )
        });
        define_routes(AppState::new(summarizer, token_verifier()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let app = app(None, MockCalendar::new(), MockNotifier::new());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"healthy");
    }

    #[tokio::test]
    async fn test_summarize_returns_outcome() {
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

        let response = app(Some(engine), calendar, notifier)
            .oneshot(post_json(
                "/summarize",
                r#"{"transcript": "Alice will send the report by 2024-05-01."}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "summary": "Alice to send report",
                "action_items": [
                    {"task": "Send report", "assignee": "Alice", "due_date": "2024-05-01"}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_summarize_ignores_connector_failures() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Succeeded,
            output: Some(json!(STUB_OUTPUT)),
            error: None,
        });
        let mut calendar = MockCalendar::new();
        calendar
            .expect_create_event()
            .returning(|_| Err(meeting_ai::Error::Network("connection reset".to_string())));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .returning(|_| Err(meeting_ai::Error::Configuration("no key".to_string())));

        let response = app(Some(engine), calendar, notifier)
            .oneshot(post_json(
                "/summarize",
                r#"{"transcript": "Alice will send the report by 2024-05-01."}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["action_items"][0]["assignee"], "Alice");
    }

    #[tokio::test]
    async fn test_summarize_without_transcript_is_bad_request() {
        // An engine mock without expectations panics on any call.
        for body in [r#"{}"#, r#"{"transcript": ""}"#, r#"{"transcript": "   "}"#] {
            let response = app(Some(MockEngine::new()), MockCalendar::new(), MockNotifier::new())
                .oneshot(post_json("/summarize", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(
                json_body(response).await,
                json!({"error": "No transcript provided"})
            );
        }
    }

    #[tokio::test]
    async fn test_summarize_unreadable_body_is_bad_request() {
        let response = app(Some(MockEngine::new()), MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json("/summarize", "transcript=hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_summarize_without_engine_is_server_error() {
        let response = app(None, MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json("/summarize", r#"{"transcript": "Bob: hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Execution engine is not configured"})
        );
    }

    #[tokio::test]
    async fn test_summarize_engine_failure_is_server_error() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Failed,
            output: None,
            error: Some("context length exceeded".to_string()),
        });

        let response = app(Some(engine), MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json("/summarize", r#"{"transcript": "Bob: hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Execution failed: context length exceeded"})
        );
    }

    #[tokio::test]
    async fn test_summarize_unparseable_output_is_server_error() {
        let engine = engine_finishing_with(Execution {
            id: "ex_1".to_string(),
            status: ExecutionStatus::Succeeded,
            output: Some(json!("Here is your summary, no yaml today.")),
            error: None,
        });

        let response = app(Some(engine), MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json("/summarize", r#"{"transcript": "Bob: hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_generate_email_drafts_follow_up() {
        let response = app(None, MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json(
                "/generate_email",
                r#"{"task": "Send report", "assignee": "Alice", "due_date": "2024-05-01"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["subject"], "Send report");
        let text = body["body"].as_str().unwrap();
        assert!(text.starts_with("Dear Alice,"));
        assert!(text.contains("Due Date: 2024-05-01"));
    }

    #[tokio::test]
    async fn test_generate_email_missing_field_is_bad_request() {
        let response = app(None, MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json(
                "/generate_email",
                r#"{"task": "Send report", "assignee": "Alice"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Missing required data"})
        );
    }

    #[tokio::test]
    async fn test_verify_blank_token_is_rejected() {
        let response = app(None, MockCalendar::new(), MockNotifier::new())
            .oneshot(post_json("/verify_google_token", r#"{"token": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "error": "Invalid token"})
        );
    }

    #[tokio::test]
    async fn test_openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in ["/summarize", "/generate_email", "/verify_google_token", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
