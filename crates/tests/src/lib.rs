//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Wire contract snapshots (envelope, record)
//! - Config file -> dispatcher -> fake provider scenarios
//! - Envelope closure under arbitrary input

#[cfg(test)]
mod fake_provider {
    use std::sync::{Arc, Mutex};

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{StatusCode, Uri};
    use axum::Router;
    use serde_json::Value;

    #[derive(Clone)]
    struct Shared {
        status: StatusCode,
        seen: Arc<Mutex<Vec<(String, Value)>>>,
    }

    /// Provider stand-in answering every path with one status
    pub struct FakeProvider {
        pub base_url: String,
        seen: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl FakeProvider {
        pub async fn start(status: u16) -> Self {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let shared = Shared {
                status: StatusCode::from_u16(status).unwrap(),
                seen: Arc::clone(&seen),
            };
            let app = Router::new().fallback(capture).with_state(shared);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            Self {
                base_url: format!("http://{addr}"),
                seen,
            }
        }

        /// (path, JSON body) of every request so far
        pub fn requests(&self) -> Vec<(String, Value)> {
            self.seen.lock().unwrap().clone()
        }

        pub fn hits(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    async fn capture(State(shared): State<Shared>, uri: Uri, body: Bytes) -> StatusCode {
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        shared
            .seen
            .lock()
            .unwrap()
            .push((uri.path().to_string(), body));
        shared.status
    }
}

#[cfg(test)]
mod contract_tests {
    use contracts::{DeliveryMethod, FeedbackRecord, ResultEnvelope};
    use serde_json::json;

    #[test]
    fn test_envelope_wire_shapes() {
        assert_eq!(
            serde_json::to_value(ResultEnvelope::success("Thank you for your feedback!")).unwrap(),
            json!({"status": "success", "message": "Thank you for your feedback!"})
        );
        assert_eq!(
            serde_json::to_value(ResultEnvelope::failure("nope")).unwrap(),
            json!({"error": true, "status": "failure", "message": "nope"})
        );
    }

    #[test]
    fn test_widget_payload_decodes() {
        let record: FeedbackRecord = serde_json::from_value(json!({
            "topic": "Pricing",
            "option": "Neutral",
            "message": null,
            "metadata": {
                "route": {
                    "path": "/pricing",
                    "fullPath": "/pricing?plan=pro#faq",
                    "name": "pricing",
                    "hash": "#faq",
                    "query": {"plan": "pro"},
                    "redirectedFrom": null
                },
                "time": {"timestamp": "2024-01-01T09:30:00+01:00", "timezone": "Europe/Berlin"}
            }
        }))
        .unwrap();

        assert_eq!(record.reaction, "Neutral");
        assert_eq!(record.message, "");
        assert_eq!(record.metadata.route.full_path, "/pricing?plan=pro#faq");
        assert!(record.metadata.route.redirect().is_none());
    }

    #[test]
    fn test_method_selector_sources() {
        assert_eq!(DeliveryMethod::parse("github"), DeliveryMethod::IssueTracker);
        assert_eq!(DeliveryMethod::parse("custom-endpoint"), DeliveryMethod::Webhook);
        assert_eq!(DeliveryMethod::parse(""), DeliveryMethod::Unconfigured);
        assert_eq!(DeliveryMethod::parse("carrier-pigeon"), DeliveryMethod::Unconfigured);
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::{create_dispatcher, Dispatcher};
    use serde_json::{json, Value};

    use crate::fake_provider::FakeProvider;

    const SUBMISSION: &str = r#"{
        "topic": "Docs",
        "reaction": "Happy",
        "message": "Great site <script>alert(1)</script>",
        "metadata": {
            "route": {
                "path": "/guide",
                "fullPath": "/guide?step=2",
                "name": "guide",
                "hash": "",
                "query": {"step": "2"}
            },
            "time": {"timestamp": "2024-06-01T12:00:00Z", "timezone": "UTC"}
        }
    }"#;

    fn dispatcher_from_toml(toml: &str) -> Dispatcher {
        let config = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        create_dispatcher(&config.delivery).unwrap()
    }

    fn envelope(outcome: &dispatcher::DispatchOutcome) -> Value {
        serde_json::to_value(&outcome.envelope).unwrap()
    }

    /// Email success path: one outbound call, subject carries the site name
    #[tokio::test]
    async fn test_email_success_path() {
        let provider = FakeProvider::start(200).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery]
method = "email"
site_name = "Acme Docs"

[delivery.email]
api_key = "re_live"
from = "feedback@acme.dev"
to = "team@acme.dev"
api_base = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert_eq!(outcome.status_code, 200);
        assert_eq!(
            envelope(&outcome),
            json!({"status": "success", "message": "Thank you for your feedback!"})
        );

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let (path, body) = &requests[0];
        assert_eq!(path, "/emails");
        assert_eq!(body["subject"], "New Feedback Submission (Acme Docs)");
        let html = body["html"].as_str().unwrap();
        assert!(!html.contains("<script>"));
    }

    /// Empty API key: generic configuration failure, nothing sent
    #[tokio::test]
    async fn test_missing_credentials() {
        let provider = FakeProvider::start(200).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery]
method = "email"

[delivery.email]
api_key = ""
from = "feedback@acme.dev"
to = "team@acme.dev"
api_base = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert_eq!(outcome.status_code, 500);
        assert_eq!(
            envelope(&outcome),
            json!({
                "error": true,
                "status": "failure",
                "message": "A server configuration error occurred. Please try again later."
            })
        );
        assert_eq!(provider.hits(), 0);
    }

    /// No method: fixed error channel, zero adapter calls
    #[tokio::test]
    async fn test_unconfigured_method() {
        let provider = FakeProvider::start(200).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery.email]
api_key = "re_live"
from = "feedback@acme.dev"
to = "team@acme.dev"
api_base = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert_eq!(
            outcome.envelope.message(),
            "Submission Failed. Please Provide a Default Feedback Method."
        );
        assert!(!outcome.is_success());
        assert_eq!(provider.hits(), 0);
    }

    /// Issue tracker: labels carry the raw reaction, body is Markdown
    #[tokio::test]
    async fn test_issue_tracker_path() {
        let provider = FakeProvider::start(201).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery]
method = "issue-tracker"
site_name = "Acme Docs"

[delivery.issue_tracker]
token = "ghp_live"
owner = "acme"
repo = "docs"
api_base = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert!(outcome.is_success());

        let requests = provider.requests();
        let (path, body) = &requests[0];
        assert_eq!(path, "/repos/acme/docs/issues");
        assert_eq!(body["title"], "[Feedback] Acme Docs");
        assert_eq!(body["labels"], json!(["feedback", "Happy"]));
        assert!(body["body"].as_str().unwrap().contains("| **Topic** | Docs |"));
    }

    /// Webhook: flattened record plus siteName
    #[tokio::test]
    async fn test_webhook_path() {
        let provider = FakeProvider::start(200).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery]
method = "custom-endpoint"
site_name = "Acme Docs"

[delivery.webhook]
endpoint = "/collect"
origin = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert!(outcome.is_success());

        let requests = provider.requests();
        let (path, body) = &requests[0];
        assert_eq!(path, "/collect");
        assert_eq!(body["siteName"], "Acme Docs");
        assert_eq!(body["reaction"], "Happy");
        assert_eq!(body["metadata"]["route"]["fullPath"], "/guide?step=2");
    }

    /// Malformed webhook target fails before any request
    #[tokio::test]
    async fn test_webhook_bad_endpoint() {
        let dispatcher = dispatcher_from_toml(
            r#"
[delivery]
method = "webhook"

[delivery.webhook]
endpoint = "not-a-url"
"#,
        );

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert_eq!(outcome.status_code, 500);
        assert_eq!(
            outcome.envelope.message(),
            "A server configuration error occurred. Please try again later."
        );
    }

    /// Provider outage surfaces as the generic delivery message
    #[tokio::test]
    async fn test_provider_outage() {
        let provider = FakeProvider::start(503).await;
        let dispatcher = dispatcher_from_toml(&format!(
            r#"
[delivery]
method = "email"

[delivery.email]
api_key = "re_live"
from = "feedback@acme.dev"
to = "team@acme.dev"
api_base = "{}"
"#,
            provider.base_url
        ));

        let outcome = dispatcher.dispatch(SUBMISSION.as_bytes()).await;
        assert_eq!(outcome.status_code, 500);
        assert_eq!(
            outcome.envelope.message(),
            "A server error occurred while submitting feedback."
        );
        assert_eq!(provider.hits(), 1);
        assert_eq!(dispatcher.metrics().failed, 1);
    }
}

#[cfg(test)]
mod property_tests {
    use contracts::{DeliveryConfig, DeliveryMethod, WebhookSettings};
    use dispatcher::create_dispatcher;
    use proptest::prelude::*;
    use serde_json::Value;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn is_closed_shape(value: &Value) -> bool {
        let Some(object) = value.as_object() else {
            return false;
        };
        match object.get("status").and_then(Value::as_str) {
            Some("success") => object.len() == 2 && object["message"].is_string(),
            Some("failure") => {
                object.len() == 3
                    && object["error"] == Value::Bool(true)
                    && object["message"].is_string()
            }
            _ => false,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whitespace-only reactions never reach a channel
        #[test]
        fn whitespace_reaction_is_rejected(reaction in "[ \t\r\n]{0,8}") {
            let rt = runtime();
            // Unreachable endpoint: any delivery attempt would turn into a 500
            let dispatcher = create_dispatcher(&DeliveryConfig {
                method: DeliveryMethod::Webhook,
                webhook: WebhookSettings {
                    endpoint: "http://127.0.0.1:9/hook".into(),
                    origin: None,
                },
                ..Default::default()
            })
            .unwrap();

            let body = serde_json::json!({ "reaction": reaction }).to_string();
            let outcome = rt.block_on(dispatcher.dispatch(body.as_bytes()));
            prop_assert_eq!(outcome.status_code, 400);
            prop_assert_eq!(outcome.envelope.message(), "Please select a feedback option.");
        }

        /// Arbitrary bytes always produce one of the two envelope shapes
        #[test]
        fn arbitrary_body_yields_closed_envelope(
            body in proptest::collection::vec(any::<u8>(), 0..256)
        ) {
            let rt = runtime();
            let dispatcher = create_dispatcher(&DeliveryConfig::default()).unwrap();

            let outcome = rt.block_on(dispatcher.dispatch(&body));
            let value = serde_json::to_value(&outcome.envelope).unwrap();
            prop_assert!(is_closed_shape(&value), "{}", value);
            prop_assert!(!outcome.is_success());
        }
    }
}
