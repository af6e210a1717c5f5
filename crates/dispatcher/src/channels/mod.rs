//! Delivery channel implementations
//!
//! Contains EmailChannel, IssueTrackerChannel, WebhookChannel and the fixed
//! UnconfiguredChannel, plus the closed `Channel` enum the dispatcher holds.

mod email;
mod issue_tracker;
mod unconfigured;
mod webhook;

#[cfg(test)]
pub(crate) mod fake_provider;

pub use self::email::EmailChannel;
pub use self::issue_tracker::IssueTrackerChannel;
pub use self::unconfigured::UnconfiguredChannel;
pub use self::webhook::{validate_endpoint, WebhookChannel};

use contracts::{DeliveryConfig, DeliveryMethod, FeedbackChannel, FeedbackError, FeedbackRecord};
use reqwest::{Response, Url};

/// Longest provider response excerpt kept for logs
const PROVIDER_DETAIL_MAX_CHARS: usize = 200;
/// Bytes read from a failed response; enough for the excerpt in any encoding
const PROVIDER_DETAIL_MAX_BYTES: usize = PROVIDER_DETAIL_MAX_CHARS * 4;

/// The configured channel; exactly one per process
pub enum Channel {
    Email(EmailChannel),
    IssueTracker(IssueTrackerChannel),
    Webhook(WebhookChannel),
    Unconfigured(UnconfiguredChannel),
}

impl Channel {
    /// Build the channel selected by `config.method`.
    ///
    /// Only the selected channel's settings are read.
    pub fn from_config(config: &DeliveryConfig, client: reqwest::Client) -> Self {
        let site_name = config.resolved_site_name();
        match config.method {
            DeliveryMethod::Email => {
                Self::Email(EmailChannel::new(config.email.clone(), site_name, client))
            }
            DeliveryMethod::IssueTracker => Self::IssueTracker(IssueTrackerChannel::new(
                config.issue_tracker.clone(),
                site_name,
                client,
            )),
            DeliveryMethod::Webhook => {
                Self::Webhook(WebhookChannel::new(config.webhook.clone(), site_name, client))
            }
            DeliveryMethod::Unconfigured => Self::Unconfigured(UnconfiguredChannel),
        }
    }
}

impl FeedbackChannel for Channel {
    fn method(&self) -> DeliveryMethod {
        match self {
            Self::Email(c) => c.method(),
            Self::IssueTracker(c) => c.method(),
            Self::Webhook(c) => c.method(),
            Self::Unconfigured(c) => c.method(),
        }
    }

    fn check_preconditions(&self) -> Result<(), FeedbackError> {
        match self {
            Self::Email(c) => c.check_preconditions(),
            Self::IssueTracker(c) => c.check_preconditions(),
            Self::Webhook(c) => c.check_preconditions(),
            Self::Unconfigured(c) => c.check_preconditions(),
        }
    }

    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        match self {
            Self::Email(c) => c.deliver(record).await,
            Self::IssueTracker(c) => c.deliver(record).await,
            Self::Webhook(c) => c.deliver(record).await,
            Self::Unconfigured(c) => c.deliver(record).await,
        }
    }
}

/// Fail with a configuration error if a required setting is blank
pub(crate) fn require_setting(
    channel: DeliveryMethod,
    field: &str,
    value: &str,
) -> Result<(), FeedbackError> {
    if value.trim().is_empty() {
        return Err(FeedbackError::configuration(
            channel,
            format!("missing required setting '{field}'"),
        ));
    }
    Ok(())
}

/// Append path segments to a provider base URL, percent-encoding each one
pub(crate) fn provider_url(
    channel: DeliveryMethod,
    base: &str,
    segments: &[&str],
) -> Result<Url, FeedbackError> {
    let mut url = Url::parse(base.trim()).map_err(|e| {
        FeedbackError::configuration(channel, format!("invalid api_base '{base}': {e}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            FeedbackError::configuration(channel, format!("api_base '{base}' cannot be a base"))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-2xx provider response into a log-friendly description
///
/// Only the head of the body is read; the rest is dropped with the response.
pub(crate) async fn describe_failure(mut response: Response) -> String {
    let status = response.status();
    let mut head = Vec::with_capacity(PROVIDER_DETAIL_MAX_BYTES);
    while head.len() < PROVIDER_DETAIL_MAX_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => head.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    head.truncate(PROVIDER_DETAIL_MAX_BYTES);
    let detail: String = String::from_utf8_lossy(&head)
        .chars()
        .take(PROVIDER_DETAIL_MAX_CHARS)
        .collect();
    if detail.trim().is_empty() {
        format!("provider returned {status}")
    } else {
        format!("provider returned {status}: {}", detail.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::fake_provider::FakeProvider;

    #[test]
    fn test_from_config_selects_method() {
        let client = reqwest::Client::new();
        let mut config = DeliveryConfig::default();

        for method in [
            DeliveryMethod::Email,
            DeliveryMethod::IssueTracker,
            DeliveryMethod::Webhook,
            DeliveryMethod::Unconfigured,
        ] {
            config.method = method;
            let channel = Channel::from_config(&config, client.clone());
            assert_eq!(channel.method(), method);
        }
    }

    #[test]
    fn test_require_setting() {
        assert!(require_setting(DeliveryMethod::Email, "to", "a@b.c").is_ok());
        let err = require_setting(DeliveryMethod::Email, "to", "  ").unwrap_err();
        assert!(err.to_string().contains("'to'"));
    }

    #[test]
    fn test_provider_url_encodes_segments() {
        let url = provider_url(
            DeliveryMethod::IssueTracker,
            "https://api.github.com/",
            &["repos", "acme", "my repo", "issues"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/acme/my%20repo/issues"
        );
    }

    #[test]
    fn test_provider_url_keeps_base_path() {
        let url =
            provider_url(DeliveryMethod::Email, "http://127.0.0.1:9/v1", &["emails"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v1/emails");
    }

    #[test]
    fn test_provider_url_rejects_garbage() {
        let err = provider_url(DeliveryMethod::Email, "not a url", &["emails"]).unwrap_err();
        assert!(matches!(err, FeedbackError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_describe_failure_keeps_excerpt() {
        let provider = FakeProvider::start_with_reply(502, "e".repeat(4 * 1024 * 1024)).await;
        let response = reqwest::Client::new()
            .post(format!("{}/emails", provider.base_url))
            .send()
            .await
            .unwrap();

        let detail = describe_failure(response).await;
        let expected = format!(
            "provider returned 502 Bad Gateway: {}",
            "e".repeat(PROVIDER_DETAIL_MAX_CHARS)
        );
        assert_eq!(detail, expected);
    }

    #[tokio::test]
    async fn test_describe_failure_without_body() {
        let provider = FakeProvider::start_with_reply(503, String::new()).await;
        let response = reqwest::Client::new()
            .post(provider.base_url.clone())
            .send()
            .await
            .unwrap();

        let detail = describe_failure(response).await;
        assert_eq!(detail, "provider returned 503 Service Unavailable");
    }
}
