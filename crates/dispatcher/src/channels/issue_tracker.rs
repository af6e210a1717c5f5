//! IssueTrackerChannel - opens an issue through a GitHub-compatible REST API

use std::time::Instant;

use contracts::{
    DeliveryMethod, FeedbackChannel, FeedbackError, FeedbackRecord, IssueTrackerSettings,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::{describe_failure, provider_url, require_setting};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const FEEDBACK_LABEL: &str = "feedback";

/// Issue creation request
#[derive(Debug, Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    labels: Vec<&'a str>,
}

/// Channel that files each submission as an issue
pub struct IssueTrackerChannel {
    settings: IssueTrackerSettings,
    site_name: String,
    client: reqwest::Client,
}

impl IssueTrackerChannel {
    /// Create a new IssueTrackerChannel
    pub fn new(
        settings: IssueTrackerSettings,
        site_name: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            settings,
            site_name: site_name.into(),
            client,
        }
    }
}

/// `feedback` plus the raw reaction, when there is one
fn issue_labels(record: &FeedbackRecord) -> Vec<&str> {
    let mut labels = vec![FEEDBACK_LABEL];
    if !record.reaction.is_empty() {
        labels.push(record.reaction.as_str());
    }
    labels
}

impl FeedbackChannel for IssueTrackerChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::IssueTracker
    }

    fn check_preconditions(&self) -> Result<(), FeedbackError> {
        require_setting(DeliveryMethod::IssueTracker, "token", &self.settings.token)?;
        require_setting(DeliveryMethod::IssueTracker, "repo", &self.settings.repo)?;
        require_setting(DeliveryMethod::IssueTracker, "owner", &self.settings.owner)?;
        Ok(())
    }

    #[instrument(
        name = "issue_tracker_channel_deliver",
        skip(self, record),
        fields(channel = "issue-tracker", owner = %self.settings.owner, repo = %self.settings.repo)
    )]
    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let url = provider_url(
            DeliveryMethod::IssueTracker,
            &self.settings.api_base,
            &[
                "repos",
                self.settings.owner.trim(),
                self.settings.repo.trim(),
                "issues",
            ],
        )?;
        let content = render::render_issue(record, &self.site_name);

        let request = CreateIssueRequest {
            title: &content.title,
            body: &content.body,
            labels: issue_labels(record),
        };

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .bearer_auth(self.settings.token.trim())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .header(USER_AGENT, concat!("feedback-relay/", env!("CARGO_PKG_VERSION")))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Issue tracker unreachable");
                FeedbackError::delivery(DeliveryMethod::IssueTracker, e.to_string())
            })?;

        let status = response.status();
        observability::record_provider_status(DeliveryMethod::IssueTracker, status.as_u16());
        observability::record_delivery_latency_ms(
            DeliveryMethod::IssueTracker,
            started.elapsed().as_secs_f64() * 1000.0,
        );

        if !status.is_success() {
            let detail = describe_failure(response).await;
            error!(detail = %detail, "Issue tracker API error");
            return Err(FeedbackError::delivery(DeliveryMethod::IssueTracker, detail));
        }

        debug!(status = status.as_u16(), "Feedback issue created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::fake_provider::FakeProvider;

    fn settings(api_base: &str) -> IssueTrackerSettings {
        IssueTrackerSettings {
            token: "ghp_test".into(),
            owner: "acme".into(),
            repo: "site".into(),
            api_base: api_base.into(),
        }
    }

    fn record(reaction: &str) -> FeedbackRecord {
        FeedbackRecord {
            topic: "Search".into(),
            reaction: reaction.into(),
            message: "Could not find <i>anything</i>".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_labels_include_raw_reaction() {
        assert_eq!(issue_labels(&record("Neutral")), vec!["feedback", "Neutral"]);
        assert_eq!(issue_labels(&record("")), vec!["feedback"]);
    }

    #[test]
    fn test_preconditions() {
        let client = reqwest::Client::new();
        let ok = IssueTrackerChannel::new(settings("http://127.0.0.1:1"), "Acme", client.clone());
        assert!(ok.check_preconditions().is_ok());

        let mut missing_owner = settings("http://127.0.0.1:1");
        missing_owner.owner = "  ".into();
        let channel = IssueTrackerChannel::new(missing_owner, "Acme", client);
        let err = channel.check_preconditions().unwrap_err();
        assert!(err.to_string().contains("'owner'"), "got: {err}");
    }

    #[tokio::test]
    async fn test_deliver_creates_issue() {
        let provider = FakeProvider::start(201).await;
        let channel =
            IssueTrackerChannel::new(settings(&provider.base_url), "Acme", reqwest::Client::new());

        channel.deliver(&record("Unsatisfied")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        assert_eq!(sent.path, "/repos/acme/site/issues");
        assert_eq!(sent.headers.get("authorization").unwrap(), "Bearer ghp_test");
        assert_eq!(sent.headers.get("accept").unwrap(), GITHUB_ACCEPT);
        assert_eq!(
            sent.headers.get("x-github-api-version").unwrap(),
            GITHUB_API_VERSION
        );
        assert_eq!(sent.body["title"], "[Feedback] Acme");
        assert_eq!(sent.body["labels"], serde_json::json!(["feedback", "Unsatisfied"]));
        let body = sent.body["body"].as_str().unwrap();
        assert!(body.contains("| **Message** | Could not find anything |"));
    }

    #[tokio::test]
    async fn test_non_success_is_delivery_error() {
        let provider = FakeProvider::start(404).await;
        let channel =
            IssueTrackerChannel::new(settings(&provider.base_url), "Acme", reqwest::Client::new());

        let err = channel.deliver(&record("Neutral")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Delivery { .. }));
        assert!(err.to_string().contains("404"));
    }
}
