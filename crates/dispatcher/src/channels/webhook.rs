//! WebhookChannel - JSON POST to an operator-supplied endpoint

use std::time::Instant;

use contracts::{
    DeliveryMethod, FeedbackChannel, FeedbackError, FeedbackRecord, WebhookSettings,
};
use reqwest::Url;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

/// Body posted to the webhook: the submitted object plus `siteName`
fn webhook_payload(record: &FeedbackRecord, site_name: &str) -> Map<String, Value> {
    let mut payload = record.original_json();
    payload.insert("siteName".to_string(), Value::String(site_name.to_string()));
    payload
}

/// Check the endpoint shape: an absolute http(s) URL or a rooted path.
///
/// Anything else is a deployment error and fails before any request is made.
pub fn validate_endpoint(endpoint: &str) -> Result<(), FeedbackError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(FeedbackError::configuration(
            DeliveryMethod::Webhook,
            "missing required setting 'endpoint'",
        ));
    }
    let absolute = endpoint.starts_with("http://") || endpoint.starts_with("https://");
    if !absolute && !endpoint.starts_with('/') {
        return Err(FeedbackError::configuration(
            DeliveryMethod::Webhook,
            format!("endpoint '{endpoint}' is neither an http(s) URL nor a rooted path"),
        ));
    }
    Ok(())
}

/// Sink that forwards submissions to a custom endpoint
pub struct WebhookChannel {
    settings: WebhookSettings,
    site_name: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    /// Create a new WebhookChannel
    pub fn new(
        settings: WebhookSettings,
        site_name: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            settings,
            site_name: site_name.into(),
            client,
        }
    }

    /// Resolve the endpoint to a full URL; rooted paths go through the origin
    fn target(&self) -> Result<Url, FeedbackError> {
        let endpoint = self.settings.endpoint.trim();
        let invalid =
            |detail: String| FeedbackError::configuration(DeliveryMethod::Webhook, detail);

        if !endpoint.starts_with('/') {
            return Url::parse(endpoint).map_err(|e| invalid(format!("invalid endpoint: {e}")));
        }

        let origin = self
            .settings
            .origin
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .ok_or_else(|| invalid(format!("rooted endpoint '{endpoint}' needs an origin")))?;

        Url::parse(origin)
            .and_then(|base| base.join(endpoint))
            .map_err(|e| invalid(format!("cannot resolve '{endpoint}' against '{origin}': {e}")))
    }
}

impl FeedbackChannel for WebhookChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Webhook
    }

    fn check_preconditions(&self) -> Result<(), FeedbackError> {
        validate_endpoint(&self.settings.endpoint)
    }

    #[instrument(
        name = "webhook_channel_deliver",
        skip(self, record),
        fields(channel = "webhook")
    )]
    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let url = self.target()?;
        let payload = webhook_payload(record, &self.site_name);

        let started = Instant::now();
        let response = self
            .client
            .post(url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(target_url = %url, error = %e, "Webhook endpoint unreachable");
                FeedbackError::configuration(DeliveryMethod::Webhook, e.to_string())
            })?;

        let status = response.status();
        observability::record_provider_status(DeliveryMethod::Webhook, status.as_u16());
        observability::record_delivery_latency_ms(
            DeliveryMethod::Webhook,
            started.elapsed().as_secs_f64() * 1000.0,
        );

        if !status.is_success() {
            warn!(target_url = %url, status = status.as_u16(), "Webhook endpoint error");
            return Err(FeedbackError::configuration(
                DeliveryMethod::Webhook,
                format!("endpoint returned {status}"),
            ));
        }

        debug!(target_url = %url, status = status.as_u16(), "Webhook delivered");
        Ok(())
    }
}
