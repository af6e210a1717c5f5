//! EmailChannel - transactional email via a Resend-compatible API

use std::time::Instant;

use contracts::{DeliveryMethod, EmailSettings, FeedbackChannel, FeedbackError, FeedbackRecord};
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::{describe_failure, provider_url, require_setting};

/// Provider send request
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Channel that emails the rendered feedback to a fixed recipient
pub struct EmailChannel {
    settings: EmailSettings,
    site_name: String,
    client: reqwest::Client,
}

impl EmailChannel {
    /// Create a new EmailChannel
    pub fn new(
        settings: EmailSettings,
        site_name: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            settings,
            site_name: site_name.into(),
            client,
        }
    }

    fn sender(&self) -> String {
        format!("{} <{}>", self.site_name, self.settings.from.trim())
    }
}

impl FeedbackChannel for EmailChannel {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Email
    }

    fn check_preconditions(&self) -> Result<(), FeedbackError> {
        require_setting(DeliveryMethod::Email, "api_key", &self.settings.api_key)?;
        require_setting(DeliveryMethod::Email, "from", &self.settings.from)?;
        require_setting(DeliveryMethod::Email, "to", &self.settings.to)?;
        Ok(())
    }

    #[instrument(
        name = "email_channel_deliver",
        skip(self, record),
        fields(channel = "email")
    )]
    async fn deliver(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let url = provider_url(DeliveryMethod::Email, &self.settings.api_base, &["emails"])?;
        let content = render::render_email(record, &self.site_name);

        let request = SendEmailRequest {
            from: self.sender(),
            to: self.settings.to.trim(),
            subject: &content.title,
            html: &content.body,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .bearer_auth(self.settings.api_key.trim())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Email provider unreachable");
                FeedbackError::delivery(DeliveryMethod::Email, e.to_string())
            })?;

        let status = response.status();
        observability::record_provider_status(DeliveryMethod::Email, status.as_u16());
        observability::record_delivery_latency_ms(
            DeliveryMethod::Email,
            started.elapsed().as_secs_f64() * 1000.0,
        );

        if !status.is_success() {
            let detail = describe_failure(response).await;
            error!(detail = %detail, "Email provider API error");
            return Err(FeedbackError::delivery(DeliveryMethod::Email, detail));
        }

        debug!(status = status.as_u16(), "Feedback email sent");
        Ok(())
    }
}
