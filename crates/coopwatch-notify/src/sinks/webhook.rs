use crate::error::{NotifyError, Result};
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use crate::{NotificationSink, SinkResponse};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct NotificationsPayload<'a> {
    notifications: &'a [String],
}

/// Posts `{"notifications": [...]}` as JSON to a fixed URL. One attempt per
/// call, no retries.
pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(NotifyError::InvalidConfig("webhook url is empty".to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, notifications: &[String]) -> Result<SinkResponse> {
        let resp = self
            .client
            .post(self.url.as_str())
            .json(&NotificationsPayload { notifications })
            .send()
            .await?;

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) => truncate_string(&text, MAX_BODY_LENGTH),
            Err(e) => format!("[Failed to read response body: {e}]"),
        };

        if !status.is_success() {
            return Err(NotifyError::ApiError {
                service: "webhook".to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(SinkResponse {
            http_status: Some(status.as_u16()),
            response_body: Some(body),
        })
    }

    fn sink_name(&self) -> &str {
        "webhook"
    }
}
