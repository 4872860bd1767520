//! HTTP notification relay implementation.

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::error::{OffsetZapError, Result};
use crate::protocol::{RetirementNotification, SendMessageRequest};
use crate::traits::NotificationRelay;

/// Default address of a locally running relay
pub const DEFAULT_NOTIFICATION_URL: &str = "http://localhost:3001";

const SEND_PATH: &str = "/api/send";
const NOTIFY_RETIREMENT_PATH: &str = "/api/notify/retirement";
const HEALTH_PATH: &str = "/health";

/// Body of `GET /health`
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Accepts only a `{"status":"ok"}` body.
fn check_health_body(body: &str) -> Result<()> {
    let health: HealthResponse = serde_json::from_str(body).map_err(|e| {
        OffsetZapError::NotificationFailed(format!("relay unhealthy: malformed body: {e}"))
    })?;
    if health.status != "ok" {
        return Err(OffsetZapError::NotificationFailed(format!(
            "relay unhealthy: status {}",
            health.status
        )));
    }
    Ok(())
}

/// Notification relay client speaking the relay's JSON HTTP API.
///
/// # Examples
///
/// ```rust,no_run
/// use offsetzap_rs::providers::HttpNotificationRelay;
/// use offsetzap_rs::traits::NotificationRelay;
///
/// # async fn example() -> Result<(), offsetzap_rs::OffsetZapError> {
/// let relay = HttpNotificationRelay::new("http://localhost:3001");
/// relay.health().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpNotificationRelay {
    base_url: String,
    client: Client,
}

impl HttpNotificationRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<()> {
        let url = self.url(path);
        trace!(url = %url, "Posting to notification relay");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| OffsetZapError::NotificationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OffsetZapError::NotificationFailed(format!(
                "relay returned {status}: {body}"
            )));
        }

        debug!(status_code = %status, "Notification relay accepted message");
        Ok(())
    }
}

impl Default for HttpNotificationRelay {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_URL)
    }
}

#[async_trait]
impl NotificationRelay for HttpNotificationRelay {
    #[instrument(skip(self, message), fields(recipient = %recipient))]
    async fn send(&self, recipient: Address, message: &str) -> Result<()> {
        let request = SendMessageRequest {
            recipient_address: recipient,
            message: message.to_string(),
        };
        self.post(SEND_PATH, &request).await
    }

    #[instrument(skip(self, notification), fields(
        recipient = %notification.recipient_address,
        request_id = %notification.request_id,
        status = %notification.status,
    ))]
    async fn notify_retirement(&self, notification: &RetirementNotification) -> Result<()> {
        self.post(NOTIFY_RETIREMENT_PATH, notification).await
    }

    async fn health(&self) -> Result<()> {
        let body = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| OffsetZapError::NotificationFailed(format!("relay unhealthy: {e}")))?
            .text()
            .await
            .map_err(|e| OffsetZapError::NotificationFailed(format!("relay unhealthy: {e}")))?;

        check_health_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_urls() {
        let relay = HttpNotificationRelay::new("http://localhost:3001/");
        assert_eq!(relay.url(SEND_PATH), "http://localhost:3001/api/send");
        assert_eq!(
            relay.url(NOTIFY_RETIREMENT_PATH),
            "http://localhost:3001/api/notify/retirement"
        );
        assert_eq!(
            HttpNotificationRelay::default().url(HEALTH_PATH),
            "http://localhost:3001/health"
        );
    }

    #[rstest]
    #[case(r#"{"status":"ok"}"#)]
    #[case(r#"{"status":"ok","uptime":12}"#)]
    fn test_healthy_body(#[case] body: &str) {
        assert!(check_health_body(body).is_ok());
    }

    #[rstest]
    #[case(r#"{"status":"degraded"}"#)]
    #[case(r#"{}"#)]
    #[case("OK")]
    fn test_unhealthy_body(#[case] body: &str) {
        assert!(matches!(
            check_health_body(body),
            Err(OffsetZapError::NotificationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_a_notification_error() {
        let relay = HttpNotificationRelay::new("http://127.0.0.1:9");
        let result = relay.send(Address::ZERO, "hello").await;
        assert!(matches!(result, Err(OffsetZapError::NotificationFailed(_))));
    }
}
