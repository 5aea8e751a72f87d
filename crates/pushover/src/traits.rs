//! Notifier trait definition and shared request/result types.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Prefix of the diagnostic used when a response cannot be interpreted.
pub const INVALID_RESPONSE_PREFIX: &str = "API Response not valid.";

/// Message reported for a delivered notification.
pub const SENT_MESSAGE: &str = "Message sent";

/// Message priority. Emergency priority is not offered since it requires
/// receipt polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Lowest,
    Low,
    Normal,
    High,
}

impl Priority {
    /// Wire value expected by the provider.
    pub fn as_i8(self) -> i8 {
        match self {
            Priority::Lowest => -2,
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lowest" | "-2" => Ok(Priority::Lowest),
            "low" | "-1" => Ok(Priority::Low),
            "normal" | "0" => Ok(Priority::Normal),
            "high" | "1" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Per-call values that take precedence over the gateway defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    pub token: Option<String>,
    pub device: Option<String>,
    pub title: Option<String>,
    pub sound: Option<String>,
    pub url: Option<String>,
    pub url_title: Option<String>,
    pub html: Option<bool>,
    pub priority: Option<Priority>,
}

/// A single notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Pushover user or group key.
    pub recipient: String,
    pub message: String,
    #[serde(default)]
    pub overrides: Overrides,
}

impl NotificationRequest {
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            message: message.into(),
            overrides: Overrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// How a completed exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Delivered,
    /// 2xx response whose `status` flag reports failure.
    ProviderRejected,
    /// Non-2xx status, or a body that is not the expected JSON.
    MalformedResponse,
}

/// Normalized result of one `notify` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub outcome: Outcome,
    /// `"Message sent"`, or the provider errors joined with `", "`.
    pub message: String,
    pub status_code: u16,
    /// Provider-assigned request identifier, when returned.
    pub request_id: Option<String>,
    /// Unmodified response body.
    pub raw: String,
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    ///
    /// Transport and configuration problems are returned as `Err`; every
    /// provider-side failure is an `Ok` result with `success = false`.
    async fn notify(&self, request: &NotificationRequest) -> Result<NotificationResult, GatewayError>;

    /// Send a fixed test message to `recipient`.
    async fn test(&self, recipient: &str) -> Result<NotificationResult, GatewayError> {
        let request = NotificationRequest::new(
            recipient,
            "This is a test notification from pushover-gateway.",
        )
        .with_overrides(Overrides {
            title: Some("[TEST] Pushover Gateway".to_string()),
            ..Overrides::default()
        });
        self.notify(&request).await
    }

    /// Human-readable name for this channel (e.g., "pushover").
    fn channel_name(&self) -> &str;
}

/// URL building and error shaping shared by HTTP-based gateways.
pub trait HttpGateway {
    /// Base URL without a trailing slash requirement.
    fn endpoint(&self) -> &str;

    /// API version path segment.
    fn version(&self) -> &str;

    /// `{endpoint}/{version}/{resource}`.
    fn build_url(&self, resource: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint().trim_end_matches('/'),
            self.version().trim_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    /// Diagnostic for a response that cannot be interpreted.
    fn response_error(&self, raw: &str) -> String {
        format!("{INVALID_RESPONSE_PREFIX} (Raw response API {raw})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl HttpGateway for Fixed {
        fn endpoint(&self) -> &str {
            self.0
        }
        fn version(&self) -> &str {
            "1"
        }
    }

    #[test]
    fn build_url_joins_segments() {
        assert_eq!(
            Fixed("https://api.pushover.net").build_url("messages.json"),
            "https://api.pushover.net/1/messages.json"
        );
        assert_eq!(
            Fixed("http://127.0.0.1:9000/").build_url("/messages.json"),
            "http://127.0.0.1:9000/1/messages.json"
        );
    }

    #[test]
    fn response_error_embeds_raw_body() {
        assert_eq!(
            Fixed("x").response_error("bad gateway"),
            "API Response not valid. (Raw response API bad gateway)"
        );
    }

    #[test]
    fn priority_parsing() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!("-2".parse::<Priority>().unwrap(), Priority::Lowest);
        assert!("2".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.as_i8(), -1);
    }

    #[test]
    fn request_builder_keeps_fields() {
        let req = NotificationRequest::new("uKey", "hello").with_overrides(Overrides {
            sound: Some("bike".to_string()),
            ..Overrides::default()
        });
        assert_eq!(req.recipient, "uKey");
        assert_eq!(req.message, "hello");
        assert_eq!(req.overrides.sound.as_deref(), Some("bike"));
        assert!(req.overrides.token.is_none());
    }
}
