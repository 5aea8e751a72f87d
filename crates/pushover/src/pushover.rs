//! Pushover notifier.
//!
//! Turns a [`NotificationRequest`] into a form-encoded POST against
//! `{endpoint}/{version}/messages.json` and maps the provider's reply into
//! a [`NotificationResult`]. Each call makes exactly one HTTP attempt.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{GatewayConfig, MESSAGES_RESOURCE};
use crate::error::GatewayError;
use crate::sounds;
use crate::traits::{
    HttpGateway, NotificationRequest, NotificationResult, Notifier, Outcome, SENT_MESSAGE,
};
use crate::transport::{HttpResponse, HttpTransport, PostRequest, ReqwestTransport};

/// Sends notifications through the Pushover messages API.
///
/// Holds no per-call state, so one instance can serve concurrent callers.
pub struct PushoverNotifier {
    transport: Arc<dyn HttpTransport>,
    config: GatewayConfig,
}

impl PushoverNotifier {
    /// Create a notifier over an injected transport.
    ///
    /// Returns [`GatewayError::Config`] if the config carries no API token.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        config: GatewayConfig,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self { transport, config })
    }

    /// Create a notifier with a reqwest transport built from
    /// `config.timeouts`.
    pub fn from_config(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport = ReqwestTransport::new(config.timeouts.connect)?;
        Self::new(Arc::new(transport), config)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Assemble the POST for `request` without sending it.
    pub fn build_request(&self, request: &NotificationRequest) -> PostRequest {
        let overrides = &request.overrides;
        let config = &self.config;

        let token = overrides.token.as_ref().unwrap_or(&config.api_token);
        let device = overrides
            .device
            .as_ref()
            .or(config.default_device.as_ref())
            .cloned()
            .unwrap_or_default();
        let title = overrides
            .title
            .as_ref()
            .or(config.default_title.as_ref())
            .cloned()
            .unwrap_or_default();

        let mut form = vec![
            ("token".to_string(), token.clone()),
            ("user".to_string(), request.recipient.clone()),
            ("device".to_string(), device),
            ("title".to_string(), title),
            ("message".to_string(), request.message.clone()),
        ];

        if let Some(sound) = overrides.sound.as_ref().or(config.default_sound.as_ref()) {
            form.push(("sound".to_string(), sounds::coerce(sound).to_string()));
        }
        if let Some(url) = &overrides.url {
            form.push(("url".to_string(), url.clone()));
        }
        if let Some(url_title) = &overrides.url_title {
            form.push(("url_title".to_string(), url_title.clone()));
        }
        if overrides.html == Some(true) {
            form.push(("html".to_string(), "1".to_string()));
        }
        if let Some(priority) = overrides.priority {
            form.push(("priority".to_string(), priority.as_i8().to_string()));
        }

        PostRequest {
            url: self.build_url(MESSAGES_RESOURCE),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            form,
            timeouts: config.timeouts,
        }
    }

    /// Map a completed exchange into a [`NotificationResult`].
    pub fn interpret(&self, response: HttpResponse) -> NotificationResult {
        let success_range = response.is_success();
        let HttpResponse { status, body } = response;

        if !success_range {
            tracing::warn!(status, body = %body, "Pushover returned non-2xx status");
            let message = self.response_error(&body);
            return failure(Outcome::MalformedResponse, message, status, None, body);
        }

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(status, error = %e, "Pushover response is not valid JSON");
                let message = self.response_error(&body);
                return failure(Outcome::MalformedResponse, message, status, None, body);
            }
        };

        let request_id = payload
            .get("request")
            .and_then(Value::as_str)
            .map(str::to_string);

        if is_truthy(payload.get("status")) {
            tracing::info!(status, request_id = ?request_id, "Pushover notification sent");
            return NotificationResult {
                success: true,
                outcome: Outcome::Delivered,
                message: SENT_MESSAGE.to_string(),
                status_code: status,
                request_id,
                raw: body,
            };
        }

        let errors = provider_errors(&payload);
        if errors.is_empty() {
            tracing::warn!(status, "Pushover response has neither success status nor errors");
            let message = self.response_error(&body);
            return failure(Outcome::MalformedResponse, message, status, request_id, body);
        }

        let message = errors.join(", ");
        tracing::warn!(status, request_id = ?request_id, errors = %message, "Pushover rejected notification");
        failure(Outcome::ProviderRejected, message, status, request_id, body)
    }
}

impl fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpGateway for PushoverNotifier {
    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn version(&self) -> &str {
        &self.config.version
    }
}

#[async_trait::async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, request: &NotificationRequest) -> Result<NotificationResult, GatewayError> {
        let post = self.build_request(request);

        tracing::debug!(
            url = %post.url,
            recipient = %request.recipient,
            device = post.field("device").unwrap_or_default(),
            has_sound = post.field("sound").is_some(),
            "Sending Pushover notification"
        );

        let response = self.transport.post(&post).await?;
        Ok(self.interpret(response))
    }

    fn channel_name(&self) -> &str {
        "pushover"
    }
}

fn failure(
    outcome: Outcome,
    message: String,
    status_code: u16,
    request_id: Option<String>,
    raw: String,
) -> NotificationResult {
    NotificationResult {
        success: false,
        outcome,
        message,
        status_code,
        request_id,
        raw,
    }
}

/// Boolean coercion for the provider's `status` field.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
        _ => false,
    }
}

fn provider_errors(payload: &Value) -> Vec<String> {
    payload
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| match e {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
