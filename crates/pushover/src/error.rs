//! Hard failures surfaced to callers of the gateway.

/// Errors that abort a notification before a provider verdict exists.
///
/// Provider-side failures (a rejected request, a non-2xx status, a body
/// that is not the expected JSON) are not errors: they come back as a
/// [`NotificationResult`](crate::NotificationResult) with `success = false`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
