//! The HTTP capability the gateway is handed at construction.
//!
//! The notifier never talks to the network directly. It builds a
//! [`PostRequest`] and passes it to an [`HttpTransport`], which performs a
//! single attempt and reports the status code and body text.

use std::time::Duration;

use crate::config::Timeouts;
use crate::error::GatewayError;

/// A form-encoded POST ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form fields in the order they are encoded.
    pub form: Vec<(String, String)>,
    /// `overall` bounds the whole exchange. `connect` is advisory: a
    /// transport whose connect timeout is fixed when its client is built
    /// (such as [`ReqwestTransport`]) keeps its own value.
    pub timeouts: Timeouts,
}

impl PostRequest {
    /// Value of the first form field named `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one POST per call. Implementations must not retry.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: &PostRequest) -> Result<HttpResponse, GatewayError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// The connect timeout is a client-level setting in reqwest, so it is fixed
/// when the client is built and `PostRequest::timeouts.connect` is not
/// applied. The overall timeout is applied per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    /// Connect timeout the client was built with, if known.
    connect_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build a rustls client with the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .use_rustls_tls()
            .build()?;
        Ok(Self {
            client,
            connect_timeout: Some(connect_timeout),
        })
    }

    /// Wrap an already-configured client. Its connect timeout is whatever
    /// the caller configured on it.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            connect_timeout: None,
        }
    }

    /// Connect timeout in effect for every request, when built by [`new`](Self::new).
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Whether a request asking for `requested` gets a different connect
    /// timeout than it asked for.
    fn connect_timeout_differs(&self, requested: Duration) -> bool {
        self.connect_timeout != Some(requested)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: &PostRequest) -> Result<HttpResponse, GatewayError> {
        if self.connect_timeout_differs(request.timeouts.connect) {
            match self.connect_timeout {
                Some(client) => tracing::warn!(
                    requested = ?request.timeouts.connect,
                    client = ?client,
                    "Requested connect timeout not applied; client connect timeout is fixed"
                ),
                None => tracing::debug!(
                    requested = ?request.timeouts.connect,
                    "Connect timeout left to the wrapped client"
                ),
            }
        }

        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeouts.overall);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.form(&request.form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
