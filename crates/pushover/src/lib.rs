//! Pushover notification gateway.
//!
//! This crate provides:
//! - `Notifier` trait and the shared request/result types
//! - `PushoverNotifier`, which sends one form-encoded POST per notification
//!   and normalizes the provider's reply
//! - `HttpTransport` seam with a reqwest-backed implementation
//! - `GatewayConfig` built in code or from `PUSHOVER_*` environment variables

pub mod config;
pub mod error;
pub mod pushover;
pub mod sounds;
pub mod traits;
pub mod transport;

pub use config::{load_dotenv, GatewayConfig, Timeouts};
pub use error::GatewayError;
pub use pushover::PushoverNotifier;
pub use traits::{
    HttpGateway, NotificationRequest, NotificationResult, Notifier, Outcome, Overrides, Priority,
};
pub use transport::{HttpResponse, HttpTransport, PostRequest, ReqwestTransport};
