//! Gateway configuration.
//!
//! A [`GatewayConfig`] is built once and owned by the notifier for its
//! whole lifetime. It can be assembled in code through the builder methods
//! or read from `PUSHOVER_*` environment variables (optionally loaded from
//! a `.env` file).

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::GatewayError;
use crate::sounds;

/// Base URL of the Pushover API.
pub const DEFAULT_ENDPOINT: &str = "https://api.pushover.net";
/// API version segment of the request path.
pub const API_VERSION: &str = "1";
/// Resource that accepts new messages.
pub const MESSAGES_RESOURCE: &str = "messages.json";

/// Prefix of every environment variable read by [`GatewayConfig::from_env`].
const ENV_PREFIX: &str = "PUSHOVER";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Reads a whole, non-zero number of seconds.
fn env_secs(key: &str) -> Result<Option<Duration>, GatewayError> {
    let Some(raw) = env_opt(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(GatewayError::Config(format!("{key} must be greater than zero"))),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(_) => Err(GatewayError::Config(format!(
            "{key} must be a whole number of seconds, got '{raw}'"
        ))),
    }
}

/// Connect and overall timeouts for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub overall: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            overall: Duration::from_secs(80),
        }
    }
}

/// Settings shared by every call made through one notifier.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Application token (env references already resolved).
    pub api_token: String,
    pub default_device: Option<String>,
    pub default_title: Option<String>,
    /// Always a member of [`sounds::ALLOWED_SOUNDS`] when set.
    pub default_sound: Option<String>,
    pub endpoint: String,
    pub version: String,
    pub timeouts: Timeouts,
}

impl GatewayConfig {
    /// Create a config for `api_token`.
    ///
    /// `${VAR_NAME}` references in the token are resolved from the process
    /// environment. An empty token, or a reference to a missing variable,
    /// is a [`GatewayError::Config`].
    pub fn new(api_token: impl Into<String>) -> Result<Self, GatewayError> {
        let api_token = resolve_env_vars(&api_token.into())?;
        if api_token.trim().is_empty() {
            return Err(GatewayError::Config(
                "Pushover API token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_token,
            default_device: None,
            default_title: None,
            default_sound: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            version: API_VERSION.to_string(),
            timeouts: Timeouts::default(),
        })
    }

    /// Build config from `PUSHOVER_*` environment variables (call
    /// [`load_dotenv`] first to pick up a `.env` file).
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_env_with_token(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit `token` wins over
    /// `PUSHOVER_API_TOKEN`.
    pub fn from_env_with_token(token: Option<String>) -> Result<Self, GatewayError> {
        Self::from_prefixed_env(ENV_PREFIX, token)
    }

    /// Reads `{prefix}_API_TOKEN`, `{prefix}_DEVICE`, and so on.
    fn from_prefixed_env(prefix: &str, token: Option<String>) -> Result<Self, GatewayError> {
        let key = |name: &str| format!("{prefix}_{name}");

        let token_key = key("API_TOKEN");
        let token = token
            .filter(|t| !t.is_empty())
            .or_else(|| env_opt(&token_key))
            .ok_or_else(|| GatewayError::Config(format!("{token_key} is not set")))?;

        let mut config = Self::new(token)?;
        if let Some(device) = env_opt(&key("DEVICE")) {
            config = config.with_device(device);
        }
        if let Some(title) = env_opt(&key("TITLE")) {
            config = config.with_title(title);
        }
        if let Some(sound) = env_opt(&key("SOUND")) {
            config = config.with_sound(sound);
        }
        if let Some(endpoint) = env_opt(&key("ENDPOINT")) {
            config = config.with_endpoint(endpoint);
        }

        let mut timeouts = Timeouts::default();
        if let Some(connect) = env_secs(&key("CONNECT_TIMEOUT_SECS"))? {
            timeouts.connect = connect;
        }
        if let Some(overall) = env_secs(&key("TIMEOUT_SECS"))? {
            timeouts.overall = overall;
        }

        Ok(config.with_timeouts(timeouts))
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.default_device = Some(device.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    /// Set the default sound, replacing unknown values with
    /// [`sounds::DEFAULT_SOUND`].
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        let sound = sound.into();
        self.default_sound = Some(sounds::coerce(&sound).to_string());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Fails if the token was cleared after construction.
    pub(crate) fn validate(&self) -> Result<(), GatewayError> {
        if self.api_token.trim().is_empty() {
            return Err(GatewayError::Config(
                "Pushover API token must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_token", &"...")
            .field("default_device", &self.default_device)
            .field("default_title", &self.default_title)
            .field("default_sound", &self.default_sound)
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// Resolve `${VAR_NAME}` patterns in a string using `std::env::var`.
///
/// Returns an error if a referenced variable is not set.
fn resolve_env_vars(input: &str) -> Result<String, GatewayError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(GatewayError::Config(
                    "unclosed env var reference in API token".to_string(),
                ));
            }
            let value = env::var(&var_name).map_err(|_| {
                GatewayError::Config(format!("env var not found: {var_name}"))
            })?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
