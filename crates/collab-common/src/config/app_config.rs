//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub endpoints: EndpointConfig,
    pub reconnect: ReconnectConfig,
    pub timeouts: TimeoutConfig,
    pub presence: PresenceConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Logical realtime channel, selected by the endpoint path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Collab,
    Dashboard,
    Notifications,
}

impl Namespace {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Collab => "collab",
            Self::Dashboard => "dashboard",
            Self::Notifications => "notifications",
        }
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('/').to_lowercase().as_str() {
            "collab" => Ok(Self::Collab),
            "dashboard" => Ok(Self::Dashboard),
            "notifications" => Ok(Self::Notifications),
            _ => Err(format!("unknown namespace: {s}")),
        }
    }
}

/// Remote endpoints and the bearer token
#[derive(Clone, Deserialize)]
pub struct EndpointConfig {
    /// Realtime base URL (`ws://` or `wss://`)
    pub gateway_url: String,
    /// REST base URL
    pub api_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub namespace: Namespace,
}

impl EndpointConfig {
    /// Full realtime endpoint including the namespace path
    #[must_use]
    pub fn gateway_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.gateway_url.trim_end_matches('/'),
            self.namespace.as_str()
        )
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("gateway_url", &self.gateway_url)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("namespace", &self.namespace)
            .finish()
    }
}

/// Reconnection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_reconnect_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_reconnect_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_reconnect_delay_max_ms")]
    pub delay_max_ms: u64,
}

impl ReconnectConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn delay_max(&self) -> Duration {
        Duration::from_millis(self.delay_max_ms)
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_reconnect_attempts(),
            delay_ms: default_reconnect_delay_ms(),
            delay_max_ms: default_reconnect_delay_max_ms(),
        }
    }
}

/// RPC, REST, and handshake timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_timeout_ms")]
    pub request_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub handshake_ms: u64,
}

impl TimeoutConfig {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    #[must_use]
    pub fn handshake(&self) -> Duration {
        Duration::from_millis(self.handshake_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_ms: default_timeout_ms(),
            handshake_ms: default_timeout_ms(),
        }
    }
}

/// Typing debounce and staleness sweep settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PresenceConfig {
    #[serde(default = "default_typing_idle_ms")]
    pub typing_idle_ms: u64,
    #[serde(default = "default_typing_ttl_secs")]
    pub typing_ttl_secs: u64,
    #[serde(default = "default_presence_ttl_secs")]
    pub presence_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl PresenceConfig {
    #[must_use]
    pub fn typing_idle(&self) -> Duration {
        Duration::from_millis(self.typing_idle_ms)
    }

    #[must_use]
    pub fn typing_ttl(&self) -> Duration {
        Duration::from_secs(self.typing_ttl_secs)
    }

    #[must_use]
    pub fn presence_ttl(&self) -> Duration {
        Duration::from_secs(self.presence_ttl_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            typing_idle_ms: default_typing_idle_ms(),
            typing_ttl_secs: default_typing_ttl_secs(),
            presence_ttl_secs: default_presence_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "collab-client".to_string()
}

fn default_reconnect_attempts() -> u32 {
    5
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_reconnect_delay_max_ms() -> u64 {
    5000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_typing_idle_ms() -> u64 {
    3000
}

fn default_typing_ttl_secs() -> u64 {
    10
}

fn default_presence_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_sweep_interval_secs() -> u64 {
    5
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required variables are missing or a value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or a value fails to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key, raw))
                })
                .transpose()
        };

        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            endpoints: EndpointConfig {
                gateway_url: lookup("COLLAB_GATEWAY_URL")
                    .ok_or(ConfigError::MissingVar("COLLAB_GATEWAY_URL"))?,
                api_url: lookup("COLLAB_API_URL").ok_or(ConfigError::MissingVar("COLLAB_API_URL"))?,
                token: lookup("COLLAB_TOKEN").filter(|t| !t.trim().is_empty()),
                namespace: lookup("COLLAB_NAMESPACE")
                    .map(|raw| {
                        raw.parse()
                            .map_err(|_| ConfigError::InvalidValue("COLLAB_NAMESPACE", raw))
                    })
                    .transpose()?
                    .unwrap_or_default(),
            },
            reconnect: ReconnectConfig {
                max_attempts: lookup("COLLAB_RECONNECT_ATTEMPTS")
                    .map(|raw| {
                        raw.trim()
                            .parse()
                            .map_err(|_| ConfigError::InvalidValue("COLLAB_RECONNECT_ATTEMPTS", raw))
                    })
                    .transpose()?
                    .unwrap_or_else(default_reconnect_attempts),
                delay_ms: parse("COLLAB_RECONNECT_DELAY_MS")?
                    .unwrap_or_else(default_reconnect_delay_ms),
                delay_max_ms: parse("COLLAB_RECONNECT_DELAY_MAX_MS")?
                    .unwrap_or_else(default_reconnect_delay_max_ms),
            },
            timeouts: TimeoutConfig {
                request_ms: parse("COLLAB_REQUEST_TIMEOUT_MS")?.unwrap_or_else(default_timeout_ms),
                handshake_ms: parse("COLLAB_HANDSHAKE_TIMEOUT_MS")?
                    .unwrap_or_else(default_timeout_ms),
            },
            presence: PresenceConfig {
                typing_idle_ms: parse("COLLAB_TYPING_IDLE_MS")?
                    .unwrap_or_else(default_typing_idle_ms),
                typing_ttl_secs: parse("COLLAB_TYPING_TTL_SECS")?
                    .unwrap_or_else(default_typing_ttl_secs),
                presence_ttl_secs: parse("COLLAB_PRESENCE_TTL_SECS")?
                    .unwrap_or_else(default_presence_ttl_secs),
                sweep_interval_secs: parse("COLLAB_SWEEP_INTERVAL_SECS")?
                    .unwrap_or_else(default_sweep_interval_secs),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns the first violated constraint
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconnect.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLAB_RECONNECT_ATTEMPTS",
                "must be at least 1".to_string(),
            ));
        }
        if self.reconnect.delay_ms > self.reconnect.delay_max_ms {
            return Err(ConfigError::InvalidValue(
                "COLLAB_RECONNECT_DELAY_MS",
                format!(
                    "{} exceeds COLLAB_RECONNECT_DELAY_MAX_MS ({})",
                    self.reconnect.delay_ms, self.reconnect.delay_max_ms
                ),
            ));
        }
        if self.timeouts.request_ms == 0 || self.timeouts.handshake_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLAB_REQUEST_TIMEOUT_MS",
                "timeouts must be non-zero".to_string(),
            ));
        }
        if self.presence.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLAB_SWEEP_INTERVAL_SECS",
                "must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
