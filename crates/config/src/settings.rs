//! Application settings

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings for the booking agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// NLU service settings
    #[serde(default)]
    pub nlu: NluSettings,

    /// Dialog behavior settings
    #[serde(default)]
    pub dialog: DialogSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of live conversations
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle conversations older than this are evicted (seconds)
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,

    /// How often the eviction sweep runs (seconds)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_sessions() -> usize {
    1024
}
fn default_session_timeout() -> u64 {
    1800 // 30 minutes
}
fn default_cleanup_interval() -> u64 {
    60
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            session_timeout_seconds: default_session_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// NLU service settings
///
/// All three of `app_id`, `api_key` and `host` must be set for the hosted
/// recognizer to be used; otherwise the server falls back to the keyword
/// recognizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NluSettings {
    /// NLU application id
    #[serde(default)]
    pub app_id: Option<String>,

    /// NLU subscription key
    #[serde(default)]
    pub api_key: Option<String>,

    /// NLU endpoint host
    #[serde(default)]
    pub host: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_nlu_timeout")]
    pub timeout_seconds: u64,
}

fn default_nlu_timeout() -> u64 {
    10
}

impl Default for NluSettings {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            host: None,
            timeout_seconds: default_nlu_timeout(),
        }
    }
}

impl NluSettings {
    /// True when every field the hosted recognizer needs is present.
    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.app_id) && set(&self.api_key) && set(&self.host)
    }
}

/// Dialog behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogSettings {
    /// Record diagnostic trace events through the tracing subscriber
    #[serde(default = "default_true")]
    pub telemetry_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            telemetry_enabled: true,
        }
    }
}

/// Load settings from an optional TOML file plus the environment.
///
/// Environment variables use the BOOKING_AGENT_ prefix with `__` as the
/// section separator, e.g. `BOOKING_AGENT_SERVER__PORT=9000`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        Environment::with_prefix("BOOKING_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;

    if settings.server.port == 0 {
        return Err(ConfigError::InvalidValue {
            field: "server.port".to_string(),
            message: "port must be non-zero".to_string(),
        });
    }

    let nlu_partial = !settings.nlu.is_configured()
        && (settings.nlu.app_id.is_some()
            || settings.nlu.api_key.is_some()
            || settings.nlu.host.is_some());
    if nlu_partial {
        tracing::warn!("nlu settings are incomplete, falling back to keyword recognition");
    }

    Ok(settings)
}
