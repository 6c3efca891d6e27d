//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/evallo/config.toml` by default:
//!
//! ```toml
//! [api]
//! base_url = "https://calendar.example.com/api"
//! timeout = 30
//!
//! [auth]
//! token_path = "/home/me/.local/share/evallo/token.json"
//! token = "env::EVALLO_TOKEN"
//! ```
//!
//! `auth.token` supports secret references (`pass::…`, `env::…`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use evallo_api::{ApiConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Configuration for the evallo client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend settings.
    pub api: ApiSettings,

    /// Credential settings.
    pub auth: AuthSettings,
}

/// Backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the event API.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
        }
    }
}

/// Credential settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Path to token storage.
    pub token_path: Option<PathBuf>,

    /// Static token used when no login token is stored.
    pub token: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("failed to read config: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("evallo")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("evallo")
    }

    /// Returns where the login token is stored.
    pub fn token_path(&self) -> PathBuf {
        self.auth
            .token_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("token.json"))
    }

    /// Resolves `auth.token`, expanding secret references.
    pub fn resolve_token(&self) -> ClientResult<Option<String>> {
        self.auth
            .token
            .as_deref()
            .map(crate::secret::resolve)
            .transpose()
            .map_err(|e| ClientError::Config(format!("failed to resolve auth.token: {}", e)))
    }

    /// Builds the API client configuration, optionally overriding the base URL.
    pub fn to_api_config(&self, base_url: Option<&str>) -> ApiConfig {
        ApiConfig::new(base_url.unwrap_or(&self.api.base_url))
            .with_timeout(Duration::from_secs(self.api.timeout))
    }

    /// Checks the values that would only fail at request time otherwise.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ClientError::Config(format!("invalid api.base_url `{}`: {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api.base_url must be http or https, got `{}`",
                url.scheme()
            )));
        }
        if self.api.timeout == 0 {
            return Err(ClientError::Config(
                "api.timeout must be at least 1 second".to_string(),
            ));
        }
        self.resolve_token()?;
        Ok(())
    }
}
