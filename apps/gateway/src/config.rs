//! Gateway configuration loaded from TOML.

use anyhow::Result;
use compact_str::CompactString;
use model::ProviderKeys;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level gateway configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server bind configuration.
    pub server: ServerConfig,
    /// Durable store configuration.
    pub store: StoreConfig,
    /// API key configuration.
    pub auth: AuthConfig,
    /// Provider API keys (support `${ENV_VAR}` expansion).
    pub providers: ProviderKeys,
}

/// Server configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_owned(),
        }
    }
}

/// Store backend kind.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// SQLite-backed persistent store.
    #[default]
    Sqlite,
    /// In-memory store (no persistence).
    InMemory,
}

/// Durable store configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend kind.
    pub backend: StoreBackend,
    /// Database path for the SQLite backend.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: "otter.db".to_owned(),
        }
    }
}

/// One API key granting access as a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    /// The bearer token (supports `${ENV_VAR}` expansion).
    pub key: String,
    /// The user the token resolves to.
    pub user: CompactString,
}

/// API key configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accepted API keys.
    pub api_keys: Vec<ApiKeyEntry>,
}

impl GatewayConfig {
    /// Parse a TOML string, expanding environment variables in
    /// supported fields.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str);
        let mut config: Self = toml::from_str(&expanded)?;

        // An unset environment variable expands to an empty string;
        // treat that as "not configured".
        for key in [
            &mut config.providers.openai,
            &mut config.providers.anthropic,
            &mut config.providers.google,
            &mut config.providers.fireworks,
        ] {
            if key.as_deref() == Some("") {
                *key = None;
            }
        }
        config.auth.api_keys.retain(|entry| !entry.key.is_empty());

        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
