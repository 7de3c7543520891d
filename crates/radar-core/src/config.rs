//! Configuration loading.
//!
//! Values come from an optional TOML file, then environment variables.
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{RadarError, RadarResult};
use crate::provider::gemini::{DEFAULT_GEMINI_URL, DEFAULT_MODEL};
use crate::search::StalePolicy;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "radar.toml";

/// Default web server port.
pub const DEFAULT_PORT: u16 = 3030;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub search: SearchConfig,
}

/// Analysis provider settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Ground answers in live search results.
    pub grounded: bool,
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Query controller settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub stale_policy: StalePolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_URL.to_string(),
            timeout_secs: 60,
            grounded: false,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("grounded", &self.grounded)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RadarConfig {
    /// Load configuration from `path`, or from `radar.toml` when present,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> RadarResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> RadarResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RadarError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> RadarResult<Self> {
        toml::from_str(text).map_err(|e| RadarError::config(format!("invalid config: {}", e)))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> RadarResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            if !key.trim().is_empty() {
                self.provider.api_key = Some(key);
            }
        }
        if let Some(model) = lookup("RADAR_MODEL") {
            self.provider.model = model;
        }
        if let Some(url) = lookup("RADAR_PROVIDER_URL") {
            self.provider.base_url = url;
        }
        if let Some(flag) = lookup("RADAR_GROUNDED") {
            self.provider.grounded = parse_flag("RADAR_GROUNDED", &flag)?;
        }
        if let Some(host) = lookup("RADAR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RADAR_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| RadarError::config(format!("RADAR_PORT '{}' is not a port number", port)))?;
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> RadarResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(RadarError::config(format!("{} '{}' is not a boolean", name, other))),
    }
}
