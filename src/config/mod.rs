use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

// Re-export existing config types
pub use crate::dashboard::DashboardSeed;

/// Config file read when ECONUDGE_CONFIG is not set
pub const DEFAULT_CONFIG_PATH: &str = "econudge.toml";

/// Complete service configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EcoNudgeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardSeed,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// API boundary limits
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Requests with a larger body are rejected with 413
    #[serde(default = "default_body_size_limit")]
    pub body_size_limit_bytes: usize,
    /// Origins allowed by CORS. Empty = any origin.
    #[serde(default)]
    pub cors_allow_origins: Vec<String>,
}

fn default_body_size_limit() -> usize {
    64 * 1024
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            body_size_limit_bytes: default_body_size_limit(),
            cors_allow_origins: Vec::new(),
        }
    }
}

impl EcoNudgeConfig {
    /// Resolve configuration at startup.
    ///
    /// ECONUDGE_CONFIG names a file that must exist; otherwise `econudge.toml`
    /// is read if present and defaults are used if not. Env overrides apply last.
    pub fn from_env_or_file() -> Result<Self> {
        let mut config = match std::env::var("ECONUDGE_CONFIG") {
            Ok(path) => load_config(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
            Err(_) => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply ECONUDGE_BIND_ADDR / ECONUDGE_BODY_SIZE_LIMIT_BYTES from `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("ECONUDGE_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = lookup("ECONUDGE_BODY_SIZE_LIMIT_BYTES") {
            match v.parse::<usize>() {
                Ok(n) => self.api.body_size_limit_bytes = n,
                Err(_) => warn!(value = %v, "Ignoring invalid ECONUDGE_BODY_SIZE_LIMIT_BYTES"),
            }
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<EcoNudgeConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: EcoNudgeConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
