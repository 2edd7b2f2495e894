//! Proxy configuration.
//!
//! Settings are read from YAML files and environment variable overrides,
//! in order of priority (later overrides earlier):
//! 1. `weft.yaml` in the current directory (if it exists)
//! 2. File given by the `path` argument (if provided)
//! 3. File named by the `WEFT_CONFIG` environment variable (if set)
//! 4. `WEFT__*` environment variables, `__` separating nested keys
//!    (e.g. `WEFT__PROXY__FROZEN=true`)

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "weft.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "WEFT_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "WEFT";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "WEFT_LOG";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Per-proxy switches consumed by the chain resolver and executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Advisors were already matched against the target class; skip
    /// class filters during resolution.
    pub pre_filtered: bool,
    /// Prepend [`ExposeInvocation`](crate::invocation::ExposeInvocation)
    /// to every resolved chain.
    pub expose_invocation: bool,
    /// Reject advisor list mutation.
    pub frozen: bool,
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub proxy: ProxyConfig,
}

impl Settings {
    /// Load settings from files and environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config, Environment, File, FileFormat};

        let mut builder = Config::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
