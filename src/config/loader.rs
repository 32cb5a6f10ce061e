//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(reason) => write!(f, "Invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GatewayConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    if config.import_path.is_empty() {
        return Err(ConfigError::Invalid("import_path must not be empty".into()));
    }
    if config.schema_folder.is_empty() {
        return Err(ConfigError::Invalid(
            "schema_folder must not be empty".into(),
        ));
    }
    if config.proxy_port == 0 || config.manager_port == 0 {
        return Err(ConfigError::Invalid("listener ports must be nonzero".into()));
    }
    if config.proxy_port == config.manager_port {
        return Err(ConfigError::Invalid(
            "proxy and manager ports must differ".into(),
        ));
    }
    Ok(())
}
