//! Configuration management for the arkiv-vp playback service
//!
//! Bootstrap configuration comes from a TOML file; the port may be
//! overridden from the command line or environment. CDN settings are
//! deserialized into an explicit [`CdnConfig`] that is injected into the
//! resolver at construction time.
//!
//! Settings sources priority:
//! 1. Command-line arguments (`--port`, `--config`)
//! 2. Environment variables (`ARKIV_VP_PORT`, `ARKIV_CONFIG`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::error::{Error, Result};
use arkiv_common::config::{resolve_config_file, CdnConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "ARKIV_CONFIG";

/// Bootstrap configuration loaded from the TOML file
///
/// These settings cannot change during runtime; the service must restart
/// to pick up changes.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CDN hostnames, library id and token material
    pub cdn: CdnConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    5750
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load configuration from an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        config.cdn.validate()?;
        Ok(config)
    }

    /// Load configuration following the priority order
    ///
    /// `cli_config` is the `--config` argument, `cli_port` the `--port`
    /// argument. A config file is required because there is no sensible
    /// built-in default for the CDN hostnames.
    pub fn load(cli_config: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let path = resolve_config_file(cli_config, CONFIG_ENV_VAR)
            .ok_or_else(|| Error::Config("no configuration file found".to_string()))?;

        info!("Loading configuration from {}", path.display());
        let mut config = Self::load_from(&path)?;

        if let Some(port) = cli_port {
            config.port = port;
        }

        Ok(config)
    }
}

/// Resolved configuration file path for diagnostics
pub fn config_file_path(cli_config: Option<&str>) -> Option<PathBuf> {
    resolve_config_file(cli_config, CONFIG_ENV_VAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
port = 6000

[cdn]
streaming_host = "vz-abc.b-cdn.net"
storage_host = "arkiv.b-cdn.net"
library_id = "147838"

[logging]
level = "debug"
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = TomlConfig::load_from(file.path()).unwrap();
        assert_eq!(config.port, 6000);
        assert_eq!(config.cdn.streaming_host, "vz-abc.b-cdn.net");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_port_defaults_when_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[cdn]
streaming_host = "vz-abc.b-cdn.net"
storage_host = "arkiv.b-cdn.net"
library_id = "147838"
"#,
        )
        .unwrap();

        let config = TomlConfig::load_from(file.path()).unwrap();
        assert_eq!(config.port, 5750);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_cdn_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[cdn]
streaming_host = "https://vz-abc.b-cdn.net"
storage_host = "arkiv.b-cdn.net"
library_id = "147838"
"#,
        )
        .unwrap();

        assert!(TomlConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = TomlConfig::load_from(Path::new("/nonexistent/arkiv.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
