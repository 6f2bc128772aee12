//! Configuration types and config-file resolution
//!
//! CDN settings are an explicit configuration object handed to the
//! resolver at construction time. Nothing in the resolution path reads
//! process-wide environment state ad hoc; environment variables are
//! consulted exactly once, at load time, with this priority order:
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Signed-token material for restricted streaming zones
///
/// When present, candidate URLs carry `token` and `expires` query
/// parameters computed from this material.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Security key issued by the streaming CDN for the library
    pub security_key: String,

    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

/// CDN configuration for video reference resolution
///
/// Hostnames are bare hosts (no scheme, no path). The storage host serves
/// static images only and is never valid for video playback.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CdnConfig {
    /// Streaming CDN hostname authorized to serve manifests and segments
    pub streaming_host: String,

    /// Object-storage CDN hostname (images only, rejected for playback)
    pub storage_host: String,

    /// Embed-player hostname for the iframe fallback
    #[serde(default = "default_embed_host")]
    pub embed_host: String,

    /// Streaming library identifier, used in embed URLs
    pub library_id: String,

    /// Optional signed-token material
    #[serde(default)]
    pub token: Option<TokenConfig>,
}

fn default_embed_host() -> String {
    "iframe.mediadelivery.net".to_string()
}

impl CdnConfig {
    /// Validate hostnames and library id
    ///
    /// Rejects empty fields and hostnames that carry a scheme or path,
    /// which would otherwise corrupt every URL built from them.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("streaming_host", &self.streaming_host),
            ("storage_host", &self.storage_host),
            ("embed_host", &self.embed_host),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("{} must not be empty", name)));
            }
            if value.contains("://") || value.contains('/') {
                return Err(Error::Config(format!(
                    "{} must be a bare hostname, got: {}",
                    name, value
                )));
            }
        }
        if self.streaming_host == self.storage_host {
            return Err(Error::Config(
                "streaming_host and storage_host must differ".to_string(),
            ));
        }
        if self.library_id.is_empty() {
            return Err(Error::Config("library_id must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Resolve the configuration file path
///
/// Priority order:
/// 1. Command-line argument
/// 2. Environment variable (name supplied by the caller)
/// 3. `<user config dir>/arkiv/config.toml`
/// 4. `/etc/arkiv/config.toml` (unix)
pub fn resolve_config_file(cli_arg: Option<&str>, env_var_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var(env_var_name) {
        let path = PathBuf::from(path);
        if !path.exists() {
            warn!(
                "{} points at {}, which does not exist",
                env_var_name,
                path.display()
            );
        }
        return Some(path);
    }

    if let Some(path) = dirs::config_dir().map(|d| d.join("arkiv").join("config.toml")) {
        if path.exists() {
            debug!("Using user configuration at {}", path.display());
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/arkiv/config.toml");
    if system_config.exists() {
        debug!("Using system configuration at {}", system_config.display());
        return Some(system_config);
    }

    None
}
