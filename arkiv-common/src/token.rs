//! Signed playback token generation
//!
//! Streaming zones with token authentication require each playback URL to
//! carry a `token` and `expires` query pair. The token is the SHA-256 hex
//! digest of `security_key + video_id + expires`, matching what the
//! streaming CDN validates on the edge.
//!
//! This module contains only pure functions; no HTTP framework
//! dependencies.

use crate::config::TokenConfig;
use crate::{Error, Result};
use sha2::{Digest, Sha256};

/// A signed access token with its expiry timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// SHA-256 hex digest
    pub token: String,

    /// Unix epoch seconds after which the token is rejected
    pub expires: i64,
}

impl SignedToken {
    /// Render as URL query parameters (`token=...&expires=...`)
    pub fn query_pair(&self) -> String {
        format!("token={}&expires={}", self.token, self.expires)
    }
}

/// Sign a playback token for a video identifier
///
/// `expires` is computed from the current time plus the configured TTL.
/// Fails only when the token material itself is unusable; the caller
/// treats that as non-fatal and falls back to untokenized URLs.
pub fn sign_playback_token(config: &TokenConfig, video_id: &str) -> Result<SignedToken> {
    if config.security_key.is_empty() {
        return Err(Error::Token("security key is empty".to_string()));
    }
    if config.ttl_secs == 0 {
        return Err(Error::Token("token ttl must be non-zero".to_string()));
    }

    let expires = chrono::Utc::now().timestamp() + config.ttl_secs as i64;
    Ok(sign_with_expiry(config, video_id, expires))
}

/// Sign a token with an explicit expiry (deterministic, used by tests)
pub fn sign_with_expiry(config: &TokenConfig, video_id: &str, expires: i64) -> SignedToken {
    let mut hasher = Sha256::new();
    hasher.update(config.security_key.as_bytes());
    hasher.update(video_id.as_bytes());
    hasher.update(expires.to_string().as_bytes());
    let digest = hasher.finalize();

    SignedToken {
        token: format!("{:x}", digest),
        expires,
    }
}
