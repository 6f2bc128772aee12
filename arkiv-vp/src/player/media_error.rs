//! Media error classification
//!
//! The client player reports the structured media-element error code
//! (1 aborted, 2 network, 3 decode, 4 source-not-supported) and, when it
//! has one, the HTTP status of the failed request. Classification is
//! driven by those structured fields; substring matching on error text
//! is isolated in [`message_heuristic`] and consulted only when no
//! structured signal is available.

use serde::Serialize;

/// Structured classification of a playback error
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaErrorKind {
    /// Transient or candidate-specific network failure
    Network,
    /// Container/codec problem with this candidate
    Format,
    /// Access failure; will fail identically on every candidate
    Auth,
    Unknown,
}

impl std::fmt::Display for MediaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaErrorKind::Network => write!(f, "network"),
            MediaErrorKind::Format => write!(f, "format"),
            MediaErrorKind::Auth => write!(f, "auth"),
            MediaErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Media-element error code: network failure
const MEDIA_ERR_NETWORK: u8 = 2;
/// Media-element error code: decode failure
const MEDIA_ERR_DECODE: u8 = 3;
/// Media-element error code: source not supported
const MEDIA_ERR_SRC_NOT_SUPPORTED: u8 = 4;

/// Classify a playback error from structured fields, falling back to the
/// message heuristic only when neither code nor HTTP status is present
pub fn classify_media_error(
    code: Option<u8>,
    http_status: Option<u16>,
    message: &str,
) -> MediaErrorKind {
    // An HTTP auth status is decisive regardless of the media code:
    // a 401/403 on one candidate fails identically on all others.
    if matches!(http_status, Some(401) | Some(403)) {
        return MediaErrorKind::Auth;
    }

    match code {
        Some(MEDIA_ERR_NETWORK) => return MediaErrorKind::Network,
        Some(MEDIA_ERR_DECODE) | Some(MEDIA_ERR_SRC_NOT_SUPPORTED) => {
            return MediaErrorKind::Format;
        }
        Some(_) => return MediaErrorKind::Unknown,
        None => {}
    }

    if http_status.is_some() {
        // Non-auth HTTP failure without a media code: network-level
        return MediaErrorKind::Network;
    }

    message_heuristic(message)
}

/// Last-resort substring heuristic over vendor error text
///
/// Only consulted when the client supplied no structured fields. Kept
/// deliberately narrow: a transient error misread as auth would skip
/// viable candidates.
fn message_heuristic(message: &str) -> MediaErrorKind {
    let lower = message.to_ascii_lowercase();

    if lower.contains("403") || lower.contains("forbidden") || lower.contains("unauthorized") {
        return MediaErrorKind::Auth;
    }
    if lower.contains("format error") || lower.contains("decode") {
        return MediaErrorKind::Format;
    }
    if lower.contains("network") || lower.contains("timeout") {
        return MediaErrorKind::Network;
    }

    MediaErrorKind::Unknown
}
