//! Video reference classification
//!
//! A reference is one of:
//! - a 36-character canonical identifier (GUID shape, case-insensitive),
//! - a fully-qualified URL on the streaming CDN host,
//! - a URL mentioning the object-storage CDN host (never playable),
//! - anything else (invalid).

use arkiv_common::config::CdnConfig;

/// Classification result for a video reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Canonical streaming-platform identifier, normalized to lowercase
    Identifier(String),
    /// Fully-qualified URL on the streaming CDN host
    StreamingUrl(String),
    /// URL on the object-storage CDN host; rejected for playback
    StorageUrl,
    /// Neither an identifier nor a known CDN URL
    Invalid,
}

/// Classify a video reference against the configured CDN hosts
///
/// Pure function, no side effects.
pub fn classify(cdn: &CdnConfig, reference: &str) -> ReferenceKind {
    let reference = reference.trim();

    if is_canonical_id(reference) {
        return ReferenceKind::Identifier(reference.to_ascii_lowercase());
    }

    if has_http_scheme(reference) {
        if url_host(reference).is_some_and(|h| h.eq_ignore_ascii_case(&cdn.streaming_host)) {
            return ReferenceKind::StreamingUrl(reference.to_string());
        }
    }

    // Storage URLs are recognized by hostname substring regardless of
    // path, so malformed storage links are still refused as video.
    // Hostnames are case-insensitive, same as the streaming-host match.
    if reference
        .to_ascii_lowercase()
        .contains(&cdn.storage_host.to_ascii_lowercase())
    {
        return ReferenceKind::StorageUrl;
    }

    ReferenceKind::Invalid
}

/// Check the 8-4-4-4-12 hex canonical identifier shape
pub fn is_canonical_id(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    for (i, c) in s.char_indices() {
        match i {
            8 | 13 | 18 | 23 => {
                if c != '-' {
                    return false;
                }
            }
            _ => {
                if !c.is_ascii_hexdigit() {
                    return false;
                }
            }
        }
    }
    true
}

/// Extract the canonical identifier from a reference
///
/// Accepts a bare identifier or any URL carrying the identifier as a
/// path segment. Returns the identifier normalized to lowercase.
pub fn extract_identifier(reference: &str) -> Option<String> {
    let reference = reference.trim();

    if is_canonical_id(reference) {
        return Some(reference.to_ascii_lowercase());
    }

    if has_http_scheme(reference) {
        let without_scheme = strip_scheme(reference);
        let path = without_scheme
            .split(['?', '#'])
            .next()
            .unwrap_or(without_scheme);
        for segment in path.split('/').skip(1) {
            if is_canonical_id(segment) {
                return Some(segment.to_ascii_lowercase());
            }
        }
    }

    None
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn strip_scheme(s: &str) -> &str {
    s.split_once("://").map(|(_, rest)| rest).unwrap_or(s)
}

/// Hostname of a URL, without port, or None for non-URL strings
fn url_host(s: &str) -> Option<&str> {
    if !has_http_scheme(s) {
        return None;
    }
    let rest = strip_scheme(s);
    let authority = rest.split(['/', '?', '#']).next()?;
    // Drop userinfo and port
    let host = authority.rsplit('@').next()?;
    let host = host.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
