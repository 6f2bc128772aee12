//! Iframe embed URL derivation
//!
//! When every native candidate has failed (or an access failure makes
//! native playback pointless), the player degrades to the CDN's embedded
//! iframe player. The embed URL is composed from the configured embed
//! host and library id:
//!
//! ```text
//! https://<embed-host>/embed/<library-id>/<id>
//! ```
//!
//! The CDN also serves a standalone `/play/<library-id>/<id>` watch page;
//! that form is a documented alternative only and is never produced here.

use crate::resolver::reference::extract_identifier;
use arkiv_common::config::CdnConfig;

/// Derive the iframe embed URL for a reference
///
/// Returns `None` when no canonical identifier can be extracted, in
/// which case the caller must show a terminal error with no embed
/// option.
pub fn derive_iframe_url(cdn: &CdnConfig, reference: &str) -> Option<String> {
    let id = extract_identifier(reference)?;
    Some(format!(
        "https://{}/embed/{}/{}",
        cdn.embed_host, cdn.library_id, id
    ))
}
