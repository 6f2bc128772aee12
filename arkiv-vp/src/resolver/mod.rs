//! Video reference resolution
//!
//! Turns an opaque video reference (canonical GUID, streaming-CDN URL, or
//! junk) into an ordered list of playback candidates, and derives the
//! iframe embed URL used when native playback is abandoned.
//!
//! The resolver is pure: it owns an injected [`CdnConfig`] and performs
//! no network I/O. Storage-CDN URLs are rejected by policy before any
//! playback request could be made against them.

pub mod candidates;
pub mod iframe;
pub mod reference;

pub use candidates::Candidate;
pub use reference::ReferenceKind;

use crate::error::Result;
use arkiv_common::config::CdnConfig;

/// Reference classifier, candidate builder and iframe resolver
#[derive(Debug, Clone)]
pub struct Resolver {
    cdn: CdnConfig,
}

impl Resolver {
    /// Create a resolver for the given CDN configuration
    pub fn new(cdn: CdnConfig) -> Self {
        Self { cdn }
    }

    /// CDN configuration in use
    pub fn cdn(&self) -> &CdnConfig {
        &self.cdn
    }

    /// Classify a video reference
    pub fn classify(&self, reference: &str) -> ReferenceKind {
        reference::classify(&self.cdn, reference)
    }

    /// Build the ordered candidate list for a reference
    ///
    /// HLS strictly precedes DirectPlay. Storage-CDN and invalid
    /// references fail with the corresponding policy error.
    pub fn build_candidates(&self, reference: &str) -> Result<Vec<Candidate>> {
        candidates::build_candidates(&self.cdn, reference)
    }

    /// Derive the iframe embed URL for a reference, when an identifier
    /// can be extracted from it
    pub fn derive_iframe_url(&self, reference: &str) -> Option<String> {
        iframe::derive_iframe_url(&self.cdn, reference)
    }
}
