//! Candidate playback URL construction
//!
//! For a canonical identifier the builder synthesizes exactly two
//! candidates on the streaming CDN host, HLS manifest first:
//!
//! ```text
//! https://<streaming-host>/<id>/playlist.m3u8
//! https://<streaming-host>/<id>/play
//! ```
//!
//! When signed-token material is configured both URLs carry
//! `token=...&expires=...`. Token generation failure is non-fatal: the
//! candidates are returned untokenized.

use crate::error::{Error, Result};
use crate::resolver::reference::{classify, ReferenceKind};
use arkiv_common::config::CdnConfig;
use arkiv_common::events::CandidateKind;
use arkiv_common::token::sign_playback_token;
use serde::Serialize;
use tracing::warn;

/// One playback candidate in attempt order
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub kind: CandidateKind,
}

/// Build the ordered candidate list for a reference
///
/// - `Identifier` → two candidates, HLS before DirectPlay
/// - `StreamingUrl` → the URL itself as sole candidate
/// - `StorageUrl` → [`Error::StorageUrlRejected`], never fetched as video
/// - `Invalid` → [`Error::InvalidReference`]
pub fn build_candidates(cdn: &CdnConfig, reference: &str) -> Result<Vec<Candidate>> {
    match classify(cdn, reference) {
        ReferenceKind::Identifier(id) => Ok(identifier_candidates(cdn, &id)),
        ReferenceKind::StreamingUrl(url) => {
            let kind = infer_kind(&url);
            Ok(vec![Candidate { url, kind }])
        }
        ReferenceKind::StorageUrl => Err(Error::StorageUrlRejected(reference.to_string())),
        ReferenceKind::Invalid => Err(Error::InvalidReference(reference.to_string())),
    }
}

fn identifier_candidates(cdn: &CdnConfig, id: &str) -> Vec<Candidate> {
    let query = match &cdn.token {
        Some(token_config) => match sign_playback_token(token_config, id) {
            Ok(signed) => format!("?{}", signed.query_pair()),
            Err(e) => {
                warn!("Token generation failed, serving untokenized URLs: {}", e);
                String::new()
            }
        },
        None => String::new(),
    };

    vec![
        Candidate {
            url: format!(
                "https://{}/{}/playlist.m3u8{}",
                cdn.streaming_host, id, query
            ),
            kind: CandidateKind::Hls,
        },
        Candidate {
            url: format!("https://{}/{}/play{}", cdn.streaming_host, id, query),
            kind: CandidateKind::DirectPlay,
        },
    ]
}

/// Infer the candidate kind of a full streaming URL from its path
fn infer_kind(url: &str) -> CandidateKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.ends_with(".m3u8") {
        CandidateKind::Hls
    } else {
        CandidateKind::DirectPlay
    }
}
