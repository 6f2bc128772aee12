//! Playback session state machine
//!
//! One session per mounted player. The session owns the candidate list
//! built for its reference, the index of the candidate currently
//! attached, and the stream-client handle. Media events reported by the
//! client drive the transitions:
//!
//! ```text
//! Loading → Playing ⇄ Paused
//!    |          |        |
//!    +----------+--------+-- fatal error --> next candidate (Loading)
//!                                        \-> IframeFallback (terminal)
//!                                        \-> Failed (terminal)
//! ```
//!
//! An auth-classified error bypasses remaining candidates: access
//! failures are systemic, not candidate-specific. `current_index` is
//! monotonic for the lifetime of one reference and resets to zero
//! exactly when the reference is replaced.

use crate::player::media_error::{classify_media_error, MediaErrorKind};
use crate::player::stream_client::{ClientHandle, StreamClient};
use crate::resolver::{Candidate, Resolver};
use arkiv_common::events::PlayerPhase;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Media event reported by the client player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaEvent {
    /// First media data decoded; duration known
    Loaded { duration_ms: u64 },
    /// Playback started or resumed
    Playing,
    /// Playback paused by the viewer
    Paused,
    /// Playback reached the end of the media
    Ended,
    /// Fatal playback error (native media element or adaptive-streaming
    /// library, reported identically)
    Error {
        /// Structured media-element error code (1-4), when available
        #[serde(default)]
        code: Option<u8>,
        /// HTTP status of the failed request, when the client has it
        #[serde(default)]
        http_status: Option<u16>,
        /// Vendor error text, used only as a last-resort heuristic
        #[serde(default)]
        message: String,
    },
}

/// Directive returned to the client player after each event
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Directive {
    /// Attach the given candidate to the media element
    AttachCandidate { index: usize, candidate: Candidate },
    /// Abandon native playback and render the iframe embed
    EngageIframe { url: String },
    /// Terminal failure; render the reason with no embed option
    Fail { reason: String },
    /// No action required
    Continue,
}

/// Serializable view of a session for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub reference: String,
    pub phase: PlayerPhase,
    pub current_index: usize,
    pub candidates: Vec<Candidate>,
    pub iframe_url: Option<String>,
    pub error: Option<String>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Per-player playback state
pub struct PlaybackSession {
    session_id: Uuid,
    reference: String,
    candidates: Vec<Candidate>,
    current_index: usize,
    phase: PlayerPhase,
    iframe_url: Option<String>,
    error: Option<String>,
    position_ms: u64,
    duration_ms: u64,
    client: ClientHandle,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl PlaybackSession {
    /// Create a session and attach the first candidate
    ///
    /// When no candidate list can be built the session starts in the
    /// terminal `Failed` phase (a storage-CDN or invalid reference has
    /// no extractable identifier, so no iframe is derivable either).
    pub fn new(
        session_id: Uuid,
        reference: &str,
        resolver: &Resolver,
        client: Box<dyn StreamClient>,
    ) -> (Self, Directive) {
        let mut session = Self {
            session_id,
            reference: reference.to_string(),
            candidates: Vec::new(),
            current_index: 0,
            phase: PlayerPhase::Loading,
            iframe_url: resolver.derive_iframe_url(reference),
            error: None,
            position_ms: 0,
            duration_ms: 0,
            client: ClientHandle::new(session_id, client),
            created_at: chrono::Utc::now(),
        };
        let directive = session.start(resolver);
        (session, directive)
    }

    fn start(&mut self, resolver: &Resolver) -> Directive {
        match resolver.build_candidates(&self.reference) {
            Ok(candidates) => {
                info!(
                    "Session {}: {} candidates for reference {}",
                    self.session_id,
                    candidates.len(),
                    self.reference
                );
                self.candidates = candidates;
                self.attach_current()
            }
            Err(e) => {
                warn!("Session {}: {}", self.session_id, e);
                self.fail(e.to_string())
            }
        }
    }

    /// Consume a media event and return the directive for the client
    ///
    /// Pure with respect to time and I/O: replaying the same event
    /// sequence on a fresh session with the same candidate list always
    /// reaches the same terminal state.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Directive {
        if self.is_terminal() {
            debug!(
                "Session {}: event ignored in terminal phase {}",
                self.session_id, self.phase
            );
            return Directive::Continue;
        }

        match event {
            MediaEvent::Loaded { duration_ms } => {
                self.duration_ms = duration_ms;
                Directive::Continue
            }
            MediaEvent::Playing => {
                self.phase = PlayerPhase::Playing;
                Directive::Continue
            }
            MediaEvent::Paused => {
                self.phase = PlayerPhase::Paused;
                Directive::Continue
            }
            MediaEvent::Ended => {
                self.position_ms = self.duration_ms;
                self.phase = PlayerPhase::Paused;
                Directive::Continue
            }
            MediaEvent::Error {
                code,
                http_status,
                message,
            } => {
                let kind = classify_media_error(code, http_status, &message);
                self.handle_playback_error(kind, &message)
            }
        }
    }

    fn handle_playback_error(&mut self, kind: MediaErrorKind, message: &str) -> Directive {
        warn!(
            "Session {}: candidate {} failed ({}): {}",
            self.session_id, self.current_index, kind, message
        );
        self.error = Some(message.to_string());

        // Access failures fail identically on every candidate; trying
        // the rest only delays the fallback.
        if kind == MediaErrorKind::Auth {
            return self.engage_iframe_or_fail();
        }

        if self.current_index + 1 < self.candidates.len() {
            self.current_index += 1;
            return self.attach_current();
        }

        self.engage_iframe_or_fail()
    }

    fn attach_current(&mut self) -> Directive {
        let candidate = self.candidates[self.current_index].clone();
        self.phase = PlayerPhase::Loading;
        match self.client.attach(self.current_index, &candidate) {
            Ok(()) => Directive::AttachCandidate {
                index: self.current_index,
                candidate,
            },
            Err(e) => {
                warn!("Session {}: attach failed: {}", self.session_id, e);
                self.engage_iframe_or_fail()
            }
        }
    }

    fn engage_iframe_or_fail(&mut self) -> Directive {
        match self.iframe_url.clone() {
            Some(url) => {
                self.client.release();
                self.phase = PlayerPhase::IframeFallback;
                info!("Session {}: iframe fallback engaged", self.session_id);
                Directive::EngageIframe { url }
            }
            None => self.fail(format!("no playable source for {}", self.reference)),
        }
    }

    fn fail(&mut self, reason: String) -> Directive {
        self.client.release();
        self.phase = PlayerPhase::Failed;
        self.error = Some(reason.clone());
        Directive::Fail { reason }
    }

    /// Replace the session's reference
    ///
    /// Tears down the attached stream client before the new candidate
    /// list is built; `current_index` resets to zero.
    pub fn replace_reference(&mut self, reference: &str, resolver: &Resolver) -> Directive {
        info!(
            "Session {}: reference change {} -> {}",
            self.session_id, self.reference, reference
        );
        self.client.release();
        self.reference = reference.to_string();
        self.candidates.clear();
        self.current_index = 0;
        self.phase = PlayerPhase::Loading;
        self.iframe_url = resolver.derive_iframe_url(reference);
        self.error = None;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.start(resolver)
    }

    /// Record a progress report from the client player
    pub fn set_progress(&mut self, position_ms: u64, duration_ms: Option<u64>) {
        self.position_ms = position_ms;
        if let Some(duration_ms) = duration_ms {
            self.duration_ms = duration_ms;
        }
    }

    /// Release the stream client (session removal)
    pub fn release(&mut self) {
        self.client.release();
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            PlayerPhase::IframeFallback | PlayerPhase::Failed
        )
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            reference: self.reference.clone(),
            phase: self.phase,
            current_index: self.current_index,
            candidates: self.candidates.clone(),
            iframe_url: self.iframe_url.clone(),
            error: self.error.clone(),
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            created_at: self.created_at,
        }
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::stream_client::LogStreamClient;
    use arkiv_common::config::CdnConfig;
    use arkiv_common::events::CandidateKind;

    const ID: &str = "a1b2c3d4-1111-2222-3333-444455556666";

    fn resolver() -> Resolver {
        Resolver::new(CdnConfig {
            streaming_host: "cdn.example.net".to_string(),
            storage_host: "storage.example.net".to_string(),
            embed_host: "iframe.mediadelivery.net".to_string(),
            library_id: "147838".to_string(),
            token: None,
        })
    }

    fn new_session(reference: &str) -> (PlaybackSession, Directive) {
        PlaybackSession::new(
            Uuid::new_v4(),
            reference,
            &resolver(),
            Box::new(LogStreamClient),
        )
    }

    fn network_error() -> MediaEvent {
        MediaEvent::Error {
            code: Some(2),
            http_status: None,
            message: "fragment load error".to_string(),
        }
    }

    fn auth_error() -> MediaEvent {
        MediaEvent::Error {
            code: None,
            http_status: Some(403),
            message: "Forbidden".to_string(),
        }
    }

    #[test]
    fn test_initial_attach_is_hls() {
        let (session, directive) = new_session(ID);
        assert_eq!(session.phase(), PlayerPhase::Loading);
        match directive {
            Directive::AttachCandidate { index, candidate } => {
                assert_eq!(index, 0);
                assert_eq!(candidate.kind, CandidateKind::Hls);
            }
            other => panic!("unexpected directive: {:?}", other),
        }
    }

    #[test]
    fn test_hls_failure_advances_to_directplay_not_iframe() {
        let (mut session, _) = new_session(ID);
        let directive = session.handle_media_event(network_error());
        match directive {
            Directive::AttachCandidate { index, candidate } => {
                assert_eq!(index, 1);
                assert_eq!(candidate.kind, CandidateKind::DirectPlay);
            }
            other => panic!("unexpected directive: {:?}", other),
        }
        assert_eq!(session.phase(), PlayerPhase::Loading);
    }

    #[test]
    fn test_exhausted_candidates_engage_iframe() {
        let (mut session, _) = new_session(ID);
        session.handle_media_event(network_error());
        let directive = session.handle_media_event(network_error());
        match directive {
            Directive::EngageIframe { url } => {
                assert_eq!(
                    url,
                    format!("https://iframe.mediadelivery.net/embed/147838/{}", ID)
                );
            }
            other => panic!("unexpected directive: {:?}", other),
        }
        assert_eq!(session.phase(), PlayerPhase::IframeFallback);
    }

    #[test]
    fn test_auth_error_short_circuits_to_iframe() {
        let (mut session, _) = new_session(ID);
        let directive = session.handle_media_event(auth_error());
        assert!(matches!(directive, Directive::EngageIframe { .. }));
        // Remaining candidate skipped
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), PlayerPhase::IframeFallback);
    }

    #[test]
    fn test_storage_reference_is_terminal_failure_without_embed() {
        let (session, directive) = new_session("https://storage.example.net/videos/x.mp4");
        assert_eq!(session.phase(), PlayerPhase::Failed);
        match directive {
            Directive::Fail { reason } => {
                assert!(reason.contains("storage.example.net"));
            }
            other => panic!("unexpected directive: {:?}", other),
        }
        assert!(session.snapshot().iframe_url.is_none());
    }

    #[test]
    fn test_streaming_url_without_identifier_fails_after_exhaustion() {
        // Host matches the streaming CDN but no identifier appears in the
        // path, so the sole candidate has no iframe behind it
        let url = "https://cdn.example.net/live/feed.m3u8";
        let (mut session, first) = new_session(url);
        assert!(matches!(
            first,
            Directive::AttachCandidate { index: 0, .. }
        ));
        assert!(session.snapshot().iframe_url.is_none());

        let directive = session.handle_media_event(network_error());
        match directive {
            Directive::Fail { reason } => assert!(reason.contains(url)),
            other => panic!("unexpected directive: {:?}", other),
        }
        assert_eq!(session.phase(), PlayerPhase::Failed);
    }

    #[test]
    fn test_invalid_reference_is_terminal_failure() {
        let (session, _) = new_session("garbage");
        assert_eq!(session.phase(), PlayerPhase::Failed);
    }

    #[test]
    fn test_index_monotonic_and_events_ignored_after_terminal() {
        let (mut session, _) = new_session(ID);
        session.handle_media_event(network_error());
        session.handle_media_event(network_error());
        assert!(session.is_terminal());
        let index = session.current_index();

        let directive = session.handle_media_event(network_error());
        assert_eq!(directive, Directive::Continue);
        assert_eq!(session.current_index(), index);
    }

    #[test]
    fn test_deterministic_replay() {
        let events = [network_error(), network_error(), auth_error()];

        let run = || {
            let (mut session, _) = new_session(ID);
            for event in events.clone() {
                session.handle_media_event(event);
            }
            (session.phase(), session.current_index())
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_playing_paused_transitions() {
        let (mut session, _) = new_session(ID);
        session.handle_media_event(MediaEvent::Loaded { duration_ms: 90_000 });
        session.handle_media_event(MediaEvent::Playing);
        assert_eq!(session.phase(), PlayerPhase::Playing);
        session.handle_media_event(MediaEvent::Paused);
        assert_eq!(session.phase(), PlayerPhase::Paused);
        session.handle_media_event(MediaEvent::Ended);
        assert_eq!(session.snapshot().position_ms, 90_000);
    }

    #[test]
    fn test_reference_replacement_resets_index() {
        let (mut session, _) = new_session(ID);
        session.handle_media_event(network_error());
        assert_eq!(session.current_index(), 1);

        let other = "b2c3d4e5-1111-2222-3333-444455556666";
        let directive = session.replace_reference(other, &resolver());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), PlayerPhase::Loading);
        assert_eq!(session.reference(), other);
        assert!(matches!(
            directive,
            Directive::AttachCandidate { index: 0, .. }
        ));
    }

    #[test]
    fn test_error_transitions_identical_from_playing_and_paused() {
        let run = |pre_events: Vec<MediaEvent>| {
            let (mut session, _) = new_session(ID);
            for event in pre_events {
                session.handle_media_event(event);
            }
            session.handle_media_event(network_error());
            session.current_index()
        };

        assert_eq!(run(vec![]), 1);
        assert_eq!(run(vec![MediaEvent::Playing]), 1);
        assert_eq!(run(vec![MediaEvent::Playing, MediaEvent::Paused]), 1);
    }
}
