//! Player engine orchestration
//!
//! Owns the session registry and the event bus. Each mounted player gets
//! its own session; no mutable state is shared between sessions. All
//! playback errors are handled here or below; nothing propagates to the
//! HTTP layer except "session not found" and reference-policy errors.

use crate::error::{Error, Result};
use crate::player::media_error::classify_media_error;
use crate::player::session::{Directive, MediaEvent, PlaybackSession, SessionSnapshot};
use crate::player::stream_client::{LogStreamClient, StreamClient};
use crate::resolver::Resolver;
use arkiv_common::events::{ArkivEvent, EventBus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Produces the stream client attached to each new session
pub type ClientFactory = Box<dyn Fn() -> Box<dyn StreamClient> + Send + Sync>;

/// Session engine: registry, resolution, event broadcasting
pub struct PlayerEngine {
    resolver: Resolver,
    sessions: RwLock<HashMap<Uuid, PlaybackSession>>,
    bus: EventBus,
    client_factory: ClientFactory,
}

impl PlayerEngine {
    /// Create an engine with the default logging stream client
    pub fn new(resolver: Resolver) -> Self {
        Self::with_client_factory(resolver, Box::new(|| Box::new(LogStreamClient)))
    }

    /// Create an engine with a custom stream-client factory
    pub fn with_client_factory(resolver: Resolver, client_factory: ClientFactory) -> Self {
        Self {
            resolver,
            sessions: RwLock::new(HashMap::new()),
            bus: EventBus::new(100),
            client_factory,
        }
    }

    /// Resolver in use (shared with the stateless resolve endpoint)
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Subscribe to the session event feed
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ArkivEvent> {
        self.bus.subscribe()
    }

    /// Create a playback session for a video reference
    ///
    /// The returned directive tells the client what to do first: attach
    /// the initial candidate, or render a terminal failure when the
    /// reference cannot be resolved at all.
    pub async fn create_session(&self, reference: &str) -> (SessionSnapshot, Directive) {
        let session_id = Uuid::new_v4();
        let client = (self.client_factory)();
        let (session, directive) =
            PlaybackSession::new(session_id, reference, &self.resolver, client);

        info!(
            "Created session {} for reference {} (phase: {})",
            session_id,
            reference,
            session.phase()
        );

        let snapshot = session.snapshot();
        self.bus.emit_lossy(ArkivEvent::SessionCreated {
            session_id,
            reference: reference.to_string(),
            candidate_count: snapshot.candidates.len(),
            timestamp: chrono::Utc::now(),
        });
        self.emit_directive_events(session_id, &directive);

        self.sessions.write().await.insert(session_id, session);
        (snapshot, directive)
    }

    /// Feed a media event into a session's state machine
    pub async fn media_event(&self, session_id: Uuid, event: MediaEvent) -> Result<Directive> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;

        let old_phase = session.phase();
        let failed_candidate = match &event {
            MediaEvent::Error {
                code,
                http_status,
                message,
            } if !session.is_terminal() => Some((
                session.current_index(),
                classify_media_error(*code, *http_status, message),
                message.clone(),
            )),
            _ => None,
        };

        let directive = session.handle_media_event(event);
        let new_phase = session.phase();

        if let Some((index, kind, message)) = failed_candidate {
            self.bus.emit_lossy(ArkivEvent::CandidateFailed {
                session_id,
                index,
                error_kind: kind.to_string(),
                message,
                timestamp: chrono::Utc::now(),
            });
        }
        self.emit_directive_events(session_id, &directive);
        if old_phase != new_phase {
            self.bus.emit_lossy(ArkivEvent::PlaybackStateChanged {
                session_id,
                old_phase,
                new_phase,
                timestamp: chrono::Utc::now(),
            });
        }

        Ok(directive)
    }

    /// Replace a session's video reference
    ///
    /// The old stream client is released before the new candidate list
    /// is built; the candidate index restarts at zero.
    pub async fn replace_reference(
        &self,
        session_id: Uuid,
        reference: &str,
    ) -> Result<(SessionSnapshot, Directive)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;

        let old_phase = session.phase();
        let directive = session.replace_reference(reference, &self.resolver);
        let new_phase = session.phase();
        let snapshot = session.snapshot();
        self.emit_directive_events(session_id, &directive);
        if old_phase != new_phase {
            self.bus.emit_lossy(ArkivEvent::PlaybackStateChanged {
                session_id,
                old_phase,
                new_phase,
                timestamp: chrono::Utc::now(),
            });
        }
        Ok((snapshot, directive))
    }

    /// Record a progress report from the client player
    pub async fn update_progress(
        &self,
        session_id: Uuid,
        position_ms: u64,
        duration_ms: Option<u64>,
    ) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;

        session.set_progress(position_ms, duration_ms);
        let snapshot = session.snapshot();
        self.bus.emit_lossy(ArkivEvent::PlaybackProgress {
            session_id,
            position_ms: snapshot.position_ms,
            duration_ms: snapshot.duration_ms,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    /// Snapshot a session for API responses
    pub async fn snapshot(&self, session_id: Uuid) -> Result<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .map(|s| s.snapshot())
            .ok_or(Error::SessionNotFound(session_id))
    }

    /// Remove a session, releasing its stream client
    pub async fn remove_session(&self, session_id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let mut session = sessions
            .remove(&session_id)
            .ok_or(Error::SessionNotFound(session_id))?;

        session.release();
        debug!("Removed session {}", session_id);
        self.bus.emit_lossy(ArkivEvent::SessionClosed {
            session_id,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn emit_directive_events(&self, session_id: Uuid, directive: &Directive) {
        match directive {
            Directive::AttachCandidate { index, candidate } => {
                self.bus.emit_lossy(ArkivEvent::CandidateAttached {
                    session_id,
                    index: *index,
                    kind: candidate.kind,
                    url: candidate.url.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
            Directive::EngageIframe { url } => {
                self.bus.emit_lossy(ArkivEvent::IframeFallbackEngaged {
                    session_id,
                    iframe_url: url.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
            Directive::Fail { reason } => {
                self.bus.emit_lossy(ArkivEvent::SessionFailed {
                    session_id,
                    reason: reason.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
            Directive::Continue => {}
        }
    }
}

// ========================================
// Tests
// ========================================
