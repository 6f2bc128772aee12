//! Event types for the Arkiv event system
//!
//! Provides shared event definitions and the EventBus used by the playback
//! service. Events are broadcast via EventBus and serialized for SSE
//! transmission to connected UI clients.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Playback candidate kind
///
/// Order is significant when building candidate lists: HLS manifests are
/// always attempted before the progressive direct-play endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// Adaptive-bitrate HLS manifest (`playlist.m3u8`)
    Hls,
    /// Progressive direct-play endpoint (`/play`)
    DirectPlay,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Hls => write!(f, "hls"),
            CandidateKind::DirectPlay => write!(f, "directplay"),
        }
    }
}

/// Player session phase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerPhase {
    /// A candidate is attached and waiting for first media data
    Loading,
    Playing,
    Paused,
    /// Native playback abandoned; embedded iframe player engaged (terminal)
    IframeFallback,
    /// No playable source and no iframe derivable (terminal)
    Failed,
}

impl std::fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerPhase::Loading => write!(f, "loading"),
            PlayerPhase::Playing => write!(f, "playing"),
            PlayerPhase::Paused => write!(f, "paused"),
            PlayerPhase::IframeFallback => write!(f, "iframefallback"),
            PlayerPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Arkiv event types
///
/// Events are broadcast via EventBus and can be serialized for SSE
/// transmission. All modules match on this central enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArkivEvent {
    /// Playback session created for a video reference
    SessionCreated {
        session_id: Uuid,
        reference: String,
        candidate_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A playback candidate was attached to the session's stream client
    CandidateAttached {
        session_id: Uuid,
        /// Index into the session's candidate list
        index: usize,
        kind: CandidateKind,
        url: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A playback candidate failed with a classified media error
    CandidateFailed {
        session_id: Uuid,
        index: usize,
        error_kind: String,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// All native candidates abandoned; iframe embed engaged
    IframeFallbackEngaged {
        session_id: Uuid,
        iframe_url: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session phase changed (loading/playing/paused/terminal)
    PlaybackStateChanged {
        session_id: Uuid,
        old_phase: PlayerPhase,
        new_phase: PlayerPhase,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback progress update reported by the client player
    PlaybackProgress {
        session_id: Uuid,
        position_ms: u64,
        duration_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session reached the terminal failed state
    SessionFailed {
        session_id: Uuid,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session removed (client navigated away or player unmounted)
    SessionClosed {
        session_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// One-to-many event broadcaster
///
/// Thin wrapper around `tokio::sync::broadcast` shared by the playback
/// engine and the SSE endpoint. Events emitted before subscription are
/// not received.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ArkivEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ArkivEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    pub fn emit(
        &self,
        event: ArkivEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<ArkivEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ArkivEvent) {
        let _ = self.tx.send(event);
    }

    /// Channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe_and_emit() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let session_id = Uuid::new_v4();
        bus.emit(ArkivEvent::SessionClosed {
            session_id,
            timestamp: chrono::Utc::now(),
        })
        .unwrap();

        match rx.try_recv().unwrap() {
            ArkivEvent::SessionClosed { session_id: id, .. } => assert_eq!(id, session_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_emit_lossy_without_subscribers() {
        let bus = EventBus::new(10);
        // Must not panic or error with zero subscribers
        bus.emit_lossy(ArkivEvent::SessionClosed {
            session_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
        });
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = ArkivEvent::IframeFallbackEngaged {
            session_id: Uuid::new_v4(),
            iframe_url: "https://iframe.mediadelivery.net/embed/123/abc".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "IframeFallbackEngaged");
        assert!(json["iframe_url"].as_str().unwrap().contains("/embed/"));
    }

    #[test]
    fn test_phase_serde_lowercase() {
        let json = serde_json::to_string(&PlayerPhase::IframeFallback).unwrap();
        assert_eq!(json, "\"iframefallback\"");
        let phase: PlayerPhase = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(phase, PlayerPhase::Paused);
    }
}
