//! Stream client lifecycle
//!
//! The adaptive-streaming client attached to a session is an owned
//! resource with an explicit attach/release lifecycle. [`ClientHandle`]
//! guarantees release before every new attach, on reference change, and
//! on session teardown, so two clients are never attached to the same
//! session concurrently.

use crate::error::Result;
use crate::resolver::Candidate;
use tracing::debug;
use uuid::Uuid;

/// Adaptive-streaming client attached to one session's media element
pub trait StreamClient: Send + Sync {
    /// Attach a candidate URL to the client
    fn attach(&mut self, session_id: Uuid, candidate: &Candidate) -> Result<()>;

    /// Release all decoder/network resources held for the session
    fn release(&mut self, session_id: Uuid);
}

/// Default client: records attach/release at debug level
///
/// The real media pipeline lives in the browser; the service-side client
/// only mirrors the lifecycle so leaks are observable in the logs.
#[derive(Debug, Default)]
pub struct LogStreamClient;

impl StreamClient for LogStreamClient {
    fn attach(&mut self, session_id: Uuid, candidate: &Candidate) -> Result<()> {
        debug!(
            "Session {}: attaching {} candidate {}",
            session_id, candidate.kind, candidate.url
        );
        Ok(())
    }

    fn release(&mut self, session_id: Uuid) {
        debug!("Session {}: stream client released", session_id);
    }
}

/// Owning handle enforcing release-before-attach
pub struct ClientHandle {
    session_id: Uuid,
    client: Box<dyn StreamClient>,
    attached_index: Option<usize>,
}

impl ClientHandle {
    pub fn new(session_id: Uuid, client: Box<dyn StreamClient>) -> Self {
        Self {
            session_id,
            client,
            attached_index: None,
        }
    }

    /// Attach a candidate, releasing any previous attachment first
    pub fn attach(&mut self, index: usize, candidate: &Candidate) -> Result<()> {
        if self.attached_index.is_some() {
            self.client.release(self.session_id);
            self.attached_index = None;
        }
        self.client.attach(self.session_id, candidate)?;
        self.attached_index = Some(index);
        Ok(())
    }

    /// Release the current attachment, if any
    pub fn release(&mut self) {
        if self.attached_index.take().is_some() {
            self.client.release(self.session_id);
        }
    }

    /// Index of the currently attached candidate
    pub fn attached_index(&self) -> Option<usize> {
        self.attached_index
    }
}

impl Drop for ClientHandle {
    fn drop(&mut self) {
        self.release();
    }
}
