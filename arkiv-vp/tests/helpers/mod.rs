//! Shared test helpers
//!
//! Provides a fixed CDN configuration and a recording stream client so
//! tests can assert attach/release ordering.

#![allow(dead_code)]

use arkiv_common::config::CdnConfig;
use arkiv_vp::player::engine::ClientFactory;
use arkiv_vp::player::{PlayerEngine, StreamClient};
use arkiv_vp::resolver::{Candidate, Resolver};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Canonical identifier used across the test suites
pub const VIDEO_ID: &str = "a1b2c3d4-1111-2222-3333-444455556666";

pub fn test_cdn() -> CdnConfig {
    CdnConfig {
        streaming_host: "cdn.example.net".to_string(),
        storage_host: "storage.example.net".to_string(),
        embed_host: "iframe.mediadelivery.net".to_string(),
        library_id: "147838".to_string(),
        token: None,
    }
}

pub fn test_resolver() -> Resolver {
    Resolver::new(test_cdn())
}

/// Stream client that records every attach/release into a shared log
pub struct RecordingStreamClient {
    ops: Arc<Mutex<Vec<String>>>,
}

impl StreamClient for RecordingStreamClient {
    fn attach(&mut self, _session_id: Uuid, candidate: &Candidate) -> arkiv_vp::Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(format!("attach:{}", candidate.url));
        Ok(())
    }

    fn release(&mut self, _session_id: Uuid) {
        self.ops.lock().unwrap().push("release".to_string());
    }
}

/// Engine whose sessions all record into the returned shared op log
pub fn recording_engine() -> (PlayerEngine, Arc<Mutex<Vec<String>>>) {
    let ops: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let factory_ops = ops.clone();
    let factory: ClientFactory = Box::new(move || {
        Box::new(RecordingStreamClient {
            ops: factory_ops.clone(),
        })
    });
    (
        PlayerEngine::with_client_factory(test_resolver(), factory),
        ops,
    )
}
