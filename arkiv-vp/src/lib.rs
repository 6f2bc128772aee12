//! # Arkiv Video Playback Service (arkiv-vp)
//!
//! Playback resolution and fallback engine for the Arkiv heritage media
//! site.
//!
//! **Purpose:** Classify video references, build ordered candidate
//! playback URLs (HLS manifest before progressive direct play), walk the
//! candidates as the client player reports media errors, and degrade to
//! an embedded iframe player (or a terminal error) when native playback
//! is impossible. Session transitions are exposed over HTTP/SSE.
//!
//! **Architecture:** Stateless resolver + per-session state machine,
//! coordinated by a session engine behind an axum API.

pub mod api;
pub mod config;
pub mod error;
pub mod player;
pub mod resolver;

pub use error::{Error, Result};
pub use player::engine::PlayerEngine;
pub use resolver::Resolver;
