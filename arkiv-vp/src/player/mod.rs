//! Playback session management
//!
//! The session state machine consumes media events reported by the
//! client player and answers with directives (attach next candidate,
//! engage the iframe embed, fail). The engine owns the session registry
//! and broadcasts transitions on the event bus.

pub mod engine;
pub mod media_error;
pub mod session;
pub mod stream_client;

pub use engine::PlayerEngine;
pub use media_error::MediaErrorKind;
pub use session::{Directive, MediaEvent, PlaybackSession, SessionSnapshot};
pub use stream_client::{ClientHandle, LogStreamClient, StreamClient};
