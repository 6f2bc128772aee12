//! # Arkiv Common Library
//!
//! Shared types for the Arkiv video delivery modules: playback events,
//! error types, CDN configuration, and signed-token generation.
//!
//! The playback service (`arkiv-vp`) and any UI module consuming its SSE
//! feed depend on this crate so event payloads stay in sync.

pub mod config;
pub mod error;
pub mod events;
pub mod token;

pub use config::{CdnConfig, TokenConfig};
pub use error::{Error, Result};
pub use events::{ArkivEvent, EventBus, PlayerPhase};
