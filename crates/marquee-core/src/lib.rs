//! Marquee Core - Video Player Session Controller
//!
//! This crate provides the session layer of a video player screen:
//! - One player handle per visible lifetime, driven by host lifecycle edges
//! - Source classification (progressive/HLS/DASH/smooth-streaming)
//! - Picture-in-picture action sets and transition requests
//! - One-shot cast handoff to a remote relay
//! - Gesture zoom, playback speed, and overlay auto-hide timers
//!
//! The playback engine, adaptive streaming, DRM key exchange, and cast
//! protocol are external collaborators behind trait seams.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       Marquee Core                             │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │    Source    │  │    Player    │  │  Lifecycle   │          │
//! │  │   Resolver   │  │   Backend    │  │   Policy     │          │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘          │
//! │         │                 │                 │                  │
//! │         └─────────────────┼─────────────────┘                  │
//! │                           │                                    │
//! │                    ┌──────┴──────┐                             │
//! │                    │   Session   │                             │
//! │                    │ Controller  │                             │
//! │                    └──────┬──────┘                             │
//! │                           │                                    │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐           │
//! │  │  PiP Relay   │  │    Event    │  │  Cast Relay  │           │
//! │  │   Surface    │  │  Dispatch   │  │              │           │
//! │  └──────────────┘  └─────────────┘  └──────────────┘           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod cast;
pub mod config;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod pip;
pub mod session;
pub mod source;
pub mod surface;
pub mod types;

pub use backend::{PlayerBackend, PlayerEvent, PlayerFactory};
pub use cast::{CastHandoff, CastRelay};
pub use config::{DrmParams, OrientationMode, PlaybackConfig, PlaybackConfigBuilder};
pub use error::{Error, Result};
pub use events::{EventDispatcher, SessionEvent, SessionEventRecord};
pub use lifecycle::{HostEvent, PlatformCaps, StartStopPolicy};
pub use pip::{PipAction, PipActionSet, PipParams, PipRelay};
pub use session::{SessionController, SessionControllerBuilder};
pub use source::{infer_stream_type, MediaSourceResolver, SourceHandle, StreamType, UriSourceResolver};
pub use surface::{OverlayTimer, PresentationSurface};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the session library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Marquee Core initialized");
}
