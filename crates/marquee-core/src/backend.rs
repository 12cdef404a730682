//! Playback engine seam
//!
//! The engine performs its own asynchronous I/O and decoding and reports
//! progress through [`PlayerEvent`] callbacks delivered on the controller's
//! task. The controller only ever drives it through this trait.

use crate::{source::SourceHandle, types::ResizeMode, Result, SessionState};
use async_trait::async_trait;

/// Asynchronous callbacks from the playback engine.
///
/// Delivered to [`SessionController::on_player_event`](crate::SessionController::on_player_event);
/// the controller never polls the engine for state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The `(play_when_ready, state)` pair changed
    StatusChanged {
        play_when_ready: bool,
        state: SessionState,
    },
    /// Decoded video dimensions became known or changed
    VideoSizeChanged { width: u32, height: u32 },
}

/// One instance of the external playback engine.
///
/// Exactly one live handle exists per controller; it is created by a
/// [`PlayerFactory`] on acquisition and dropped after [`release`](Self::release).
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    /// Bind a resolved source to the engine
    async fn attach(&mut self, source: &SourceHandle) -> Result<()>;

    /// Set the play/pause intent; takes effect once the engine is ready
    async fn set_play_when_ready(&mut self, play_when_ready: bool) -> Result<()>;

    /// Seek to an absolute position
    async fn seek_to(&mut self, position_ms: u64) -> Result<()>;

    /// Restart from the beginning on end of stream
    async fn set_repeat(&mut self, looping: bool) -> Result<()>;

    /// Absolute rate multiplier
    async fn set_speed(&mut self, factor: f32) -> Result<()>;

    /// Video scaling on the output surface
    async fn set_scaling(&mut self, mode: ResizeMode) -> Result<()>;

    /// Current playback position
    async fn position_ms(&self) -> u64;

    /// Tear the engine down; the handle is dead afterwards
    async fn release(&mut self);
}

/// Constructs one engine instance per acquisition.
///
/// A failure here is a `PlayerInit` error: the session stays Idle and the
/// failure is reported upward without retry.
#[async_trait]
pub trait PlayerFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn PlayerBackend>>;
}
