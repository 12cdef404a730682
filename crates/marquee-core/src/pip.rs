//! Picture-in-picture relay
//!
//! The host OS owns the PiP window; the controller derives which play/pause
//! affordance the overlay should show from the current `(play_when_ready,
//! state)` pair and pushes it through this relay on every status change.

use crate::{
    types::{AspectRatio, PlaybackStatus},
    Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The single remote affordance shown on the PiP overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipAction {
    Play,
    Pause,
}

/// Ephemeral view of the PiP overlay affordances.
///
/// Recomputed on every status change, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipActionSet {
    /// Content is playing; the overlay offers Pause
    PlayBased,
    /// Content is paused, buffering, or ended; the overlay offers Play
    PauseBased,
}

impl PipActionSet {
    /// Derive the action set from the current playback status
    pub fn for_status(status: PlaybackStatus) -> Self {
        if status.is_playing() {
            PipActionSet::PlayBased
        } else {
            PipActionSet::PauseBased
        }
    }

    /// The affordance the host overlay should render
    pub fn remote_action(&self) -> PipAction {
        match self {
            PipActionSet::PlayBased => PipAction::Pause,
            PipActionSet::PauseBased => PipAction::Play,
        }
    }

    pub fn is_play_based(&self) -> bool {
        matches!(self, PipActionSet::PlayBased)
    }
}

/// Parameters carried into a PiP transition or action update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipParams {
    /// Aspect ratio from the last-seen video dimensions; None until known
    pub aspect_ratio: Option<AspectRatio>,
    pub actions: PipActionSet,
}

/// Host-side picture-in-picture APIs
#[async_trait]
pub trait PipRelay: Send + Sync {
    /// The platform supports PiP at all
    fn is_supported(&self) -> bool;

    /// The user has granted the PiP permission
    fn is_permitted(&self) -> bool;

    /// Request the transition into PiP mode
    async fn request_pip(&self, params: PipParams) -> Result<()>;

    /// Update the overlay affordances of a current or future PiP window
    async fn set_actions(&self, params: PipParams) -> Result<()>;
}
