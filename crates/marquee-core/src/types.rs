//! Core types for Marquee

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session state machine states
///
/// Transitions are driven by asynchronous callbacks from the playback
/// engine; the controller never polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No content attached
    Idle,
    /// Engine is filling its buffer
    Buffering,
    /// Ready to render; playing iff play-when-ready is set
    Ready,
    /// End of stream reached
    Ended,
}

impl SessionState {
    /// Check if transition to target state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            // From Idle
            (Idle, Buffering) |
            // From Buffering
            (Buffering, Ready) | (Buffering, Ended) |
            // From Ready
            (Ready, Buffering) | (Ready, Ended) |
            // From Ended (loop restart)
            (Ended, Buffering)
        )
    }

    /// Playback can advance in this state
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Buffering | SessionState::Ready)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Buffering => write!(f, "buffering"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Ended => write!(f, "ended"),
        }
    }
}

/// The `(play_when_ready, state)` pair the engine reports on every change.
/// This is the unit broadcast to status subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub play_when_ready: bool,
    pub state: SessionState,
}

impl PlaybackStatus {
    /// Content is both ready and intended to play
    pub fn is_playing(&self) -> bool {
        self.play_when_ready && self.state == SessionState::Ready
    }
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            play_when_ready: false,
            state: SessionState::Idle,
        }
    }
}

/// Last-seen video dimensions, reported by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Aspect ratio for the PiP window; None until real dimensions arrive
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(AspectRatio {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl std::fmt::Display for VideoSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rational aspect ratio carried into a PiP transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Surface fit mode toggled by the pinch gesture,
/// independent of the session state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Letterbox to the surface
    #[default]
    Fit,
    /// Crop to fill the surface
    Fill,
}

impl ResizeMode {
    pub fn toggled(&self) -> Self {
        match self {
            ResizeMode::Fit => ResizeMode::Fill,
            ResizeMode::Fill => ResizeMode::Fit,
        }
    }
}

impl std::fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeMode::Fit => write!(f, "fit"),
            ResizeMode::Fill => write!(f, "fill"),
        }
    }
}

/// User-selectable playback speed, from a fixed set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackSpeed {
    Half,
    #[default]
    Normal,
    OneAndHalf,
    Double,
}

impl PlaybackSpeed {
    /// All selectable speeds, menu order
    pub const ALL: [PlaybackSpeed; 4] = [
        PlaybackSpeed::Half,
        PlaybackSpeed::Normal,
        PlaybackSpeed::OneAndHalf,
        PlaybackSpeed::Double,
    ];

    /// Absolute rate multiplier applied to the engine
    pub fn factor(&self) -> f32 {
        match self {
            PlaybackSpeed::Half => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::OneAndHalf => 1.5,
            PlaybackSpeed::Double => 2.0,
        }
    }

    /// Map a raw multiplier back into the fixed set
    pub fn from_factor(factor: f32) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.factor() == factor)
    }
}

impl std::fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

/// Returned to the caller when the player screen exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitResult {
    /// Playback position at release time
    pub last_position_ms: u64,
    /// Whether content was actively playing when the session ended
    pub was_playing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        // Valid
        assert!(SessionState::Idle.can_transition_to(SessionState::Buffering));
        assert!(SessionState::Buffering.can_transition_to(SessionState::Ready));
        assert!(SessionState::Ready.can_transition_to(SessionState::Buffering));
        assert!(SessionState::Ready.can_transition_to(SessionState::Ended));
        assert!(SessionState::Buffering.can_transition_to(SessionState::Ended));
        assert!(SessionState::Ended.can_transition_to(SessionState::Buffering));

        // Invalid
        assert!(!SessionState::Idle.can_transition_to(SessionState::Ready));
        assert!(!SessionState::Idle.can_transition_to(SessionState::Ended));
        assert!(!SessionState::Ended.can_transition_to(SessionState::Ready));
        assert!(!SessionState::Ended.can_transition_to(SessionState::Ended));
    }

    #[test]
    fn test_status_is_playing() {
        let playing = PlaybackStatus {
            play_when_ready: true,
            state: SessionState::Ready,
        };
        assert!(playing.is_playing());

        let buffering = PlaybackStatus {
            play_when_ready: true,
            state: SessionState::Buffering,
        };
        assert!(!buffering.is_playing());

        let paused = PlaybackStatus {
            play_when_ready: false,
            state: SessionState::Ready,
        };
        assert!(!paused.is_playing());
    }

    #[test]
    fn test_speed_factors() {
        assert_eq!(PlaybackSpeed::Half.factor(), 0.5);
        assert_eq!(PlaybackSpeed::Double.factor(), 2.0);
        assert_eq!(PlaybackSpeed::from_factor(1.5), Some(PlaybackSpeed::OneAndHalf));
        assert_eq!(PlaybackSpeed::from_factor(1.25), None);
    }

    #[test]
    fn test_aspect_ratio_requires_dimensions() {
        assert!(VideoSize::default().aspect_ratio().is_none());
        let ratio = VideoSize::new(1920, 1080).aspect_ratio();
        assert_eq!(
            ratio,
            Some(AspectRatio {
                width: 1920,
                height: 1080
            })
        );
    }

    #[test]
    fn test_resize_mode_toggle() {
        assert_eq!(ResizeMode::Fit.toggled(), ResizeMode::Fill);
        assert_eq!(ResizeMode::Fill.toggled(), ResizeMode::Fit);
    }
}
