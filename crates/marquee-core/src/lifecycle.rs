//! Host lifecycle coupling
//!
//! The hosting UI reports visibility edges; the controller acquires the
//! player when the UI becomes visible and releases it when hidden. Which
//! edge triggers acquisition is a strategy chosen once at construction from
//! a capability descriptor, not re-derived inside the hooks.

use serde::{Deserialize, Serialize};

/// Lifecycle hooks consumed from the hosting UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The screen became visible
    VisibleStart,
    /// The screen gained foreground focus
    Resumed,
    /// The screen lost foreground focus
    Paused,
    /// The screen is no longer visible
    VisibleStop,
    /// The user is leaving but should keep watching
    UserLeaving,
    /// The host entered or left picture-in-picture mode
    PipModeChanged(bool),
}

/// Capability descriptor for the hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCaps {
    /// The platform can keep a visible-but-unfocused surface alive
    /// (split screen, PiP). Without it the player must not outlive focus.
    pub multi_window: bool,
    /// The platform exposes a PiP feature at all
    pub pip_feature: bool,
}

impl Default for PlatformCaps {
    fn default() -> Self {
        Self {
            multi_window: true,
            pip_feature: true,
        }
    }
}

/// Which visibility edge acquires and releases the player.
///
/// Selected once from [`PlatformCaps`]; lifecycle hooks consult the stored
/// policy instead of branching on platform versions inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStopPolicy {
    /// Acquire on visible-start, release on visible-stop.
    /// Responsive: the player survives brief focus loss.
    Eager,
    /// Acquire on resume, release on pause.
    /// Conservative: frees the decoder as soon as focus is lost.
    Deferred,
}

impl StartStopPolicy {
    pub fn for_caps(caps: &PlatformCaps) -> Self {
        if caps.multi_window {
            StartStopPolicy::Eager
        } else {
            StartStopPolicy::Deferred
        }
    }

    /// This edge acquires the player
    pub fn starts_on(&self, event: HostEvent) -> bool {
        match self {
            StartStopPolicy::Eager => event == HostEvent::VisibleStart,
            StartStopPolicy::Deferred => event == HostEvent::Resumed,
        }
    }

    /// This edge releases the player
    pub fn stops_on(&self, event: HostEvent) -> bool {
        match self {
            StartStopPolicy::Eager => event == HostEvent::VisibleStop,
            StartStopPolicy::Deferred => event == HostEvent::Paused,
        }
    }
}

impl std::fmt::Display for StartStopPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartStopPolicy::Eager => write!(f, "eager"),
            StartStopPolicy::Deferred => write!(f, "deferred"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_caps() {
        let modern = PlatformCaps::default();
        assert_eq!(StartStopPolicy::for_caps(&modern), StartStopPolicy::Eager);

        let legacy = PlatformCaps {
            multi_window: false,
            pip_feature: false,
        };
        assert_eq!(StartStopPolicy::for_caps(&legacy), StartStopPolicy::Deferred);
    }

    #[test]
    fn test_eager_edges() {
        let policy = StartStopPolicy::Eager;
        assert!(policy.starts_on(HostEvent::VisibleStart));
        assert!(!policy.starts_on(HostEvent::Resumed));
        assert!(policy.stops_on(HostEvent::VisibleStop));
        assert!(!policy.stops_on(HostEvent::Paused));
    }

    #[test]
    fn test_deferred_edges() {
        let policy = StartStopPolicy::Deferred;
        assert!(policy.starts_on(HostEvent::Resumed));
        assert!(!policy.starts_on(HostEvent::VisibleStart));
        assert!(policy.stops_on(HostEvent::Paused));
        assert!(!policy.stops_on(HostEvent::VisibleStop));
    }
}
