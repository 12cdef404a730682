//! Playback configuration
//!
//! A [`PlaybackConfig`] is built by the caller before the session starts and
//! is immutable once constructed. It travels into the player screen as a
//! self-describing serde payload.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Orientation lock requested once at session start.
///
/// The wire encoding also accepts the legacy integer codes 0|1|2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "OrientationRepr")]
pub enum OrientationMode {
    #[default]
    Portrait,
    Landscape,
    /// Follow the device sensor / user preference
    UserChoice,
}

impl OrientationMode {
    /// Legacy integer code used by the inbound payload
    pub fn code(&self) -> u8 {
        match self {
            OrientationMode::Portrait => 0,
            OrientationMode::Landscape => 1,
            OrientationMode::UserChoice => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(OrientationMode::Portrait),
            1 => Some(OrientationMode::Landscape),
            2 => Some(OrientationMode::UserChoice),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrientationMode::Portrait => write!(f, "portrait"),
            OrientationMode::Landscape => write!(f, "landscape"),
            OrientationMode::UserChoice => write!(f, "user_choice"),
        }
    }
}

/// Accepts both `"landscape"` and the legacy `1`
#[derive(Deserialize)]
#[serde(untagged)]
enum OrientationRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<OrientationRepr> for OrientationMode {
    type Error = String;

    fn try_from(repr: OrientationRepr) -> std::result::Result<Self, String> {
        match repr {
            OrientationRepr::Code(code) => OrientationMode::from_code(code)
                .ok_or_else(|| format!("unknown orientation code: {code}")),
            OrientationRepr::Name(name) => match name.as_str() {
                "portrait" => Ok(OrientationMode::Portrait),
                "landscape" => Ok(OrientationMode::Landscape),
                "user_choice" => Ok(OrientationMode::UserChoice),
                other => Err(format!("unknown orientation: {other}")),
            },
        }
    }
}

/// Opaque DRM parameters forwarded to the resolver's encrypted path.
/// License exchange itself is the engine's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmParams {
    /// License server URL
    pub license_url: Url,
    /// Custom headers for license requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl DrmParams {
    pub fn new(license_url: Url) -> Self {
        Self {
            license_url,
            headers: HashMap::new(),
        }
    }

    /// Add a custom header for license requests
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }
}

/// Immutable description of what/how to play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Source URI handed to the resolver
    pub source_uri: Url,
    /// Start playback as soon as the engine is ready
    #[serde(default)]
    pub auto_play: bool,
    /// Restart from the beginning on end of stream
    #[serde(default)]
    pub loop_playback: bool,
    /// Orientation lock applied once at start
    #[serde(default)]
    pub orientation: OrientationMode,
    /// Permit the PiP transition on the user-leaving hint
    #[serde(default)]
    pub allow_pip: bool,
    /// Initial seek position
    #[serde(default)]
    pub start_offset_ms: u64,
    /// Require a protected output path
    #[serde(default)]
    pub secure: bool,
    /// Encrypted-path parameters; None selects the plain path
    #[serde(default)]
    pub drm: Option<DrmParams>,
}

impl PlaybackConfig {
    /// Start building a config for the given source
    pub fn builder(source_uri: Url) -> PlaybackConfigBuilder {
        PlaybackConfigBuilder {
            config: PlaybackConfig::new(source_uri),
        }
    }

    /// Config with defaults: no autoplay, no loop, portrait, PiP off
    pub fn new(source_uri: Url) -> Self {
        Self {
            source_uri,
            auto_play: false,
            loop_playback: false,
            orientation: OrientationMode::Portrait,
            allow_pip: false,
            start_offset_ms: 0,
            secure: false,
            drm: None,
        }
    }

    /// Parse the inbound self-describing payload
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

/// Fluent builder for [`PlaybackConfig`]
pub struct PlaybackConfigBuilder {
    config: PlaybackConfig,
}

impl PlaybackConfigBuilder {
    pub fn auto_play(mut self, auto_play: bool) -> Self {
        self.config.auto_play = auto_play;
        self
    }

    pub fn loop_playback(mut self, loop_playback: bool) -> Self {
        self.config.loop_playback = loop_playback;
        self
    }

    pub fn orientation(mut self, orientation: OrientationMode) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn allow_pip(mut self, allow_pip: bool) -> Self {
        self.config.allow_pip = allow_pip;
        self
    }

    pub fn start_offset_ms(mut self, start_offset_ms: u64) -> Self {
        self.config.start_offset_ms = start_offset_ms;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.config.secure = secure;
        self
    }

    pub fn drm(mut self, drm: DrmParams) -> Self {
        self.config.drm = Some(drm);
        self
    }

    pub fn build(self) -> PlaybackConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let config = PlaybackConfig::builder(uri("https://example.com/video.mp4")).build();
        assert!(!config.auto_play);
        assert!(!config.loop_playback);
        assert_eq!(config.orientation, OrientationMode::Portrait);
        assert!(!config.allow_pip);
        assert_eq!(config.start_offset_ms, 0);
        assert!(config.drm.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = PlaybackConfig::builder(uri("https://example.com/video.m3u8"))
            .auto_play(true)
            .loop_playback(true)
            .orientation(OrientationMode::Landscape)
            .allow_pip(true)
            .start_offset_ms(5000)
            .build();
        assert!(config.auto_play);
        assert!(config.loop_playback);
        assert_eq!(config.orientation, OrientationMode::Landscape);
        assert_eq!(config.start_offset_ms, 5000);
    }

    #[test]
    fn test_payload_with_integer_orientation() {
        let config = PlaybackConfig::from_json(
            r#"{
                "source_uri": "https://example.com/video.mp4",
                "auto_play": true,
                "orientation": 1,
                "allow_pip": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.orientation, OrientationMode::Landscape);
        assert!(config.auto_play);
        assert!(!config.loop_playback);
    }

    #[test]
    fn test_payload_rejects_unknown_orientation() {
        let err = PlaybackConfig::from_json(
            r#"{"source_uri": "https://example.com/v.mp4", "orientation": 7}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_payload_roundtrip() {
        let config = PlaybackConfig::builder(uri("https://example.com/video.mpd"))
            .secure(true)
            .drm(DrmParams::new(uri("https://license.example.com/wv")).with_header("x-token", "abc"))
            .build();
        let json = serde_json::to_string(&config).unwrap();
        let back = PlaybackConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }
}
