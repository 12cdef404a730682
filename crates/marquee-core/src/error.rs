//! Error types for Marquee Core

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Session error types
#[derive(Error, Debug)]
pub enum Error {
    // Source errors
    #[error("Unsupported source type for {uri} (extension: {extension})")]
    UnsupportedSourceType { uri: String, extension: String },

    #[error("Invalid source URI: {0}")]
    InvalidSourceUri(String),

    // Player errors
    #[error("Player initialization failed: {0}")]
    PlayerInit(String),

    #[error("Invalid session state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("A player handle is already live; stop the session first")]
    SessionActive,

    // Permission errors
    #[error("Permission denied: {permission}")]
    PermissionDenied { permission: String },

    // Relay errors
    #[error("Picture-in-picture request rejected: {0}")]
    PipRequest(String),

    #[error("No connected cast session")]
    CastUnavailable,

    #[error("Cast handoff failed: {0}")]
    CastHandoff(String),

    // Configuration errors
    #[error("Playback speed {0} is not in the supported set")]
    InvalidSpeed(f32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a permission error
    pub fn permission(permission: impl Into<String>) -> Self {
        Error::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Returns true if this error is recoverable by user action
    /// (re-invoke the triggering action after resolving the prompt)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PermissionDenied { .. } | Error::CastUnavailable
        )
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnsupportedSourceType { .. } => "UNSUPPORTED_SOURCE",
            Error::InvalidSourceUri(_) => "INVALID_URI",
            Error::PlayerInit(_) => "PLAYER_INIT",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
            Error::SessionActive => "SESSION_ACTIVE",
            Error::PermissionDenied { .. } => "PERMISSION_DENIED",
            Error::PipRequest(_) => "PIP_REQUEST",
            Error::CastUnavailable => "CAST_UNAVAILABLE",
            Error::CastHandoff(_) => "CAST_HANDOFF",
            Error::InvalidSpeed(_) => "INVALID_SPEED",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::permission("picture-in-picture").is_recoverable());
        assert!(Error::CastUnavailable.is_recoverable());
        assert!(!Error::PlayerInit("no decoder".into()).is_recoverable());
        assert!(!Error::UnsupportedSourceType {
            uri: "rtmp://example/live".into(),
            extension: "".into(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_codes_stable() {
        assert_eq!(Error::SessionActive.error_code(), "SESSION_ACTIVE");
        assert_eq!(Error::InvalidSpeed(3.0).error_code(), "INVALID_SPEED");
    }
}
