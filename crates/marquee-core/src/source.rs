//! Media source resolution
//!
//! Given a URI (and optional encryption parameters) the resolver returns a
//! ready-to-play [`SourceHandle`] and classifies the stream type. The engine
//! consumes the handle as a black box; this module never fetches or parses
//! container data.

use crate::{config::DrmParams, Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// Stream types the resolver can classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    /// Single progressive file (mp4, webm, mkv, ...)
    Progressive,
    Hls,
    Dash,
    SmoothStreaming,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamType::Progressive => write!(f, "progressive"),
            StreamType::Hls => write!(f, "hls"),
            StreamType::Dash => write!(f, "dash"),
            StreamType::SmoothStreaming => write!(f, "smooth-streaming"),
        }
    }
}

/// Classify a source URI by its path
pub fn infer_stream_type(uri: &Url) -> StreamType {
    let path = uri.path().to_lowercase();
    if path.ends_with(".mpd") {
        return StreamType::Dash;
    }
    if path.ends_with(".m3u8") || path.ends_with(".m3u") {
        return StreamType::Hls;
    }
    if path.ends_with(".ism") || path.ends_with(".isml") || path.contains(".ism/") {
        return StreamType::SmoothStreaming;
    }
    StreamType::Progressive
}

/// Ready-to-play source description handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceHandle {
    pub uri: Url,
    pub stream_type: StreamType,
    /// Present iff the encrypted path was selected
    pub drm: Option<DrmParams>,
    /// Protected output required
    pub secure: bool,
}

impl SourceHandle {
    pub fn is_encrypted(&self) -> bool {
        self.drm.is_some()
    }
}

/// External collaborator that turns a URI into a playable source.
///
/// `UnsupportedSourceType` is fatal to session start; there is no retry and
/// the caller must supply a different source.
#[async_trait]
pub trait MediaSourceResolver: Send + Sync {
    async fn resolve(&self, uri: &Url, drm: Option<&DrmParams>) -> Result<SourceHandle>;
}

/// Default resolver: classifies by URI extension and stamps the DRM
/// parameters onto the handle when the encrypted path is selected.
#[derive(Debug, Clone)]
pub struct UriSourceResolver {
    supported: Vec<StreamType>,
}

impl UriSourceResolver {
    /// Resolver accepting every stream type
    pub fn new() -> Self {
        Self {
            supported: vec![
                StreamType::Progressive,
                StreamType::Hls,
                StreamType::Dash,
                StreamType::SmoothStreaming,
            ],
        }
    }

    /// Restrict the resolver to the given stream types
    pub fn with_supported(supported: Vec<StreamType>) -> Self {
        Self { supported }
    }

    fn extension_of(uri: &Url) -> String {
        uri.path()
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

impl Default for UriSourceResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaSourceResolver for UriSourceResolver {
    async fn resolve(&self, uri: &Url, drm: Option<&DrmParams>) -> Result<SourceHandle> {
        let stream_type = infer_stream_type(uri);
        if !self.supported.contains(&stream_type) {
            return Err(Error::UnsupportedSourceType {
                uri: uri.to_string(),
                extension: Self::extension_of(uri),
            });
        }

        tracing::debug!(uri = %uri, stream_type = %stream_type, encrypted = drm.is_some(), "Source resolved");

        Ok(SourceHandle {
            uri: uri.clone(),
            stream_type,
            drm: drm.cloned(),
            secure: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_infer_dash() {
        assert_eq!(
            infer_stream_type(&uri("https://example.com/manifest.mpd")),
            StreamType::Dash
        );
    }

    #[test]
    fn test_infer_hls() {
        assert_eq!(
            infer_stream_type(&uri("https://example.com/master.m3u8")),
            StreamType::Hls
        );
        assert_eq!(
            infer_stream_type(&uri("https://example.com/master.M3U8")),
            StreamType::Hls
        );
    }

    #[test]
    fn test_infer_smooth_streaming() {
        assert_eq!(
            infer_stream_type(&uri("https://example.com/video.ism/Manifest")),
            StreamType::SmoothStreaming
        );
        assert_eq!(
            infer_stream_type(&uri("https://example.com/video.isml")),
            StreamType::SmoothStreaming
        );
    }

    #[test]
    fn test_infer_progressive_fallback() {
        assert_eq!(
            infer_stream_type(&uri("https://example.com/video.mp4")),
            StreamType::Progressive
        );
        assert_eq!(
            infer_stream_type(&uri("https://example.com/no-extension")),
            StreamType::Progressive
        );
    }

    #[tokio::test]
    async fn test_resolver_rejects_unsupported_type() {
        let resolver = UriSourceResolver::with_supported(vec![StreamType::Hls]);
        let err = resolver
            .resolve(&uri("https://example.com/video.mp4"), None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_SOURCE");
    }

    #[tokio::test]
    async fn test_resolver_selects_encrypted_path() {
        let resolver = UriSourceResolver::new();
        let drm = DrmParams::new(uri("https://license.example.com/wv"));
        let handle = resolver
            .resolve(&uri("https://example.com/manifest.mpd"), Some(&drm))
            .await
            .unwrap();
        assert!(handle.is_encrypted());
        assert_eq!(handle.stream_type, StreamType::Dash);

        let plain = resolver
            .resolve(&uri("https://example.com/manifest.mpd"), None)
            .await
            .unwrap();
        assert!(!plain.is_encrypted());
    }
}
