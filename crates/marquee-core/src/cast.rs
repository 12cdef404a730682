//! Remote cast relay
//!
//! Handoff is one-shot: the controller transfers the source URI, position,
//! and playback intent to the remote relay, then leaves local and remote
//! playback unsynchronized.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// What was handed to the remote relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastHandoff {
    pub uri: Url,
    pub position_ms: u64,
    pub auto_play: bool,
}

/// External service mediating playback handoff to a remote display
#[async_trait]
pub trait CastRelay: Send + Sync {
    /// A remote cast session is currently connected
    fn is_connected(&self) -> bool;

    /// Load the source on the remote device and apply the playback intent
    async fn load_and_play(&self, uri: &Url, position_ms: u64, auto_play: bool) -> Result<()>;
}
