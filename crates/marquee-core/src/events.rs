//! Session event emission
//!
//! Every externally observable thing the controller does is mirrored as a
//! [`SessionEvent`]. Each event type has exactly one dispatch point inside
//! the controller; observers subscribe through the dispatcher rather than
//! registering per-widget callbacks.

use crate::{
    cast::CastHandoff,
    source::StreamType,
    types::{ExitResult, ResizeMode, SessionId, SessionState},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Session event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A player handle was acquired and the source attached
    Started {
        uri: String,
        stream_type: StreamType,
    },

    /// The `(play_when_ready, state)` pair changed
    StatusChanged {
        play_when_ready: bool,
        state: SessionState,
    },

    /// Decoded video dimensions changed
    VideoSizeChanged { width: u32, height: u32 },

    /// Playback speed selection applied
    SpeedChanged { factor: f32 },

    /// Pinch gesture toggled the fit mode
    ZoomChanged { mode: ResizeMode },

    /// PiP is allowed and supported but the user has not granted it;
    /// the host should raise its permission prompt
    PipPermissionRequired,

    /// A PiP transition was requested from the host
    PipEntered { play_based: bool },

    /// The host entered or left PiP mode
    PipModeChanged { active: bool },

    /// One-shot handoff to a remote cast session
    CastHandoff {
        uri: String,
        position_ms: u64,
        auto_play: bool,
    },

    /// End of stream on a non-looping session; emitted exactly once
    Finished { position_ms: u64 },

    /// The player handle was released
    Stopped { result: ExitResult },
}

impl SessionEvent {
    pub fn cast_handoff(handoff: &CastHandoff) -> Self {
        SessionEvent::CastHandoff {
            uri: handoff.uri.to_string(),
            position_ms: handoff.position_ms,
            auto_play: handoff.auto_play,
        }
    }
}

/// Session event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEventRecord {
    /// Unique event ID
    pub id: Uuid,
    /// Session ID
    pub session_id: SessionId,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Sequence number
    pub sequence: u64,
    /// The event
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Fan-out point for session events
pub struct EventDispatcher {
    session_id: SessionId,
    sequence: RwLock<u64>,
    tx: broadcast::Sender<SessionEventRecord>,
}

impl EventDispatcher {
    pub fn new(session_id: SessionId) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            session_id,
            sequence: RwLock::new(0),
            tx,
        }
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEventRecord> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    pub async fn emit(&self, event: SessionEvent) {
        let mut seq = self.sequence.write().await;
        *seq += 1;

        let record = SessionEventRecord {
            id: Uuid::new_v4(),
            session_id: self.session_id,
            timestamp: Utc::now(),
            sequence: *seq,
            event,
        };

        debug!(session_id = %self.session_id, sequence = record.sequence, event = ?record.event, "Session event");

        // No subscribers is fine
        let _ = self.tx.send(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_are_sequenced() {
        let dispatcher = EventDispatcher::new(SessionId::new());
        let mut rx = dispatcher.subscribe();

        dispatcher
            .emit(SessionEvent::StatusChanged {
                play_when_ready: true,
                state: SessionState::Buffering,
            })
            .await;
        dispatcher
            .emit(SessionEvent::VideoSizeChanged {
                width: 1280,
                height: 720,
            })
            .await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
    }

    #[test]
    fn test_event_serializes_tagged() {
        let record = SessionEvent::Finished { position_ms: 653_000 };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""event":"finished""#));
        assert!(json.contains("653000"));
    }
}
