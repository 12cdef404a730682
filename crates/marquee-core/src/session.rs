//! Session controller - owner of the player lifecycle
//!
//! Coordinates:
//! - Player acquisition/release on host visibility edges
//! - Source resolution and attachment
//! - State machine transitions from engine callbacks
//! - PiP action-set recomputation and handoff
//! - One-shot cast handoff
//! - Gesture zoom, playback speed, overlay timers

use crate::{
    backend::{PlayerBackend, PlayerEvent, PlayerFactory},
    cast::{CastHandoff, CastRelay},
    config::PlaybackConfig,
    events::{EventDispatcher, SessionEvent, SessionEventRecord},
    lifecycle::{HostEvent, PlatformCaps, StartStopPolicy},
    pip::{PipActionSet, PipParams, PipRelay},
    source::{MediaSourceResolver, SourceHandle},
    surface::{OverlayTimer, PresentationSurface},
    types::{ExitResult, PlaybackSpeed, PlaybackStatus, ResizeMode, SessionId, SessionState, VideoSize},
    Error, Result,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// How long the zoom caption stays up before the overlay timer hides it
const CAPTION_HIDE_DELAY: Duration = Duration::from_millis(1500);

/// Builder wiring the controller's collaborators.
///
/// The cast relay, PiP relay, and platform capabilities are optional wiring;
/// a controller without a cast relay simply reports `CastUnavailable` from
/// the cast affordance.
pub struct SessionControllerBuilder {
    factory: Arc<dyn PlayerFactory>,
    resolver: Arc<dyn MediaSourceResolver>,
    surface: Arc<dyn PresentationSurface>,
    pip: Option<Arc<dyn PipRelay>>,
    cast: Option<Arc<dyn CastRelay>>,
    caps: PlatformCaps,
}

impl SessionControllerBuilder {
    pub fn new(
        factory: Arc<dyn PlayerFactory>,
        resolver: Arc<dyn MediaSourceResolver>,
        surface: Arc<dyn PresentationSurface>,
    ) -> Self {
        Self {
            factory,
            resolver,
            surface,
            pip: None,
            cast: None,
            caps: PlatformCaps::default(),
        }
    }

    pub fn with_pip_relay(mut self, relay: Arc<dyn PipRelay>) -> Self {
        self.pip = Some(relay);
        self
    }

    pub fn with_cast_relay(mut self, relay: Arc<dyn CastRelay>) -> Self {
        self.cast = Some(relay);
        self
    }

    pub fn with_platform_caps(mut self, caps: PlatformCaps) -> Self {
        self.caps = caps;
        self
    }

    pub fn build(self) -> SessionController {
        let id = SessionId::new();
        let policy = StartStopPolicy::for_caps(&self.caps);
        let (status_tx, _) = watch::channel(PlaybackStatus::default());

        info!(session_id = %id, policy = %policy, "Session controller created");

        SessionController {
            id,
            policy,
            caps: self.caps,
            factory: self.factory,
            resolver: self.resolver,
            surface: self.surface,
            pip: self.pip,
            cast: self.cast,
            player: Mutex::new(None),
            config: RwLock::new(None),
            status: RwLock::new(PlaybackStatus::default()),
            status_tx,
            video_size: RwLock::new(VideoSize::default()),
            resize_mode: RwLock::new(ResizeMode::Fit),
            speed: RwLock::new(PlaybackSpeed::Normal),
            finished: RwLock::new(false),
            in_pip: RwLock::new(false),
            last_exit: RwLock::new(None),
            caption_timer: OverlayTimer::new(),
            events: EventDispatcher::new(id),
        }
    }
}

/// Controller owning one player instance per visible lifetime
pub struct SessionController {
    id: SessionId,
    /// Start/stop edge strategy, fixed at construction
    policy: StartStopPolicy,
    caps: PlatformCaps,
    factory: Arc<dyn PlayerFactory>,
    resolver: Arc<dyn MediaSourceResolver>,
    surface: Arc<dyn PresentationSurface>,
    pip: Option<Arc<dyn PipRelay>>,
    cast: Option<Arc<dyn CastRelay>>,
    /// The single player slot. The mutex serializes acquisition and release
    /// so a stop racing a start never targets a half-constructed handle.
    player: Mutex<Option<Box<dyn PlayerBackend>>>,
    config: RwLock<Option<PlaybackConfig>>,
    status: RwLock<PlaybackStatus>,
    status_tx: watch::Sender<PlaybackStatus>,
    video_size: RwLock<VideoSize>,
    resize_mode: RwLock<ResizeMode>,
    speed: RwLock<PlaybackSpeed>,
    /// Latch: a non-looping session finishes exactly once
    finished: RwLock<bool>,
    in_pip: RwLock<bool>,
    last_exit: RwLock<Option<ExitResult>>,
    caption_timer: OverlayTimer,
    events: EventDispatcher,
}

impl SessionController {
    pub fn builder(
        factory: Arc<dyn PlayerFactory>,
        resolver: Arc<dyn MediaSourceResolver>,
        surface: Arc<dyn PresentationSurface>,
    ) -> SessionControllerBuilder {
        SessionControllerBuilder::new(factory, resolver, surface)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn policy(&self) -> StartStopPolicy {
        self.policy
    }

    /// Current `(play_when_ready, state)` pair
    pub async fn status(&self) -> PlaybackStatus {
        *self.status.read().await
    }

    pub async fn state(&self) -> SessionState {
        self.status.read().await.state
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> watch::Receiver<PlaybackStatus> {
        self.status_tx.subscribe()
    }

    /// Subscribe to the session event stream
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<SessionEventRecord> {
        self.events.subscribe()
    }

    pub async fn config(&self) -> Option<PlaybackConfig> {
        self.config.read().await.clone()
    }

    pub async fn speed(&self) -> PlaybackSpeed {
        *self.speed.read().await
    }

    pub async fn resize_mode(&self) -> ResizeMode {
        *self.resize_mode.read().await
    }

    pub async fn video_size(&self) -> VideoSize {
        *self.video_size.read().await
    }

    pub async fn is_in_pip(&self) -> bool {
        *self.in_pip.read().await
    }

    /// Result captured at the most recent release
    pub async fn exit_result(&self) -> Option<ExitResult> {
        *self.last_exit.read().await
    }

    /// Current playback position; falls back to the last captured exit
    /// position once the handle is released
    pub async fn position_ms(&self) -> u64 {
        let slot = self.player.lock().await;
        match slot.as_ref() {
            Some(player) => player.position_ms().await,
            None => self
                .last_exit
                .read()
                .await
                .as_ref()
                .map(|r| r.last_position_ms)
                .unwrap_or(0),
        }
    }

    /// Bind a config and acquire the player.
    ///
    /// Fails fast on an unrecognized stream type; on engine construction
    /// failure the session stays Idle and the error is reported upward.
    #[instrument(skip(self, config))]
    pub async fn start(&self, config: PlaybackConfig) -> Result<()> {
        let mut slot = self.player.lock().await;
        if slot.is_some() {
            return Err(Error::SessionActive);
        }
        *self.config.write().await = Some(config.clone());
        self.acquire_into(&mut slot, &config).await
    }

    /// Release the player handle and capture the exit result.
    ///
    /// Idempotent: a second call is a no-op and returns None.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Option<ExitResult> {
        self.release().await
    }

    /// Route a host lifecycle hook through the start/stop policy
    #[instrument(skip(self))]
    pub async fn handle_host_event(&self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::UserLeaving => match self.enter_pip().await {
                Ok(entered) => {
                    if entered {
                        debug!("Entered PiP on user-leaving hint");
                    }
                    Ok(())
                }
                // Not granted yet: stay on screen, the host prompts
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "PiP transition unavailable");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            HostEvent::PipModeChanged(active) => {
                *self.in_pip.write().await = active;
                self.surface.set_controller_visible(!active).await;
                self.events
                    .emit(SessionEvent::PipModeChanged { active })
                    .await;
                Ok(())
            }
            event if self.policy.starts_on(event) => self.acquire().await,
            event if self.policy.stops_on(event) => {
                self.release().await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Engine callback entry point; the controller never polls
    pub async fn on_player_event(&self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::StatusChanged {
                play_when_ready,
                state,
            } => self.apply_engine_status(play_when_ready, state).await,
            PlayerEvent::VideoSizeChanged { width, height } => {
                *self.video_size.write().await = VideoSize::new(width, height);
                self.events
                    .emit(SessionEvent::VideoSizeChanged { width, height })
                    .await;
                Ok(())
            }
        }
    }

    /// Apply the user's play/pause intent (transport button or the PiP
    /// overlay's remote action)
    pub async fn set_play_when_ready(&self, play_when_ready: bool) -> Result<()> {
        let mut slot = self.player.lock().await;
        if let Some(player) = slot.as_mut() {
            player.set_play_when_ready(play_when_ready).await?;
        }
        drop(slot);

        let current = *self.status.read().await;
        if current.state != SessionState::Idle {
            self.set_status(PlaybackStatus {
                play_when_ready,
                state: current.state,
            })
            .await;
        }
        Ok(())
    }

    /// Select a playback speed from the fixed set.
    ///
    /// Idempotent: re-selecting the current speed applies nothing.
    #[instrument(skip(self))]
    pub async fn set_speed(&self, speed: PlaybackSpeed) -> Result<()> {
        if *self.speed.read().await == speed {
            debug!(speed = %speed, "Speed unchanged");
            return Ok(());
        }

        let mut slot = self.player.lock().await;
        if let Some(player) = slot.as_mut() {
            player.set_speed(speed.factor()).await?;
        }
        drop(slot);

        *self.speed.write().await = speed;
        self.events
            .emit(SessionEvent::SpeedChanged {
                factor: speed.factor(),
            })
            .await;
        Ok(())
    }

    /// Select a speed by raw multiplier; rejects values outside the fixed set
    pub async fn set_speed_factor(&self, factor: f32) -> Result<()> {
        let speed = PlaybackSpeed::from_factor(factor).ok_or(Error::InvalidSpeed(factor))?;
        self.set_speed(speed).await
    }

    /// Pinch gesture: toggle Fit/Fill, independent of the state machine
    pub async fn toggle_zoom(&self) -> Result<ResizeMode> {
        let mode = self.resize_mode.read().await.toggled();

        let mut slot = self.player.lock().await;
        if let Some(player) = slot.as_mut() {
            player.set_scaling(mode).await?;
        }
        drop(slot);

        *self.resize_mode.write().await = mode;
        self.surface.set_resize_mode(mode).await;

        let caption = match mode {
            ResizeMode::Fill => "Zoomed to fill",
            ResizeMode::Fit => "Original",
        };
        self.surface.show_caption(caption).await;
        let surface = Arc::clone(&self.surface);
        self.caption_timer.schedule(CAPTION_HIDE_DELAY, async move {
            surface.hide_caption().await;
        });

        self.events.emit(SessionEvent::ZoomChanged { mode }).await;
        Ok(mode)
    }

    /// Request the PiP transition with the current aspect ratio and action
    /// set. Returns Ok(false) when PiP is not allowed/supported here, and
    /// `PermissionDenied` when supported but not yet granted.
    pub async fn enter_pip(&self) -> Result<bool> {
        let allow_pip = self
            .config
            .read()
            .await
            .as_ref()
            .map(|c| c.allow_pip)
            .unwrap_or(false);
        if !allow_pip {
            return Ok(false);
        }
        let Some(pip) = &self.pip else {
            return Ok(false);
        };
        if !self.caps.pip_feature || !pip.is_supported() {
            return Ok(false);
        }
        if !pip.is_permitted() {
            return Err(Error::permission("picture-in-picture"));
        }

        let status = *self.status.read().await;
        let actions = PipActionSet::for_status(status);
        let params = PipParams {
            aspect_ratio: self.video_size.read().await.aspect_ratio(),
            actions,
        };
        pip.request_pip(params).await?;

        info!(play_based = actions.is_play_based(), "PiP transition requested");
        self.events
            .emit(SessionEvent::PipEntered {
                play_based: actions.is_play_based(),
            })
            .await;
        Ok(true)
    }

    /// One-shot handoff to the remote cast session; pauses local playback
    /// and does not keep the two in sync afterwards
    #[instrument(skip(self))]
    pub async fn cast_handoff(&self) -> Result<CastHandoff> {
        let relay = self.cast.as_ref().ok_or(Error::CastUnavailable)?;
        if !relay.is_connected() {
            return Err(Error::CastUnavailable);
        }
        let config = self
            .config
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::InvalidConfig("cast handoff requires a bound config".into()))?;

        let position_ms = self.position_ms().await;
        let auto_play = self.status.read().await.play_when_ready;
        relay
            .load_and_play(&config.source_uri, position_ms, auto_play)
            .await?;

        self.set_play_when_ready(false).await?;

        let handoff = CastHandoff {
            uri: config.source_uri.clone(),
            position_ms,
            auto_play,
        };
        info!(uri = %handoff.uri, position_ms, "Cast handoff complete");
        self.events.emit(SessionEvent::cast_handoff(&handoff)).await;
        Ok(handoff)
    }

    /// Lifecycle re-entry: acquire using the bound config. No-op when a
    /// handle is already live or no config is bound yet.
    async fn acquire(&self) -> Result<()> {
        let mut slot = self.player.lock().await;
        if slot.is_some() {
            debug!("Player already live; skipping acquisition");
            return Ok(());
        }
        let config = match self.config.read().await.clone() {
            Some(config) => config,
            None => {
                debug!("No config bound; nothing to acquire");
                return Ok(());
            }
        };
        self.acquire_into(&mut slot, &config).await
    }

    /// Construct, resolve, and attach under the slot lock. The handle only
    /// lands in the slot fully prepared; a failed preparation releases it
    /// before the error propagates.
    async fn acquire_into(
        &self,
        slot: &mut Option<Box<dyn PlayerBackend>>,
        config: &PlaybackConfig,
    ) -> Result<()> {
        info!(uri = %config.source_uri, "Acquiring player");

        let mut source = self
            .resolver
            .resolve(&config.source_uri, config.drm.as_ref())
            .await?;
        source.secure = config.secure;

        let mut player = self.factory.create().await?;
        if let Err(e) = self.prepare(player.as_mut(), config, &source).await {
            player.release().await;
            return Err(e);
        }

        *self.finished.write().await = false;
        *self.video_size.write().await = VideoSize::default();
        *self.resize_mode.write().await = ResizeMode::Fit;
        *self.speed.write().await = PlaybackSpeed::Normal;

        self.surface.lock_orientation(config.orientation).await;

        *slot = Some(player);

        if config.allow_pip {
            if let Some(pip) = &self.pip {
                if self.caps.pip_feature && pip.is_supported() && !pip.is_permitted() {
                    self.events.emit(SessionEvent::PipPermissionRequired).await;
                }
            }
        }

        self.events
            .emit(SessionEvent::Started {
                uri: config.source_uri.to_string(),
                stream_type: source.stream_type,
            })
            .await;
        Ok(())
    }

    async fn prepare(
        &self,
        player: &mut dyn PlayerBackend,
        config: &PlaybackConfig,
        source: &SourceHandle,
    ) -> Result<()> {
        player.attach(source).await?;
        if config.start_offset_ms > 0 {
            player.seek_to(config.start_offset_ms).await?;
        }
        player.set_repeat(config.loop_playback).await?;
        player.set_play_when_ready(config.auto_play).await?;
        Ok(())
    }

    async fn release(&self) -> Option<ExitResult> {
        let mut slot = self.player.lock().await;
        let mut player = slot.take()?;

        let last_position_ms = player.position_ms().await;
        let status = *self.status.read().await;
        player.release().await;
        drop(slot);

        self.caption_timer.cancel();
        self.surface.hide_caption().await;
        self.surface.set_progress_visible(false).await;

        let result = ExitResult {
            last_position_ms,
            was_playing: status.play_when_ready && status.state.is_active(),
        };

        // Release is not a state-machine transition; force Idle
        let idle = PlaybackStatus::default();
        *self.status.write().await = idle;
        let _ = self.status_tx.send(idle);

        *self.last_exit.write().await = Some(result);
        info!(position_ms = last_position_ms, was_playing = result.was_playing, "Player released");
        self.events.emit(SessionEvent::Stopped { result }).await;
        Some(result)
    }

    /// Apply an engine-reported `(play_when_ready, state)` pair
    async fn apply_engine_status(&self, play_when_ready: bool, state: SessionState) -> Result<()> {
        let current = *self.status.read().await;
        if current.play_when_ready == play_when_ready && current.state == state {
            return Ok(());
        }
        // Duplicate end-of-stream callbacks carry an equal state and fall
        // through; anything else off the state machine is rejected
        if state != current.state && !current.state.can_transition_to(state) {
            return Err(Error::InvalidStateTransition {
                from: current.state.to_string(),
                to: state.to_string(),
            });
        }

        if state == SessionState::Ended {
            let looping = self
                .config
                .read()
                .await
                .as_ref()
                .map(|c| c.loop_playback)
                .unwrap_or(false);
            if looping {
                self.set_status(PlaybackStatus {
                    play_when_ready,
                    state: SessionState::Ended,
                })
                .await;
                return self.restart_from_top(play_when_ready).await;
            }
        }

        self.set_status(PlaybackStatus {
            play_when_ready,
            state,
        })
        .await;

        if state == SessionState::Ended {
            let mut finished = self.finished.write().await;
            if !*finished {
                *finished = true;
                drop(finished);
                let position_ms = self.position_ms().await;
                info!(position_ms, "Stream ended; finishing screen");
                self.events
                    .emit(SessionEvent::Finished { position_ms })
                    .await;
            }
        }
        Ok(())
    }

    /// Loop restart: absorb end of stream and re-enter the buffering loop
    /// with the playback intent preserved
    async fn restart_from_top(&self, play_when_ready: bool) -> Result<()> {
        let mut slot = self.player.lock().await;
        if let Some(player) = slot.as_mut() {
            player.seek_to(0).await?;
        }
        drop(slot);

        debug!("Loop restart");
        self.set_status(PlaybackStatus {
            play_when_ready,
            state: SessionState::Buffering,
        })
        .await;
        Ok(())
    }

    /// The single dispatch point for status changes: store, broadcast, and
    /// recompute every UI affordance derived from `(play_when_ready, state)`
    async fn set_status(&self, status: PlaybackStatus) {
        let previous = {
            let mut guard = self.status.write().await;
            std::mem::replace(&mut *guard, status)
        };
        if previous == status {
            return;
        }

        let _ = self.status_tx.send(status);
        info!(
            play_when_ready = status.play_when_ready,
            from = %previous.state,
            to = %status.state,
            "Status change"
        );

        self.surface
            .set_progress_visible(status.state == SessionState::Buffering)
            .await;
        if *self.in_pip.read().await {
            self.surface.set_controller_visible(false).await;
        }
        self.push_pip_actions(status).await;

        self.events
            .emit(SessionEvent::StatusChanged {
                play_when_ready: status.play_when_ready,
                state: status.state,
            })
            .await;
    }

    /// Push the recomputed action set to the host, iff PiP is supported and
    /// currently permitted
    async fn push_pip_actions(&self, status: PlaybackStatus) {
        let Some(pip) = &self.pip else { return };
        if !self.caps.pip_feature || !pip.is_supported() || !pip.is_permitted() {
            return;
        }

        let params = PipParams {
            aspect_ratio: self.video_size.read().await.aspect_ratio(),
            actions: PipActionSet::for_status(status),
        };
        if let Err(e) = pip.set_actions(params).await {
            warn!(error = %e, "Failed to push PiP actions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UriSourceResolver;
    use async_trait::async_trait;
    use url::Url;

    struct StubSurface;

    #[async_trait]
    impl PresentationSurface for StubSurface {
        async fn set_progress_visible(&self, _visible: bool) {}
        async fn set_controller_visible(&self, _visible: bool) {}
        async fn set_resize_mode(&self, _mode: ResizeMode) {}
        async fn lock_orientation(&self, _orientation: crate::OrientationMode) {}
        async fn show_caption(&self, _text: &str) {}
        async fn hide_caption(&self) {}
    }

    struct StubPlayer;

    #[async_trait]
    impl PlayerBackend for StubPlayer {
        async fn attach(&mut self, _source: &SourceHandle) -> Result<()> {
            Ok(())
        }
        async fn set_play_when_ready(&mut self, _play_when_ready: bool) -> Result<()> {
            Ok(())
        }
        async fn seek_to(&mut self, _position_ms: u64) -> Result<()> {
            Ok(())
        }
        async fn set_repeat(&mut self, _looping: bool) -> Result<()> {
            Ok(())
        }
        async fn set_speed(&mut self, _factor: f32) -> Result<()> {
            Ok(())
        }
        async fn set_scaling(&mut self, _mode: ResizeMode) -> Result<()> {
            Ok(())
        }
        async fn position_ms(&self) -> u64 {
            0
        }
        async fn release(&mut self) {}
    }

    struct StubFactory;

    #[async_trait]
    impl PlayerFactory for StubFactory {
        async fn create(&self) -> Result<Box<dyn PlayerBackend>> {
            Ok(Box::new(StubPlayer))
        }
    }

    fn controller() -> SessionController {
        SessionController::builder(
            Arc::new(StubFactory),
            Arc::new(UriSourceResolver::new()),
            Arc::new(StubSurface),
        )
        .build()
    }

    #[tokio::test]
    async fn test_controller_starts_idle() {
        let controller = controller();
        assert_eq!(controller.state().await, SessionState::Idle);
        assert!(controller.exit_result().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let controller = controller();
        assert!(controller.stop().await.is_none());
        assert_eq!(controller.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let controller = controller();
        let config =
            PlaybackConfig::builder(Url::parse("https://example.com/video.mp4").unwrap()).build();
        controller.start(config.clone()).await.unwrap();

        let err = controller.start(config).await.unwrap_err();
        assert_eq!(err.error_code(), "SESSION_ACTIVE");
    }

    #[tokio::test]
    async fn test_policy_fixed_at_construction() {
        let legacy = SessionController::builder(
            Arc::new(StubFactory),
            Arc::new(UriSourceResolver::new()),
            Arc::new(StubSurface),
        )
        .with_platform_caps(PlatformCaps {
            multi_window: false,
            pip_feature: false,
        })
        .build();
        assert_eq!(legacy.policy(), StartStopPolicy::Deferred);
        assert_eq!(controller().policy(), StartStopPolicy::Eager);
    }
}
