//! Simulated playback engine and relays
//!
//! Stands in for the real engine so the controller can be driven headless:
//! the `play` command scripts the status timeline and advances the simulated
//! clock, the controller reacts exactly as it would on-device.

use async_trait::async_trait;
use marquee_core::{
    OrientationMode, PipParams, PipRelay, PlayerBackend, PlayerFactory, PresentationSurface,
    ResizeMode, Result, SourceHandle,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Debug)]
struct SimState {
    position_ms: u64,
    play_when_ready: bool,
    speed: f32,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            position_ms: 0,
            play_when_ready: false,
            speed: 1.0,
        }
    }
}

/// Shared handle onto the simulated engine clock
#[derive(Clone, Default)]
pub struct SimEngine {
    state: Arc<Mutex<SimState>>,
}

impl SimEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulated clock; respects play intent and speed
    pub fn advance(&self, wall_ms: u64) {
        let mut state = self.state.lock().expect("sim state lock poisoned");
        if state.play_when_ready {
            state.position_ms += (wall_ms as f32 * state.speed) as u64;
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.state.lock().expect("sim state lock poisoned").position_ms
    }
}

pub struct SimPlayerFactory {
    engine: SimEngine,
}

impl SimPlayerFactory {
    pub fn new(engine: SimEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PlayerFactory for SimPlayerFactory {
    async fn create(&self) -> Result<Box<dyn PlayerBackend>> {
        Ok(Box::new(SimPlayer {
            engine: self.engine.clone(),
        }))
    }
}

struct SimPlayer {
    engine: SimEngine,
}

#[async_trait]
impl PlayerBackend for SimPlayer {
    async fn attach(&mut self, source: &SourceHandle) -> Result<()> {
        info!(uri = %source.uri, stream_type = %source.stream_type, encrypted = source.is_encrypted(), "sim: source attached");
        Ok(())
    }

    async fn set_play_when_ready(&mut self, play_when_ready: bool) -> Result<()> {
        self.engine
            .state
            .lock()
            .expect("sim state lock poisoned")
            .play_when_ready = play_when_ready;
        Ok(())
    }

    async fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        self.engine
            .state
            .lock()
            .expect("sim state lock poisoned")
            .position_ms = position_ms;
        Ok(())
    }

    async fn set_repeat(&mut self, looping: bool) -> Result<()> {
        debug!(looping, "sim: repeat mode");
        Ok(())
    }

    async fn set_speed(&mut self, factor: f32) -> Result<()> {
        self.engine
            .state
            .lock()
            .expect("sim state lock poisoned")
            .speed = factor;
        Ok(())
    }

    async fn set_scaling(&mut self, mode: ResizeMode) -> Result<()> {
        debug!(mode = %mode, "sim: scaling mode");
        Ok(())
    }

    async fn position_ms(&self) -> u64 {
        self.engine.position_ms()
    }

    async fn release(&mut self) {
        info!("sim: player released");
    }
}

/// Surface that only logs its affordance changes
#[derive(Default)]
pub struct HeadlessSurface;

#[async_trait]
impl PresentationSurface for HeadlessSurface {
    async fn set_progress_visible(&self, visible: bool) {
        debug!(visible, "sim: progress indicator");
    }

    async fn set_controller_visible(&self, visible: bool) {
        debug!(visible, "sim: transport controls");
    }

    async fn set_resize_mode(&self, mode: ResizeMode) {
        debug!(mode = %mode, "sim: resize mode");
    }

    async fn lock_orientation(&self, orientation: OrientationMode) {
        info!(orientation = %orientation, "sim: orientation locked");
    }

    async fn show_caption(&self, text: &str) {
        debug!(text, "sim: caption shown");
    }

    async fn hide_caption(&self) {
        debug!("sim: caption hidden");
    }
}

/// PiP host that always grants the transition
#[derive(Default)]
pub struct SimPipRelay;

#[async_trait]
impl PipRelay for SimPipRelay {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_permitted(&self) -> bool {
        true
    }

    async fn request_pip(&self, params: PipParams) -> Result<()> {
        info!(?params, "sim: pip transition requested");
        Ok(())
    }

    async fn set_actions(&self, params: PipParams) -> Result<()> {
        debug!(?params, "sim: pip actions updated");
        Ok(())
    }
}
