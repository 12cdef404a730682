//! Presentation surface and overlay timers
//!
//! The on-screen view the controller attaches the player to, plus the
//! overlay widgets it toggles. The surface is a collaborator; the controller
//! only flips its affordances and never draws.

use crate::types::ResizeMode;
use crate::OrientationMode;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Host view consumed by the controller
#[async_trait]
pub trait PresentationSurface: Send + Sync {
    /// Spinner shown while the engine buffers
    async fn set_progress_visible(&self, visible: bool);

    /// Transport controls overlay; hidden while in PiP
    async fn set_controller_visible(&self, visible: bool);

    /// Fit/fill mode after a pinch gesture
    async fn set_resize_mode(&self, mode: ResizeMode);

    /// Orientation lock, applied once at session start
    async fn lock_orientation(&self, orientation: OrientationMode);

    /// Transient caption (e.g. "Zoomed to fill"); auto-hidden by the
    /// controller's overlay timer
    async fn show_caption(&self, text: &str);

    async fn hide_caption(&self);
}

/// Scoped auto-hide timer owned by the controller.
///
/// Scheduling replaces any pending deadline. The timer is cancelled
/// deterministically on teardown so a late callback never fires against a
/// destroyed surface.
pub struct OverlayTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl OverlayTimer {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Run `fut` after `delay`, replacing any pending schedule
    pub fn schedule<F>(&self, delay: Duration, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await;
        });
        let mut pending = self.pending.lock().expect("overlay timer lock poisoned");
        if let Some(prev) = pending.replace(handle) {
            prev.abort();
        }
    }

    /// Drop the pending schedule, if any
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().expect("overlay timer lock poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    /// A schedule is pending and has not fired yet
    pub fn is_scheduled(&self) -> bool {
        let pending = self.pending.lock().expect("overlay timer lock poisoned");
        pending.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Default for OverlayTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OverlayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_timer_fires_once() {
        let fired = Arc::new(AtomicU32::new(0));
        let timer = OverlayTimer::new();

        let f = fired.clone();
        timer.schedule(Duration::from_millis(10), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.is_scheduled());
    }

    #[tokio::test]
    async fn test_reschedule_replaces_pending() {
        let fired = Arc::new(AtomicU32::new(0));
        let timer = OverlayTimer::new();

        for _ in 0..3 {
            let f = fired.clone();
            timer.schedule(Duration::from_millis(20), async move {
                f.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicU32::new(0));
        let timer = OverlayTimer::new();

        let f = fired.clone();
        timer.schedule(Duration::from_millis(20), async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        timer.cancel();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!timer.is_scheduled());
    }
}
