//! Typing Debounce
//!
//! Sends `typing: true` when a burst of keystrokes starts and `typing:
//! false` once the idle window elapses with no further keystroke. Exactly
//! one idle timer is armed at a time; each keystroke restarts it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::protocol::OutboundEvent;
use crate::session::ChatSession;

/// Debounced typing-indicator state for the compose input
pub struct TypingTracker {
    /// True between the first keystroke of a burst and the idle timeout
    active: Arc<AtomicBool>,
    idle_timer: Option<JoinHandle<()>>,
    idle_window: Duration,
}

impl TypingTracker {
    pub fn new(idle_window: Duration) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(false)),
            idle_timer: None,
            idle_window,
        }
    }

    /// Record a keystroke
    ///
    /// Emits `typing: true` on the idle-to-typing transition and restarts
    /// the idle timer; the timer emits `typing: false` when it lapses.
    pub fn keystroke<S: ChatSession>(&mut self, session: &S) {
        if !self.active.swap(true, Ordering::SeqCst) {
            session.send(OutboundEvent::Typing { is_typing: true });
        }

        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }

        let active = Arc::clone(&self.active);
        let session = session.clone();
        // Anchor the idle deadline at the keystroke, not at the spawned
        // task's first poll, so the window is exactly `idle_window` from now.
        let deadline = tokio::time::Instant::now() + self.idle_window;
        self.idle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            active.store(false, Ordering::SeqCst);
            session.send(OutboundEvent::Typing { is_typing: false });
        }));
    }

    /// Drop any pending timer without emitting a frame
    ///
    /// Used when navigating away; the old room's indicator dies with its
    /// session.
    pub fn reset(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for TypingTracker {
    fn drop(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.abort();
        }
    }
}
