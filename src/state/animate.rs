//! Frame Clock System - Shared clocks per FPS
//!
//! Drives per-frame animation (the marquee's auto-scroll step) from shared
//! timers. All subscribers at the same FPS share one timer thread.
//!
//! # Pattern
//!
//! - The timer thread only bumps an atomic tick counter
//! - Each [`FrameSubscription`] remembers the last tick it consumed, so two
//!   marquees at the same FPS both see every frame
//! - Timer starts with the first subscriber, stops when the last one is
//!   cancelled or dropped
//!
//! # Example
//!
//! ```ignore
//! use skill_marquee::state::animate::subscribe_to_frames;
//!
//! let mut frames = subscribe_to_frames(30);
//!
//! // In the UI loop
//! for _ in 0..frames.take_pending(4) {
//!     marquee.step();
//! }
//!
//! // Teardown (dropping has the same effect)
//! frames.cancel();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

// =============================================================================
// CLOCK REGISTRY
// =============================================================================

/// Per-FPS clock registry containing shared timer state
struct ClockRegistry {
    /// Thread-safe tick counter written by the timer thread
    ticks: Arc<AtomicU64>,
    /// Background timer thread handle
    handle: Option<JoinHandle<()>>,
    /// Flag to signal timer thread to stop
    running: Arc<AtomicBool>,
    /// Number of active subscribers
    subscribers: usize,
}

thread_local! {
    /// Map from FPS to clock registry
    static CLOCK_REGISTRIES: RefCell<HashMap<u8, ClockRegistry>> = RefCell::new(HashMap::new());
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// A live subscription to the frame clock at one FPS.
///
/// Cancelled on drop.
#[derive(Debug)]
pub struct FrameSubscription {
    fps: u8,
    ticks: Option<Arc<AtomicU64>>,
    seen: u64,
    active: bool,
}

impl FrameSubscription {
    pub fn fps(&self) -> u8 {
        self.fps
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Frames elapsed since the last call, capped at `max`.
    ///
    /// Frames beyond the cap are dropped rather than replayed, so a stalled
    /// UI thread does not fast-forward the animation.
    pub fn take_pending(&mut self, max: u64) -> u64 {
        if !self.active {
            return 0;
        }
        let Some(ticks) = &self.ticks else {
            return 0;
        };
        let now = ticks.load(Ordering::SeqCst);
        let pending = now.saturating_sub(self.seen);
        self.seen = now;
        pending.min(max)
    }

    /// Stop receiving frames. Stops the shared timer if this was the last
    /// subscriber.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if self.ticks.is_none() {
            return;
        }

        let fps = self.fps;
        // The thread-local may already be gone during thread teardown
        let _ = CLOCK_REGISTRIES.try_with(|registries| {
            let mut registries = registries.borrow_mut();
            if let Some(registry) = registries.get_mut(&fps) {
                registry.subscribers = registry.subscribers.saturating_sub(1);

                // Stop timer if no more subscribers
                if registry.subscribers == 0 {
                    registry.running.store(false, Ordering::SeqCst);
                    // Thread exits on its next wake; not joined to avoid blocking
                    registry.handle = None;
                }
            }
        });
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to the frame clock at the given FPS.
///
/// Multiple subscribers at the same FPS share one timer.
///
/// # Arguments
///
/// * `fps` - Frames per second. If 0, the subscription never yields frames
///   and no timer is started.
pub fn subscribe_to_frames(fps: u8) -> FrameSubscription {
    if fps == 0 {
        return FrameSubscription {
            fps,
            ticks: None,
            seen: 0,
            active: true,
        };
    }

    CLOCK_REGISTRIES.with(|registries| {
        let mut registries = registries.borrow_mut();

        let registry = registries.entry(fps).or_insert_with(|| ClockRegistry {
            ticks: Arc::new(AtomicU64::new(0)),
            handle: None,
            running: Arc::new(AtomicBool::new(false)),
            subscribers: 0,
        });

        registry.subscribers += 1;

        // Start timer if first subscriber
        if registry.subscribers == 1 {
            let interval = Duration::from_micros(1_000_000 / fps as u64);
            let ticks = registry.ticks.clone();
            // Fresh flag per thread so an old thread that has not woken yet
            // cannot be revived by a resubscribe.
            let running = Arc::new(AtomicBool::new(true));
            registry.running = running.clone();

            registry.handle = Some(thread::spawn(move || {
                while running.load(Ordering::SeqCst) {
                    thread::sleep(interval);
                    if running.load(Ordering::SeqCst) {
                        ticks.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }));

            tracing::debug!(fps, "frame clock started");
        }

        FrameSubscription {
            fps,
            seen: registry.ticks.load(Ordering::SeqCst),
            ticks: Some(registry.ticks.clone()),
            active: true,
        }
    })
}

/// Check if a frame clock is currently running for the given FPS.
pub fn is_clock_running(fps: u8) -> bool {
    CLOCK_REGISTRIES.with(|registries| {
        let registries = registries.borrow();
        registries
            .get(&fps)
            .map(|r| r.running.load(Ordering::SeqCst) && r.subscribers > 0)
            .unwrap_or(false)
    })
}

/// Get the number of subscribers for a given FPS.
pub fn get_subscriber_count(fps: u8) -> usize {
    CLOCK_REGISTRIES.with(|registries| {
        let registries = registries.borrow();
        registries.get(&fps).map(|r| r.subscribers).unwrap_or(0)
    })
}

/// Reset all clock registries (for testing).
///
/// Stops all timers and clears all registries. Outstanding subscriptions
/// stop yielding frames once their clock is gone.
pub fn reset_clock_registries() {
    CLOCK_REGISTRIES.with(|registries| {
        let mut registries = registries.borrow_mut();

        for registry in registries.values_mut() {
            registry.running.store(false, Ordering::SeqCst);
            registry.subscribers = 0;
        }

        registries.clear();
    });
}

// =============================================================================
// TESTS
// =============================================================================
