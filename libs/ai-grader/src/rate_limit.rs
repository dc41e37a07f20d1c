//! Fixed-window rate limiting for outbound model calls.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Clock abstraction so the limiter can be tested without waiting out
/// real windows.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The system monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Fixed-window rate limiter: at most `capacity` permits per window.
///
/// All state lives in the limiter value. Construct one per client and
/// share it; there is no global window.
pub struct FixedWindowLimiter {
    capacity: u32,
    window: Duration,
    clock: Box<dyn Clock>,
    state: Mutex<WindowState>,
}

struct WindowState {
    window_start: Instant,
    used: u32,
}

impl FixedWindowLimiter {
    /// Create a limiter on the system clock.
    pub fn new(capacity: u32, window: Duration) -> Self {
        FixedWindowLimiter::with_clock(capacity, window, Box::new(SystemClock))
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(capacity: u32, window: Duration, clock: Box<dyn Clock>) -> Self {
        let now = clock.now();
        FixedWindowLimiter {
            capacity: capacity.max(1),
            window,
            clock,
            state: Mutex::new(WindowState { window_start: now, used: 0 }),
        }
    }

    /// Take one permit from the current window.
    ///
    /// When the window is exhausted, returns how long until it resets.
    pub fn try_acquire(&self) -> std::result::Result<(), Duration> {
        let now = self.clock.now();
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.used = 0;
        }
        if state.used < self.capacity {
            state.used += 1;
            Ok(())
        } else {
            Err(self.window - now.duration_since(state.window_start))
        }
    }
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("capacity", &self.capacity)
            .field("window", &self.window)
            .finish()
    }
}
