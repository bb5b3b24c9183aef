//! L4 Atomic Layer: Time source and small numeric helpers shared by the scrollers
//!
//! All scroller time is measured in whole milliseconds on a monotonic clock.
//! The clock is the only way the simulator learns about wall time; it never
//! sleeps or schedules anything itself.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Milliseconds elapsed since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_ms(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// Settable clock for tests and offline sampling
///
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(ms)),
        }
    }

    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::Relaxed);
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// Fraction of `duration_ms` covered by `elapsed_ms`
///
/// Not clamped; a zero duration counts as complete.
#[inline]
pub fn progress(elapsed_ms: i64, duration_ms: i32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    elapsed_ms as f32 / duration_ms as f32
}

/// Round half towards positive infinity
#[inline]
pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Linear interpolation between two pixel positions
#[inline]
pub fn lerp_i32(from: i32, to: i32, q: f32) -> i32 {
    from.wrapping_add(round_half_up(q * to.wrapping_sub(from) as f32))
}

/// Sign of `value` as -1, 0 or 1
///
/// Unlike `f32::signum`, zero maps to zero.
#[inline]
pub fn signum(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::starting_at(10);
        let handle = clock.clone();
        handle.advance(16);
        assert_eq!(clock.now_ms(), 26);
        clock.set(100);
        assert_eq!(handle.now_ms(), 100);
    }

    #[test]
    fn test_progress() {
        assert!((progress(125, 250) - 0.5).abs() < 0.001);
        assert!((progress(0, 0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_i32() {
        assert_eq!(lerp_i32(0, 100, 0.0), 0);
        assert_eq!(lerp_i32(0, 100, 0.5), 50);
        assert_eq!(lerp_i32(0, 100, 1.0), 100);
        assert_eq!(lerp_i32(100, 0, 0.25), 75);
        assert_eq!(lerp_i32(i32::MAX, i32::MIN, 0.0), i32::MAX);
        assert_eq!(lerp_i32(2_000_000_000, -2_000_000_000, 1.0), -2_000_000_000);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn test_signum_zero() {
        assert_eq!(signum(0.0), 0.0);
        assert_eq!(signum(-0.0), 0.0);
        assert_eq!(signum(3.0), 1.0);
        assert_eq!(signum(-0.1), -1.0);
    }
}
