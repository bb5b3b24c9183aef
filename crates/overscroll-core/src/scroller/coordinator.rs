//! L2 Organism Layer: Two-axis scroll coordinator
//!
//! Owns one [`AxisScroller`] per axis and a clock. In scroll mode both axes
//! follow a shared, eased timeline owned by the coordinator; in fling mode
//! each axis runs its own phase chain independently.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::axis::{AxisScroller, Phase};
use super::interpolator::Interpolator;
use super::timing::{progress, signum, Clock, MonotonicClock};
use crate::config::ScrollerConfig;

/// Default duration (ms) for scripted scrolls
pub const DEFAULT_DURATION: i32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// Time-interpolated move with a synchronized duration on both axes
    Scroll,
    /// Independent per-axis physics
    Fling,
}

/// Two-axis fling and scroll simulator
///
/// Start a motion with `start_scroll`, `fling` or `spring_back`, then call
/// `compute_scroll_offset()` (or `advance(now)`) once per frame and read the
/// current position back.
pub struct ScrollCoordinator<C: Clock = MonotonicClock> {
    x: AxisScroller,
    y: AxisScroller,
    mode: ScrollMode,
    interpolator: Box<dyn Interpolator + Send>,
    flywheel: bool,
    clock: C,
    /// Shared timeline for scroll mode
    scroll_start: i64,
    scroll_duration: i32,
}

impl<C: Clock> fmt::Debug for ScrollCoordinator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("mode", &self.mode)
            .field("flywheel", &self.flywheel)
            .field("scroll_start", &self.scroll_start)
            .field("scroll_duration", &self.scroll_duration)
            .finish_non_exhaustive()
    }
}

impl ScrollCoordinator<MonotonicClock> {
    /// Create a coordinator driven by the process monotonic clock
    pub fn new(config: &ScrollerConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> ScrollCoordinator<C> {
    pub fn with_clock(config: &ScrollerConfig, clock: C) -> Self {
        let ppi = config.ppi();
        Self {
            x: AxisScroller::new(ppi, config.friction),
            y: AxisScroller::new(ppi, config.friction),
            mode: ScrollMode::Scroll,
            interpolator: Box::new(config.interpolator),
            flywheel: config.flywheel,
            clock,
            scroll_start: 0,
            scroll_duration: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace the easing used by scripted scrolls
    pub fn set_interpolator(&mut self, interpolator: impl Interpolator + Send + 'static) {
        self.interpolator = Box::new(interpolator);
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.x.set_friction(friction);
        self.y.set_friction(friction);
    }

    pub fn set_flywheel(&mut self, flywheel: bool) {
        self.flywheel = flywheel;
    }

    pub fn flywheel(&self) -> bool {
        self.flywheel
    }

    #[inline]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn axis_x(&self) -> &AxisScroller {
        &self.x
    }

    pub fn axis_y(&self) -> &AxisScroller {
        &self.y
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.x.is_finished() && self.y.is_finished()
    }

    /// Set both finished flags without moving either axis
    pub fn force_finished(&mut self, finished: bool) {
        self.x.set_finished(finished);
        self.y.set_finished(finished);
    }

    #[inline]
    pub fn curr_x(&self) -> i32 {
        self.x.current()
    }

    #[inline]
    pub fn curr_y(&self) -> i32 {
        self.y.current()
    }

    /// Combined speed of both axes (px/s)
    ///
    /// Also reported in scroll mode, where it holds whatever the last fling left behind.
    pub fn curr_velocity(&self) -> f32 {
        self.x.curr_velocity().hypot(self.y.curr_velocity())
    }

    pub fn start_x(&self) -> i32 {
        self.x.start()
    }

    pub fn start_y(&self) -> i32 {
        self.y.start()
    }

    pub fn final_x(&self) -> i32 {
        self.x.final_position()
    }

    pub fn final_y(&self) -> i32 {
        self.y.final_position()
    }

    pub fn set_final_x(&mut self, x: i32) {
        self.x.set_final_position(x);
    }

    pub fn set_final_y(&mut self, y: i32) {
        self.y.set_final_position(y);
    }

    /// Longest of the two axis durations (ms)
    pub fn duration(&self) -> i32 {
        self.x.duration().max(self.y.duration())
    }

    /// Let the current motion run for `extend` more ms
    pub fn extend_duration(&mut self, extend: i32) {
        let now = self.clock.now_ms();
        self.x.extend_duration(extend, now);
        self.y.extend_duration(extend, now);
        if self.mode == ScrollMode::Scroll {
            self.scroll_duration = ((now - self.scroll_start) as i32).wrapping_add(extend);
        }
    }

    /// Milliseconds since the earlier of the two axes started moving
    pub fn time_passed(&self) -> i32 {
        let start = self.x.start_time().min(self.y.start_time());
        (self.clock.now_ms() - start) as i32
    }

    /// Advance using the owned clock; see [`ScrollCoordinator::advance`]
    pub fn compute_scroll_offset(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.advance(now)
    }

    /// Move both axes to their positions at time `now`
    ///
    /// Returns whether the motion is still going after this step. The frame
    /// that completes a motion already carries the final position.
    pub fn advance(&mut self, now: i64) -> bool {
        if self.is_finished() {
            return false;
        }

        match self.mode {
            ScrollMode::Scroll => {
                let elapsed = now - self.scroll_start;
                if elapsed < self.scroll_duration as i64 {
                    let q = self
                        .interpolator
                        .interpolate(progress(elapsed, self.scroll_duration));
                    self.x.update_scroll(q);
                    self.y.update_scroll(q);
                } else {
                    self.abort_animation();
                }
            }
            ScrollMode::Fling => {
                Self::step_fling(&mut self.x, now);
                Self::step_fling(&mut self.y, now);
            }
        }

        !self.is_finished()
    }

    fn step_fling(axis: &mut AxisScroller, now: i64) {
        if !axis.is_finished() && !axis.update(now) && !axis.continue_when_finished(now) {
            axis.finish();
        }
    }

    /// Scripted scroll with the default duration
    pub fn start_scroll_default(&mut self, start_x: i32, start_y: i32, dx: i32, dy: i32) {
        self.start_scroll(start_x, start_y, dx, dy, DEFAULT_DURATION);
    }

    /// Move by `(dx, dy)` over `duration` ms along the interpolator curve
    pub fn start_scroll(&mut self, start_x: i32, start_y: i32, dx: i32, dy: i32, duration: i32) {
        let now = self.clock.now_ms();
        self.mode = ScrollMode::Scroll;
        self.scroll_start = now;
        self.scroll_duration = duration;
        self.x.start_scroll(start_x, dx, duration, now);
        self.y.start_scroll(start_y, dy, duration, now);
    }

    /// Bring out-of-range content back inside the given bounds
    ///
    /// Returns whether either axis started springing back.
    pub fn spring_back(
        &mut self,
        start_x: i32,
        start_y: i32,
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
    ) -> bool {
        let now = self.clock.now_ms();
        self.mode = ScrollMode::Fling;
        let spring_x = self.x.springback(start_x, min_x, max_x, now);
        let spring_y = self.y.springback(start_y, min_y, max_y, now);
        spring_x || spring_y
    }

    /// Fling without any overshoot allowance
    #[allow(clippy::too_many_arguments)]
    pub fn fling_without_overscroll(
        &mut self,
        start_x: i32,
        start_y: i32,
        velocity_x: i32,
        velocity_y: i32,
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
    ) {
        self.fling(
            start_x, start_y, velocity_x, velocity_y, min_x, max_x, min_y, max_y, 0, 0,
        );
    }

    /// Start a fling on both axes
    ///
    /// With the flywheel enabled, a fling that lands while the previous one is
    /// still running in the same direction on both axes adds the current
    /// velocity to the new one.
    #[allow(clippy::too_many_arguments)]
    pub fn fling(
        &mut self,
        start_x: i32,
        start_y: i32,
        velocity_x: i32,
        velocity_y: i32,
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
        over_x: i32,
        over_y: i32,
    ) {
        let mut velocity_x = velocity_x;
        let mut velocity_y = velocity_y;

        if self.flywheel && !self.is_finished() {
            let old_velocity_x = self.x.curr_velocity();
            let old_velocity_y = self.y.curr_velocity();
            if signum(velocity_x as f32) == signum(old_velocity_x)
                && signum(velocity_y as f32) == signum(old_velocity_y)
            {
                velocity_x = (velocity_x as f32 + old_velocity_x) as i32;
                velocity_y = (velocity_y as f32 + old_velocity_y) as i32;
                tracing::debug!(velocity_x, velocity_y, "Flywheel merged fling velocity");
            }
        }

        let now = self.clock.now_ms();
        self.mode = ScrollMode::Fling;
        self.x.fling(start_x, velocity_x, min_x, max_x, over_x, now);
        self.y.fling(start_y, velocity_y, min_y, max_y, over_y, now);
    }

    /// Content reached a horizontal edge at `final_x` while flinging
    pub fn notify_horizontal_edge_reached(&mut self, start_x: i32, final_x: i32, over_x: i32) {
        let now = self.clock.now_ms();
        self.x.notify_edge_reached(start_x, final_x, over_x, now);
    }

    /// Content reached a vertical edge at `final_y` while flinging
    pub fn notify_vertical_edge_reached(&mut self, start_y: i32, final_y: i32, over_y: i32) {
        let now = self.clock.now_ms();
        self.y.notify_edge_reached(start_y, final_y, over_y, now);
    }

    /// Whether either axis is overshooting or springing back
    pub fn is_over_scrolled(&self) -> bool {
        let edge_phase = |axis: &AxisScroller| {
            !axis.is_finished() && matches!(axis.phase(), Phase::Ballistic | Phase::Cubic)
        };
        edge_phase(&self.x) || edge_phase(&self.y)
    }

    /// Whether a running motion already heads the way of `(xvel, yvel)`
    pub fn is_scrolling_in_direction(&self, xvel: f32, yvel: f32) -> bool {
        let dx = self.x.final_position().wrapping_sub(self.x.start());
        let dy = self.y.final_position().wrapping_sub(self.y.start());
        !self.is_finished() && signum(xvel) == signum(dx as f32) && signum(yvel) == signum(dy as f32)
    }

    /// Jump both axes to their final positions
    pub fn abort_animation(&mut self) {
        self.x.finish();
        self.y.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpolatorKind;
    use crate::scroller::timing::ManualClock;

    fn coordinator(config: ScrollerConfig) -> (ScrollCoordinator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (ScrollCoordinator::with_clock(&config, clock.clone()), clock)
    }

    fn linear_config() -> ScrollerConfig {
        ScrollerConfig {
            interpolator: InterpolatorKind::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_is_finished() {
        let (scroller, _) = coordinator(ScrollerConfig::default());
        assert!(scroller.is_finished());
        assert!(!scroller.is_over_scrolled());
        assert_eq!(scroller.mode(), ScrollMode::Scroll);
    }

    #[test]
    fn test_start_scroll_end_to_end() {
        let (mut scroller, clock) = coordinator(linear_config());
        scroller.start_scroll(0, 0, 100, 0, 250);
        assert_eq!(scroller.mode(), ScrollMode::Scroll);

        assert!(scroller.advance(0));
        assert_eq!((scroller.curr_x(), scroller.curr_y()), (0, 0));

        clock.set(125);
        assert!(scroller.compute_scroll_offset());
        assert!((scroller.curr_x() - 50).abs() <= 1);
        assert_eq!(scroller.curr_y(), 0);

        clock.set(250);
        assert!(!scroller.compute_scroll_offset());
        assert_eq!((scroller.curr_x(), scroller.curr_y()), (100, 0));
        assert!(scroller.is_finished());

        // Finished coordinators stay put
        assert!(!scroller.advance(400));
        assert_eq!(scroller.curr_x(), 100);
    }

    #[test]
    fn test_scripted_scroll_is_not_over_scrolled() {
        let (mut scroller, clock) = coordinator(linear_config());
        scroller.start_scroll(0, 0, 100, 0, 250);
        assert!(!scroller.is_finished());
        assert!(!scroller.is_over_scrolled());

        clock.set(125);
        assert!(scroller.compute_scroll_offset());
        assert!(!scroller.is_over_scrolled());
    }

    #[test]
    fn test_extreme_scroll_wraps_without_panicking() {
        let (mut scroller, clock) = coordinator(linear_config());
        scroller.start_scroll(2_000_000_000, 0, 500_000_000, 0, 250);
        assert_eq!(scroller.final_x(), 2_000_000_000i32.wrapping_add(500_000_000));
        assert!(scroller.is_scrolling_in_direction(-1.0, 0.0));

        clock.set(125);
        assert!(scroller.compute_scroll_offset());
        clock.set(250);
        assert!(!scroller.compute_scroll_offset());
        assert_eq!(scroller.curr_x(), scroller.final_x());
    }

    #[test]
    fn test_extreme_fling_bounds_do_not_panic() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        scroller.fling(i32::MAX - 10, 0, 8000, 0, i32::MIN, i32::MAX, 0, 0, 50, 0);
        scroller.spring_back(i32::MIN, 0, i32::MAX, i32::MAX, 0, 0);
        for _ in 0..200 {
            clock.advance(16);
            if !scroller.compute_scroll_offset() {
                break;
            }
        }
    }

    #[test]
    fn test_start_scroll_default_duration() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.start_scroll_default(10, 20, -10, 30);
        assert_eq!(scroller.duration(), DEFAULT_DURATION);
        assert_eq!(scroller.final_x(), 0);
        assert_eq!(scroller.final_y(), 50);
    }

    #[test]
    fn test_viscous_scroll_reaches_target() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        scroller.start_scroll(0, 0, 0, 300, 200);

        let mut last = 0;
        while scroller.compute_scroll_offset() {
            assert!(scroller.curr_y() >= last);
            last = scroller.curr_y();
            clock.advance(16);
        }
        assert_eq!(scroller.curr_y(), 300);
    }

    #[test]
    fn test_custom_interpolator() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        scroller.set_interpolator(|t: f32| t * t);
        scroller.start_scroll(0, 0, 100, 100, 100);
        clock.set(50);
        scroller.compute_scroll_offset();
        assert_eq!((scroller.curr_x(), scroller.curr_y()), (25, 25));
    }

    #[test]
    fn test_fling_reports_combined_velocity() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 300, 400, -10_000, 10_000, -10_000, 10_000, 0, 0);
        assert_eq!(scroller.mode(), ScrollMode::Fling);
        assert!((scroller.curr_velocity() - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_flywheel_accumulates_velocity() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 2000, 0, 0, 100_000, 0, 0, 0, 0);
        clock.set(32);
        scroller.compute_scroll_offset();
        let carried = scroller.axis_x().curr_velocity();
        assert!(carried > 0.0 && carried < 2000.0);

        scroller.fling(scroller.curr_x(), 0, 1500, 0, 0, 100_000, 0, 0, 0, 0);
        assert_eq!(scroller.axis_x().velocity(), (1500.0 + carried) as i32);
    }

    #[test]
    fn test_flywheel_immediate_refling() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 1000, 0, 0, 100_000, 0, 0, 0, 0);
        scroller.fling(0, 0, 1200, 0, 0, 100_000, 0, 0, 0, 0);
        assert_eq!(scroller.axis_x().velocity(), 2200);
    }

    #[test]
    fn test_flywheel_ignores_reversal() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 1000, 0, -100_000, 100_000, 0, 0, 0, 0);
        scroller.fling(0, 0, -1200, 0, -100_000, 100_000, 0, 0, 0, 0);
        assert_eq!(scroller.axis_x().velocity(), -1200);
    }

    #[test]
    fn test_flywheel_disabled() {
        let config = ScrollerConfig {
            flywheel: false,
            ..Default::default()
        };
        let (mut scroller, _) = coordinator(config);
        assert!(!scroller.flywheel());
        scroller.fling(0, 0, 1000, 0, 0, 100_000, 0, 0, 0, 0);
        scroller.fling(0, 0, 1200, 0, 0, 100_000, 0, 0, 0, 0);
        assert_eq!(scroller.axis_x().velocity(), 1200);
    }

    #[test]
    fn test_flywheel_ignores_finished_fling() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 1000, 0, 0, 100_000, 0, 0, 0, 0);
        scroller.abort_animation();
        scroller.fling(0, 0, 1200, 0, 0, 100_000, 0, 0, 0, 0);
        assert_eq!(scroller.axis_x().velocity(), 1200);
    }

    #[test]
    fn test_spring_back_any_axis() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        assert!(!scroller.spring_back(50, 50, 0, 100, 0, 100));
        assert!(scroller.is_finished());

        assert!(scroller.spring_back(50, 130, 0, 100, 0, 100));
        assert_eq!(scroller.mode(), ScrollMode::Fling);
        assert!(scroller.is_over_scrolled());
        assert_eq!(scroller.final_y(), 100);

        while scroller.compute_scroll_offset() {
            clock.advance(16);
        }
        assert_eq!((scroller.curr_x(), scroller.curr_y()), (50, 100));
    }

    #[test]
    fn test_edge_notification_overscrolls() {
        let (mut scroller, clock) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 0, 3000, 0, 0, 0, 100_000, 0, 0);
        clock.set(48);
        scroller.compute_scroll_offset();
        assert!(!scroller.is_over_scrolled());

        let y = scroller.curr_y();
        scroller.notify_vertical_edge_reached(y, y, 40);
        assert!(scroller.is_over_scrolled());
        assert_eq!(scroller.axis_y().phase(), Phase::Ballistic);

        let mut peak = y;
        while scroller.compute_scroll_offset() {
            peak = peak.max(scroller.curr_y());
            clock.advance(8);
        }
        assert!(peak <= y + 40);
        assert_eq!(scroller.curr_y(), y);
    }

    #[test]
    fn test_horizontal_edge_ignored_outside_spline() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.spring_back(-30, 0, 0, 100, 0, 0);
        let final_x = scroller.final_x();
        scroller.notify_horizontal_edge_reached(-30, -30, 200);
        assert_eq!(scroller.final_x(), final_x);
        assert_eq!(scroller.axis_x().phase(), Phase::Cubic);
    }

    #[test]
    fn test_scrolling_in_direction() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 2000, 0, 0, 100_000, 0, 0, 0, 0);
        assert!(scroller.is_scrolling_in_direction(1.0, 0.0));
        assert!(!scroller.is_scrolling_in_direction(-1.0, 0.0));
        assert!(!scroller.is_scrolling_in_direction(1.0, 1.0));

        scroller.abort_animation();
        assert!(!scroller.is_scrolling_in_direction(1.0, 0.0));
    }

    #[test]
    fn test_force_finished() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 2000, 0, 0, 100_000, 0, 0, 0, 0);
        scroller.force_finished(true);
        assert!(scroller.is_finished());
        // Position is left where it was
        assert_eq!(scroller.curr_x(), 0);
    }

    #[test]
    fn test_velocity_survives_into_scroll_mode() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 600, 800, -10_000, 10_000, -10_000, 10_000, 0, 0);
        scroller.start_scroll(0, 0, 10, 10, 100);
        assert!((scroller.curr_velocity() - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_extend_duration_in_scroll_mode() {
        let (mut scroller, clock) = coordinator(linear_config());
        scroller.start_scroll(0, 0, 100, 0, 100);
        clock.set(50);
        scroller.extend_duration(150);
        assert_eq!(scroller.duration(), 200);

        clock.set(100);
        assert!(scroller.compute_scroll_offset());
        assert_eq!(scroller.curr_x(), 50);
        assert_eq!(scroller.time_passed(), 100);
    }

    #[test]
    fn test_set_final_retargets_scroll() {
        let (mut scroller, clock) = coordinator(linear_config());
        scroller.start_scroll(0, 0, 100, 100, 100);
        scroller.set_final_x(200);
        clock.set(50);
        scroller.compute_scroll_offset();
        assert_eq!(scroller.curr_x(), 100);
        assert_eq!(scroller.curr_y(), 50);
    }

    #[test]
    fn test_set_friction_shortens_fling() {
        let (mut scroller, _) = coordinator(ScrollerConfig::default());
        scroller.fling(0, 0, 2000, 0, 0, 100_000, 0, 0, 0, 0);
        let default_final = scroller.final_x();
        scroller.abort_animation();

        scroller.set_friction(0.05);
        scroller.fling(0, 0, 2000, 0, 0, 100_000, 0, 0, 0, 0);
        assert!(scroller.final_x() < default_final);
    }
}
