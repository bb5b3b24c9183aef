//! L3 Molecular Layer: Single-axis scroll simulator
//!
//! An [`AxisScroller`] tracks one scalar position over time. A motion is a
//! chain of phases, each with its own kinematic law:
//!
//! - `Spline`: the main fling decay, read from the precomputed spline tables
//! - `Ballistic`: constant deceleration after the content crossed an edge
//! - `Cubic`: S-curve spring-back onto an edge
//! - `Linear`: scripted scroll, positioned by the caller through [`AxisScroller::update_scroll`]
//!
//! The scroller does not advance on its own. Callers poll [`AxisScroller::update`]
//! once per frame and, when it reports the phase has expired, call
//! [`AxisScroller::continue_when_finished`] to chain into the next phase.

use serde::{Deserialize, Serialize};

use super::spline;
use super::timing::{lerp_i32, round_half_up, signum};

/// Constant deceleration (px/s²) used for overshoot and spring-back
const GRAVITY: f32 = 2000.0;

/// Kinematic law currently driving an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Linear,
    Spline,
    Ballistic,
    Cubic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Linear,
    /// Planned signed displacement and unclamped duration (ms) of the full spline
    Spline { distance: i32, duration: i32 },
    /// Signed deceleration (px/s²), opposing the phase's initial velocity
    Ballistic { deceleration: f32 },
    /// Direction of travel towards the edge
    Cubic { sign: f32 },
}

#[derive(Debug, Clone)]
pub struct AxisScroller {
    start: i32,
    current: i32,
    final_pos: i32,
    /// Velocity at the start of the current phase (px/s)
    velocity: i32,
    /// Instantaneous velocity as of the last update (px/s)
    curr_velocity: f32,
    start_time: i64,
    duration: i32,
    /// Overshoot allowance for edge phases
    over: i32,
    finished: bool,
    motion: Motion,
    friction: f32,
    physical_coeff: f32,
}

/// Deceleration opposing `velocity`
fn deceleration_for(velocity: i32) -> f32 {
    if velocity > 0 {
        -GRAVITY
    } else {
        GRAVITY
    }
}

impl AxisScroller {
    pub fn new(ppi: f32, friction: f32) -> Self {
        Self {
            start: 0,
            current: 0,
            final_pos: 0,
            velocity: 0,
            curr_velocity: 0.0,
            start_time: 0,
            duration: 0,
            over: 0,
            finished: true,
            motion: Motion::Spline {
                distance: 0,
                duration: 0,
            },
            friction,
            physical_coeff: spline::physical_coeff(ppi),
        }
    }

    #[inline]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[inline]
    pub fn start(&self) -> i32 {
        self.start
    }

    #[inline]
    pub fn final_position(&self) -> i32 {
        self.final_pos
    }

    #[inline]
    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    #[inline]
    pub fn curr_velocity(&self) -> f32 {
        self.curr_velocity
    }

    #[inline]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    #[inline]
    pub fn duration(&self) -> i32 {
        self.duration
    }

    #[inline]
    pub fn over(&self) -> i32 {
        self.over
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn phase(&self) -> Phase {
        match self.motion {
            Motion::Linear => Phase::Linear,
            Motion::Spline { .. } => Phase::Spline,
            Motion::Ballistic { .. } => Phase::Ballistic,
            Motion::Cubic { .. } => Phase::Cubic,
        }
    }

    /// Unclamped spline duration, or 0 outside the spline phase
    pub fn spline_duration(&self) -> i32 {
        match self.motion {
            Motion::Spline { duration, .. } => duration,
            _ => 0,
        }
    }

    /// Planned spline displacement, or 0 outside the spline phase
    pub fn spline_distance(&self) -> i32 {
        match self.motion {
            Motion::Spline { distance, .. } => distance,
            _ => 0,
        }
    }

    /// Deceleration of the active edge phase, or 0 during spline and linear motion
    pub fn deceleration(&self) -> f32 {
        match self.motion {
            Motion::Ballistic { deceleration } => deceleration,
            Motion::Cubic { .. } => deceleration_for(self.start.wrapping_sub(self.final_pos)),
            _ => 0.0,
        }
    }

    pub fn set_friction(&mut self, friction: f32) {
        self.friction = friction;
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    /// Begin a scripted move of `distance` px over `duration` ms
    ///
    /// Position is driven by [`AxisScroller::update_scroll`]. The instantaneous
    /// velocity of any earlier fling is left as it was.
    pub fn start_scroll(&mut self, start: i32, distance: i32, duration: i32, now: i64) {
        self.finished = false;
        self.start = start;
        self.current = start;
        self.final_pos = start.wrapping_add(distance);
        self.start_time = now;
        self.duration = duration;
        self.velocity = 0;
        self.motion = Motion::Linear;
    }

    /// Place the axis at eased fraction `q` of a scripted move
    pub fn update_scroll(&mut self, q: f32) {
        self.current = lerp_i32(self.start, self.final_pos, q);
    }

    /// Start a fling from `start` at `velocity` px/s within `[min, max]`
    ///
    /// Content may overshoot the bounds by up to `over` px before springing back.
    pub fn fling(&mut self, start: i32, velocity: i32, min: i32, max: i32, over: i32, now: i64) {
        self.over = over;
        self.finished = false;
        self.velocity = velocity;
        self.curr_velocity = velocity as f32;
        self.duration = 0;
        self.start_time = now;
        self.start = start;
        self.current = start;

        if start > max || start < min {
            self.start_after_edge(start, min, max, velocity, now);
            return;
        }

        let mut spline_duration = 0;
        let mut total_distance = 0.0f64;
        if velocity != 0 {
            spline_duration = spline::fling_duration(velocity, self.friction, self.physical_coeff);
            total_distance = spline::fling_distance(velocity, self.friction, self.physical_coeff);
        }

        let spline_distance = (total_distance * signum(velocity as f32) as f64) as i32;
        self.duration = spline_duration;
        self.final_pos = start.wrapping_add(spline_distance);
        self.motion = Motion::Spline {
            distance: spline_distance,
            duration: spline_duration,
        };

        // Clamp to a valid final position
        if self.final_pos < min {
            self.adjust_duration(start, self.final_pos, min);
            self.final_pos = min;
        }

        if self.final_pos > max {
            self.adjust_duration(start, self.final_pos, max);
            self.final_pos = max;
        }
    }

    /// Spring back into `[min, max]` if `start` lies outside it
    ///
    /// Returns whether a spring-back was started. An in-range `start` leaves
    /// the axis finished at `start`.
    pub fn springback(&mut self, start: i32, min: i32, max: i32, now: i64) -> bool {
        self.finished = true;
        self.start = start;
        self.current = start;
        self.final_pos = start;
        self.velocity = 0;
        self.start_time = now;
        self.duration = 0;

        if start < min {
            self.start_springback(start, min);
        } else if start > max {
            self.start_springback(start, max);
        }

        !self.finished
    }

    /// Tell a flinging axis that content hit an edge at `end`
    ///
    /// Only acts during the spline phase, so repeated notifications for the
    /// same edge are ignored. The overshoot continues from the current
    /// instantaneous velocity.
    pub fn notify_edge_reached(&mut self, start: i32, end: i32, over: i32, now: i64) {
        if let Motion::Spline { .. } = self.motion {
            self.over = over;
            self.start_time = now;
            // Velocity keeps increasing the distance to the edge, so this
            // never restarts a fling
            self.start_after_edge(start, end, end, self.curr_velocity as i32, now);
        }
    }

    /// Recompute position and velocity for time `now`
    ///
    /// Returns false once the active phase has expired (the caller then
    /// decides whether to chain with [`AxisScroller::continue_when_finished`])
    /// or when the axis is finished. At zero elapsed time nothing is computed
    /// and the result only reflects whether the phase has a nonzero duration.
    pub fn update(&mut self, now: i64) -> bool {
        if self.finished {
            return false;
        }

        let current_time = now - self.start_time;

        if current_time == 0 {
            return self.duration > 0;
        }
        if current_time > self.duration as i64 {
            return false;
        }

        let distance = match self.motion {
            Motion::Linear => {
                let total = self.final_pos.wrapping_sub(self.start) as f32;
                let t = current_time as f32 / self.duration as f32;
                self.curr_velocity = total / self.duration as f32 * 1000.0;
                total * t
            }
            Motion::Spline { distance, duration } => {
                let t = current_time as f32 / duration as f32;
                let (distance_coef, velocity_coef) = spline::tables().sample_position(t);
                self.curr_velocity = velocity_coef * distance as f32 / duration as f32 * 1000.0;
                distance_coef * distance as f32
            }
            Motion::Ballistic { deceleration } => {
                let t = current_time as f32 / 1000.0;
                self.curr_velocity = self.velocity as f32 + deceleration * t;
                self.velocity as f32 * t + deceleration * t * t / 2.0
            }
            Motion::Cubic { sign } => {
                let t = current_time as f32 / self.duration as f32;
                let t2 = t * t;
                let over = self.over as f32;
                self.curr_velocity = sign * over * 6.0 * (-t + t2);
                sign * over * (3.0 * t2 - 2.0 * t * t2)
            }
        };

        self.current = self.start.wrapping_add(round_half_up(distance));

        true
    }

    /// Chain into the next phase after the current one expired
    ///
    /// Spline clamped at an edge continues ballistically past it, ballistic
    /// overshoot springs back, everything else ends. Returns whether a new
    /// phase started.
    pub fn continue_when_finished(&mut self, now: i64) -> bool {
        match self.motion {
            Motion::Spline {
                duration: spline_duration,
                ..
            } => {
                if self.duration >= spline_duration {
                    // Normal stop, no need to continue
                    return false;
                }
                // The spline was clamped, so the edge has been reached
                self.start = self.final_pos;
                self.current = self.final_pos;
                self.velocity = self.curr_velocity as i32;
                self.start_time += self.duration as i64;
                self.on_edge_reached(deceleration_for(self.velocity));
                tracing::debug!(
                    edge = self.start,
                    velocity = self.velocity,
                    over = self.over,
                    "Spline reached edge, continuing ballistically"
                );
            }
            Motion::Ballistic { .. } => {
                self.start_time += self.duration as i64;
                self.start_springback(self.final_pos, self.start);
                tracing::debug!(
                    from = self.start,
                    to = self.final_pos,
                    duration_ms = self.duration,
                    "Overshoot apex reached, springing back"
                );
            }
            Motion::Cubic { .. } | Motion::Linear => return false,
        }

        self.update(now);
        true
    }

    /// Jump to the final position and stop
    ///
    /// The last instantaneous velocity is kept for callers that inspect it afterwards.
    pub fn finish(&mut self) {
        self.current = self.final_pos;
        self.finished = true;
    }

    /// Let the current phase run for `extend` more ms from `now`
    pub fn extend_duration(&mut self, extend: i32, now: i64) {
        let elapsed = (now - self.start_time) as i32;
        self.duration = elapsed.wrapping_add(extend);
        self.finished = false;
    }

    /// Retarget the final position of the current motion
    pub fn set_final_position(&mut self, position: i32) {
        self.final_pos = position;
        if let Motion::Spline { duration, .. } = self.motion {
            self.motion = Motion::Spline {
                distance: self.final_pos.wrapping_sub(self.start),
                duration,
            };
        }
        self.finished = false;
    }

    /// Shrink the duration so the spline stops at `new_final` instead of `old_final`
    fn adjust_duration(&mut self, start: i32, old_final: i32, new_final: i32) {
        let old_distance = old_final.wrapping_sub(start);
        let new_distance = new_final.wrapping_sub(start);
        let x = (new_distance as f32 / old_distance as f32).abs();
        if let Some(time_coef) = spline::tables().time_coef(x) {
            self.duration = (self.duration as f32 * time_coef) as i32;
        }
    }

    fn start_springback(&mut self, start: i32, end: i32) {
        self.finished = false;
        self.start = start;
        self.current = start;
        self.final_pos = end;
        let delta = start.wrapping_sub(end);
        let deceleration = deceleration_for(delta);
        self.velocity = delta.wrapping_neg();
        self.over = delta.wrapping_abs();
        self.duration = (1000.0 * (-2.0 * delta as f64 / deceleration as f64).sqrt()) as i32;
        self.motion = Motion::Cubic {
            sign: signum(self.velocity as f32),
        };
    }

    fn start_after_edge(&mut self, start: i32, min: i32, max: i32, velocity: i32, now: i64) {
        if start > min && start < max {
            tracing::warn!(
                start,
                min,
                max,
                "After-edge motion requested from an in-range position"
            );
            self.finished = true;
            return;
        }

        let positive = start > max;
        let edge = if positive { max } else { min };
        let over_distance = start.wrapping_sub(edge);
        let keep_increasing = (over_distance as i64) * (velocity as i64) >= 0;

        if keep_increasing {
            // Will result in a bounce or a to_boundary depending on velocity
            self.start_bounce_after_edge(start, edge, velocity);
        } else {
            let total_distance = spline::fling_distance(velocity, self.friction, self.physical_coeff);
            if total_distance > (over_distance as f64).abs() {
                let (min, max) = if positive { (min, start) } else { (start, max) };
                self.fling(start, velocity, min, max, self.over, now);
            } else {
                self.start_springback(start, edge);
            }
        }
    }

    fn start_bounce_after_edge(&mut self, start: i32, end: i32, velocity: i32) {
        let deceleration = deceleration_for(if velocity == 0 { start.wrapping_sub(end) } else { velocity });
        self.fit_on_bounce_curve(start, end, velocity, deceleration);
        self.on_edge_reached(deceleration);
    }

    /// Rewind to a virtual launch from the edge that passes `start` at `velocity` now
    fn fit_on_bounce_curve(&mut self, start: i32, end: i32, velocity: i32, deceleration: f32) {
        let duration_to_apex = -(velocity as f32) / deceleration;
        let velocity_squared = velocity as f32 * velocity as f32;
        let distance_to_apex = velocity_squared / 2.0 / deceleration.abs();
        let distance_to_edge = end.wrapping_sub(start).wrapping_abs() as f32;
        let total_duration = (2.0 * (distance_to_apex + distance_to_edge) as f64
            / deceleration.abs() as f64)
            .sqrt() as f32;

        self.start_time -= (1000.0 * (total_duration - duration_to_apex)) as i64;
        self.start = end;
        self.current = end;
        self.velocity = (-deceleration * total_duration) as i32;
    }

    /// Enter the ballistic phase from the edge at `start` with `velocity`
    ///
    /// Deceleration is raised when the default would overshoot by more than `over`.
    fn on_edge_reached(&mut self, deceleration: f32) {
        let velocity_squared = self.velocity as f32 * self.velocity as f32;
        let mut distance = velocity_squared / (2.0 * deceleration.abs());
        let sign = signum(self.velocity as f32);
        let mut deceleration = deceleration;

        if distance > self.over as f32 {
            deceleration = -sign * velocity_squared / (2.0 * self.over as f32);
            distance = self.over as f32;
        }

        self.over = distance as i32;
        let offset = if self.velocity > 0 { distance as i32 } else { (distance as i32).wrapping_neg() };
        self.final_pos = self.start.wrapping_add(offset);
        self.duration = ((1000.0 * self.velocity as f32 / deceleration) as i32).wrapping_neg();
        self.motion = Motion::Ballistic { deceleration };
    }
}
