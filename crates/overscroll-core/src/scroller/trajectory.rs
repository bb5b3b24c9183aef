//! Frame-by-frame recording of a coordinator's motion

use serde::Serialize;

use super::axis::Phase;
use super::coordinator::ScrollCoordinator;
use super::timing::{Clock, ManualClock};
use crate::{Error, Result};

/// State of both axes right after one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    pub t_ms: i64,
    pub x: i32,
    pub y: i32,
    pub velocity: f32,
    pub phase_x: Phase,
    pub phase_y: Phase,
    pub finished: bool,
}

impl FrameSample {
    pub fn capture<C: Clock>(scroller: &ScrollCoordinator<C>, t_ms: i64) -> Self {
        Self {
            t_ms,
            x: scroller.curr_x(),
            y: scroller.curr_y(),
            velocity: scroller.curr_velocity(),
            phase_x: scroller.axis_x().phase(),
            phase_y: scroller.axis_y().phase(),
            finished: scroller.is_finished(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Trajectory {
    pub frames: Vec<FrameSample>,
}

impl Trajectory {
    /// Step a coordinator on its manual clock until it stops
    ///
    /// The first frame is the state before any step. Sampling also stops
    /// after `max_frames` steps.
    pub fn sample(
        scroller: &mut ScrollCoordinator<ManualClock>,
        frame_interval_ms: u64,
        max_frames: usize,
    ) -> Result<Self> {
        if frame_interval_ms == 0 {
            return Err(Error::Other("frame interval must be positive".to_string()));
        }

        let clock = scroller.clock().clone();
        let mut frames = vec![FrameSample::capture(scroller, clock.now_ms())];

        for _ in 0..max_frames {
            clock.advance(frame_interval_ms as i64);
            let moving = scroller.compute_scroll_offset();
            frames.push(FrameSample::capture(scroller, clock.now_ms()));
            if !moving {
                break;
            }
        }

        if frames.last().is_some_and(|f| !f.finished) {
            tracing::debug!(max_frames, "Trajectory sampling hit the frame cap");
        }

        Ok(Self { frames })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&FrameSample> {
        self.frames.last()
    }

    /// Distinct consecutive phases on the x axis
    pub fn phases_x(&self) -> Vec<Phase> {
        Self::phase_sequence(self.frames.iter().map(|f| f.phase_x))
    }

    /// Distinct consecutive phases on the y axis
    pub fn phases_y(&self) -> Vec<Phase> {
        Self::phase_sequence(self.frames.iter().map(|f| f.phase_y))
    }

    fn phase_sequence(phases: impl Iterator<Item = Phase>) -> Vec<Phase> {
        let mut sequence: Vec<Phase> = phases.collect();
        sequence.dedup();
        sequence
    }

    pub fn max_x(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.x).max()
    }

    pub fn min_x(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.x).min()
    }

    pub fn max_y(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.y).max()
    }

    pub fn min_y(&self) -> Option<i32> {
        self.frames.iter().map(|f| f.y).min()
    }
}
