//! L4 Atomic Layer: Easing functions for scripted scrolls
//!
//! Maps a time fraction in [0, 1] to a distance fraction in [0, 1]. Only the
//! scroll mode of the coordinator consults an interpolator.

pub use crate::config::InterpolatorKind;

/// Time-fraction to distance-fraction mapping
pub trait Interpolator {
    fn interpolate(&self, t: f32) -> f32;
}

impl<F> Interpolator for F
where
    F: Fn(f32) -> f32,
{
    #[inline]
    fn interpolate(&self, t: f32) -> f32 {
        self(t)
    }
}

impl Interpolator for InterpolatorKind {
    #[inline]
    fn interpolate(&self, t: f32) -> f32 {
        match self {
            InterpolatorKind::ViscousFluid => viscous_fluid_interpolation(t),
            InterpolatorKind::Linear => t,
            InterpolatorKind::Cubic => cubic_ease_out(t),
            InterpolatorKind::Quintic => quintic_ease_out(t),
            InterpolatorKind::EaseOut => exponential_ease_out(t),
        }
    }
}

const VISCOUS_FLUID_SCALE: f32 = 8.0;

fn viscous_fluid(x: f32) -> f32 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        let start = 0.367_879_44; // 1/e
        let x = 1.0 - (1.0 - x).exp();
        start + x * (1.0 - start)
    }
}

/// Viscous fluid curve normalised so that f(1) = 1
fn viscous_fluid_interpolation(t: f32) -> f32 {
    let normalize = 1.0 / viscous_fluid(1.0);
    let offset = 1.0 - normalize * viscous_fluid(1.0);
    let interpolated = normalize * viscous_fluid(t);
    if interpolated > 0.0 {
        interpolated + offset
    } else {
        interpolated
    }
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f32.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InterpolatorKind; 5] = [
        InterpolatorKind::ViscousFluid,
        InterpolatorKind::Linear,
        InterpolatorKind::Cubic,
        InterpolatorKind::Quintic,
        InterpolatorKind::EaseOut,
    ];

    #[test]
    fn test_interpolator_boundaries() {
        for kind in ALL {
            assert!(kind.interpolate(0.0).abs() < 0.001, "{:?} at t=0", kind);
            assert!((kind.interpolate(1.0) - 1.0).abs() < 0.001, "{:?} at t=1", kind);
        }
    }

    #[test]
    fn test_interpolator_monotonic() {
        for kind in ALL {
            let mut prev = 0.0;
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                let v = kind.interpolate(t);
                assert!(v >= prev, "{:?} not monotonic at t={}", kind, t);
                prev = v;
            }
        }
    }

    #[test]
    fn test_viscous_fluid_eases_in() {
        // Slow start: behind linear in the first couple of percent
        assert!(InterpolatorKind::ViscousFluid.interpolate(0.02) < 0.02);
        // Fast finish: ahead of linear by the midpoint
        assert!(InterpolatorKind::ViscousFluid.interpolate(0.5) > 0.5);
    }

    #[test]
    fn test_closure_interpolator() {
        let square = |t: f32| t * t;
        assert!((square.interpolate(0.5) - 0.25).abs() < f32::EPSILON);
    }
}
