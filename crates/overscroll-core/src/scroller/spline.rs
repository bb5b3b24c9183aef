//! L4 Atomic Layer: Spline deceleration curve
//!
//! The fling curve is a cubic with a single inflexion point. Solving it at
//! runtime is avoided by sampling its inverse once into two lookup tables:
//! `position[i]` is the distance fraction reached at time fraction `i / 100`,
//! `time[i]` is the time fraction at which distance fraction `i / 100` is reached.

use std::sync::OnceLock;

/// Number of intervals in each lookup table (tables hold `NB_SAMPLES + 1` entries)
pub const NB_SAMPLES: usize = 100;

const INFLEXION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLEXION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLEXION);

/// Binary search stops once the curve is this close to the target fraction
const SEARCH_TOLERANCE: f32 = 1e-5;

/// Standard gravity (m/s²)
const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// Look and feel tuning
const PHYSICAL_TUNING: f32 = 0.84;

#[derive(Debug, Clone)]
pub struct SplineTables {
    pub position: [f32; NB_SAMPLES + 1],
    pub time: [f32; NB_SAMPLES + 1],
}

/// Build both lookup tables from scratch
pub fn build_spline_tables() -> SplineTables {
    let mut position = [0.0f32; NB_SAMPLES + 1];
    let mut time = [0.0f32; NB_SAMPLES + 1];

    // Targets increase with i, so each search can start where the last one ended
    let mut x_min = 0.0f32;
    let mut y_min = 0.0f32;

    for i in 0..NB_SAMPLES {
        let alpha = i as f32 / NB_SAMPLES as f32;

        let mut x_max = 1.0f32;
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < SEARCH_TOLERANCE {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        position[i] = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;

        let mut y_max = 1.0f32;
        let (y, coef) = loop {
            let y = y_min + (y_max - y_min) / 2.0;
            let coef = 3.0 * y * (1.0 - y);
            let dy = coef * ((1.0 - y) * START_TENSION + y) + y * y * y;
            if (dy - alpha).abs() < SEARCH_TOLERANCE {
                break (y, coef);
            }
            if dy > alpha {
                y_max = y;
            } else {
                y_min = y;
            }
        };
        time[i] = coef * ((1.0 - y) * P1 + y * P2) + y * y * y;
    }

    position[NB_SAMPLES] = 1.0;
    time[NB_SAMPLES] = 1.0;

    SplineTables { position, time }
}

/// Process-wide tables, built on first use
pub fn tables() -> &'static SplineTables {
    static TABLES: OnceLock<SplineTables> = OnceLock::new();
    TABLES.get_or_init(build_spline_tables)
}

impl SplineTables {
    /// Distance fraction and its slope at time fraction `t`
    ///
    /// Past the last sample the curve is at rest: `(1.0, 0.0)`.
    pub fn sample_position(&self, t: f32) -> (f32, f32) {
        // Saturating cast: negative and NaN land on index 0
        let index = (NB_SAMPLES as f32 * t) as usize;
        if index >= NB_SAMPLES {
            return (1.0, 0.0);
        }

        let t_inf = index as f32 / NB_SAMPLES as f32;
        let t_sup = (index + 1) as f32 / NB_SAMPLES as f32;
        let d_inf = self.position[index];
        let d_sup = self.position[index + 1];
        let velocity_coef = (d_sup - d_inf) / (t_sup - t_inf);
        let distance_coef = d_inf + (t - t_inf) * velocity_coef;

        (distance_coef, velocity_coef)
    }

    /// Time fraction needed to cover distance fraction `x`
    ///
    /// Returns `None` when `x` lies at or beyond the end of the table, in which
    /// case the full duration applies.
    pub fn time_coef(&self, x: f32) -> Option<f32> {
        let index = (NB_SAMPLES as f32 * x) as usize;
        if index >= NB_SAMPLES {
            return None;
        }

        let x_inf = index as f32 / NB_SAMPLES as f32;
        let x_sup = (index + 1) as f32 / NB_SAMPLES as f32;
        let t_inf = self.time[index];
        let t_sup = self.time[index + 1];

        Some(t_inf + (x - x_inf) / (x_sup - x_inf) * (t_sup - t_inf))
    }
}

/// Scale converting friction into pixels for a display with the given ppi
pub fn physical_coeff(ppi: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * ppi * PHYSICAL_TUNING
}

fn deceleration_rate() -> f64 {
    (0.78f64.ln() / 0.9f64.ln()) as f32 as f64
}

/// Log of the normalised fling velocity
///
/// The ratio is taken in single precision and only the logarithm is widened.
fn spline_deceleration(velocity: i32, friction: f32, physical_coeff: f32) -> f64 {
    let ratio = INFLEXION * velocity.unsigned_abs() as f32 / (friction * physical_coeff);
    (ratio as f64).ln()
}

/// Total unsigned distance covered by a fling at `velocity` px/s
pub fn fling_distance(velocity: i32, friction: f32, physical_coeff: f32) -> f64 {
    let l = spline_deceleration(velocity, friction, physical_coeff);
    let rate = deceleration_rate();
    (friction * physical_coeff) as f64 * (rate / (rate - 1.0) * l).exp()
}

/// Time in ms for a fling at `velocity` px/s to come to rest
pub fn fling_duration(velocity: i32, friction: f32, physical_coeff: f32) -> i32 {
    let l = spline_deceleration(velocity, friction, physical_coeff);
    (1000.0 * (l / (deceleration_rate() - 1.0)).exp()) as i32
}
