//! Physics-based scroll simulation
//!
//! Tracks scroll position and velocity over time for flings, scripted
//! scrolls, overshoot past content edges and spring-back. Nothing here draws
//! or schedules frames: the host calls into the coordinator once per frame
//! and applies the position it reads back.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `spline` - Precomputed fling deceleration curve and fling distance/duration
//! - `interpolator` - Easing functions for scripted scrolls
//! - `timing` - Clock boundary and numeric helpers
//!
//! ## L3 Molecular Layer
//! - `axis` - Per-axis phase machine (spline, ballistic, cubic, linear)
//!
//! ## L2 Organism Layer
//! - `coordinator` - Two-axis orchestration, scroll/fling modes, flywheel
//! - `trajectory` - Frame-by-frame sampling for offline inspection
//!
//! # Usage
//!
//! ```ignore
//! use overscroll_core::{ScrollCoordinator, ScrollerConfig};
//!
//! let mut scroller = ScrollCoordinator::new(&ScrollerConfig::default());
//!
//! // Fling right at 3000 px/s inside [0, 2000] with 40px of overshoot
//! scroller.fling(0, 0, 3000, 0, 0, 2000, 0, 0, 40, 0);
//!
//! // Once per frame
//! while scroller.compute_scroll_offset() {
//!     apply_offset(scroller.curr_x(), scroller.curr_y());
//! }
//! ```

// L4 Atomic Layer
pub mod interpolator;
pub mod spline;
pub mod timing;

// L3 Molecular Layer
pub mod axis;

// L2 Organism Layer
pub mod coordinator;
pub mod trajectory;

// Re-exports for convenient access
pub use axis::{AxisScroller, Phase};
pub use coordinator::{ScrollCoordinator, ScrollMode, DEFAULT_DURATION};
pub use interpolator::Interpolator;
pub use timing::{Clock, ManualClock, MonotonicClock};
pub use trajectory::{FrameSample, Trajectory};
