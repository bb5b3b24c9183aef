pub mod config;
pub mod error;
pub mod scroller;

pub use config::{AppConfig, InterpolatorKind, ScrollerConfig};
pub use error::{Error, Result};
pub use scroller::{
    AxisScroller, Clock, FrameSample, ManualClock, MonotonicClock, Phase, ScrollCoordinator,
    ScrollMode, Trajectory,
};
