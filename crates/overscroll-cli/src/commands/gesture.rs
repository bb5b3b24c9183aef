use overscroll_core::{Clock, ScrollCoordinator};

/// Motion requested on the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Fling {
        start: (i32, i32),
        velocity: (i32, i32),
        bounds_x: (i32, i32),
        bounds_y: (i32, i32),
        over: (i32, i32),
    },
    Scroll {
        start: (i32, i32),
        delta: (i32, i32),
        duration: i32,
    },
    SpringBack {
        start: (i32, i32),
        bounds_x: (i32, i32),
        bounds_y: (i32, i32),
    },
}

impl Gesture {
    /// Kick off the motion on a coordinator
    ///
    /// Returns false when there is nothing to animate.
    pub fn start<C: Clock>(&self, scroller: &mut ScrollCoordinator<C>) -> bool {
        match *self {
            Gesture::Fling {
                start,
                velocity,
                bounds_x,
                bounds_y,
                over,
            } => {
                scroller.fling(
                    start.0, start.1, velocity.0, velocity.1, bounds_x.0, bounds_x.1, bounds_y.0,
                    bounds_y.1, over.0, over.1,
                );
                true
            }
            Gesture::Scroll {
                start,
                delta,
                duration,
            } => {
                scroller.start_scroll(start.0, start.1, delta.0, delta.1, duration);
                true
            }
            Gesture::SpringBack {
                start,
                bounds_x,
                bounds_y,
            } => scroller.spring_back(
                start.0, start.1, bounds_x.0, bounds_x.1, bounds_y.0, bounds_y.1,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overscroll_core::{ManualClock, ScrollerConfig};

    #[test]
    fn test_spring_back_in_bounds_has_nothing_to_do() {
        let mut scroller = ScrollCoordinator::with_clock(&ScrollerConfig::default(), ManualClock::new());
        let gesture = Gesture::SpringBack {
            start: (10, 10),
            bounds_x: (0, 100),
            bounds_y: (0, 100),
        };
        assert!(!gesture.start(&mut scroller));
        assert!(scroller.is_finished());
    }

    #[test]
    fn test_fling_starts_motion() {
        let mut scroller = ScrollCoordinator::with_clock(&ScrollerConfig::default(), ManualClock::new());
        let gesture = Gesture::Fling {
            start: (0, 0),
            velocity: (0, -1500),
            bounds_x: (0, 0),
            bounds_y: (-5000, 0),
            over: (0, 20),
        };
        assert!(gesture.start(&mut scroller));
        assert!(!scroller.is_finished());
        assert!(scroller.final_y() < 0);
    }
}
