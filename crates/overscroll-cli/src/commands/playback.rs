use std::time::Duration;

use anyhow::Result;
use tracing::info;

use overscroll_core::{
    Clock, FrameSample, ManualClock, MonotonicClock, ScrollCoordinator, ScrollerConfig, Trajectory,
};

use super::gesture::Gesture;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackOptions {
    pub json: bool,
    pub realtime: bool,
}

pub async fn run(gesture: &Gesture, config: &ScrollerConfig, options: &PlaybackOptions) -> Result<()> {
    if options.realtime {
        realtime(gesture, config, options).await
    } else {
        offline(gesture, config, options)
    }
}

/// Run a gesture to completion on a virtual clock
fn simulate(gesture: &Gesture, config: &ScrollerConfig) -> Result<Trajectory> {
    let mut scroller = ScrollCoordinator::with_clock(config, ManualClock::new());

    if !gesture.start(&mut scroller) {
        info!("Nothing to animate, content is already in bounds");
    }

    Ok(Trajectory::sample(&mut scroller, config.frame_interval_ms, config.max_frames)?)
}

/// Simulate on a virtual clock and print the whole trajectory
fn offline(gesture: &Gesture, config: &ScrollerConfig, options: &PlaybackOptions) -> Result<()> {
    let trajectory = simulate(gesture, config)?;

    if options.json {
        println!("{}", trajectory.to_json()?);
        return Ok(());
    }

    print_header();
    for frame in &trajectory.frames {
        print_frame(frame);
    }
    println!(
        "\n{} frames, x range {}..={}, y range {}..={}",
        trajectory.len(),
        trajectory.min_x().unwrap_or_default(),
        trajectory.max_x().unwrap_or_default(),
        trajectory.min_y().unwrap_or_default(),
        trajectory.max_y().unwrap_or_default(),
    );

    Ok(())
}

/// Drive the coordinator from the wall clock at the configured frame rate
async fn realtime(gesture: &Gesture, config: &ScrollerConfig, options: &PlaybackOptions) -> Result<()> {
    let clock = MonotonicClock::new();
    let mut scroller = ScrollCoordinator::with_clock(config, clock);

    if !gesture.start(&mut scroller) {
        info!("Nothing to animate, content is already in bounds");
    }

    let frame_interval = Duration::from_millis(config.frame_interval_ms.max(1));
    let mut ticker = tokio::time::interval(frame_interval);

    if !options.json {
        print_header();
    }

    for _ in 0..config.max_frames {
        ticker.tick().await;
        let moving = scroller.compute_scroll_offset();
        let frame = FrameSample::capture(&scroller, clock.now_ms());

        if options.json {
            println!("{}", serde_json::to_string(&frame)?);
        } else {
            print_frame(&frame);
        }

        if !moving {
            break;
        }
    }

    Ok(())
}

fn print_header() {
    println!(
        "{:>7}  {:>8}  {:>8}  {:>10}  {:<9}  {:<9}",
        "t(ms)", "x", "y", "velocity", "phase x", "phase y"
    );
}

fn print_frame(frame: &FrameSample) {
    println!("{}", format_frame(frame));
}

fn format_frame(frame: &FrameSample) -> String {
    format!(
        "{:>7}  {:>8}  {:>8}  {:>10.1}  {:<9}  {:<9}",
        frame.t_ms,
        frame.x,
        frame.y,
        frame.velocity,
        format!("{:?}", frame.phase_x).to_lowercase(),
        format!("{:?}", frame.phase_y).to_lowercase(),
    )
}
