use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overscroll_core::AppConfig;

mod commands;

use commands::gesture::Gesture;
use commands::playback::PlaybackOptions;

#[derive(Parser)]
#[command(name = "overscroll")]
#[command(author, version, about = "Simulate fling, scroll and spring-back trajectories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Play the motion back on the wall clock, one line per frame
    #[arg(long, global = true)]
    realtime: bool,

    /// Override display density (ppi = density * 160)
    #[arg(long, global = true)]
    density: Option<f32>,

    /// Override fling friction
    #[arg(long, global = true)]
    friction: Option<f32>,

    /// Disable velocity accumulation across flings
    #[arg(long, global = true)]
    no_flywheel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fling from a position with an initial velocity
    Fling {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        /// Horizontal velocity (px/s)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        vx: i32,
        /// Vertical velocity (px/s)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        vy: i32,
        #[arg(long, default_value_t = i32::MIN, allow_negative_numbers = true)]
        min_x: i32,
        #[arg(long, default_value_t = i32::MAX, allow_negative_numbers = true)]
        max_x: i32,
        #[arg(long, default_value_t = i32::MIN, allow_negative_numbers = true)]
        min_y: i32,
        #[arg(long, default_value_t = i32::MAX, allow_negative_numbers = true)]
        max_y: i32,
        /// Horizontal overshoot allowance (px)
        #[arg(long, default_value_t = 0)]
        over_x: i32,
        /// Vertical overshoot allowance (px)
        #[arg(long, default_value_t = 0)]
        over_y: i32,
    },
    /// Scripted scroll by a fixed offset
    Scroll {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dx: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dy: i32,
        /// Duration in milliseconds
        #[arg(long, default_value_t = overscroll_core::scroller::DEFAULT_DURATION)]
        duration: i32,
    },
    /// Spring back into bounds from an overscrolled position
    SpringBack {
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
        #[arg(long, allow_negative_numbers = true)]
        min_x: i32,
        #[arg(long, allow_negative_numbers = true)]
        max_x: i32,
        #[arg(long, allow_negative_numbers = true)]
        min_y: i32,
        #[arg(long, allow_negative_numbers = true)]
        max_y: i32,
    },
    /// Print the spline lookup tables
    Tables,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Command line overrides
    if let Some(density) = cli.density {
        config.scroller.density = density;
    }
    if let Some(friction) = cli.friction {
        config.scroller.friction = friction;
    }
    if cli.no_flywheel {
        config.scroller.flywheel = false;
    }

    let options = PlaybackOptions {
        json: cli.json,
        realtime: cli.realtime,
    };

    let gesture = match cli.command {
        Commands::Fling {
            x,
            y,
            vx,
            vy,
            min_x,
            max_x,
            min_y,
            max_y,
            over_x,
            over_y,
        } => Gesture::Fling {
            start: (x, y),
            velocity: (vx, vy),
            bounds_x: (min_x, max_x),
            bounds_y: (min_y, max_y),
            over: (over_x, over_y),
        },
        Commands::Scroll {
            x,
            y,
            dx,
            dy,
            duration,
        } => Gesture::Scroll {
            start: (x, y),
            delta: (dx, dy),
            duration,
        },
        Commands::SpringBack {
            x,
            y,
            min_x,
            max_x,
            min_y,
            max_y,
        } => Gesture::SpringBack {
            start: (x, y),
            bounds_x: (min_x, max_x),
            bounds_y: (min_y, max_y),
        },
        Commands::Tables => return commands::tables::run(cli.json),
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init => commands::config::init(),
            };
        }
    };

    commands::playback::run(&gesture, &config.scroller, &options).await
}
