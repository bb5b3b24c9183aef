use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroller: ScrollerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Easing curve applied to the time fraction of a scripted scroll.
///
/// Fling, spring-back and overshoot never go through the interpolator; they
/// follow their own kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolatorKind {
    /// Exponential ease-in followed by exponential ease-out
    #[default]
    ViscousFluid,
    Linear,
    /// f(t) = 1 - (1-t)³
    Cubic,
    /// f(t) = 1 - (1-t)⁵
    Quintic,
    /// f(t) = 1 - 2^(-10t)
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollerConfig {
    /// Fling friction coefficient
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Accumulate velocity across overlapping flings in the same direction
    #[serde(default = "default_true")]
    pub flywheel: bool,
    /// Display density; pixels per inch is density * 160
    #[serde(default = "default_density")]
    pub density: f32,
    /// Easing used for scripted scrolls
    #[serde(default)]
    pub interpolator: InterpolatorKind,
    /// Frame interval used when sampling trajectories
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Upper bound on sampled frames per trajectory
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            flywheel: default_true(),
            density: default_density(),
            interpolator: InterpolatorKind::default(),
            frame_interval_ms: default_frame_interval(),
            max_frames: default_max_frames(),
        }
    }
}

impl ScrollerConfig {
    /// Pixels per inch derived from the display density
    pub fn ppi(&self) -> f32 {
        self.density * 160.0
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_friction() -> f32 {
    0.015
}

fn default_density() -> f32 {
    1.0
}

fn default_frame_interval() -> u64 {
    16 // ~60fps
}

fn default_max_frames() -> usize {
    1000
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/overscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("overscroll")
            .join("config.toml")
    }
}
