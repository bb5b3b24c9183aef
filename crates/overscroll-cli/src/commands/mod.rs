pub mod config;
pub mod gesture;
pub mod playback;
pub mod tables;
