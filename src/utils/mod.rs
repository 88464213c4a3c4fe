//! Utility Module
//!
//! - [`time`]: frame clock providing `deltaTime`, elapsed time and FPS

pub mod time;

pub use time::Timer;
