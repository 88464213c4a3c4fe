//! Application layer
//!
//! - [`winit`]: window, event loop and the per-frame driver
//! - [`controls`]: polled keyboard and mouse mapping onto the render state
//! - [`panel`]: egui overlay windows

pub mod controls;
pub mod panel;
pub mod winit;

pub use controls::{ControlOutcome, Controls, toggle_overlay};
pub use winit::App;
