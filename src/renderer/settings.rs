//! Renderer Settings
//!
//! Configuration consumed once at startup to create the window, the GPU context
//! and the fixed-size render targets.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lumen::renderer::settings::RendererSettings;
//!
//! // Defaults: 800x600, vsync, 10 blur iterations
//! let settings = RendererSettings::default();
//!
//! // Or best-effort from JSON, falling back to defaults
//! let settings = RendererSettings::load_or_default("resources/settings.json");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Result;

/// GPU adapter selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    /// Prefer discrete / dedicated GPU
    #[default]
    HighPerformance,
    /// Prefer integrated GPU (better battery life)
    LowPower,
}

impl From<PowerMode> for wgpu::PowerPreference {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::HighPerformance => wgpu::PowerPreference::HighPerformance,
            PowerMode::LowPower => wgpu::PowerPreference::LowPower,
        }
    }
}

/// Global configuration for renderer initialization.
///
/// # Fields
///
/// | Field              | Description                                  | Default                        |
/// |--------------------|----------------------------------------------|--------------------------------|
/// | `title`            | Window title                                 | `"Lumen"`                      |
/// | `width`/`height`   | Window and render target size                | 800 × 600                      |
/// | `vsync`            | Vertical sync enabled                        | `true`                         |
/// | `power_mode`       | GPU adapter selection strategy               | `HighPerformance`              |
/// | `blur_iterations`  | Ping-pong blur passes per frame              | 10                             |
/// | `bright_threshold` | Luminance above which color feeds the bloom  | 1.0                            |
/// | `resource_root`    | Directory holding models and textures        | `resources`                    |
/// | `state_file`       | Persisted program state                      | `resources/program_state.txt`  |
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub power_mode: PowerMode,

    /// Number of single-axis blur passes. Even counts leave the result in
    /// ping-pong target 0.
    pub blur_iterations: u32,
    pub bright_threshold: f32,

    pub resource_root: PathBuf,
    pub state_file: PathBuf,

    #[serde(skip, default = "default_depth_format")]
    pub depth_format: wgpu::TextureFormat,
}

fn default_depth_format() -> wgpu::TextureFormat {
    wgpu::TextureFormat::Depth32Float
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            title: "Lumen".into(),
            width: 800,
            height: 600,
            vsync: true,
            power_mode: PowerMode::default(),
            blur_iterations: 10,
            bright_threshold: 1.0,
            resource_root: PathBuf::from("resources"),
            state_file: PathBuf::from("resources/program_state.txt"),
            depth_format: default_depth_format(),
        }
    }
}

impl RendererSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Loads settings from `path`, falling back to defaults when the file is
    /// absent or malformed.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let Ok(source) = std::fs::read_to_string(path) else {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        };

        match Self::from_json(&source) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Resolves an asset path against the resource root.
    #[must_use]
    pub fn resource(&self, relative: &str) -> PathBuf {
        self.resource_root.join(relative)
    }

    /// Aspect ratio of the fixed render size.
    #[inline]
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    #[inline]
    #[must_use]
    pub fn power_preference(&self) -> wgpu::PowerPreference {
        self.power_mode.into()
    }
}
