//! Post-Process State
//!
//! Bloom switch, exposure and the active full-screen filter. Mutated only by
//! the controls, read once per frame by the composite pass.
//!
//! # Filter state machine
//!
//! ```text
//!            I            G             B
//!   None ◄──────► Invert  None ◄──► Greyscale   None ◄──► Blur
//!
//!   Any active filter + another filter's key  ──►  that filter
//! ```
//!
//! Bloom is independent of the filter.

use std::fmt;

/// Full-screen filter applied after tonemapping.
///
/// The discriminant is the `filter_index` uniform read by the composite shader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PostFilter {
    #[default]
    None = 0,
    Invert = 1,
    Greyscale = 2,
    Blur = 3,
}

impl PostFilter {
    /// Transition taken when the key bound to `requested` is pressed.
    #[must_use]
    pub fn toggled(self, requested: PostFilter) -> PostFilter {
        if self == requested { PostFilter::None } else { requested }
    }

    #[inline]
    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for PostFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Invert => "invert",
            Self::Greyscale => "greyscale",
            Self::Blur => "blur",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessState {
    pub bloom_enabled: bool,
    exposure: f32,
    pub filter: PostFilter,
}

impl Default for PostProcessState {
    fn default() -> Self {
        Self {
            bloom_enabled: false,
            exposure: Self::DEFAULT_EXPOSURE,
            filter: PostFilter::None,
        }
    }
}

impl PostProcessState {
    pub const DEFAULT_EXPOSURE: f32 = 0.5;
    /// Exposure change per frame while the adjust key is held.
    pub const EXPOSURE_STEP: f32 = 0.01;

    #[inline]
    #[must_use]
    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Sets the exposure, clamped to be non-negative.
    pub fn set_exposure(&mut self, exposure: f32) {
        self.exposure = exposure.max(0.0);
    }

    pub fn adjust_exposure(&mut self, delta: f32) {
        self.set_exposure(self.exposure + delta);
    }

    pub fn toggle_bloom(&mut self) {
        self.bloom_enabled = !self.bloom_enabled;
        log::info!("bloom: {} | exposure: {:.2}", if self.bloom_enabled { "on" } else { "off" }, self.exposure);
    }

    /// Applies the filter key for `requested`.
    pub fn toggle_filter(&mut self, requested: PostFilter) {
        self.filter = self.filter.toggled(requested);
        log::info!("post filter: {}", self.filter);
    }
}
