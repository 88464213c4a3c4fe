//! Error Types
//!
//! This module defines the error types used throughout the renderer.
//!
//! # Overview
//!
//! The main error type [`LumenError`] covers all failure modes including:
//! - GPU, surface and window initialization failures (fatal at startup)
//! - Framebuffer completeness failures (fatal at startup)
//! - Asset loading and decoding errors (recovered by the loaders)
//! - State file and configuration parsing errors (recovered by the callers)
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, LumenError>`.
//!
//! ```rust,ignore
//! use lumen::errors::{LumenError, Result};
//!
//! fn build_targets() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// The main error type for the renderer.
#[derive(Error, Debug)]
pub enum LumenError {
    // ========================================================================
    // GPU & Window Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create a presentation surface for the window.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The adapter cannot present to the window surface.
    #[error("Surface not supported by adapter")]
    SurfaceUnsupported,

    /// Window creation failed.
    #[error("Failed to create window: {0}")]
    WindowCreateFailed(#[from] winit::error::OsError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Framebuffer & Registry Errors
    // ========================================================================
    /// A render target failed its completeness check at creation.
    #[error("Framebuffer '{target}' is incomplete: {reason}")]
    IncompleteFramebuffer {
        /// Label of the offending render target
        target: String,
        /// What made the target incomplete
        reason: IncompleteReason,
    },

    /// A texture handle does not resolve to a live texture.
    #[error("Texture not found in registry: {0}")]
    TextureNotFound(String),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),

    /// Cube map validation error.
    #[error("Cube map error: {0}")]
    CubeMapError(String),

    /// OBJ model loading error.
    #[error("Model load error: {0}")]
    ModelLoadError(String),

    // ========================================================================
    // Shader Errors
    // ========================================================================
    /// Shader template lookup or rendering failed.
    #[error("Shader template error: {0}")]
    ShaderTemplateError(String),

    // ========================================================================
    // State & Configuration Errors
    // ========================================================================
    /// A persisted state field could not be parsed.
    #[error("State parse error at field '{field}': {value:?}")]
    StateParseError {
        /// Name of the field being read
        field: &'static str,
        /// The raw token that failed to parse
        value: String,
    },

    /// Renderer settings could not be decoded.
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reason a render target failed its completeness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteReason {
    /// Fewer or more color textures were bound than the target declares.
    AttachmentCountMismatch { declared: usize, bound: usize },
    /// The target declares more color outputs than the device can write at once.
    TooManyColorAttachments { requested: usize, max: u32 },
    /// A color attachment format cannot be rendered to.
    UnsupportedColorFormat { slot: usize, format: wgpu::TextureFormat },
    /// A bound texture does not match the declared attachment format.
    FormatMismatch {
        slot: usize,
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },
    /// A bound texture is not the size of the target.
    SizeMismatch {
        slot: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// The target requires a depth buffer but none was bound.
    MissingDepthAttachment,
    /// A depth buffer was bound to a target that does not declare one.
    UnexpectedDepthAttachment,
    /// The depth format cannot be used as a depth attachment.
    UnsupportedDepthFormat(wgpu::TextureFormat),
    /// The target has zero width or height.
    ZeroSized,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttachmentCountMismatch { declared, bound } => {
                write!(f, "declares {declared} color attachments but {bound} bound")
            }
            Self::TooManyColorAttachments { requested, max } => {
                write!(f, "{requested} color attachments exceed device limit {max}")
            }
            Self::UnsupportedColorFormat { slot, format } => {
                write!(f, "attachment {slot} format {format:?} is not renderable")
            }
            Self::FormatMismatch {
                slot,
                expected,
                actual,
            } => write!(f, "attachment {slot} expects {expected:?}, got {actual:?}"),
            Self::SizeMismatch {
                slot,
                expected,
                actual,
            } => write!(
                f,
                "attachment {slot} is {}x{}, target is {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::MissingDepthAttachment => write!(f, "depth attachment missing"),
            Self::UnexpectedDepthAttachment => write!(f, "depth attachment not declared"),
            Self::UnsupportedDepthFormat(format) => {
                write!(f, "depth format {format:?} is not renderable")
            }
            Self::ZeroSized => write!(f, "zero-sized target"),
        }
    }
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<image::ImageError> for LumenError {
    fn from(err: image::ImageError) -> Self {
        LumenError::ImageDecodeError(err.to_string())
    }
}

impl From<tobj::LoadError> for LumenError {
    fn from(err: tobj::LoadError) -> Self {
        LumenError::ModelLoadError(err.to_string())
    }
}

impl From<minijinja::Error> for LumenError {
    fn from(err: minijinja::Error) -> Self {
        LumenError::ShaderTemplateError(err.to_string())
    }
}

/// Alias for `Result<T, LumenError>`.
pub type Result<T> = std::result::Result<T, LumenError>;
