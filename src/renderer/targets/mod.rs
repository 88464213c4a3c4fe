//! Render targets and the textures behind them.
//!
//! - [`registry`]: ownership of GPU images and their format descriptors
//! - [`framebuffer`]: declared targets, completeness checks, the fixed target set

pub mod framebuffer;
pub mod registry;

pub use framebuffer::{
    AttachmentDesc, BRIGHT_SLOT, FormatSupport, FramebufferGraph, HDR_FORMAT, RenderTarget,
    RenderTargetConfig, SCENE_COLOR_SLOT,
};
pub use registry::{GpuTexture, TextureDesc, TextureHandle, TextureKind, TextureRegistry};
