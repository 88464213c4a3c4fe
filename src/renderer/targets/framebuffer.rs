//! Framebuffer Graph
//!
//! Declares the offscreen render targets and checks their completeness once,
//! at creation. A failed check is fatal: the renderer never starts drawing into
//! a target that could not be assembled.
//!
//! ```text
//!                 ┌──────────────── HDR target ────────────────┐
//!  Geometry ────► │ [0] scene color  Rgba16F                   │
//!                 │ [1] bright pass  Rgba16F  ──┐              │
//!                 │ depth            Depth32F   │              │
//!                 └─────────────────────────────┼──────────────┘
//!                                               ▼
//!  Blur ─────────► ping-pong[0] ◄──────► ping-pong[1]   (Rgba16F, no depth)
//!                                               │
//!  Composite ────► surface  ◄── [0] + final ping-pong
//! ```

use smallvec::SmallVec;

use crate::errors::{IncompleteReason, LumenError, Result};

use super::registry::{TextureDesc, TextureHandle, TextureRegistry};

/// Floating-point format of every HDR and blur attachment.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Index of the shaded color attachment in the HDR target.
pub const SCENE_COLOR_SLOT: usize = 0;
/// Index of the brightness-thresholded attachment in the HDR target.
pub const BRIGHT_SLOT: usize = 1;

/// Device capabilities consulted by the completeness check.
pub trait FormatSupport {
    fn is_color_renderable(&self, format: wgpu::TextureFormat) -> bool;
    fn is_depth_renderable(&self, format: wgpu::TextureFormat) -> bool;
    fn max_color_attachments(&self) -> u32;
}

// ============================================================================
// Target configuration
// ============================================================================

/// One declared color output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentDesc {
    pub format: wgpu::TextureFormat,
    pub filter: wgpu::FilterMode,
    pub wrap: wgpu::AddressMode,
}

impl AttachmentDesc {
    /// Rgba16F, linear, clamp-to-edge.
    pub const HDR: Self = Self {
        format: HDR_FORMAT,
        filter: wgpu::FilterMode::Linear,
        wrap: wgpu::AddressMode::ClampToEdge,
    };
}

/// Declaration of a render target prior to allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTargetConfig {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub color_attachments: SmallVec<[AttachmentDesc; 2]>,
    pub depth: Option<wgpu::TextureFormat>,
}

impl RenderTargetConfig {
    /// The dual-output capture target written by the geometry pass.
    #[must_use]
    pub fn hdr(width: u32, height: u32, depth_format: wgpu::TextureFormat) -> Self {
        Self {
            label: "HDR Target".into(),
            width,
            height,
            color_attachments: smallvec::smallvec![AttachmentDesc::HDR, AttachmentDesc::HDR],
            depth: Some(depth_format),
        }
    }

    /// One half of the blur ping-pong pair.
    #[must_use]
    pub fn ping_pong(index: usize, width: u32, height: u32) -> Self {
        Self {
            label: format!("Ping-Pong Target {index}"),
            width,
            height,
            color_attachments: smallvec::smallvec![AttachmentDesc::HDR],
            depth: None,
        }
    }

    /// Texture descriptor for color slot `slot`.
    #[must_use]
    pub fn color_texture_desc(&self, slot: usize) -> Option<TextureDesc> {
        self.color_attachments.get(slot).map(|a| TextureDesc {
            filter: a.filter,
            wrap: a.wrap,
            ..TextureDesc::color_attachment(format!("{} Color {slot}", self.label), self.width, self.height, a.format)
        })
    }

    /// Texture descriptor for the depth buffer, if one is declared.
    #[must_use]
    pub fn depth_texture_desc(&self) -> Option<TextureDesc> {
        self.depth
            .map(|format| TextureDesc::depth_attachment(format!("{} Depth", self.label), self.width, self.height, format))
    }

    /// Color formats in slot order, for pipeline target declarations.
    #[must_use]
    pub fn color_formats(&self) -> SmallVec<[wgpu::TextureFormat; 2]> {
        self.color_attachments.iter().map(|a| a.format).collect()
    }

    /// Checks that `colors` (bound to ascending slots) and `depth` complete
    /// this declaration on a device with capabilities `caps`.
    pub fn validate(&self, colors: &[&TextureDesc], depth: Option<&TextureDesc>, caps: &dyn FormatSupport) -> Result<()> {
        self.check(colors, depth, caps)
            .map_err(|reason| LumenError::IncompleteFramebuffer {
                target: self.label.clone(),
                reason,
            })
    }

    fn check(
        &self,
        colors: &[&TextureDesc],
        depth: Option<&TextureDesc>,
        caps: &dyn FormatSupport,
    ) -> std::result::Result<(), IncompleteReason> {
        if self.width == 0 || self.height == 0 {
            return Err(IncompleteReason::ZeroSized);
        }

        let declared = self.color_attachments.len();
        if colors.len() != declared {
            return Err(IncompleteReason::AttachmentCountMismatch {
                declared,
                bound: colors.len(),
            });
        }

        let max = caps.max_color_attachments();
        if declared > max as usize {
            return Err(IncompleteReason::TooManyColorAttachments { requested: declared, max });
        }

        let expected = (self.width, self.height);
        for (slot, (attachment, bound)) in self.color_attachments.iter().zip(colors).enumerate() {
            if !caps.is_color_renderable(attachment.format) {
                return Err(IncompleteReason::UnsupportedColorFormat {
                    slot,
                    format: attachment.format,
                });
            }
            if bound.format != attachment.format {
                return Err(IncompleteReason::FormatMismatch {
                    slot,
                    expected: attachment.format,
                    actual: bound.format,
                });
            }
            if bound.size() != expected {
                return Err(IncompleteReason::SizeMismatch {
                    slot,
                    expected,
                    actual: bound.size(),
                });
            }
        }

        match (self.depth, depth) {
            (Some(_), None) => Err(IncompleteReason::MissingDepthAttachment),
            (None, Some(_)) => Err(IncompleteReason::UnexpectedDepthAttachment),
            (Some(format), Some(bound)) => {
                if !caps.is_depth_renderable(format) || bound.format != format {
                    Err(IncompleteReason::UnsupportedDepthFormat(bound.format))
                } else if bound.size() != expected {
                    Err(IncompleteReason::SizeMismatch {
                        slot: declared,
                        expected,
                        actual: bound.size(),
                    })
                } else {
                    Ok(())
                }
            }
            (None, None) => Ok(()),
        }
    }
}

// ============================================================================
// Assembled targets
// ============================================================================

/// A complete render target. Only constructed through [`RenderTarget::assemble`].
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub config: RenderTargetConfig,
    color: SmallVec<[TextureHandle; 2]>,
    depth: Option<TextureHandle>,
}

impl RenderTarget {
    /// Binds registry textures to the declared slots and runs the
    /// completeness check.
    pub fn assemble(
        config: RenderTargetConfig,
        color: &[TextureHandle],
        depth: Option<TextureHandle>,
        registry: &TextureRegistry,
        caps: &dyn FormatSupport,
    ) -> Result<Self> {
        let color_descs = color
            .iter()
            .map(|&h| registry.desc(h))
            .collect::<Result<SmallVec<[&TextureDesc; 2]>>>()?;
        let depth_desc = depth.map(|h| registry.desc(h)).transpose()?;

        config.validate(&color_descs, depth_desc, caps)?;

        Ok(Self {
            config,
            color: color.iter().copied().collect(),
            depth,
        })
    }

    /// Allocates textures for every declared slot, then assembles.
    pub fn allocate(
        device: &wgpu::Device,
        registry: &mut TextureRegistry,
        caps: &dyn FormatSupport,
        config: RenderTargetConfig,
    ) -> Result<Self> {
        let color: SmallVec<[TextureHandle; 2]> = (0..config.color_attachments.len())
            .filter_map(|slot| config.color_texture_desc(slot))
            .map(|desc| registry.create(device, desc))
            .collect();
        let depth = config.depth_texture_desc().map(|desc| registry.create(device, desc));

        Self::assemble(config, &color, depth, registry, caps)
    }

    #[inline]
    #[must_use]
    pub fn color(&self, slot: usize) -> Option<TextureHandle> {
        self.color.get(slot).copied()
    }

    #[inline]
    #[must_use]
    pub fn color_attachments(&self) -> &[TextureHandle] {
        &self.color
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> Option<TextureHandle> {
        self.depth
    }
}

/// The fixed set of offscreen targets.
#[derive(Debug, Clone)]
pub struct FramebufferGraph {
    pub hdr: RenderTarget,
    pub ping_pong: [RenderTarget; 2],
}

impl FramebufferGraph {
    /// Allocates and validates the HDR target and the ping-pong pair.
    pub fn new(
        device: &wgpu::Device,
        registry: &mut TextureRegistry,
        caps: &dyn FormatSupport,
        width: u32,
        height: u32,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let hdr = RenderTarget::allocate(device, registry, caps, RenderTargetConfig::hdr(width, height, depth_format))?;
        let ping = RenderTarget::allocate(device, registry, caps, RenderTargetConfig::ping_pong(0, width, height))?;
        let pong = RenderTarget::allocate(device, registry, caps, RenderTargetConfig::ping_pong(1, width, height))?;

        log::info!("Framebuffer graph ready: HDR {width}x{height} + 2 ping-pong targets");

        Ok(Self {
            hdr,
            ping_pong: [ping, pong],
        })
    }

    /// Handle of the scene color attachment.
    #[must_use]
    pub fn scene_color(&self) -> TextureHandle {
        self.hdr.color[SCENE_COLOR_SLOT]
    }

    /// Handle of the bright-pass attachment.
    #[must_use]
    pub fn bright(&self) -> TextureHandle {
        self.hdr.color[BRIGHT_SLOT]
    }

    /// Handle of ping-pong color buffer `index` (0 or 1).
    #[must_use]
    pub fn ping_pong_color(&self, index: usize) -> TextureHandle {
        self.ping_pong[index & 1].color[0]
    }
}
