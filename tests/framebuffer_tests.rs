//! Framebuffer Completeness Tests
//!
//! Tests for:
//! - RenderTargetConfig declarations (HDR and ping-pong)
//! - Attachment texture descriptors
//! - Completeness validation against device capabilities

use lumen::errors::{IncompleteReason, LumenError};
use lumen::renderer::targets::{BRIGHT_SLOT, FormatSupport, HDR_FORMAT, RenderTargetConfig, SCENE_COLOR_SLOT, TextureDesc};

const DEPTH: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Capabilities of a device that renders everything up to `max_colors` outputs.
struct FakeCaps {
    max_colors: u32,
    float_renderable: bool,
}

impl Default for FakeCaps {
    fn default() -> Self {
        Self {
            max_colors: 8,
            float_renderable: true,
        }
    }
}

impl FormatSupport for FakeCaps {
    fn is_color_renderable(&self, format: wgpu::TextureFormat) -> bool {
        self.float_renderable || format != HDR_FORMAT
    }

    fn is_depth_renderable(&self, format: wgpu::TextureFormat) -> bool {
        format.is_depth_stencil_format()
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_colors
    }
}

fn color_descs(config: &RenderTargetConfig) -> Vec<TextureDesc> {
    (0..config.color_attachments.len())
        .map(|slot| config.color_texture_desc(slot).unwrap())
        .collect()
}

fn reason(result: lumen::errors::Result<()>) -> IncompleteReason {
    match result {
        Err(LumenError::IncompleteFramebuffer { reason, .. }) => reason,
        other => panic!("expected IncompleteFramebuffer, got {other:?}"),
    }
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn hdr_target_declares_two_float_outputs_and_depth() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    assert_eq!(config.color_attachments.len(), 2);
    assert_eq!(config.color_formats().as_slice(), &[HDR_FORMAT, HDR_FORMAT]);
    assert_eq!(config.depth, Some(DEPTH));
    assert_ne!(SCENE_COLOR_SLOT, BRIGHT_SLOT);
}

#[test]
fn ping_pong_targets_have_no_depth() {
    for index in 0..2 {
        let config = RenderTargetConfig::ping_pong(index, 800, 600);
        assert_eq!(config.color_attachments.len(), 1);
        assert!(config.depth.is_none());
        assert!(config.depth_texture_desc().is_none());
        assert!(config.label.contains(&index.to_string()));
    }
}

#[test]
fn attachment_descs_are_linear_and_clamped() {
    let config = RenderTargetConfig::hdr(640, 480, DEPTH);
    let bright = config.color_texture_desc(BRIGHT_SLOT).unwrap();

    assert_eq!(bright.format, HDR_FORMAT);
    assert_eq!(bright.size(), (640, 480));
    assert_eq!(bright.filter, wgpu::FilterMode::Linear);
    assert_eq!(bright.wrap, wgpu::AddressMode::ClampToEdge);
    assert!(bright.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
    assert!(bright.usage.contains(wgpu::TextureUsages::TEXTURE_BINDING));

    assert!(config.color_texture_desc(2).is_none());
}

#[test]
fn depth_desc_is_attach_only() {
    let config = RenderTargetConfig::hdr(640, 480, DEPTH);
    let depth = config.depth_texture_desc().unwrap();
    assert_eq!(depth.format, DEPTH);
    assert_eq!(depth.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
}

// ============================================================================
// Validation: complete targets
// ============================================================================

#[test]
fn complete_hdr_target_validates() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let colors = color_descs(&config);
    let depth = config.depth_texture_desc().unwrap();
    let bound: Vec<&TextureDesc> = colors.iter().collect();

    assert!(config.validate(&bound, Some(&depth), &FakeCaps::default()).is_ok());
}

#[test]
fn complete_ping_pong_target_validates() {
    let config = RenderTargetConfig::ping_pong(1, 800, 600);
    let colors = color_descs(&config);
    let bound: Vec<&TextureDesc> = colors.iter().collect();

    assert!(config.validate(&bound, None, &FakeCaps::default()).is_ok());
}

// ============================================================================
// Validation: incomplete targets
// ============================================================================

#[test]
fn one_bound_texture_for_two_outputs_is_incomplete() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let colors = color_descs(&config);
    let depth = config.depth_texture_desc().unwrap();

    let result = config.validate(&[&colors[0]], Some(&depth), &FakeCaps::default());
    assert_eq!(reason(result), IncompleteReason::AttachmentCountMismatch { declared: 2, bound: 1 });
}

#[test]
fn error_names_the_target() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let depth = config.depth_texture_desc().unwrap();

    let err = config.validate(&[], Some(&depth), &FakeCaps::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("HDR Target"));
    assert!(message.contains("incomplete"));
}

#[test]
fn device_with_one_output_cannot_hold_hdr_target() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let colors = color_descs(&config);
    let depth = config.depth_texture_desc().unwrap();
    let bound: Vec<&TextureDesc> = colors.iter().collect();
    let caps = FakeCaps {
        max_colors: 1,
        ..FakeCaps::default()
    };

    let result = config.validate(&bound, Some(&depth), &caps);
    assert_eq!(reason(result), IncompleteReason::TooManyColorAttachments { requested: 2, max: 1 });
}

#[test]
fn unrenderable_float_format_is_incomplete() {
    let config = RenderTargetConfig::ping_pong(0, 800, 600);
    let colors = color_descs(&config);
    let caps = FakeCaps {
        float_renderable: false,
        ..FakeCaps::default()
    };

    let result = config.validate(&[&colors[0]], None, &caps);
    assert_eq!(
        reason(result),
        IncompleteReason::UnsupportedColorFormat {
            slot: 0,
            format: HDR_FORMAT
        }
    );
}

#[test]
fn wrong_bound_format_is_incomplete() {
    let config = RenderTargetConfig::ping_pong(0, 800, 600);
    let wrong = TextureDesc::color_attachment("LDR", 800, 600, wgpu::TextureFormat::Rgba8Unorm);

    let result = config.validate(&[&wrong], None, &FakeCaps::default());
    assert_eq!(
        reason(result),
        IncompleteReason::FormatMismatch {
            slot: 0,
            expected: HDR_FORMAT,
            actual: wgpu::TextureFormat::Rgba8Unorm,
        }
    );
}

#[test]
fn wrong_bound_size_is_incomplete() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let colors = color_descs(&config);
    let small = TextureDesc::color_attachment("Small", 400, 300, HDR_FORMAT);
    let depth = config.depth_texture_desc().unwrap();

    let result = config.validate(&[&colors[0], &small], Some(&depth), &FakeCaps::default());
    assert_eq!(
        reason(result),
        IncompleteReason::SizeMismatch {
            slot: 1,
            expected: (800, 600),
            actual: (400, 300),
        }
    );
}

#[test]
fn missing_depth_is_incomplete() {
    let config = RenderTargetConfig::hdr(800, 600, DEPTH);
    let colors = color_descs(&config);
    let bound: Vec<&TextureDesc> = colors.iter().collect();

    let result = config.validate(&bound, None, &FakeCaps::default());
    assert_eq!(reason(result), IncompleteReason::MissingDepthAttachment);
}

#[test]
fn undeclared_depth_is_incomplete() {
    let config = RenderTargetConfig::ping_pong(0, 800, 600);
    let colors = color_descs(&config);
    let depth = TextureDesc::depth_attachment("Stray Depth", 800, 600, DEPTH);

    let result = config.validate(&[&colors[0]], Some(&depth), &FakeCaps::default());
    assert_eq!(reason(result), IncompleteReason::UnexpectedDepthAttachment);
}

#[test]
fn color_format_as_depth_is_incomplete() {
    let config = RenderTargetConfig::hdr(800, 600, HDR_FORMAT);
    let colors = color_descs(&config);
    let bound: Vec<&TextureDesc> = colors.iter().collect();
    let depth = config.depth_texture_desc().unwrap();

    let result = config.validate(&bound, Some(&depth), &FakeCaps::default());
    assert_eq!(reason(result), IncompleteReason::UnsupportedDepthFormat(HDR_FORMAT));
}

#[test]
fn zero_sized_target_is_incomplete() {
    let config = RenderTargetConfig::ping_pong(0, 0, 600);
    let colors = color_descs(&config);

    let result = config.validate(&[&colors[0]], None, &FakeCaps::default());
    assert_eq!(reason(result), IncompleteReason::ZeroSized);
}
