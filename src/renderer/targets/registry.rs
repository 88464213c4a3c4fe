//! Texture Registry
//!
//! Owns every GPU image the renderer creates: HDR color attachments, depth
//! buffers, ping-pong blur targets, the skybox cubemap and loaded material
//! textures. Each entry pairs the wgpu texture with its default view, a sampler
//! built from the descriptor's filter/wrap modes, and the descriptor itself.
//!
//! Handles are stable `slotmap` keys; entries are immutable after creation
//! except for their pixel contents.

use slotmap::{SlotMap, new_key_type};

use crate::errors::{LumenError, Result};

new_key_type! {
    /// Opaque handle to a texture owned by [`TextureRegistry`].
    pub struct TextureHandle;
}

/// Image dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    D2,
    /// Six square faces in +X, -X, +Y, -Y, +Z, -Z order.
    Cube,
}

/// Format descriptor of a registry texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub kind: TextureKind,
    pub format: wgpu::TextureFormat,
    pub filter: wgpu::FilterMode,
    pub wrap: wgpu::AddressMode,
    pub mip_levels: u32,
    pub usage: wgpu::TextureUsages,
}

impl TextureDesc {
    /// A sampled color attachment: linear filtering, clamped to edge.
    #[must_use]
    pub fn color_attachment(label: impl Into<String>, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            kind: TextureKind::D2,
            format,
            filter: wgpu::FilterMode::Linear,
            wrap: wgpu::AddressMode::ClampToEdge,
            mip_levels: 1,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        }
    }

    /// A depth buffer that is only ever attached, never sampled.
    #[must_use]
    pub fn depth_attachment(label: impl Into<String>, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            kind: TextureKind::D2,
            format,
            filter: wgpu::FilterMode::Nearest,
            wrap: wgpu::AddressMode::ClampToEdge,
            mip_levels: 1,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    /// A material texture: sRGB, repeat wrap, trilinear.
    ///
    /// Use [`with_format`](Self::with_format) for data maps (normals, heights)
    /// that must not be gamma decoded.
    #[must_use]
    pub fn material(label: impl Into<String>, width: u32, height: u32, mip_levels: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
            kind: TextureKind::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            filter: wgpu::FilterMode::Linear,
            wrap: wgpu::AddressMode::Repeat,
            mip_levels: mip_levels.max(1),
            // Mip levels past the first are rendered by the mipmap generator.
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
        }
    }

    /// A cubemap with clamped edges.
    #[must_use]
    pub fn cubemap(label: impl Into<String>, size: u32) -> Self {
        Self {
            label: label.into(),
            width: size,
            height: size,
            kind: TextureKind::Cube,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            filter: wgpu::FilterMode::Linear,
            wrap: wgpu::AddressMode::ClampToEdge,
            mip_levels: 1,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        }
    }

    /// Overrides the pixel format.
    #[must_use]
    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    #[must_use]
    pub fn layers(&self) -> u32 {
        match self.kind {
            TextureKind::D2 => 1,
            TextureKind::Cube => 6,
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A registry entry.
pub struct GpuTexture {
    pub desc: TextureDesc,
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Owner of all renderer textures.
#[derive(Default)]
pub struct TextureRegistry {
    textures: SlotMap<TextureHandle, GpuTexture>,
}

impl TextureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a texture, its default view and its sampler.
    pub fn create(&mut self, device: &wgpu::Device, desc: TextureDesc) -> TextureHandle {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&desc.label),
            size: wgpu::Extent3d {
                width: desc.width.max(1),
                height: desc.height.max(1),
                depth_or_array_layers: desc.layers(),
            },
            mip_level_count: desc.mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.format,
            usage: desc.usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&desc.label),
            dimension: Some(match desc.kind {
                TextureKind::D2 => wgpu::TextureViewDimension::D2,
                TextureKind::Cube => wgpu::TextureViewDimension::Cube,
            }),
            ..Default::default()
        });

        let mipmap_filter = if desc.mip_levels > 1 {
            wgpu::MipmapFilterMode::Linear
        } else {
            wgpu::MipmapFilterMode::Nearest
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&desc.label),
            address_mode_u: desc.wrap,
            address_mode_v: desc.wrap,
            address_mode_w: desc.wrap,
            mag_filter: desc.filter,
            min_filter: desc.filter,
            mipmap_filter,
            ..Default::default()
        });

        log::debug!(
            "Registered texture '{}' {}x{} {:?}",
            desc.label,
            desc.width,
            desc.height,
            desc.format
        );

        self.textures.insert(GpuTexture {
            desc,
            texture,
            view,
            sampler,
        })
    }

    /// Writes tightly packed RGBA8 pixels into one mip level of one layer.
    pub fn upload_rgba8(
        &self,
        queue: &wgpu::Queue,
        handle: TextureHandle,
        layer: u32,
        mip_level: u32,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<()> {
        let entry = self.get(handle)?;
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &entry.texture,
                mip_level,
                origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    pub fn get(&self, handle: TextureHandle) -> Result<&GpuTexture> {
        self.textures
            .get(handle)
            .ok_or_else(|| LumenError::TextureNotFound(format!("{handle:?}")))
    }

    #[inline]
    pub fn view(&self, handle: TextureHandle) -> Result<&wgpu::TextureView> {
        self.get(handle).map(|t| &t.view)
    }

    #[inline]
    pub fn desc(&self, handle: TextureHandle) -> Result<&TextureDesc> {
        self.get(handle).map(|t| &t.desc)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Destroys every texture. Handles become dangling.
    pub fn shutdown(&mut self) {
        for (_, entry) in self.textures.drain() {
            entry.texture.destroy();
        }
    }
}
