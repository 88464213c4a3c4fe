//! Texture Loading
//!
//! Decodes images with the `image` crate and uploads them into the
//! [`TextureRegistry`]. Material textures get a full mip chain rendered on the
//! GPU; cubemap faces are uploaded as six layers of one texture.
//!
//! Loading is best-effort at this boundary: callers receive a `Result` and
//! substitute a 1×1 fallback on failure.

use std::path::Path;

use image::GenericImageView;

use crate::errors::{LumenError, Result};
use crate::renderer::core::{MipmapGenerator, full_mip_count};
use crate::renderer::targets::{TextureDesc, TextureHandle, TextureRegistry};

/// How the texel values of a 2D image are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Colour data, decoded from sRGB when sampled.
    Srgb,
    /// Normals, heights and other data maps.
    Linear,
}

impl ColorSpace {
    #[must_use]
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            Self::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            Self::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn decode_image(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| LumenError::ImageDecodeError(format!("{}: {e}", path.display())))?;
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: img.into_rgba8().into_raw(),
    })
}

/// Checks that six face sizes form a cubemap and returns the edge length.
pub fn validate_cube_faces(sizes: &[(u32, u32)]) -> Result<u32> {
    if sizes.len() != 6 {
        return Err(LumenError::CubeMapError(format!("expected 6 faces, got {}", sizes.len())));
    }
    let (width, height) = sizes[0];
    if width == 0 || width != height {
        return Err(LumenError::CubeMapError(format!("face 0 is {width}x{height}, faces must be square")));
    }
    if let Some(index) = sizes.iter().position(|&size| size != (width, height)) {
        let (w, h) = sizes[index];
        return Err(LumenError::CubeMapError(format!("face {index} is {w}x{h}, expected {width}x{width}")));
    }
    Ok(width)
}

/// Creates a 1×1 texture of one colour.
pub fn solid_color(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    label: &str,
    rgba: [u8; 4],
) -> Result<TextureHandle> {
    let handle = registry.create(device, TextureDesc::material(label, 1, 1, 1).with_format(wgpu::TextureFormat::Rgba8Unorm));
    registry.upload_rgba8(queue, handle, 0, 0, 1, 1, &rgba)?;
    Ok(handle)
}

/// Loads, uploads and mipmaps a 2D material texture.
pub fn load_texture_2d(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    mipmaps: &mut MipmapGenerator,
    path: impl AsRef<Path>,
    color_space: ColorSpace,
) -> Result<TextureHandle> {
    let path = path.as_ref();
    let image = decode_image(path)?;

    let mip_levels = full_mip_count(image.width, image.height);
    let desc = TextureDesc::material(path.display().to_string(), image.width, image.height, mip_levels)
        .with_format(color_space.format());
    let handle = registry.create(device, desc);
    registry.upload_rgba8(queue, handle, 0, 0, image.width, image.height, &image.pixels)?;

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Mipmap Generation"),
    });
    mipmaps.generate(device, &mut encoder, &registry.get(handle)?.texture);
    queue.submit(Some(encoder.finish()));

    log::info!("Loaded texture {} ({}x{}, {mip_levels} mips)", path.display(), image.width, image.height);
    Ok(handle)
}

/// Loads six faces in +X, -X, +Y, -Y, +Z, -Z order into one cubemap.
///
/// A face that fails to decode is logged and left black; mismatched face
/// sizes fail the whole cubemap.
pub fn load_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    registry: &mut TextureRegistry,
    label: &str,
    faces: &[impl AsRef<Path>],
) -> Result<TextureHandle> {
    let decoded: Vec<Option<DecodedImage>> = faces
        .iter()
        .map(|path| match decode_image(path) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("Cubemap face failed to load: {e}");
                None
            }
        })
        .collect();

    let loaded: Vec<(u32, u32)> = decoded.iter().flatten().map(|image| (image.width, image.height)).collect();
    let Some(&reference) = loaded.first() else {
        return Err(LumenError::CubeMapError(format!("no face of '{label}' could be loaded")));
    };

    let sizes: Vec<(u32, u32)> = decoded
        .iter()
        .map(|image| image.as_ref().map_or(reference, |image| (image.width, image.height)))
        .collect();
    let size = validate_cube_faces(&sizes)?;

    let handle = registry.create(device, TextureDesc::cubemap(label, size));
    let black = vec![0u8; (size * size * 4) as usize];
    for (layer, image) in decoded.iter().enumerate() {
        let pixels = image.as_ref().map_or(black.as_slice(), |image| image.pixels.as_slice());
        registry.upload_rgba8(queue, handle, layer as u32, 0, size, size, pixels)?;
    }

    log::info!("Loaded cubemap '{label}' ({size}x{size})");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_must_match() {
        assert_eq!(validate_cube_faces(&[(64, 64); 6]).unwrap(), 64);
        assert!(validate_cube_faces(&[(64, 64); 5]).is_err());
        assert!(validate_cube_faces(&[(64, 32); 6]).is_err());

        let mut sizes = [(64, 64); 6];
        sizes[4] = (32, 32);
        assert!(matches!(validate_cube_faces(&sizes), Err(LumenError::CubeMapError(_))));
    }

    #[test]
    fn missing_image_is_a_decode_error() {
        let err = decode_image("definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LumenError::ImageDecodeError(_)));
    }

    #[test]
    fn color_space_is_part_of_the_texture_cache_key() {
        let path = std::path::PathBuf::from("textures/stone.png");
        let mut cache = rustc_hash::FxHashMap::default();
        cache.insert((path.clone(), ColorSpace::Srgb), 1);
        cache.insert((path.clone(), ColorSpace::Linear), 2);
        cache.insert((path.clone(), ColorSpace::Srgb), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&(path.clone(), ColorSpace::Srgb)), Some(&3));
        assert_eq!(cache.get(&(path, ColorSpace::Linear)), Some(&2));
    }
}
