//! Scene assets
//!
//! Every texture and model the scene draws, loaded once at startup.
//!
//! - [`texture_loader`]: images, mip chains, cubemaps, solid fallbacks
//! - [`model_loader`]: OBJ meshes and their materials
//!
//! A file that fails to load never aborts startup: textures fall back to a
//! 1×1 white or black image and models to an empty mesh list.

pub mod model_loader;
pub mod texture_loader;

pub use model_loader::{Model, ModelMaterial, ModelMesh, ObjMaterial, ObjMesh, ObjModel, load_obj};
pub use texture_loader::{ColorSpace, DecodedImage, decode_image, load_cubemap, load_texture_2d, solid_color, validate_cube_faces};

use crate::errors::{LumenError, Result};
use crate::renderer::core::MipmapGenerator;
use crate::renderer::settings::RendererSettings;
use crate::renderer::targets::{TextureDesc, TextureHandle, TextureRegistry};

/// Resource-root relative asset paths.
pub mod paths {
    pub const STATUE: &str = "objects/LibertyStatue/LibertStatue.obj";
    pub const PEDESTAL: &str = "objects/10421_square_pedastal_iterations-2.obj";

    /// +X, -X, +Y, -Y, +Z, -Z.
    pub const SKYBOX_FACES: [&str; 6] = [
        "textures/skyboxtexture/px.jpg",
        "textures/skyboxtexture/nx.jpg",
        "textures/skyboxtexture/py.jpg",
        "textures/skyboxtexture/ny.jpg",
        "textures/skyboxtexture/pz.jpg",
        "textures/skyboxtexture/nz.jpg",
    ];

    pub const BRICK_DIFFUSE: &str = "textures/marble_01_diff_4k.jpg";
    pub const BRICK_NORMAL: &str = "textures/marble_01_nor_gl_4k.jpg";
    pub const FLOOR_DIFFUSE: &str = "textures/floor_tiles_08_diff_4k.jpg";
    pub const FLOOR_NORMAL: &str = "textures/floor_tiles_08_nor_gl_4k.jpg";
    pub const FLOOR_HEIGHT: &str = "textures/floor_tiles_08_disp_4k.jpg";
    pub const FOLIAGE: &str = "textures/11_ccexpress.png";
    pub const WINDOW: &str = "textures/window.png";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneTextures {
    pub skybox: TextureHandle,
    pub foliage: TextureHandle,
    pub window: TextureHandle,
    pub brick_diffuse: TextureHandle,
    pub brick_normal: TextureHandle,
    pub floor_diffuse: TextureHandle,
    pub floor_normal: TextureHandle,
    pub floor_height: TextureHandle,
    /// 1×1 fallbacks.
    pub white: TextureHandle,
    pub black: TextureHandle,
}

pub struct SceneModels {
    pub statue: Model,
    pub pedestal: Model,
}

impl SceneModels {
    pub fn destroy(&self) {
        self.statue.destroy();
        self.pedestal.destroy();
    }
}

pub struct SceneAssets {
    pub textures: SceneTextures,
    pub models: SceneModels,
}

impl SceneAssets {
    /// Loads every scene asset under the configured resource root.
    ///
    /// Only the fallback textures can fail this call.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &mut TextureRegistry,
        mipmaps: &mut MipmapGenerator,
        settings: &RendererSettings,
    ) -> Result<Self> {
        let white = solid_color(device, queue, registry, "Fallback White", [255; 4])?;
        let black = solid_color(device, queue, registry, "Fallback Black", [0, 0, 0, 255])?;
        let flat_normal = solid_color(device, queue, registry, "Fallback Normal", [128, 128, 255, 255])?;

        let mut texture = |relative: &str, color_space: ColorSpace, fallback: TextureHandle| {
            let path = settings.resource(relative);
            load_texture_2d(device, queue, registry, mipmaps, &path, color_space).unwrap_or_else(|e| {
                log::warn!("Texture {} failed to load: {e}", path.display());
                fallback
            })
        };

        let foliage = texture(paths::FOLIAGE, ColorSpace::Srgb, white);
        let window = texture(paths::WINDOW, ColorSpace::Srgb, white);
        let brick_diffuse = texture(paths::BRICK_DIFFUSE, ColorSpace::Srgb, white);
        let brick_normal = texture(paths::BRICK_NORMAL, ColorSpace::Linear, flat_normal);
        let floor_diffuse = texture(paths::FLOOR_DIFFUSE, ColorSpace::Srgb, white);
        let floor_normal = texture(paths::FLOOR_NORMAL, ColorSpace::Linear, flat_normal);
        let floor_height = texture(paths::FLOOR_HEIGHT, ColorSpace::Linear, black);

        let faces = paths::SKYBOX_FACES.map(|face| settings.resource(face));
        let skybox = load_cubemap(device, queue, registry, "Skybox", &faces).or_else(|e| {
            log::warn!("Skybox failed to load: {e}");
            let desc = TextureDesc::cubemap("Skybox Fallback", 1);
            let handle = registry.create(device, desc);
            for layer in 0..6 {
                registry.upload_rgba8(queue, handle, layer, 0, 1, 1, &[0, 0, 0, 255])?;
            }
            Ok::<_, LumenError>(handle)
        })?;

        let mut model = |label: &str, relative: &str| {
            let path = settings.resource(relative);
            match load_obj(&path) {
                Ok(obj) => {
                    log::info!(
                        "Loaded model {} ({} meshes, {} vertices)",
                        path.display(),
                        obj.meshes.len(),
                        obj.vertex_count()
                    );
                    Model::upload(device, queue, registry, mipmaps, label, &obj, white, black)
                }
                Err(e) => {
                    log::warn!("Model {} failed to load: {e}", path.display());
                    Model::empty(label)
                }
            }
        };

        let models = SceneModels {
            statue: model("Statue", paths::STATUE),
            pedestal: model("Pedestal", paths::PEDESTAL),
        };

        Ok(Self {
            textures: SceneTextures {
                skybox,
                foliage,
                window,
                brick_diffuse,
                brick_normal,
                floor_diffuse,
                floor_normal,
                floor_height,
                white,
                black,
            },
            models,
        })
    }
}
