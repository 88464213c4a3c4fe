//! OBJ model loading.
//!
//! [`load_obj`] parses a Wavefront file with `tobj` into CPU geometry plus
//! material texture paths. [`Model::upload`] turns that into GPU meshes and
//! registry textures, sharing each texture file between the materials that
//! name it.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::{LumenError, Result};
use crate::renderer::core::MipmapGenerator;
use crate::renderer::pipeline::vertex::MeshVertex;
use crate::renderer::targets::{TextureHandle, TextureRegistry};
use crate::resources::geometry::{Geometry, GpuMesh};

use super::texture_loader::{ColorSpace, load_texture_2d};

#[derive(Debug, Clone, PartialEq)]
pub struct ObjMesh {
    pub name: String,
    pub geometry: Geometry<MeshVertex>,
    /// Index into [`ObjModel::materials`].
    pub material: Option<usize>,
}

/// Material texture paths, already resolved against the model directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjMaterial {
    pub name: String,
    pub diffuse_texture: Option<PathBuf>,
    pub specular_texture: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjModel {
    pub meshes: Vec<ObjMesh>,
    pub materials: Vec<ObjMaterial>,
}

impl ObjModel {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.geometry.vertex_count()).sum()
    }
}

/// Reads an OBJ file and its material library.
///
/// Faces are triangulated and single-indexed. Texture `v` is flipped so
/// images load top row first. A missing or broken material library is logged
/// and leaves the meshes without materials.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjModel> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)
        .map_err(|e| LumenError::ModelLoadError(format!("{}: {e}", path.display())))?;

    let directory = path.parent().unwrap_or_else(|| Path::new(""));
    let materials = match materials {
        Ok(materials) => materials
            .into_iter()
            .map(|material| ObjMaterial {
                name: material.name,
                diffuse_texture: material.diffuse_texture.map(|file| directory.join(file)),
                specular_texture: material.specular_texture.map(|file| directory.join(file)),
            })
            .collect(),
        Err(e) => {
            log::warn!("No materials for {}: {e}", path.display());
            Vec::new()
        }
    };

    let meshes = models
        .into_iter()
        .map(|model| {
            let mesh = model.mesh;
            let vertex_count = mesh.positions.len() / 3;
            let vertices = (0..vertex_count)
                .map(|i| {
                    let position = [mesh.positions[3 * i], mesh.positions[3 * i + 1], mesh.positions[3 * i + 2]];
                    let normal = if mesh.normals.len() >= 3 * (i + 1) {
                        [mesh.normals[3 * i], mesh.normals[3 * i + 1], mesh.normals[3 * i + 2]]
                    } else {
                        [0.0; 3]
                    };
                    let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                        [mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1]]
                    } else {
                        [0.0; 2]
                    };
                    MeshVertex::new(position, normal, uv)
                })
                .collect();

            let material = mesh.material_id.filter(|&id| id < materials.len());
            ObjMesh {
                geometry: Geometry::new(model.name.clone(), vertices, mesh.indices),
                name: model.name,
                material,
            }
        })
        .collect();

    Ok(ObjModel { meshes, materials })
}

pub struct ModelMesh {
    pub mesh: GpuMesh,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelMaterial {
    pub diffuse: TextureHandle,
    pub specular: TextureHandle,
}

/// A model resident on the GPU.
#[derive(Default)]
pub struct Model {
    pub label: String,
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<ModelMaterial>,
}

impl Model {
    /// An empty model, drawn as nothing.
    #[must_use]
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Uploads meshes and material textures.
    ///
    /// A texture that fails to load is replaced by `white` (diffuse) or
    /// `black` (specular).
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &mut TextureRegistry,
        mipmaps: &mut MipmapGenerator,
        label: &str,
        obj: &ObjModel,
        white: TextureHandle,
        black: TextureHandle,
    ) -> Self {
        let mut cache: FxHashMap<(PathBuf, ColorSpace), TextureHandle> = FxHashMap::default();
        let mut texture = |path: Option<&PathBuf>, color_space: ColorSpace, fallback: TextureHandle| {
            let Some(path) = path else {
                return fallback;
            };
            if let Some(&handle) = cache.get(&(path.clone(), color_space)) {
                return handle;
            }
            let handle = load_texture_2d(device, queue, registry, mipmaps, path, color_space).unwrap_or_else(|e| {
                log::warn!("Material texture {} failed to load: {e}", path.display());
                fallback
            });
            cache.insert((path.clone(), color_space), handle);
            handle
        };

        let materials = obj
            .materials
            .iter()
            .map(|material| ModelMaterial {
                diffuse: texture(material.diffuse_texture.as_ref(), ColorSpace::Srgb, white),
                specular: texture(material.specular_texture.as_ref(), ColorSpace::Linear, black),
            })
            .collect();

        let meshes = obj
            .meshes
            .iter()
            .filter(|mesh| mesh.geometry.index_count() > 0)
            .map(|mesh| ModelMesh {
                mesh: mesh.geometry.upload(device),
                material: mesh.material,
            })
            .collect();

        Self {
            label: label.to_string(),
            meshes,
            materials,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn destroy(&self) {
        for mesh in &self.meshes {
            mesh.mesh.destroy();
        }
    }
}
