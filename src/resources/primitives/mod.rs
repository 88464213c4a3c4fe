//! Drawable primitives.
//!
//! Every shape goes through an explicit lifecycle: built on the CPU at
//! construction, uploaded by [`Primitive::initialize`] during renderer setup
//! and released by [`Primitive::shutdown`] at teardown. Nothing is created on
//! first draw.

pub mod box_shape;
pub mod quad;

pub use box_shape::{create_box, create_skybox_cube};
pub use quad::{create_foliage_quad, create_tangent_quad, triangle_tangents};

use crate::renderer::pipeline::vertex::{MeshVertex, PositionVertex, TangentVertex, VertexLayout};
use crate::resources::geometry::{Geometry, GpuMesh};

/// A geometry plus its GPU buffers once initialized.
#[derive(Debug)]
pub struct Primitive<V: VertexLayout> {
    geometry: Geometry<V>,
    mesh: Option<GpuMesh>,
}

impl<V: VertexLayout> Primitive<V> {
    #[must_use]
    pub fn new(geometry: Geometry<V>) -> Self {
        Self { geometry, mesh: None }
    }

    /// Uploads the buffers. Calling it again is a no-op.
    pub fn initialize(&mut self, device: &wgpu::Device) {
        if self.mesh.is_none() {
            self.mesh = Some(self.geometry.upload(device));
        }
    }

    /// Releases the GPU buffers; the CPU geometry is kept.
    pub fn shutdown(&mut self) {
        if let Some(mesh) = self.mesh.take() {
            mesh.destroy();
        }
    }

    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.mesh.is_some()
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> Option<&GpuMesh> {
        self.mesh.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &Geometry<V> {
        &self.geometry
    }
}

/// Every primitive the scene draws.
#[derive(Debug)]
pub struct PrimitiveSet {
    /// Point light indicator, ±0.5.
    pub light_cube: Primitive<MeshVertex>,
    /// Emissive bloom source, ±1.
    pub bloom_cube: Primitive<MeshVertex>,
    /// Blended window box, ±0.5.
    pub window_cube: Primitive<MeshVertex>,
    pub foliage_quad: Primitive<MeshVertex>,
    pub tangent_quad: Primitive<TangentVertex>,
    pub skybox: Primitive<PositionVertex>,
}

impl Default for PrimitiveSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            light_cube: Primitive::new(create_box("Light Cube", 0.5)),
            bloom_cube: Primitive::new(create_box("Bloom Cube", 1.0)),
            window_cube: Primitive::new(create_box("Window Cube", 0.5)),
            foliage_quad: Primitive::new(create_foliage_quad()),
            tangent_quad: Primitive::new(create_tangent_quad()),
            skybox: Primitive::new(create_skybox_cube()),
        }
    }

    pub fn initialize(&mut self, device: &wgpu::Device) {
        self.light_cube.initialize(device);
        self.bloom_cube.initialize(device);
        self.window_cube.initialize(device);
        self.foliage_quad.initialize(device);
        self.tangent_quad.initialize(device);
        self.skybox.initialize(device);
        log::debug!("Primitives initialized");
    }

    pub fn shutdown(&mut self) {
        self.light_cube.shutdown();
        self.bloom_cube.shutdown();
        self.window_cube.shutdown();
        self.foliage_quad.shutdown();
        self.tangent_quad.shutdown();
        self.skybox.shutdown();
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.light_cube.is_initialized()
            && self.bloom_cube.is_initialized()
            && self.window_cube.is_initialized()
            && self.foliage_quad.is_initialized()
            && self.tangent_quad.is_initialized()
            && self.skybox.is_initialized()
    }
}
