//! CPU geometry and its GPU upload.
//!
//! A [`Geometry`] is a plain vertex/index list tied to one vertex layout.
//! [`Geometry::upload`] turns it into a [`GpuMesh`] that the passes draw.

use wgpu::util::DeviceExt;

use crate::renderer::pipeline::vertex::VertexLayout;

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry<V: VertexLayout> {
    pub label: String,
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V: VertexLayout> Geometry<V> {
    #[must_use]
    pub fn new(label: impl Into<String>, vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self {
            label: label.into(),
            vertices,
            indices,
        }
    }

    /// A triangle list where every three consecutive vertices form a face.
    #[must_use]
    pub fn non_indexed(label: impl Into<String>, vertices: Vec<V>) -> Self {
        let indices = (0..vertices.len() as u32).collect();
        Self::new(label, vertices, indices)
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Creates the vertex and index buffers.
    #[must_use]
    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", self.label)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", self.label)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded '{}': {} vertices, {} indices",
            self.label,
            self.vertices.len(),
            self.indices.len()
        );

        GpuMesh {
            label: self.label.clone(),
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Vertex and index buffers of an uploaded [`Geometry`].
#[derive(Debug)]
pub struct GpuMesh {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Binds the buffers to slot 0 and draws every index once.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
