//! Vertex Layouts
//!
//! Fixed interleaved vertex formats used by the scene, plus generation of the
//! matching WGSL `VertexInput` struct so the templates never drift from the
//! Rust side.

use bytemuck::{Pod, Zeroable};
use wgpu::VertexFormat;

/// A named attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy)]
pub struct NamedAttribute {
    pub name: &'static str,
    pub format: VertexFormat,
}

/// Interleaved vertex types that can describe their own GPU layout.
pub trait VertexLayout: Pod {
    const ATTRIBUTES: &'static [NamedAttribute];

    /// `wgpu` attribute list with tightly packed offsets and ascending locations.
    #[must_use]
    fn wgpu_attributes() -> Vec<wgpu::VertexAttribute> {
        let mut offset = 0;
        Self::ATTRIBUTES
            .iter()
            .enumerate()
            .map(|(location, attr)| {
                let attribute = wgpu::VertexAttribute {
                    format: attr.format,
                    offset,
                    shader_location: location as u32,
                };
                offset += attr.format.size();
                attribute
            })
            .collect()
    }

    #[must_use]
    fn stride() -> u64 {
        std::mem::size_of::<Self>() as u64
    }

    /// WGSL declaration of the vertex input struct.
    #[must_use]
    fn vertex_input_code() -> String {
        let fields: Vec<String> = Self::ATTRIBUTES
            .iter()
            .enumerate()
            .map(|(location, attr)| {
                format!(
                    "    @location({location}) {}: {},",
                    attr.name,
                    format_to_wgsl_type(attr.format)
                )
            })
            .collect();

        format!("struct VertexInput {{\n{}\n}};", fields.join("\n"))
    }
}

/// Owned copy of a vertex buffer layout, so pipelines can be built later.
#[derive(Debug, Clone)]
pub struct OwnedVertexBufferDesc {
    pub array_stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl OwnedVertexBufferDesc {
    #[must_use]
    pub fn of<V: VertexLayout>() -> Self {
        Self {
            array_stride: V::stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: V::wgpu_attributes(),
        }
    }

    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

/// Position, normal and texture coordinate. Used by models, cubes and quads.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    #[must_use]
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

impl VertexLayout for MeshVertex {
    const ATTRIBUTES: &'static [NamedAttribute] = &[
        NamedAttribute { name: "position", format: VertexFormat::Float32x3 },
        NamedAttribute { name: "normal", format: VertexFormat::Float32x3 },
        NamedAttribute { name: "uv", format: VertexFormat::Float32x2 },
    ];
}

/// Mesh vertex with a tangent frame, for normal and parallax mapping.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TangentVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl VertexLayout for TangentVertex {
    const ATTRIBUTES: &'static [NamedAttribute] = &[
        NamedAttribute { name: "position", format: VertexFormat::Float32x3 },
        NamedAttribute { name: "normal", format: VertexFormat::Float32x3 },
        NamedAttribute { name: "uv", format: VertexFormat::Float32x2 },
        NamedAttribute { name: "tangent", format: VertexFormat::Float32x3 },
        NamedAttribute { name: "bitangent", format: VertexFormat::Float32x3 },
    ];
}

/// Position only. Used by the skybox cube.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl VertexLayout for PositionVertex {
    const ATTRIBUTES: &'static [NamedAttribute] = &[NamedAttribute {
        name: "position",
        format: VertexFormat::Float32x3,
    }];
}

#[allow(clippy::match_same_arms)]
fn format_to_wgsl_type(format: VertexFormat) -> &'static str {
    match format {
        VertexFormat::Float32 => "f32",
        VertexFormat::Float32x2 => "vec2<f32>",
        VertexFormat::Float32x3 => "vec3<f32>",
        VertexFormat::Float32x4 => "vec4<f32>",
        VertexFormat::Uint32 => "u32",
        VertexFormat::Uint32x2 => "vec2<u32>",
        VertexFormat::Uint32x3 => "vec3<u32>",
        VertexFormat::Uint32x4 => "vec4<u32>",
        VertexFormat::Sint32 => "i32",
        VertexFormat::Sint32x2 => "vec2<i32>",
        VertexFormat::Sint32x3 => "vec3<i32>",
        VertexFormat::Sint32x4 => "vec4<i32>",
        _ => "f32",
    }
}
