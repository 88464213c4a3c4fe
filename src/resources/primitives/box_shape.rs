use glam::Vec3;

use crate::renderer::pipeline::vertex::{MeshVertex, PositionVertex};
use crate::resources::geometry::Geometry;

/// Outward normal and the in-plane (u, v) axes of each face, with u × v = normal.
const FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
];

/// Face corners as (u, v) signs, counter-clockwise seen from outside.
const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

fn face_indices(face: u32) -> [u32; 6] {
    let base = face * 4;
    [base, base + 1, base + 2, base, base + 2, base + 3]
}

/// Axis-aligned cube centred on the origin with per-face normals and UVs.
///
/// 24 vertices, 36 indices, counter-clockwise front faces.
#[must_use]
pub fn create_box(label: &str, half_extent: f32) -> Geometry<MeshVertex> {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (normal, u, v)) in FACES.into_iter().enumerate() {
        for (su, sv) in CORNERS {
            let position = (normal + u * su + v * sv) * half_extent;
            let uv = [(su + 1.0) * 0.5, (1.0 - sv) * 0.5];
            vertices.push(MeshVertex::new(position.to_array(), normal.to_array(), uv));
        }
        indices.extend_from_slice(&face_indices(face as u32));
    }

    Geometry::new(label, vertices, indices)
}

/// Position-only unit cube sampled as a cubemap direction.
#[must_use]
pub fn create_skybox_cube() -> Geometry<PositionVertex> {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (normal, u, v)) in FACES.into_iter().enumerate() {
        for (su, sv) in CORNERS {
            vertices.push(PositionVertex {
                position: (normal + u * su + v * sv).to_array(),
            });
        }
        indices.extend_from_slice(&face_indices(face as u32));
    }

    Geometry::new("Skybox Cube", vertices, indices)
}
