use glam::{Vec2, Vec3};

use crate::renderer::pipeline::vertex::{MeshVertex, TangentVertex};
use crate::resources::geometry::Geometry;

/// Unit quad standing on its left edge, used for foliage billboards.
///
/// Spans x ∈ [0, 1], y ∈ [-0.5, 0.5] with the texture top at y = 0.5.
#[must_use]
pub fn create_foliage_quad() -> Geometry<MeshVertex> {
    const N: [f32; 3] = [0.0, 0.0, 1.0];
    let vertices = vec![
        MeshVertex::new([0.0, 0.5, 0.0], N, [0.0, 0.0]),
        MeshVertex::new([0.0, -0.5, 0.0], N, [0.0, 1.0]),
        MeshVertex::new([1.0, -0.5, 0.0], N, [1.0, 1.0]),
        MeshVertex::new([0.0, 0.5, 0.0], N, [0.0, 0.0]),
        MeshVertex::new([1.0, -0.5, 0.0], N, [1.0, 1.0]),
        MeshVertex::new([1.0, 0.5, 0.0], N, [1.0, 0.0]),
    ];
    Geometry::non_indexed("Foliage Quad", vertices)
}

/// Per-triangle tangent and bitangent from position and UV deltas.
///
/// Degenerate UV mappings yield zero vectors.
#[must_use]
pub fn triangle_tangents(positions: [Vec3; 3], uvs: [Vec2; 3]) -> (Vec3, Vec3) {
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
    if det.abs() <= f32::EPSILON {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    let f = 1.0 / det;

    let tangent = f * (delta_uv2.y * edge1 - delta_uv1.y * edge2);
    let bitangent = f * (-delta_uv2.x * edge1 + delta_uv1.x * edge2);
    (tangent.normalize_or_zero(), bitangent.normalize_or_zero())
}

/// 2×2 quad in the XY plane facing +Z, with a tangent frame for normal mapping.
///
/// Emitted as two flat triangles so each carries its own tangent basis.
#[must_use]
pub fn create_tangent_quad() -> Geometry<TangentVertex> {
    let corners = [
        (Vec3::new(-1.0, 1.0, 0.0), Vec2::new(0.0, 1.0)),
        (Vec3::new(-1.0, -1.0, 0.0), Vec2::new(0.0, 0.0)),
        (Vec3::new(1.0, -1.0, 0.0), Vec2::new(1.0, 0.0)),
        (Vec3::new(1.0, 1.0, 0.0), Vec2::new(1.0, 1.0)),
    ];
    let normal = Vec3::Z;

    let mut vertices = Vec::with_capacity(6);
    for triangle in [[0, 1, 2], [0, 2, 3]] {
        let positions = triangle.map(|i| corners[i].0);
        let uvs = triangle.map(|i| corners[i].1);
        let (tangent, bitangent) = triangle_tangents(positions, uvs);

        for (position, uv) in positions.into_iter().zip(uvs) {
            vertices.push(TangentVertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: uv.to_array(),
                tangent: tangent.to_array(),
                bitangent: bitangent.to_array(),
            });
        }
    }

    Geometry::non_indexed("Tangent Quad", vertices)
}
