//! Geometry & Asset Tests
//!
//! Tests for:
//! - Primitive shapes: box, skybox cube, foliage quad, tangent quad
//! - Per-triangle tangent frames
//! - OBJ loading via tobj: flipped UVs, material paths, missing attributes
//! - Image decoding

use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use lumen::assets::{decode_image, load_obj};
use lumen::errors::LumenError;
use lumen::resources::primitives::{
    PrimitiveSet, create_box, create_foliage_quad, create_skybox_cube, create_tangent_quad, triangle_tangents,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lumen_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, file: &str, contents: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn box_has_24_vertices_and_12_triangles() {
    let cube = create_box("Cube", 0.5);
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.index_count(), 36);
    assert_eq!(cube.triangle_count(), 12);
}

#[test]
fn box_vertices_lie_on_half_extent() {
    let cube = create_box("Cube", 1.0);
    for vertex in &cube.vertices {
        let p = Vec3::from_array(vertex.position);
        assert!(approx(p.abs().max_element(), 1.0));
    }
}

#[test]
fn box_triangles_wind_counter_clockwise_outward() {
    let cube = create_box("Cube", 0.5);
    for [a, b, c] in cube.triangles() {
        let (a, b, c) = (&cube.vertices[a as usize], &cube.vertices[b as usize], &cube.vertices[c as usize]);
        let p = |v: &lumen::renderer::pipeline::MeshVertex| Vec3::from_array(v.position);
        let face_normal = (p(b) - p(a)).cross(p(c) - p(a)).normalize();
        assert!(vec3_approx(face_normal, Vec3::from_array(a.normal)));
    }
}

#[test]
fn box_normals_are_axis_aligned_units() {
    let cube = create_box("Cube", 0.5);
    for vertex in &cube.vertices {
        let n = Vec3::from_array(vertex.normal);
        assert!(approx(n.length(), 1.0));
        assert!(approx(n.abs().max_element(), 1.0));
    }
}

#[test]
fn skybox_cube_is_unit_positions_only() {
    let sky = create_skybox_cube();
    assert_eq!(sky.vertex_count(), 24);
    assert_eq!(sky.index_count(), 36);
    for vertex in &sky.vertices {
        assert!(approx(Vec3::from_array(vertex.position).abs().max_element(), 1.0));
    }
}

#[test]
fn foliage_quad_is_two_triangles_with_top_row_at_v_zero() {
    let quad = create_foliage_quad();
    assert_eq!(quad.vertex_count(), 6);
    assert_eq!(quad.triangle_count(), 2);
    for vertex in &quad.vertices {
        let expected_v = if vertex.position[1] > 0.0 { 0.0 } else { 1.0 };
        assert!(approx(vertex.uv[1], expected_v));
    }
}

#[test]
fn primitive_set_starts_without_gpu_buffers() {
    let set = PrimitiveSet::new();
    assert!(!set.is_initialized());
    assert!(set.light_cube.mesh().is_none());
    assert_eq!(set.bloom_cube.geometry().vertex_count(), 24);
}

// ============================================================================
// Tangent frames
// ============================================================================

#[test]
fn tangents_follow_uv_axes() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let uvs = [Vec2::ZERO, Vec2::X, Vec2::Y];
    let (tangent, bitangent) = triangle_tangents(positions, uvs);

    assert!(vec3_approx(tangent, Vec3::X));
    assert!(vec3_approx(bitangent, Vec3::Y));
}

#[test]
fn tangents_follow_rotated_uvs() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let uvs = [Vec2::ZERO, Vec2::Y, Vec2::X];
    let (tangent, bitangent) = triangle_tangents(positions, uvs);

    assert!(vec3_approx(tangent, Vec3::Y));
    assert!(vec3_approx(bitangent, Vec3::X));
}

#[test]
fn degenerate_uvs_give_zero_tangents() {
    let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
    let uvs = [Vec2::ONE; 3];
    assert_eq!(triangle_tangents(positions, uvs), (Vec3::ZERO, Vec3::ZERO));
}

#[test]
fn tangent_quad_frame_is_orthonormal() {
    let quad = create_tangent_quad();
    assert_eq!(quad.vertex_count(), 6);

    for vertex in &quad.vertices {
        let n = Vec3::from_array(vertex.normal);
        let t = Vec3::from_array(vertex.tangent);
        let b = Vec3::from_array(vertex.bitangent);
        assert!(vec3_approx(n, Vec3::Z));
        assert!(vec3_approx(t, Vec3::X));
        assert!(vec3_approx(b, Vec3::Y));
        assert!(vec3_approx(t.cross(b), n));
    }
}

// ============================================================================
// OBJ loading
// ============================================================================

const QUAD_OBJ: &str = "\
mtllib quad.mtl
o Quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl stone
f 1/1/1 2/2/1 3/3/1 4/4/1
";

const QUAD_MTL: &str = "\
newmtl stone
Kd 1 1 1
map_Kd stone_diffuse.png
map_Ks stone_spec.png
";

#[test]
fn obj_quad_is_triangulated_and_single_indexed() -> anyhow::Result<()> {
    let dir = scratch_dir("obj_quad");
    write(&dir, "quad.mtl", QUAD_MTL);
    let path = write(&dir, "quad.obj", QUAD_OBJ);

    let model = load_obj(&path)?;
    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.vertex_count(), 4);

    let mesh = &model.meshes[0];
    assert_eq!(mesh.name, "Quad");
    assert_eq!(mesh.geometry.index_count(), 6);
    assert_eq!(mesh.material, Some(0));
    Ok(())
}

#[test]
fn obj_texture_v_is_flipped() {
    let dir = scratch_dir("obj_flip");
    write(&dir, "quad.mtl", QUAD_MTL);
    let path = write(&dir, "quad.obj", QUAD_OBJ);

    let model = load_obj(&path).unwrap();
    let origin = model.meshes[0]
        .geometry
        .vertices
        .iter()
        .find(|v| v.position == [0.0, 0.0, 0.0])
        .unwrap();

    assert_eq!(origin.uv, [0.0, 1.0]);
    assert_eq!(origin.normal, [0.0, 0.0, 1.0]);
}

#[test]
fn obj_material_paths_resolve_against_model_directory() -> anyhow::Result<()> {
    let dir = scratch_dir("obj_mtl");
    write(&dir, "quad.mtl", QUAD_MTL);
    let path = write(&dir, "quad.obj", QUAD_OBJ);

    let model = load_obj(&path)?;
    assert_eq!(model.materials.len(), 1);

    let material = &model.materials[0];
    assert_eq!(material.name, "stone");
    assert_eq!(material.diffuse_texture.as_deref(), Some(dir.join("stone_diffuse.png").as_path()));
    assert_eq!(material.specular_texture.as_deref(), Some(dir.join("stone_spec.png").as_path()));
    Ok(())
}

#[test]
fn obj_without_normals_or_uvs_is_zero_filled() {
    let dir = scratch_dir("obj_bare");
    let path = write(&dir, "tri.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

    let model = load_obj(&path).unwrap();
    assert_eq!(model.meshes.len(), 1);
    assert!(model.materials.is_empty());

    let mesh = &model.meshes[0];
    assert_eq!(mesh.material, None);
    for vertex in &mesh.geometry.vertices {
        assert_eq!(vertex.normal, [0.0; 3]);
        assert_eq!(vertex.uv, [0.0; 2]);
    }
}

#[test]
fn obj_with_missing_library_loads_without_materials() {
    let dir = scratch_dir("obj_nolib");
    let path = write(&dir, "quad.obj", &QUAD_OBJ.replace("quad.mtl", "absent.mtl"));

    let model = load_obj(&path).unwrap();
    assert!(model.materials.is_empty());
    assert_eq!(model.meshes[0].material, None);
}

#[test]
fn missing_obj_is_a_model_error() {
    let result = load_obj("no/such/model.obj");
    assert!(matches!(result, Err(LumenError::ModelLoadError(_))));
}

// ============================================================================
// Images
// ============================================================================

#[test]
fn decoded_png_is_rgba8() -> anyhow::Result<()> {
    let dir = scratch_dir("png");
    let path = dir.join("pixel.png");
    image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30])).save(&path)?;

    let decoded = decode_image(&path)?;
    assert_eq!((decoded.width, decoded.height), (3, 2));
    assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
    assert_eq!(&decoded.pixels[..4], &[10, 20, 30, 255]);
    Ok(())
}
