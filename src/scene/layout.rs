//! Fixed scene layout.
//!
//! World placement of every drawable, as pure functions of the program state
//! and the elapsed time. Transforms compose right to left, so the last factor
//! is applied to the vertices first.

use glam::{Mat4, Vec3};

use crate::state::Placement;

/// Foliage billboard anchors.
pub const FOLIAGE_POSITIONS: [Vec3; 2] = [Vec3::new(-0.27, -0.28, -0.5), Vec3::new(-0.27, -0.28, 0.5)];
pub const FOLIAGE_SCALE: f32 = 0.5;

/// Normal-mapped tiles ringing the floor.
pub const BRICK_POSITIONS: [Vec3; 8] = [
    Vec3::new(0.0, -0.5, 1.4),
    Vec3::new(1.4, -0.5, 0.0),
    Vec3::new(1.4, -0.5, 1.4),
    Vec3::new(0.0, -0.5, -1.4),
    Vec3::new(-1.4, -0.5, 0.0),
    Vec3::new(-1.4, -0.5, -1.4),
    Vec3::new(1.4, -0.5, -1.4),
    Vec3::new(-1.4, -0.5, 1.4),
];
pub const TILE_SCALE: f32 = 0.7;

/// Parallax-mapped floor tile under the statue.
pub const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -0.5, 0.0);

/// Window box offset above the statue origin and its non-uniform scale.
pub const WINDOW_OFFSET: Vec3 = Vec3::new(0.0, 0.4, 0.0);
pub const WINDOW_SCALE: Vec3 = Vec3::new(0.3, 0.75, 0.3);

pub const INDICATOR_SCALE: f32 = 0.5;
pub const BLOOM_CUBE_SCALE: f32 = 0.3;

/// Radiance of the bloom source cube; well above 1 so it passes the bright threshold.
pub const BLOOM_EMISSION: Vec3 = Vec3::new(8.5, 8.0, 1.0);

/// Statue spin about +Y, in degrees per second.
pub const STATUE_SPIN_RATE: f32 = 50.0;

/// Turns the XY-plane quad into a floor tile facing +Y.
fn lay_flat() -> Mat4 {
    Mat4::from_rotation_x(90.0_f32.to_radians()) * Mat4::from_rotation_y(180.0_f32.to_radians())
}

#[must_use]
pub fn statue_model(placement: &Placement, time: f32) -> Mat4 {
    Mat4::from_translation(placement.position)
        * Mat4::from_scale(Vec3::splat(placement.scale))
        * Mat4::from_rotation_y((time * STATUE_SPIN_RATE).to_radians())
}

#[must_use]
pub fn pedestal_model(placement: &Placement) -> Mat4 {
    Mat4::from_translation(placement.position)
        * Mat4::from_scale(Vec3::splat(placement.scale))
        * Mat4::from_rotation_x(90.0_f32.to_radians())
}

#[must_use]
pub fn foliage_model(position: Vec3) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(FOLIAGE_SCALE))
}

#[must_use]
pub fn window_model(statue_position: Vec3) -> Mat4 {
    Mat4::from_translation(statue_position + WINDOW_OFFSET) * Mat4::from_scale(WINDOW_SCALE)
}

#[must_use]
pub fn brick_model(position: Vec3) -> Mat4 {
    Mat4::from_translation(position) * lay_flat() * Mat4::from_scale(Vec3::splat(TILE_SCALE))
}

#[must_use]
pub fn floor_model() -> Mat4 {
    Mat4::from_translation(FLOOR_POSITION) * Mat4::from_scale(Vec3::splat(TILE_SCALE)) * lay_flat()
}

#[must_use]
pub fn indicator_model(light_position: Vec3) -> Mat4 {
    Mat4::from_translation(light_position) * Mat4::from_scale(Vec3::splat(INDICATOR_SCALE))
}

#[must_use]
pub fn bloom_cube_model(light_position: Vec3) -> Mat4 {
    Mat4::from_translation(light_position) * Mat4::from_scale(Vec3::splat(BLOOM_CUBE_SCALE))
}
