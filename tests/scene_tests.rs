//! Scene & Frame Tests
//!
//! Tests for:
//! - FlyCamera: matrices, keyboard/mouse/scroll, restored front vectors
//! - Lights: spotlight resolution, active emitter selection, attenuation
//! - Scene layout transforms
//! - DrawPlan ordering and fixed-function state
//! - FrameContext and the per-frame phase sequence
//! - BlurSchedule ping-pong ordering

use glam::{Mat4, Vec3, Vec4};
use lumen::renderer::graph::passes::{BlurSchedule, BlurSource, DrawKind, DrawPlan, Program, RasterState};
use lumen::renderer::graph::{FrameContext, FramePhase};
use lumen::scene::camera::{CameraMovement, FlyCamera};
use lumen::scene::layout;
use lumen::scene::light::{ActiveEmitter, LightingState};
use lumen::state::{Placement, RenderState};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// FlyCamera
// ============================================================================

#[test]
fn camera_default_looks_down_negative_z() {
    let camera = FlyCamera::default();
    assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
    assert!(vec3_approx(camera.front, Vec3::NEG_Z));
    assert!(vec3_approx(camera.right, Vec3::X));
    assert!(vec3_approx(camera.up, Vec3::Y));
    assert!(approx(camera.zoom, FlyCamera::MAX_ZOOM));
}

#[test]
fn view_matrix_moves_eye_to_origin() {
    let camera = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
    let eye = camera.view_matrix().transform_point3(camera.position);
    assert!(vec3_approx(eye, Vec3::ZERO));
}

#[test]
fn skybox_view_drops_translation() {
    let camera = FlyCamera::new(Vec3::new(5.0, -2.0, 7.0));
    let view = camera.skybox_view_matrix();
    assert!(vec3_approx(view.w_axis.truncate(), Vec3::ZERO));
    assert!(approx(view.w_axis.w, 1.0));
    assert!(vec3_approx(view.transform_vector3(Vec3::NEG_Z), camera.view_matrix().transform_vector3(Vec3::NEG_Z)));
}

#[test]
fn projection_maps_near_plane_to_zero_depth() {
    let camera = FlyCamera::default();
    let clip = camera.projection_matrix(4.0 / 3.0) * Vec4::new(0.0, 0.0, -FlyCamera::NEAR, 1.0);
    assert!(approx(clip.z / clip.w, 0.0));

    let clip = camera.projection_matrix(4.0 / 3.0) * Vec4::new(0.0, 0.0, -FlyCamera::FAR, 1.0);
    assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
}

#[test]
fn keyboard_moves_at_configured_speed() {
    let mut camera = FlyCamera::default();
    camera.process_keyboard(CameraMovement::Right, 2.0);
    assert!(vec3_approx(camera.position, Vec3::new(2.0 * FlyCamera::DEFAULT_SPEED, 0.0, 3.0)));

    camera.process_keyboard(CameraMovement::Left, 2.0);
    camera.process_keyboard(CameraMovement::Backward, 1.0);
    assert!(vec3_approx(camera.position, Vec3::new(0.0, 0.0, 3.0 + FlyCamera::DEFAULT_SPEED)));
}

#[test]
fn mouse_pitch_is_constrained() {
    let mut camera = FlyCamera::default();
    camera.process_mouse_movement(0.0, 10_000.0, true);
    assert!(approx(camera.pitch, FlyCamera::PITCH_LIMIT));

    camera.process_mouse_movement(0.0, -20_000.0, true);
    assert!(approx(camera.pitch, -FlyCamera::PITCH_LIMIT));
}

#[test]
fn mouse_movement_keeps_basis_orthonormal() {
    let mut camera = FlyCamera::default();
    camera.process_mouse_movement(123.0, 45.0, true);

    assert!(approx(camera.front.length(), 1.0));
    assert!(approx(camera.right.length(), 1.0));
    assert!(approx(camera.front.dot(camera.right), 0.0));
    assert!(approx(camera.front.dot(camera.up), 0.0));
}

#[test]
fn scroll_zoom_is_clamped() {
    let mut camera = FlyCamera::default();
    camera.process_mouse_scroll(100.0);
    assert!(approx(camera.zoom, FlyCamera::MIN_ZOOM));

    camera.process_mouse_scroll(-100.0);
    assert!(approx(camera.zoom, FlyCamera::MAX_ZOOM));
}

#[test]
fn set_front_keeps_vector_and_derives_angles() {
    let mut camera = FlyCamera::default();
    let front = Vec3::new(0.0, 1.0, 1.0).normalize();
    camera.set_front(front);

    assert_eq!(camera.front, front);
    assert!((camera.pitch - 45.0).abs() < 1e-3);
    assert!((camera.yaw - 90.0).abs() < 1e-3);
}

#[test]
fn set_front_ignores_zero_vector() {
    let mut camera = FlyCamera::default();
    let before = camera.clone();
    camera.set_front(Vec3::ZERO);
    assert_eq!(camera, before);
}

#[test]
fn vertical_front_is_clamped_to_pitch_limit() {
    for (front, limit) in [(Vec3::Y, FlyCamera::PITCH_LIMIT), (Vec3::NEG_Y, -FlyCamera::PITCH_LIMIT)] {
        let mut camera = FlyCamera::default();
        camera.set_front(front);

        assert!(approx(camera.pitch, limit));
        assert!(approx(camera.yaw, FlyCamera::DEFAULT_YAW));
        assert!(approx(camera.right.length(), 1.0));
        assert!(approx(camera.up.length(), 1.0));
        assert!(camera.front.dot(front) > 0.99);
        assert!(camera.view_matrix().is_finite());
        assert!(camera.skybox_view_matrix().is_finite());
    }
}

// ============================================================================
// Lights
// ============================================================================

#[test]
fn disabled_spotlight_is_dark_but_follows_camera() {
    let lighting = LightingState::default();
    let camera = FlyCamera::new(Vec3::new(1.0, 1.0, 1.0));
    let spot = lighting.resolved_spotlight(&camera);

    assert_eq!(spot.position, camera.position);
    assert_eq!(spot.direction, camera.front);
    assert_eq!(spot.diffuse, Vec3::ZERO);
    assert_eq!(spot.specular, Vec3::ZERO);
}

#[test]
fn enabled_spotlight_keeps_its_colour() {
    let mut lighting = LightingState::default();
    lighting.spotlight_enabled = true;
    let spot = lighting.resolved_spotlight(&FlyCamera::default());
    assert_eq!(spot.diffuse, lighting.spot.diffuse);
}

#[test]
fn active_emitter_follows_bloom_switch() {
    let lighting = LightingState::default();
    assert_eq!(ActiveEmitter::select(false), ActiveEmitter::PointLight0);
    assert_eq!(ActiveEmitter::select(true), ActiveEmitter::Bloom);

    assert_eq!(ActiveEmitter::PointLight0.position(&lighting), lighting.points[0].position);
    assert_eq!(ActiveEmitter::Bloom.position(&lighting), lighting.bloom_emitter);
    assert!(approx(lighting.bloom_emitter.y, lighting.points[0].position.y));
}

#[test]
fn attenuation_is_one_over_constant_at_source() {
    let lighting = LightingState::default();
    let attenuation = lighting.points[0].attenuation;
    assert!(approx(attenuation.factor(0.0), 1.0 / attenuation.constant));
    assert!(attenuation.factor(10.0) < attenuation.factor(1.0));
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn statue_spins_about_its_position() {
    let placement = Placement {
        position: Vec3::new(1.0, 0.0, -1.0),
        scale: 0.5,
    };
    let model = layout::statue_model(&placement, 1.0);
    assert!(vec3_approx(model.transform_point3(Vec3::ZERO), placement.position));

    let quarter_turn = 90.0 / layout::STATUE_SPIN_RATE;
    let spun = layout::statue_model(&placement, quarter_turn).transform_vector3(Vec3::X);
    assert!(vec3_approx(spun, Vec3::new(0.0, 0.0, -0.5)));
}

#[test]
fn floor_tile_faces_up() {
    let normal = layout::floor_model().transform_vector3(Vec3::Z).normalize();
    assert!(approx(normal.y.abs(), 1.0));
    assert!(vec3_approx(layout::floor_model().transform_point3(Vec3::ZERO), layout::FLOOR_POSITION));
}

#[test]
fn window_sits_above_statue() {
    let statue = Vec3::new(2.0, 0.0, 0.0);
    let origin = layout::window_model(statue).transform_point3(Vec3::ZERO);
    assert!(vec3_approx(origin, statue + layout::WINDOW_OFFSET));
}

// ============================================================================
// DrawPlan
// ============================================================================

fn default_plan() -> DrawPlan {
    DrawPlan::build(&RenderState::default(), 0.0)
}

#[test]
fn draw_plan_order() {
    let plan = default_plan();
    let kinds: Vec<DrawKind> = plan.items().iter().map(|item| item.kind).collect();

    assert_eq!(plan.len(), 18);
    assert_eq!(kinds[0], DrawKind::Statue);
    assert_eq!(kinds[1], DrawKind::Pedestal);
    assert_eq!(&kinds[2..4], &[DrawKind::Foliage, DrawKind::Foliage]);
    assert_eq!(kinds[4], DrawKind::Window);
    assert!(kinds[5..13].iter().all(|&k| k == DrawKind::Brick));
    assert_eq!(kinds[13], DrawKind::Floor);
    assert_eq!(&kinds[14..16], &[DrawKind::Indicator, DrawKind::Indicator]);
    assert_eq!(kinds[16], DrawKind::BloomSource);
    assert_eq!(kinds[17], DrawKind::Skybox);
}

#[test]
fn skybox_is_drawn_last_with_front_culling() {
    let plan = default_plan();
    let last = plan.items().last().unwrap();

    assert_eq!(last.kind, DrawKind::Skybox);
    assert_eq!(last.kind.program(), Program::Skybox);
    assert_eq!(last.kind.raster(), RasterState::SKYBOX);
    assert_eq!(RasterState::SKYBOX.cull_mode, Some(wgpu::Face::Front));
    assert_eq!(RasterState::SKYBOX.depth_compare, wgpu::CompareFunction::LessEqual);
    assert!(plan.items()[..plan.len() - 1].iter().all(|item| item.kind != DrawKind::Skybox));
}

#[test]
fn bloom_source_is_emissive_at_point_light_two() {
    let state = RenderState::default();
    let plan = DrawPlan::build(&state, 0.0);
    let source = plan
        .items()
        .iter()
        .find(|item| item.kind == DrawKind::BloomSource)
        .unwrap();

    assert_eq!(source.uniforms.color, layout::BLOOM_EMISSION.extend(1.0));
    let origin = source.uniforms.model.transform_point3(Vec3::ZERO);
    assert!(vec3_approx(origin, state.program.lighting.points[2].position));
}

#[test]
fn indicators_follow_first_two_point_lights() {
    let state = RenderState::default();
    let plan = DrawPlan::build(&state, 0.0);
    let origins: Vec<Vec3> = plan
        .items()
        .iter()
        .filter(|item| item.kind == DrawKind::Indicator)
        .map(|item| item.uniforms.model.transform_point3(Vec3::ZERO))
        .collect();

    assert_eq!(origins.len(), 2);
    assert!(vec3_approx(origins[0], state.program.lighting.points[0].position));
    assert!(vec3_approx(origins[1], state.program.lighting.points[1].position));
}

#[test]
fn draw_uniforms_carry_normal_matrix() {
    let plan = default_plan();
    for item in plan.items() {
        let expected = item.uniforms.model.inverse().transpose();
        assert!(item.uniforms.normal_matrix.abs_diff_eq(expected, 1e-4));
    }
}

#[test]
fn rebuild_tracks_time_and_state() {
    let mut state = RenderState::default();
    let mut plan = DrawPlan::build(&state, 0.0);
    let first = plan.items()[0].uniforms.model;

    state.program.statue.position = Vec3::new(0.0, 1.0, 0.0);
    plan.rebuild(&state, 1.0);
    assert_eq!(plan.len(), 18);
    assert_ne!(plan.items()[0].uniforms.model, first);
    assert_ne!(plan.items()[0].uniforms.model, Mat4::IDENTITY);
}

#[test]
fn pipeline_keys_are_unique() {
    let keys = default_plan().pipeline_keys();
    assert_eq!(keys.len(), 7);
    assert_eq!(keys.first(), Some(&(Program::LitModel, RasterState::DEFAULT)));
    assert_eq!(keys.last(), Some(&(Program::Skybox, RasterState::SKYBOX)));
    assert!(keys.contains(&(Program::Parallax, RasterState::DOUBLE_SIDED)));
}

#[test]
fn only_parallax_program_sets_define() {
    for program in Program::ALL {
        let defines = program.options();
        assert_eq!(defines.defines().contains_key("PARALLAX"), program == Program::Parallax);
    }
    assert_eq!(Program::Parallax.template(), Program::NormalMapped.template());
}

// ============================================================================
// FrameContext & FramePhase
// ============================================================================

#[test]
fn frame_sequence_without_overlay() {
    let phases = FramePhase::sequence(false);
    assert_eq!(
        phases.as_slice(),
        &[
            FramePhase::Clear,
            FramePhase::Geometry,
            FramePhase::Blur,
            FramePhase::Composite,
            FramePhase::Present
        ]
    );
}

#[test]
fn frame_sequence_puts_overlay_before_present() {
    let phases = FramePhase::sequence(true);
    assert_eq!(phases.len(), 6);
    assert_eq!(phases[4], FramePhase::Overlay);
    assert_eq!(phases[5], FramePhase::Present);
}

#[test]
fn frame_context_uses_active_emitter() {
    let mut state = RenderState::default();
    let frame = FrameContext::new(&state, 4.0 / 3.0, 1.5, 0.016);
    assert_eq!(frame.emitter_position, state.program.lighting.points[0].position);
    assert!(approx(frame.time, 1.5));

    state.post.bloom_enabled = true;
    let frame = FrameContext::new(&state, 4.0 / 3.0, 1.5, 0.016);
    assert_eq!(frame.emitter_position, state.program.lighting.bloom_emitter);
}

#[test]
fn frame_uniforms_carry_parallax_and_threshold() {
    let mut state = RenderState::default();
    state.set_height_scale(0.25);
    let frame = FrameContext::new(&state, 1.0, 0.0, 0.0);
    let uniforms = frame.uniforms(state.height_scale(), 1.0);

    assert!(approx(uniforms.height_scale, 0.25));
    assert!(approx(uniforms.bright_threshold, 1.0));
    assert_eq!(uniforms.view, state.program.camera.view_matrix());
    assert_eq!(uniforms.view_position, state.program.camera.position);
}

// ============================================================================
// BlurSchedule
// ============================================================================

#[test]
fn ten_iterations_alternate_axes_and_end_in_buffer_zero() {
    let schedule = BlurSchedule::new(10);
    let steps: Vec<_> = schedule.steps().collect();

    assert_eq!(steps.len(), 10);
    assert!(steps[0].horizontal);
    assert_eq!(steps[0].source, BlurSource::Bright);
    for pair in steps.windows(2) {
        assert_ne!(pair[0].horizontal, pair[1].horizontal);
        assert_eq!(pair[1].source, BlurSource::PingPong(pair[0].target));
    }
    assert_eq!(schedule.final_source(), BlurSource::PingPong(0));
}

#[test]
fn odd_iterations_end_in_buffer_one() {
    assert_eq!(BlurSchedule::new(3).final_source(), BlurSource::PingPong(1));
}

#[test]
fn steps_never_read_their_own_target() {
    for step in BlurSchedule::new(10).steps() {
        assert_ne!(step.source, BlurSource::PingPong(step.target));
    }
}
