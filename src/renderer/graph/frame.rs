//! Per-frame inputs and the fixed pass sequence.

use std::fmt;

use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::resources::uniforms::FrameUniforms;
use crate::scene::camera::FlyCamera;
use crate::scene::light::ActiveEmitter;
use crate::state::RenderState;

/// Matrices and timing shared by every pass of one frame.
///
/// Built once after input processing and before any draw; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub projection: Mat4,
    pub view: Mat4,
    /// `view` without its translation.
    pub skybox_view: Mat4,
    pub view_position: Vec3,
    /// Light position used by the tangent-space programs this frame.
    pub emitter_position: Vec3,
    pub time: f32,
    pub delta_time: f32,
}

impl FrameContext {
    #[must_use]
    pub fn new(state: &RenderState, aspect: f32, time: f32, delta_time: f32) -> Self {
        let camera: &FlyCamera = &state.program.camera;
        let emitter = ActiveEmitter::select(state.post.bloom_enabled);

        Self {
            projection: camera.projection_matrix(aspect),
            view: camera.view_matrix(),
            skybox_view: camera.skybox_view_matrix(),
            view_position: camera.position,
            emitter_position: emitter.position(&state.program.lighting),
            time,
            delta_time,
        }
    }

    /// The group 0 frame block for the scene programs.
    #[must_use]
    pub fn uniforms(&self, height_scale: f32, bright_threshold: f32) -> FrameUniforms {
        FrameUniforms {
            view: self.view,
            projection: self.projection,
            skybox_view: self.skybox_view,
            view_position: self.view_position,
            time: self.time,
            emitter_position: self.emitter_position,
            height_scale,
            bright_threshold,
            ..FrameUniforms::default()
        }
    }
}

/// One step of the per-frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Clear the HDR target to the background colour.
    Clear,
    Geometry,
    Blur,
    Composite,
    Overlay,
    Present,
}

impl FramePhase {
    /// The phases of one frame, in execution order. Only the overlay is optional.
    #[must_use]
    pub fn sequence(ui_enabled: bool) -> SmallVec<[FramePhase; 6]> {
        let mut phases = SmallVec::new();
        phases.extend_from_slice(&[Self::Clear, Self::Geometry, Self::Blur, Self::Composite]);
        if ui_enabled {
            phases.push(Self::Overlay);
        }
        phases.push(Self::Present);
        phases
    }
}

impl fmt::Display for FramePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clear => "clear",
            Self::Geometry => "geometry",
            Self::Blur => "blur",
            Self::Composite => "composite",
            Self::Overlay => "overlay",
            Self::Present => "present",
        })
    }
}
