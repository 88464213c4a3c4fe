//! Render Graph Context
//!
//! The two phase-separated contexts handed to every [`RenderNode`](super::RenderNode):
//!
//! - [`PrepareContext`]: device and queue access plus the read-only frame
//!   inputs. Passes write uniform buffers here.
//! - [`ExecuteContext`]: everything a pass reads while recording commands.

use crate::assets::SceneModels;
use crate::renderer::targets::{FramebufferGraph, TextureRegistry};
use crate::resources::primitives::PrimitiveSet;
use crate::state::RenderState;

use super::frame::FrameContext;

pub struct PrepareContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub state: &'a RenderState,
    pub frame: &'a FrameContext,
}

pub struct ExecuteContext<'a> {
    pub targets: &'a FramebufferGraph,
    pub textures: &'a TextureRegistry,
    pub primitives: &'a PrimitiveSet,
    pub models: &'a SceneModels,
    /// Swap-chain view of the frame being drawn.
    pub surface_view: &'a wgpu::TextureView,
}
