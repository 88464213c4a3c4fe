//! Render Node Trait
//!
//! Every pass of the frame implements [`RenderNode`].

use super::context::{ExecuteContext, PrepareContext};

/// A single pass of the frame.
///
/// - `prepare` takes `&mut self` and the mutable-phase context: upload
///   uniforms, rebuild per-frame draw lists.
/// - `run` takes `&self` and only records GPU commands.
///
/// Pipelines and bind groups are created when the pass is constructed; both
/// phases only reuse them.
pub trait RenderNode {
    /// Debug label, also used as the GPU debug group name.
    fn name(&self) -> &str;

    fn prepare(&mut self, _ctx: &mut PrepareContext) {}

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder);
}
