//! Ping-pong Gaussian blur of the bright attachment.
//!
//! Each iteration runs one axis of a separable kernel into ping-pong buffer
//! `horizontal as usize`. The first iteration is horizontal and reads the
//! bright attachment; every later one reads the buffer the previous iteration
//! wrote. With an even iteration count the result lands in buffer 0.

use wgpu::ShaderStages;

use crate::errors::Result;
use crate::renderer::core::LayoutBuilder;
use crate::renderer::graph::context::ExecuteContext;
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::{ShaderCompilationOptions, ShaderManager};
use crate::renderer::targets::{FramebufferGraph, HDR_FORMAT, TextureHandle, TextureRegistry};
use crate::resources::uniforms::BlurUniforms;

use super::{fullscreen_pipeline, texture_bind_group};

/// Image a blur iteration samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurSource {
    /// Bright attachment of the HDR target.
    Bright,
    PingPong(usize),
}

impl BlurSource {
    #[must_use]
    pub fn handle(self, targets: &FramebufferGraph) -> TextureHandle {
        match self {
            Self::Bright => targets.bright(),
            Self::PingPong(index) => targets.ping_pong_color(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurStep {
    pub index: u32,
    pub horizontal: bool,
    pub source: BlurSource,
    /// Ping-pong buffer written.
    pub target: usize,
}

/// The sequence of blur iterations for a given count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurSchedule {
    pub iterations: u32,
}

impl BlurSchedule {
    #[must_use]
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn steps(self) -> impl Iterator<Item = BlurStep> {
        (0..self.iterations).map(|index| {
            let horizontal = index % 2 == 0;
            let source = if index == 0 {
                BlurSource::Bright
            } else {
                BlurSource::PingPong(usize::from(!horizontal))
            };
            BlurStep {
                index,
                horizontal,
                source,
                target: usize::from(horizontal),
            }
        })
    }

    /// Image holding the blurred result once every step has run.
    #[must_use]
    pub fn final_source(self) -> BlurSource {
        self.steps().last().map_or(BlurSource::Bright, |step| BlurSource::PingPong(step.target))
    }
}

/// Bind groups indexed by `[source][horizontal]`.
struct BlurBindings {
    bright: [wgpu::BindGroup; 2],
    ping_pong: [[wgpu::BindGroup; 2]; 2],
}

impl BlurBindings {
    fn get(&self, source: BlurSource, horizontal: bool) -> Option<&wgpu::BindGroup> {
        let axis = usize::from(horizontal);
        match source {
            BlurSource::Bright => Some(&self.bright[axis]),
            BlurSource::PingPong(index) => self.ping_pong.get(index).map(|groups| &groups[axis]),
        }
    }
}

pub struct BlurPass {
    pipeline: wgpu::RenderPipeline,
    bindings: BlurBindings,
    /// Vertical at 0, horizontal at 1.
    uniforms: [wgpu::Buffer; 2],
    schedule: BlurSchedule,
}

impl BlurPass {
    pub const TEMPLATE: &'static str = "post/blur";

    /// Bindings of group 0: source image, its sampler and the axis block.
    #[must_use]
    pub fn layout() -> LayoutBuilder {
        LayoutBuilder::new()
            .texture("image", wgpu::TextureViewDimension::D2, ShaderStages::FRAGMENT)
            .sampler("image", ShaderStages::FRAGMENT)
            .uniform::<BlurUniforms>("blur", ShaderStages::FRAGMENT)
    }

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shaders: &mut ShaderManager,
        registry: &TextureRegistry,
        targets: &FramebufferGraph,
        iterations: u32,
    ) -> Result<Self> {
        let builder = Self::layout();
        let layout = builder.build_layout(device, "Blur Layout");

        let (module, _) = shaders.get_or_compile_template(
            device,
            Self::TEMPLATE,
            &ShaderCompilationOptions::new(),
            None,
            &builder.generate_wgsl(0),
        )?;
        let pipeline = fullscreen_pipeline(device, "Blur Pipeline", module, &layout, HDR_FORMAT);

        let uniforms = [false, true].map(|horizontal| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(if horizontal { "Blur Uniforms H" } else { "Blur Uniforms V" }),
                size: std::mem::size_of::<BlurUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            queue.write_buffer(&buffer, 0, bytemuck::bytes_of(&BlurUniforms::new(horizontal)));
            buffer
        });

        let bindings = Self::create_bindings(device, &layout, registry, targets, &uniforms)?;

        Ok(Self {
            pipeline,
            bindings,
            uniforms,
            schedule: BlurSchedule::new(iterations),
        })
    }

    fn create_bindings(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        registry: &TextureRegistry,
        targets: &FramebufferGraph,
        uniforms: &[wgpu::Buffer; 2],
    ) -> Result<BlurBindings> {
        let group = |source: BlurSource, axis: usize| -> Result<wgpu::BindGroup> {
            let handle = source.handle(targets);
            texture_bind_group(
                device,
                &format!("Blur {source:?} axis {axis}"),
                layout,
                registry,
                &[handle],
                handle,
                Some(&uniforms[axis]),
            )
        };

        Ok(BlurBindings {
            bright: [group(BlurSource::Bright, 0)?, group(BlurSource::Bright, 1)?],
            ping_pong: [
                [group(BlurSource::PingPong(0), 0)?, group(BlurSource::PingPong(0), 1)?],
                [group(BlurSource::PingPong(1), 0)?, group(BlurSource::PingPong(1), 1)?],
            ],
        })
    }

    #[inline]
    #[must_use]
    pub fn schedule(&self) -> BlurSchedule {
        self.schedule
    }

    pub fn destroy(&self) {
        for buffer in &self.uniforms {
            buffer.destroy();
        }
    }
}

impl RenderNode for BlurPass {
    fn name(&self) -> &str {
        "Blur Pass"
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        encoder.push_debug_group(self.name());

        for step in self.schedule.steps() {
            let target = match ctx.textures.view(ctx.targets.ping_pong_color(step.target)) {
                Ok(view) => view,
                Err(e) => {
                    log::error!("Blur target {} unavailable: {e}", step.target);
                    break;
                }
            };
            let Some(bind_group) = self.bindings.get(step.source, step.horizontal) else {
                log::error!("No blur binding for {:?}", step.source);
                break;
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blur Step"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        encoder.pop_debug_group();
    }
}
