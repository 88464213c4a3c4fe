//! Composite Pass
//!
//! Samples the HDR scene colour and the blurred bright image, applies the
//! exposure tone map and the selected full-screen filter, and writes the
//! surface.

use wgpu::ShaderStages;

use crate::errors::Result;
use crate::renderer::core::LayoutBuilder;
use crate::renderer::graph::context::{ExecuteContext, PrepareContext};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::{ShaderCompilationOptions, ShaderManager};
use crate::renderer::targets::{FramebufferGraph, TextureRegistry};
use crate::resources::uniforms::CompositeUniforms;

use super::blur::BlurSource;
use super::{fullscreen_pipeline, texture_bind_group};

pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Last block written, to skip redundant uploads.
    uniforms: Option<CompositeUniforms>,
    surface_is_srgb: bool,
}

impl CompositePass {
    pub const TEMPLATE: &'static str = "post/composite";

    /// Bindings of group 0: scene colour, blurred bloom, one sampler and the
    /// composite block.
    #[must_use]
    pub fn layout() -> LayoutBuilder {
        LayoutBuilder::new()
            .texture("scene", wgpu::TextureViewDimension::D2, ShaderStages::FRAGMENT)
            .texture("bloom", wgpu::TextureViewDimension::D2, ShaderStages::FRAGMENT)
            .sampler("scene", ShaderStages::FRAGMENT)
            .uniform::<CompositeUniforms>("composite", ShaderStages::FRAGMENT)
    }

    /// `bloom_source` is the image the blur schedule leaves its result in.
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        registry: &TextureRegistry,
        targets: &FramebufferGraph,
        bloom_source: BlurSource,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let builder = Self::layout();
        let layout = builder.build_layout(device, "Composite Layout");

        let (module, _) = shaders.get_or_compile_template(
            device,
            Self::TEMPLATE,
            &ShaderCompilationOptions::new(),
            None,
            &builder.generate_wgsl(0),
        )?;
        let pipeline = fullscreen_pipeline(device, "Composite Pipeline", module, &layout, surface_format);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Composite Uniforms"),
            size: std::mem::size_of::<CompositeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene = targets.scene_color();
        let bind_group = texture_bind_group(
            device,
            "Composite BindGroup",
            &layout,
            registry,
            &[scene, bloom_source.handle(targets)],
            scene,
            Some(&uniform_buffer),
        )?;

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
            uniforms: None,
            surface_is_srgb: surface_format.is_srgb(),
        })
    }

    pub fn destroy(&self) {
        self.uniform_buffer.destroy();
    }
}

impl RenderNode for CompositePass {
    fn name(&self) -> &str {
        "Composite Pass"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext) {
        let uniforms = CompositeUniforms::from_state(&ctx.state.post, self.surface_is_srgb);
        if self.uniforms != Some(uniforms) {
            ctx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
            self.uniforms = Some(uniforms);
        }
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.surface_view,
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
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
