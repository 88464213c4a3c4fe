//! Frame passes
//!
//! | Pass              | Reads                                | Writes                     |
//! |-------------------|--------------------------------------|----------------------------|
//! | [`GeometryPass`]  | scene meshes, material textures      | HDR target (2 colours + depth) |
//! | [`BlurPass`]      | HDR bright attachment, ping-pong     | ping-pong pair             |
//! | [`CompositePass`] | HDR scene colour, final blur output  | surface                    |
//! | [`OverlayPass`]   | egui tessellation                    | surface                    |

pub mod blur;
pub mod composite;
pub mod geometry;
pub mod overlay;

pub use blur::{BlurPass, BlurSchedule, BlurSource, BlurStep};
pub use composite::CompositePass;
pub use geometry::{DrawItem, DrawKind, DrawPlan, GeometryPass, Program, RasterState};
pub use overlay::OverlayPass;

use crate::errors::Result;
use crate::renderer::targets::{TextureHandle, TextureRegistry};

/// Builds a bind group whose layout lists `textures` first, then one sampler,
/// then an optional uniform buffer, matching the order
/// [`LayoutBuilder`](crate::renderer::core::LayoutBuilder) assigns.
///
/// The sampler is the one registered with `textures[sampler_source]`.
pub(crate) fn texture_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    registry: &TextureRegistry,
    textures: &[TextureHandle],
    sampler_source: TextureHandle,
    uniform: Option<&wgpu::Buffer>,
) -> Result<wgpu::BindGroup> {
    let mut entries = Vec::with_capacity(textures.len() + 2);
    for (binding, &handle) in textures.iter().enumerate() {
        entries.push(wgpu::BindGroupEntry {
            binding: binding as u32,
            resource: wgpu::BindingResource::TextureView(registry.view(handle)?),
        });
    }

    let sampler_binding = textures.len() as u32;
    entries.push(wgpu::BindGroupEntry {
        binding: sampler_binding,
        resource: wgpu::BindingResource::Sampler(&registry.get(sampler_source)?.sampler),
    });

    if let Some(buffer) = uniform {
        entries.push(wgpu::BindGroupEntry {
            binding: sampler_binding + 1,
            resource: buffer.as_entire_binding(),
        });
    }

    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    }))
}

/// Pipeline drawing one full-screen triangle with a single bind group.
pub(crate) fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{label} Layout")),
        bind_group_layouts: &[Some(layout)],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
