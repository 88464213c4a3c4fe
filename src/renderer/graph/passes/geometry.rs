//! Geometry Pass
//!
//! Draws the whole scene into the HDR target. Every program writes two
//! colour outputs: the shaded radiance to attachment 0 and its bright portion
//! to attachment 1.
//!
//! # Draw order
//!
//! ```text
//! statue, pedestal          lit model     back-face culled
//! foliage ×2, window        blended       double sided
//! brick tiles ×8            normal map    double sided
//! floor                     parallax      double sided
//! light indicators ×2       unlit         back-face culled
//! bloom source              unlit         double sided
//! skybox (last)             skybox        front-face culled, LessEqual
//! ```
//!
//! The order is captured by the [`DrawPlan`], a pure list rebuilt each frame.
//! Cull mode and depth comparison are part of each pipeline, so ending the
//! render pass leaves no state behind.

use std::num::NonZeroU64;

use glam::{Mat4, Vec4};
use rustc_hash::FxHashMap;
use wgpu::ShaderStages;

use crate::assets::{Model, SceneAssets};
use crate::errors::Result;
use crate::renderer::core::LayoutBuilder;
use crate::renderer::graph::context::{ExecuteContext, PrepareContext};
use crate::renderer::graph::node::RenderNode;
use crate::renderer::pipeline::vertex::{MeshVertex, OwnedVertexBufferDesc, PositionVertex, TangentVertex, VertexLayout};
use crate::renderer::pipeline::{ShaderCompilationOptions, ShaderManager};
use crate::renderer::targets::{FramebufferGraph, TextureRegistry};
use crate::resources::primitives::Primitive;
use crate::resources::uniforms::{DrawUniforms, FrameUniforms, LightsUniforms};
use crate::scene::layout;
use crate::state::RenderState;

use super::texture_bind_group;

// ============================================================================
// Programs and fixed-function state
// ============================================================================

/// Shader program used by a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Program {
    /// Multi-light Phong with diffuse and specular maps.
    LitModel,
    /// Unlit texture with alpha.
    Blended,
    /// Tangent-space normal map lit by the active emitter.
    NormalMapped,
    /// Normal map plus steep parallax occlusion.
    Parallax,
    /// Flat colour from the draw block.
    Unlit,
    Skybox,
}

/// Material bind group shape of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MaterialKind {
    Lit,
    Blended,
    Tangent,
    Skybox,
}

impl MaterialKind {
    const ALL: [MaterialKind; 4] = [Self::Lit, Self::Blended, Self::Tangent, Self::Skybox];

    fn layout(self) -> LayoutBuilder {
        let fragment = ShaderStages::FRAGMENT;
        match self {
            Self::Lit => LayoutBuilder::new()
                .texture("diffuse", wgpu::TextureViewDimension::D2, fragment)
                .texture("specular", wgpu::TextureViewDimension::D2, fragment)
                .sampler("material", fragment),
            Self::Blended => LayoutBuilder::new()
                .texture("diffuse", wgpu::TextureViewDimension::D2, fragment)
                .sampler("material", fragment),
            Self::Tangent => LayoutBuilder::new()
                .texture("diffuse", wgpu::TextureViewDimension::D2, fragment)
                .texture("normal", wgpu::TextureViewDimension::D2, fragment)
                .texture("height", wgpu::TextureViewDimension::D2, fragment)
                .sampler("material", fragment),
            Self::Skybox => LayoutBuilder::new()
                .texture("skybox", wgpu::TextureViewDimension::Cube, fragment)
                .sampler("skybox", fragment),
        }
    }
}

impl Program {
    pub const ALL: [Program; 6] = [
        Self::LitModel,
        Self::Blended,
        Self::NormalMapped,
        Self::Parallax,
        Self::Unlit,
        Self::Skybox,
    ];

    #[must_use]
    pub fn template(self) -> &'static str {
        match self {
            Self::LitModel => "scene/lit_model",
            Self::Blended => "scene/blended",
            Self::NormalMapped | Self::Parallax => "scene/normal_mapped",
            Self::Unlit => "scene/unlit",
            Self::Skybox => "scene/skybox",
        }
    }

    #[must_use]
    pub fn options(self) -> ShaderCompilationOptions {
        match self {
            Self::Parallax => ShaderCompilationOptions::new().with_define("PARALLAX", "1"),
            _ => ShaderCompilationOptions::new(),
        }
    }

    /// WGSL declarations of bind groups 0 to 2 as the geometry pass binds them.
    #[must_use]
    pub fn binding_code(self) -> String {
        let mut code = format!("{}{}", global_bindings().generate_wgsl(0), draw_bindings().generate_wgsl(1));
        if let Some(kind) = self.material() {
            code.push_str(&kind.layout().generate_wgsl(2));
        }
        code
    }

    /// The generated `VertexInput` struct this program reads.
    #[must_use]
    pub fn vertex_input_code(self) -> String {
        self.vertex_layout().0
    }

    fn material(self) -> Option<MaterialKind> {
        match self {
            Self::LitModel => Some(MaterialKind::Lit),
            Self::Blended => Some(MaterialKind::Blended),
            Self::NormalMapped | Self::Parallax => Some(MaterialKind::Tangent),
            Self::Skybox => Some(MaterialKind::Skybox),
            Self::Unlit => None,
        }
    }

    fn vertex_layout(self) -> (String, OwnedVertexBufferDesc) {
        match self {
            Self::LitModel | Self::Blended | Self::Unlit => {
                (MeshVertex::vertex_input_code(), OwnedVertexBufferDesc::of::<MeshVertex>())
            }
            Self::NormalMapped | Self::Parallax => {
                (TangentVertex::vertex_input_code(), OwnedVertexBufferDesc::of::<TangentVertex>())
            }
            Self::Skybox => (PositionVertex::vertex_input_code(), OwnedVertexBufferDesc::of::<PositionVertex>()),
        }
    }
}

/// Group 0: per-frame camera block and the light rig.
fn global_bindings() -> LayoutBuilder {
    LayoutBuilder::new()
        .uniform::<FrameUniforms>("frame", ShaderStages::VERTEX_FRAGMENT)
        .uniform::<LightsUniforms>("lights", ShaderStages::FRAGMENT)
}

/// Group 1: one dynamic-offset slot per draw.
fn draw_bindings() -> LayoutBuilder {
    LayoutBuilder::new().dynamic_uniform::<DrawUniforms>("draw", ShaderStages::VERTEX_FRAGMENT)
}

/// Culling and depth state baked into a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterState {
    pub cull_mode: Option<wgpu::Face>,
    pub depth_compare: wgpu::CompareFunction,
    pub depth_write: bool,
}

impl RasterState {
    /// Back faces culled, `Less`, depth written.
    pub const DEFAULT: Self = Self {
        cull_mode: Some(wgpu::Face::Back),
        depth_compare: wgpu::CompareFunction::Less,
        depth_write: true,
    };

    /// No culling, `Less`, depth written.
    pub const DOUBLE_SIDED: Self = Self {
        cull_mode: None,
        ..Self::DEFAULT
    };

    /// Seen from inside: front faces culled. `LessEqual` lets the far-plane
    /// depth pass where nothing else was drawn.
    pub const SKYBOX: Self = Self {
        cull_mode: Some(wgpu::Face::Front),
        depth_compare: wgpu::CompareFunction::LessEqual,
        depth_write: false,
    };
}

// ============================================================================
// Draw plan
// ============================================================================

/// What a draw item renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Statue,
    Pedestal,
    Foliage,
    Window,
    Brick,
    Floor,
    Indicator,
    BloomSource,
    Skybox,
}

impl DrawKind {
    #[must_use]
    pub fn program(self) -> Program {
        match self {
            Self::Statue | Self::Pedestal => Program::LitModel,
            Self::Foliage | Self::Window => Program::Blended,
            Self::Brick => Program::NormalMapped,
            Self::Floor => Program::Parallax,
            Self::Indicator | Self::BloomSource => Program::Unlit,
            Self::Skybox => Program::Skybox,
        }
    }

    #[must_use]
    pub fn raster(self) -> RasterState {
        match self {
            Self::Statue | Self::Pedestal | Self::Indicator => RasterState::DEFAULT,
            Self::Foliage | Self::Window | Self::Brick | Self::Floor | Self::BloomSource => RasterState::DOUBLE_SIDED,
            Self::Skybox => RasterState::SKYBOX,
        }
    }
}

/// One draw with its per-draw uniform block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub uniforms: DrawUniforms,
}

impl DrawItem {
    #[must_use]
    pub fn new(kind: DrawKind, model: Mat4) -> Self {
        Self::with_color(kind, model, Vec4::ONE)
    }

    #[must_use]
    pub fn with_color(kind: DrawKind, model: Mat4, color: Vec4) -> Self {
        Self {
            kind,
            uniforms: DrawUniforms::new(model, color),
        }
    }
}

/// Ordered draw list of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawPlan {
    items: Vec<DrawItem>,
}

impl DrawPlan {
    #[must_use]
    pub fn build(state: &RenderState, time: f32) -> Self {
        let mut plan = Self::default();
        plan.rebuild(state, time);
        plan
    }

    /// Refills the list in place.
    pub fn rebuild(&mut self, state: &RenderState, time: f32) {
        let program = &state.program;
        let lights = &program.lighting.points;
        let items = &mut self.items;
        items.clear();

        items.push(DrawItem::new(DrawKind::Statue, layout::statue_model(&program.statue, time)));
        items.push(DrawItem::new(DrawKind::Pedestal, layout::pedestal_model(&program.pedestal)));

        for position in layout::FOLIAGE_POSITIONS {
            items.push(DrawItem::new(DrawKind::Foliage, layout::foliage_model(position)));
        }
        items.push(DrawItem::new(DrawKind::Window, layout::window_model(program.statue.position)));

        for position in layout::BRICK_POSITIONS {
            items.push(DrawItem::new(DrawKind::Brick, layout::brick_model(position)));
        }
        items.push(DrawItem::new(DrawKind::Floor, layout::floor_model()));

        for light in &lights[..2] {
            items.push(DrawItem::new(DrawKind::Indicator, layout::indicator_model(light.position)));
        }
        items.push(DrawItem::with_color(
            DrawKind::BloomSource,
            layout::bloom_cube_model(lights[2].position),
            layout::BLOOM_EMISSION.extend(1.0),
        ));

        items.push(DrawItem::new(DrawKind::Skybox, Mat4::IDENTITY));
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct (program, raster state) pairs in first-use order.
    #[must_use]
    pub fn pipeline_keys(&self) -> Vec<(Program, RasterState)> {
        let mut keys = Vec::new();
        for item in &self.items {
            let key = (item.kind.program(), item.kind.raster());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

// ============================================================================
// GPU pass
// ============================================================================

const DRAW_SLOT_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;
const INITIAL_DRAW_CAPACITY: usize = 32;

struct MaterialBindGroups {
    /// One per model material, then the fallback.
    statue: Vec<wgpu::BindGroup>,
    pedestal: Vec<wgpu::BindGroup>,
    foliage: wgpu::BindGroup,
    window: wgpu::BindGroup,
    brick: wgpu::BindGroup,
    floor: wgpu::BindGroup,
    skybox: wgpu::BindGroup,
}

pub struct GeometryPass {
    frame_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,

    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    draw_staging: Vec<DrawUniforms>,

    pipelines: FxHashMap<(Program, RasterState), wgpu::RenderPipeline>,
    materials: MaterialBindGroups,

    plan: DrawPlan,
    bright_threshold: f32,
    clear_color: wgpu::Color,
}

impl GeometryPass {
    /// Compiles every program and binds every material texture.
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderManager,
        registry: &TextureRegistry,
        targets: &FramebufferGraph,
        assets: &SceneAssets,
        bright_threshold: f32,
    ) -> Result<Self> {
        let global_layout = global_bindings().build_layout(device, "Scene Global Layout");
        let draw_layout = draw_bindings().build_layout(device, "Scene Draw Layout");

        let material_layouts: FxHashMap<MaterialKind, wgpu::BindGroupLayout> = MaterialKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.layout().build_layout(device, &format!("{kind:?} Material Layout"))))
            .collect();

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Uniforms"),
            size: std::mem::size_of::<LightsUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Global BindGroup"),
            layout: &global_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let (draw_buffer, draw_bind_group) = Self::create_draw_slots(device, &draw_layout, INITIAL_DRAW_CAPACITY);

        // --- Pipelines ---
        let depth_format = targets.hdr.config.depth.unwrap_or(wgpu::TextureFormat::Depth32Float);
        let color_formats = targets.hdr.config.color_formats();

        let plan = DrawPlan::build(&RenderState::default(), 0.0);
        let mut pipelines = FxHashMap::default();
        for (program, raster) in plan.pipeline_keys() {
            let binding_code = program.binding_code();
            let mut layouts = vec![Some(&global_layout), Some(&draw_layout)];
            if let Some(kind) = program.material() {
                layouts.push(Some(&material_layouts[&kind]));
            }

            let (vertex_code, vertex_desc) = program.vertex_layout();
            let (module, _) =
                shaders.get_or_compile_template(device, program.template(), &program.options(), Some(&vertex_code), &binding_code)?;

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{program:?} Pipeline Layout")),
                bind_group_layouts: &layouts,
                immediate_size: 0,
            });

            let targets: Vec<Option<wgpu::ColorTargetState>> = color_formats
                .iter()
                .map(|&format| {
                    Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })
                })
                .collect();

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{program:?} Pipeline")),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_desc.as_wgpu()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    targets: &targets,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: raster.cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_format,
                    depth_write_enabled: Some(raster.depth_write),
                    depth_compare: Some(raster.depth_compare),
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

            log::debug!("Created pipeline {program:?} / {raster:?}");
            pipelines.insert((program, raster), pipeline);
        }

        // --- Materials ---
        let textures = &assets.textures;
        let model_groups = |model: &Model, label: &str| -> Result<Vec<wgpu::BindGroup>> {
            let layout = &material_layouts[&MaterialKind::Lit];
            let mut groups = Vec::with_capacity(model.materials.len() + 1);
            for (index, material) in model.materials.iter().enumerate() {
                groups.push(texture_bind_group(
                    device,
                    &format!("{label} Material {index}"),
                    layout,
                    registry,
                    &[material.diffuse, material.specular],
                    material.diffuse,
                    None,
                )?);
            }
            groups.push(texture_bind_group(
                device,
                &format!("{label} Fallback Material"),
                layout,
                registry,
                &[textures.white, textures.black],
                textures.white,
                None,
            )?);
            Ok(groups)
        };

        let blended_layout = &material_layouts[&MaterialKind::Blended];
        let tangent_layout = &material_layouts[&MaterialKind::Tangent];
        let materials = MaterialBindGroups {
            statue: model_groups(&assets.models.statue, "Statue")?,
            pedestal: model_groups(&assets.models.pedestal, "Pedestal")?,
            foliage: texture_bind_group(device, "Foliage Material", blended_layout, registry, &[textures.foliage], textures.foliage, None)?,
            window: texture_bind_group(device, "Window Material", blended_layout, registry, &[textures.window], textures.window, None)?,
            brick: texture_bind_group(
                device,
                "Brick Material",
                tangent_layout,
                registry,
                &[textures.brick_diffuse, textures.brick_normal, textures.black],
                textures.brick_diffuse,
                None,
            )?,
            floor: texture_bind_group(
                device,
                "Floor Material",
                tangent_layout,
                registry,
                &[textures.floor_diffuse, textures.floor_normal, textures.floor_height],
                textures.floor_diffuse,
                None,
            )?,
            skybox: texture_bind_group(
                device,
                "Skybox Material",
                &material_layouts[&MaterialKind::Skybox],
                registry,
                &[textures.skybox],
                textures.skybox,
                None,
            )?,
        };

        log::info!("Geometry pass ready: {} pipelines, {} shader modules", pipelines.len(), shaders.module_count());

        Ok(Self {
            frame_buffer,
            lights_buffer,
            global_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            draw_staging: Vec::with_capacity(INITIAL_DRAW_CAPACITY),
            pipelines,
            materials,
            plan,
            bright_threshold,
            clear_color: wgpu::Color::BLACK,
        })
    }

    fn create_draw_slots(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: DRAW_SLOT_SIZE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw BindGroup"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(DRAW_SLOT_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// The plan recorded by the last `prepare`.
    #[must_use]
    pub fn plan(&self) -> &DrawPlan {
        &self.plan
    }

    /// Records the clear of both HDR colour attachments and the depth buffer.
    pub fn clear(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let Some((scene, bright, depth)) = hdr_views(ctx) else {
            return;
        };
        let clear = wgpu::Operations {
            load: wgpu::LoadOp::Clear(self.clear_color),
            store: wgpu::StoreOp::Store,
        };

        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("HDR Clear"),
            color_attachments: &[
                Some(wgpu::RenderPassColorAttachment {
                    view: scene,
                    resolve_target: None,
                    ops: clear,
                    depth_slice: None,
                }),
                Some(wgpu::RenderPassColorAttachment {
                    view: bright,
                    resolve_target: None,
                    ops: clear,
                    depth_slice: None,
                }),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn draw_item(&self, pass: &mut wgpu::RenderPass<'_>, ctx: &ExecuteContext, kind: DrawKind) {
        let primitives = ctx.primitives;
        let materials = &self.materials;
        match kind {
            DrawKind::Statue => draw_model(pass, &ctx.models.statue, &materials.statue),
            DrawKind::Pedestal => draw_model(pass, &ctx.models.pedestal, &materials.pedestal),
            DrawKind::Foliage => {
                pass.set_bind_group(2, &materials.foliage, &[]);
                draw_primitive(pass, &primitives.foliage_quad);
            }
            DrawKind::Window => {
                pass.set_bind_group(2, &materials.window, &[]);
                draw_primitive(pass, &primitives.window_cube);
            }
            DrawKind::Brick => {
                pass.set_bind_group(2, &materials.brick, &[]);
                draw_primitive(pass, &primitives.tangent_quad);
            }
            DrawKind::Floor => {
                pass.set_bind_group(2, &materials.floor, &[]);
                draw_primitive(pass, &primitives.tangent_quad);
            }
            DrawKind::Indicator => draw_primitive(pass, &primitives.light_cube),
            DrawKind::BloomSource => draw_primitive(pass, &primitives.bloom_cube),
            DrawKind::Skybox => {
                pass.set_bind_group(2, &materials.skybox, &[]);
                draw_primitive(pass, &primitives.skybox);
            }
        }
    }
}

fn hdr_views<'a>(ctx: &ExecuteContext<'a>) -> Option<(&'a wgpu::TextureView, &'a wgpu::TextureView, &'a wgpu::TextureView)> {
    let targets = ctx.targets;
    let lookup = || -> Result<_> {
        let scene = ctx.textures.view(targets.scene_color())?;
        let bright = ctx.textures.view(targets.bright())?;
        let depth = match targets.hdr.depth() {
            Some(handle) => ctx.textures.view(handle)?,
            None => return Err(crate::errors::LumenError::TextureNotFound("HDR depth".into())),
        };
        Ok((scene, bright, depth))
    };
    match lookup() {
        Ok(views) => Some(views),
        Err(e) => {
            log::error!("HDR target unavailable: {e}");
            None
        }
    }
}

fn draw_primitive<V: VertexLayout>(pass: &mut wgpu::RenderPass<'_>, primitive: &Primitive<V>) {
    if let Some(mesh) = primitive.mesh() {
        mesh.draw(pass);
    }
}

fn draw_model(pass: &mut wgpu::RenderPass<'_>, model: &Model, groups: &[wgpu::BindGroup]) {
    for mesh in &model.meshes {
        let group = mesh.material.and_then(|i| groups.get(i)).or(groups.last());
        if let Some(group) = group {
            pass.set_bind_group(2, group, &[]);
        }
        mesh.mesh.draw(pass);
    }
}

impl RenderNode for GeometryPass {
    fn name(&self) -> &str {
        "Geometry Pass"
    }

    fn prepare(&mut self, ctx: &mut PrepareContext) {
        let state = ctx.state;
        let program = &state.program;

        let c = program.clear_color;
        self.clear_color = wgpu::Color {
            r: f64::from(c.x),
            g: f64::from(c.y),
            b: f64::from(c.z),
            a: 1.0,
        };

        let frame = ctx.frame.uniforms(state.height_scale(), self.bright_threshold);
        ctx.queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let lights = LightsUniforms::from_lighting(&program.lighting, &program.camera);
        ctx.queue.write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&lights));

        self.plan.rebuild(state, ctx.frame.time);

        if self.plan.len() > self.draw_capacity {
            let capacity = self.plan.len().next_power_of_two();
            log::debug!("Growing draw uniform slots {} -> {capacity}", self.draw_capacity);
            self.draw_buffer.destroy();
            let (buffer, bind_group) = Self::create_draw_slots(ctx.device, &self.draw_layout, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
        }

        self.draw_staging.clear();
        self.draw_staging.extend(self.plan.items().iter().map(|item| item.uniforms));
        ctx.queue.write_buffer(&self.draw_buffer, 0, bytemuck::cast_slice(&self.draw_staging));
    }

    fn run(&self, ctx: &ExecuteContext, encoder: &mut wgpu::CommandEncoder) {
        let Some((scene, bright, depth)) = hdr_views(ctx) else {
            return;
        };
        let load = wgpu::Operations {
            load: wgpu::LoadOp::Load,
            store: wgpu::StoreOp::Store,
        };

        encoder.push_debug_group(self.name());
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Geometry Pass"),
                color_attachments: &[
                    Some(wgpu::RenderPassColorAttachment {
                        view: scene,
                        resolve_target: None,
                        ops: load,
                        depth_slice: None,
                    }),
                    Some(wgpu::RenderPassColorAttachment {
                        view: bright,
                        resolve_target: None,
                        ops: load,
                        depth_slice: None,
                    }),
                ],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.global_bind_group, &[]);

            let mut bound = None;
            for (slot, item) in self.plan.items().iter().enumerate() {
                let key = (item.kind.program(), item.kind.raster());
                if bound != Some(key) {
                    let Some(pipeline) = self.pipelines.get(&key) else {
                        log::warn!("No pipeline for {key:?}, skipping {:?}", item.kind);
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    bound = Some(key);
                }

                pass.set_bind_group(1, &self.draw_bind_group, &[(slot as u64 * DRAW_SLOT_SIZE) as u32]);
                self.draw_item(&mut pass, ctx, item.kind);
            }
        }
        encoder.pop_debug_group();
    }
}
