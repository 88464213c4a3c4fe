//! Rendering System
//!
//! The [`Renderer`] owns every GPU object of the program and runs the fixed
//! frame sequence:
//!
//! ```text
//! Clear ─► Geometry ─► Blur ×N ─► Composite ─► Overlay (optional) ─► Present
//!   │          │           │           │
//!   HDR        HDR         ping-pong   surface
//! ```
//!
//! # Lifecycle
//!
//! 1. [`Renderer::new`] stores settings only; no GPU work happens.
//! 2. [`Renderer::init`] creates the device, validates the render targets,
//!    loads the scene assets and compiles every pipeline. Any failure here is
//!    fatal.
//! 3. [`Renderer::render_frame`] once per redraw.
//! 4. [`Renderer::shutdown`] releases primitives, models and textures.
//!
//! # Modules
//!
//! - [`core`]: wgpu context, bind group layouts, mipmaps
//! - [`targets`]: texture registry and the framebuffer graph
//! - [`pipeline`]: shader templates and vertex layouts
//! - [`graph`]: render node trait, frame sequence and the passes
//! - [`settings`]: startup configuration

pub mod core;
pub mod graph;
pub mod pipeline;
pub mod settings;
pub mod targets;

use std::sync::Arc;

use winit::window::Window;

use crate::assets::SceneAssets;
use crate::errors::Result;
use crate::resources::primitives::PrimitiveSet;
use crate::state::RenderState;

use self::core::{MipmapGenerator, WgpuContext};
use self::graph::passes::{BlurPass, CompositePass, GeometryPass, OverlayPass};
use self::graph::{ExecuteContext, FrameContext, FramePhase, PrepareContext, RenderNode};
use self::pipeline::ShaderManager;
use self::settings::RendererSettings;
use self::targets::{FramebufferGraph, TextureRegistry};

/// Everything created by [`Renderer::init`].
struct RendererState {
    wgpu_ctx: WgpuContext,
    registry: TextureRegistry,
    targets: FramebufferGraph,
    primitives: PrimitiveSet,
    assets: SceneAssets,
    shaders: ShaderManager,

    geometry: GeometryPass,
    blur: BlurPass,
    composite: CompositePass,
    overlay: OverlayPass,
}

/// The main renderer.
pub struct Renderer {
    settings: RendererSettings,
    state: Option<RendererState>,
    frame_count: u64,
}

impl Renderer {
    /// Creates a renderer with the given settings. Call [`init`](Self::init)
    /// before rendering.
    #[must_use]
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            state: None,
            frame_count: 0,
        }
    }

    /// Creates every GPU resource.
    ///
    /// Fails on adapter, device or surface errors, on an incomplete render
    /// target and on shader compilation errors. Missing asset files are not
    /// errors; they fall back to placeholder textures and empty models.
    pub async fn init(&mut self, window: Arc<Window>, width: u32, height: u32) -> Result<()> {
        if self.state.is_some() {
            return Ok(());
        }

        let wgpu_ctx = WgpuContext::new(window.clone(), &self.settings, width, height).await?;
        let device = &wgpu_ctx.device;
        let queue = &wgpu_ctx.queue;

        let mut registry = TextureRegistry::new();
        let targets = FramebufferGraph::new(
            device,
            &mut registry,
            &wgpu_ctx,
            self.settings.width,
            self.settings.height,
            self.settings.depth_format,
        )?;

        let mut primitives = PrimitiveSet::new();
        primitives.initialize(device);

        let mut mipmaps = MipmapGenerator::new(device);
        let assets = SceneAssets::load(device, queue, &mut registry, &mut mipmaps, &self.settings)?;

        let mut shaders = ShaderManager::new();
        let geometry = GeometryPass::new(
            device,
            &mut shaders,
            &registry,
            &targets,
            &assets,
            self.settings.bright_threshold,
        )?;
        let blur = BlurPass::new(device, queue, &mut shaders, &registry, &targets, self.settings.blur_iterations)?;
        let composite = CompositePass::new(
            device,
            &mut shaders,
            &registry,
            &targets,
            blur.schedule().final_source(),
            wgpu_ctx.color_format(),
        )?;
        let overlay = OverlayPass::new(device, wgpu_ctx.color_format(), &window);

        log::info!(
            "Renderer ready: {} textures, {} shader modules, surface {:?}",
            registry.len(),
            shaders.module_count(),
            wgpu_ctx.color_format()
        );

        self.state = Some(RendererState {
            wgpu_ctx,
            registry,
            targets,
            primitives,
            assets,
            shaders,
            geometry,
            blur,
            composite,
            overlay,
        });
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Reconfigures the surface. Render targets keep their configured size.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        if let Some(state) = &mut self.state {
            state.wgpu_ctx.resize(width, height);
            state.overlay.resize(width, height, scale_factor);
        }
    }

    /// The egui overlay, for input forwarding and panel building.
    pub fn overlay_mut(&mut self) -> Option<&mut OverlayPass> {
        self.state.as_mut().map(|state| &mut state.overlay)
    }

    /// Draws one frame.
    ///
    /// `time` is seconds since startup, `delta_time` seconds since the last
    /// frame. A lost or outdated surface skips the frame.
    pub fn render_frame(&mut self, render_state: &RenderState, time: f32, delta_time: f32) {
        let Some(state) = &mut self.state else {
            return;
        };

        let output = match state.wgpu_ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output) | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                let (width, height) = state.wgpu_ctx.size();
                state.wgpu_ctx.resize(width, height);
                return;
            }
            e => {
                log::error!("Render error: {e:?}");
                return;
            }
        };
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let phases = FramePhase::sequence(render_state.program.ui_enabled);
        let frame = FrameContext::new(render_state, self.settings.aspect_ratio(), time, delta_time);

        // --- Prepare ---
        {
            let mut prepare_ctx = PrepareContext {
                device: &state.wgpu_ctx.device,
                queue: &state.wgpu_ctx.queue,
                state: render_state,
                frame: &frame,
            };
            for phase in &phases {
                match phase {
                    FramePhase::Geometry => state.geometry.prepare(&mut prepare_ctx),
                    FramePhase::Blur => state.blur.prepare(&mut prepare_ctx),
                    FramePhase::Composite => state.composite.prepare(&mut prepare_ctx),
                    FramePhase::Overlay => state.overlay.prepare(&mut prepare_ctx),
                    FramePhase::Clear | FramePhase::Present => {}
                }
            }
        }

        // --- Execute ---
        let execute_ctx = ExecuteContext {
            targets: &state.targets,
            textures: &state.registry,
            primitives: &state.primitives,
            models: &state.assets.models,
            surface_view: &surface_view,
        };

        let mut encoder = state.wgpu_ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        for phase in &phases {
            log::trace!("Frame {}: {phase}", self.frame_count);
            match phase {
                FramePhase::Clear => state.geometry.clear(&execute_ctx, &mut encoder),
                FramePhase::Geometry => state.geometry.run(&execute_ctx, &mut encoder),
                FramePhase::Blur => state.blur.run(&execute_ctx, &mut encoder),
                FramePhase::Composite => state.composite.run(&execute_ctx, &mut encoder),
                FramePhase::Overlay => state.overlay.run(&execute_ctx, &mut encoder),
                FramePhase::Present => {
                    state.wgpu_ctx.queue.submit(std::iter::once(encoder.finish()));
                    output.present();
                    break;
                }
            }
        }

        self.frame_count += 1;
    }

    /// Releases GPU resources. The renderer must be re-initialised to draw again.
    pub fn shutdown(&mut self) {
        let Some(mut state) = self.state.take() else {
            return;
        };

        state.primitives.shutdown();
        state.assets.models.destroy();
        state.blur.destroy();
        state.composite.destroy();
        state.registry.shutdown();
        log::info!(
            "Renderer shut down after {} frames ({} shader modules released)",
            self.frame_count,
            state.shaders.module_count()
        );
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
