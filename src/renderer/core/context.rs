//! wgpu Context
//!
//! The [`WgpuContext`] holds core GPU handles: adapter, device, queue, surface and
//! its configuration. It is responsible for window surface management.
//!
//! Offscreen render targets are not owned here; they live in the
//! [`FramebufferGraph`](crate::renderer::targets::FramebufferGraph) and keep the
//! size chosen at startup.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};

use crate::errors::{LumenError, Result};
use crate::renderer::settings::RendererSettings;
use crate::renderer::targets::FormatSupport;

/// Core wgpu context holding GPU handles.
pub struct WgpuContext {
    /// The adapter the device was created from (queried for format support)
    pub adapter: wgpu::Adapter,
    /// The wgpu device for GPU operations
    pub device: wgpu::Device,
    /// The command queue for submitting work
    pub queue: wgpu::Queue,
    /// The window surface for presentation
    pub surface: wgpu::Surface<'static>,
    /// Surface configuration
    pub config: wgpu::SurfaceConfiguration,
}

impl WgpuContext {
    pub async fn new<W>(window: W, settings: &RendererSettings, width: u32, height: u32) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| LumenError::AdapterRequestFailed(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Lumen Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(LumenError::SurfaceUnsupported)?;

        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        Ok(Self {
            adapter,
            device,
            queue,
            surface,
            config,
        })
    }

    /// Reconfigures the swap chain. Offscreen targets are untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Returns the surface color format.
    #[inline]
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current surface dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

impl FormatSupport for WgpuContext {
    fn is_color_renderable(&self, format: wgpu::TextureFormat) -> bool {
        let features = self.adapter.get_texture_format_features(format);
        features
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
            && !format.is_depth_stencil_format()
    }

    fn is_depth_renderable(&self, format: wgpu::TextureFormat) -> bool {
        format.is_depth_stencil_format()
            && self
                .adapter
                .get_texture_format_features(format)
                .allowed_usages
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    }

    fn max_color_attachments(&self) -> u32 {
        self.device.limits().max_color_attachments
    }
}
