//! Winit Application Runner
//!
//! [`App`] owns the event loop and drives one frame per redraw:
//!
//! 1. tick the [`Timer`]
//! 2. apply polled input through [`Controls`]
//! 3. build the overlay panels when the overlay is visible
//! 4. [`Renderer::render_frame`]
//!
//! Startup failures end the event loop and surface from [`App::run`] as an
//! error. On a clean exit the program state is written back to the state file.
//!
//! ```rust,ignore
//! use lumen::app::App;
//! use lumen::renderer::settings::RendererSettings;
//!
//! fn main() -> lumen::errors::Result<()> {
//!     App::new(RendererSettings::default()).run()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::app::controls::Controls;
use crate::app::panel::draw_panels;
use crate::errors::{LumenError, Result};
use crate::renderer::Renderer;
use crate::renderer::settings::RendererSettings;
use crate::resources::input::Input;
use crate::state::{ProgramState, RenderState};
use crate::utils::time::Timer;

pub mod input_adapter;

/// Application entry point.
pub struct App {
    settings: RendererSettings,
    program: ProgramState,
}

impl App {
    /// Creates the app and restores persisted state from the configured file.
    #[must_use]
    pub fn new(settings: RendererSettings) -> Self {
        let mut program = ProgramState::default();
        program.load_from_file(&settings.state_file);
        Self { settings, program }
    }

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns the startup error if the window, device, render targets or
    /// pipelines could not be created, or an event loop error.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner::new(self.settings, self.program);
        event_loop.run_app(&mut runner)?;

        match runner.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppRunner {
    settings: RendererSettings,
    window: Option<Arc<Window>>,
    renderer: Renderer,

    state: RenderState,
    input: Input,
    controls: Controls,
    timer: Timer,

    init_error: Option<LumenError>,
}

impl AppRunner {
    fn new(settings: RendererSettings, program: ProgramState) -> Self {
        let mut state = RenderState::new(program);
        if state.program.ui_enabled {
            state.program.camera_mouse_update = false;
        }

        Self {
            renderer: Renderer::new(settings.clone()),
            settings,
            window: None,
            state,
            input: Input::new(),
            controls: Controls::new(),
            timer: Timer::new(),
            init_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: LumenError) {
        log::error!("Fatal Renderer Error: {error}");
        self.init_error = Some(error);
        event_loop.exit();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };

        self.timer.tick();
        let dt = self.timer.dt_seconds();

        let outcome = self.controls.update(&self.input, &mut self.state, dt);
        self.input.start_frame();

        if let Some(visible) = outcome.overlay_toggled {
            set_cursor_captured(&window, !visible);
        }
        if outcome.close_requested {
            event_loop.exit();
            return;
        }

        if self.state.program.ui_enabled
            && let Some(overlay) = self.renderer.overlay_mut()
        {
            overlay.begin_frame(&window);
            let ctx = overlay.context().clone();
            draw_panels(&ctx, &mut self.state.program);
            overlay.end_frame(&window);
        }

        self.renderer
            .render_frame(&self.state, self.timer.elapsed_seconds(), dt);
    }
}

/// Grabs and hides the cursor, or releases and shows it.
fn set_cursor_captured(window: &Window, captured: bool) {
    let grab = if captured {
        window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };
    if let Err(e) = grab {
        log::warn!("Cursor grab change failed: {e}");
    }
    window.set_cursor_visible(!captured);
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(self.settings.width, self.settings.height))
            .with_resizable(false);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        log::info!("Initializing Renderer Backend...");

        let size = window.inner_size();
        if let Err(e) = pollster::block_on(self.renderer.init(window.clone(), size.width, size.height)) {
            return self.fail(event_loop, e);
        }

        set_cursor_captured(&window, !self.state.program.ui_enabled);
        self.timer = Timer::new();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let consumed = self.state.program.ui_enabled
            && self
                .renderer
                .overlay_mut()
                .is_some_and(|overlay| overlay.handle_input(&window, &event));

        if !consumed || input_adapter::bypasses_overlay(&event) {
            input_adapter::process_window_event(&mut self.input, &event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.renderer
                    .resize(size.width, size.height, window.scale_factor() as f32);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                window.request_redraw();
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        input_adapter::process_device_event(&mut self.input, &event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.renderer.is_initialized()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.init_error.is_some() {
            return;
        }

        let path = &self.settings.state_file;
        match self.state.program.save_to_file(path) {
            Ok(()) => log::info!("Saved state to {}", path.display()),
            Err(e) => log::warn!("Could not save state to {}: {e}", path.display()),
        }
        self.renderer.shutdown();
    }
}
