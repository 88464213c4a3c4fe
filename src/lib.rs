//! # Lumen
//!
//! A forward renderer built on wgpu that captures the scene into an HDR
//! target with a separate bright-pass output, blurs the bright image with a
//! ping-pong Gaussian and composites both with exposure tone mapping.
//!
//! ## Module layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`renderer`]  | GPU context, render targets, shader templates, passes     |
//! | [`state`]     | program, post-process and parallax state                  |
//! | [`scene`]     | fly camera, lights, scene layout                          |
//! | [`resources`] | geometry, primitives, uniform blocks, input state         |
//! | [`assets`]    | texture and OBJ loading                                   |
//! | [`app`]       | winit runner, controls, overlay panels                    |

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod app;
pub mod assets;
pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod state;
pub mod utils;

pub use app::App;
pub use errors::{LumenError, Result};
pub use renderer::Renderer;
pub use renderer::core::WgpuContext;
pub use renderer::settings::RendererSettings;
pub use state::{PostFilter, PostProcessState, ProgramState, RenderState};
