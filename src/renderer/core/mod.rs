//! wgpu core
//!
//! - [`WgpuContext`]: adapter, device, queue, surface and its configuration
//! - [`LayoutBuilder`]: bind group layouts with generated WGSL declarations
//! - [`MipmapGenerator`]: GPU mip chain generation for material textures

pub mod builder;
pub mod context;
pub mod mipmap;

pub use builder::LayoutBuilder;
pub use context::WgpuContext;
pub use mipmap::{MipmapGenerator, full_mip_count};
