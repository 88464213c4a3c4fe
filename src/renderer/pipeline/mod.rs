//! Render pipeline support
//!
//! - `vertex`: interleaved vertex formats and their WGSL input structs
//! - `shader_manager`: minijinja environment and shader module cache
//! - `shader_gen`: template rendering with defines

pub mod shader_gen;
pub mod shader_manager;
pub mod vertex;

pub use shader_gen::{ShaderCompilationOptions, ShaderGenerator};
pub use shader_manager::ShaderManager;
pub use vertex::{MeshVertex, OwnedVertexBufferDesc, PositionVertex, TangentVertex, VertexLayout};
