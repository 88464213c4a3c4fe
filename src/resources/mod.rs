//! CPU-side resource definitions
//!
//! - [`input`]: platform-agnostic keyboard and mouse state
//! - [`uniforms`]: `Pod` uniform blocks and their generated WGSL
//! - [`geometry`]: vertex/index lists and their GPU upload
//! - [`primitives`]: procedural shapes with an explicit initialize/shutdown lifecycle

pub mod geometry;
pub mod input;
pub mod primitives;
pub mod uniforms;

pub use geometry::{Geometry, GpuMesh};
pub use input::{ButtonState, Input, Key};
pub use primitives::{Primitive, PrimitiveSet};
pub use uniforms::{WgslStruct, WgslType};
