//! Scene description
//!
//! - [`camera`]: free-fly camera producing view and projection matrices
//! - [`light`]: directional, point and spot lights plus the active emitter selection
//! - [`layout`]: fixed world transforms of every drawable

pub mod camera;
pub mod layout;
pub mod light;

pub use camera::{CameraMovement, FlyCamera};
pub use light::{ActiveEmitter, Attenuation, DirLight, LightingState, PointLight, SpotLight};
