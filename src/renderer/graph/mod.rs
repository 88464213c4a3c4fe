//! Frame organisation
//!
//! - [`RenderNode`]: the prepare/run interface every pass implements
//! - [`PrepareContext`] / [`ExecuteContext`]: the data each phase sees
//! - [`FrameContext`]: matrices and timing computed once per frame
//! - [`FramePhase`]: the fixed pass order
//! - [`passes`]: geometry, blur, composite and overlay

pub mod context;
pub mod frame;
pub mod node;
pub mod passes;

pub use context::{ExecuteContext, PrepareContext};
pub use frame::{FrameContext, FramePhase};
pub use node::RenderNode;
