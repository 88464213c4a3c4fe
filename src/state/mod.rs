//! Render State
//!
//! Everything a frame reads that outlives the frame, gathered in one
//! [`RenderState`] passed by reference into each pass.
//!
//! | Part               | Mutated by                         | Persisted            |
//! |--------------------|------------------------------------|----------------------|
//! | [`ProgramState`]   | controls, overlay panels           | partially (see file) |
//! | [`PostProcessState`] | edge-triggered and held keys     | no                   |
//! | `height_scale`     | held keys                          | no                   |

pub mod latch;
pub mod post_process;
pub mod program_state;

pub use latch::KeyLatch;
pub use post_process::{PostFilter, PostProcessState};
pub use program_state::{Placement, ProgramState};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub program: ProgramState,
    pub post: PostProcessState,
    height_scale: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            program: ProgramState::default(),
            post: PostProcessState::default(),
            height_scale: Self::DEFAULT_HEIGHT_SCALE,
        }
    }
}

impl RenderState {
    pub const DEFAULT_HEIGHT_SCALE: f32 = 0.005;
    /// Height scale change per frame while the adjust key is held.
    pub const HEIGHT_SCALE_STEP: f32 = 0.0005;

    #[must_use]
    pub fn new(program: ProgramState) -> Self {
        Self {
            program,
            ..Self::default()
        }
    }

    /// Parallax depth scale, always within [0, 1].
    #[inline]
    #[must_use]
    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    pub fn set_height_scale(&mut self, value: f32) {
        self.height_scale = value.clamp(0.0, 1.0);
    }

    pub fn adjust_height_scale(&mut self, delta: f32) {
        self.set_height_scale(self.height_scale + delta);
    }
}
