/// Edge detector for a polled key.
///
/// [`update`](Self::update) is fed the key's held state once per frame and
/// reports `true` only on the frame the key goes down. The latch clears when
/// the key is released, so holding a key fires exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyLatch {
    held: bool,
}

impl KeyLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self { held: false }
    }

    /// Returns `true` on the press edge.
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.held;
        self.held = pressed;
        fired
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }
}
