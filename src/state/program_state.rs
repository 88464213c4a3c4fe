//! Program State & Persistence
//!
//! State shared between the controls, the overlay panels and the passes.
//! A subset of it survives restarts through a plain text file:
//!
//! ```text
//! clear_color.r
//! clear_color.g
//! clear_color.b
//! ui_enabled        (0 or 1)
//! camera.position.x
//! camera.position.y
//! camera.position.z
//! camera.front.x
//! camera.front.y
//! camera.front.z
//! ```
//!
//! Values are whitespace separated and read in that order. Loading is
//! best-effort: reading stops at the first missing or malformed token and
//! every field not read keeps its current value.

use std::path::Path;

use glam::Vec3;

use crate::errors::{LumenError, Result};
use crate::scene::camera::FlyCamera;
use crate::scene::light::LightingState;

/// Translation plus uniform scale of a placed model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramState {
    pub clear_color: Vec3,
    pub ui_enabled: bool,
    pub camera: FlyCamera,
    pub camera_mouse_update: bool,
    pub statue: Placement,
    pub pedestal: Placement,
    pub lighting: LightingState,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            ui_enabled: false,
            camera: FlyCamera::default(),
            camera_mouse_update: true,
            statue: Placement {
                position: Vec3::ZERO,
                scale: 0.5,
            },
            pedestal: Placement {
                position: Vec3::ZERO,
                scale: 0.006,
            },
            lighting: LightingState::default(),
        }
    }
}

/// Field names in file order.
const FIELDS: [&str; 10] = [
    "clear_color.r",
    "clear_color.g",
    "clear_color.b",
    "ui_enabled",
    "camera.position.x",
    "camera.position.y",
    "camera.position.z",
    "camera.front.x",
    "camera.front.y",
    "camera.front.z",
];

impl ProgramState {
    /// Serializes the persisted fields, one per line.
    #[must_use]
    pub fn to_persisted_string(&self) -> String {
        let c = &self.camera;
        let values = [
            self.clear_color.x.to_string(),
            self.clear_color.y.to_string(),
            self.clear_color.z.to_string(),
            u8::from(self.ui_enabled).to_string(),
            c.position.x.to_string(),
            c.position.y.to_string(),
            c.position.z.to_string(),
            c.front.x.to_string(),
            c.front.y.to_string(),
            c.front.z.to_string(),
        ];

        let mut out = values.join("\n");
        out.push('\n');
        out
    }

    /// Applies persisted values from `source` in field order.
    ///
    /// Returns the number of fields applied, or the parse error that stopped
    /// reading. Fields read before the error are kept either way.
    pub fn apply_persisted(&mut self, source: &str) -> Result<usize> {
        let mut tokens = source.split_whitespace();
        let mut floats = [0.0_f32; 10];
        let mut read = 0;

        for (index, field) in FIELDS.iter().copied().enumerate() {
            let Some(token) = tokens.next() else { break };
            let parsed = if index == 3 { parse_flag(token) } else { token.parse::<f32>().ok() };
            match parsed {
                Some(value) => {
                    floats[index] = value;
                    read += 1;
                }
                None => {
                    self.assign(&floats, read);
                    return Err(LumenError::StateParseError {
                        field,
                        value: token.to_string(),
                    });
                }
            }
        }

        self.assign(&floats, read);
        Ok(read)
    }

    fn assign(&mut self, values: &[f32; 10], count: usize) {
        let field = |i: usize, current: f32| if i < count { values[i] } else { current };

        self.clear_color = Vec3::new(
            field(0, self.clear_color.x),
            field(1, self.clear_color.y),
            field(2, self.clear_color.z),
        );
        if count > 3 {
            self.ui_enabled = values[3] > 0.5;
        }
        self.camera.position = Vec3::new(
            field(4, self.camera.position.x),
            field(5, self.camera.position.y),
            field(6, self.camera.position.z),
        );
        if count > 7 {
            let front = Vec3::new(
                field(7, self.camera.front.x),
                field(8, self.camera.front.y),
                field(9, self.camera.front.z),
            );
            self.camera.set_front(front);
        }
    }

    /// Loads persisted fields from `path`. A missing or unreadable file
    /// leaves every field at its current value.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                log::info!("No saved state at {} ({e}), using defaults", path.display());
                return;
            }
        };

        match self.apply_persisted(&source) {
            Ok(read) if read < FIELDS.len() => {
                log::warn!("State file {} is short: {read} of {} fields", path.display(), FIELDS.len());
            }
            Ok(_) => log::debug!("Restored state from {}", path.display()),
            Err(e) => log::warn!("Stopped reading {}: {e}", path.display()),
        }
    }

    /// Overwrites `path` with the persisted fields.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_persisted_string())?;
        Ok(())
    }
}

fn parse_flag(token: &str) -> Option<f32> {
    token.parse::<i64>().ok().map(|v| if v == 0 { 0.0 } else { 1.0 })
}
