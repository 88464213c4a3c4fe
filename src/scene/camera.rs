use glam::{Mat3, Mat4, Vec3};

/// Movement directions driven by level-triggered keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-fly camera driven by yaw/pitch Euler angles.
///
/// Angles are in degrees. `front`, `right` and `up` are kept in sync with
/// `yaw`/`pitch` by [`update_vectors`](Self::update_vectors).
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,

    pub yaw: f32,
    pub pitch: f32,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
}

impl FlyCamera {
    pub const DEFAULT_YAW: f32 = -90.0;
    pub const DEFAULT_PITCH: f32 = 0.0;
    pub const DEFAULT_SPEED: f32 = 2.5;
    pub const DEFAULT_SENSITIVITY: f32 = 0.1;
    pub const MAX_ZOOM: f32 = 45.0;
    pub const MIN_ZOOM: f32 = 1.0;
    pub const PITCH_LIMIT: f32 = 89.0;

    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    #[must_use]
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: Self::DEFAULT_YAW,
            pitch: Self::DEFAULT_PITCH,
            movement_speed: Self::DEFAULT_SPEED,
            mouse_sensitivity: Self::DEFAULT_SENSITIVITY,
            zoom: Self::MAX_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// View matrix with the translation removed, for the skybox.
    #[must_use]
    pub fn skybox_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    /// Perspective projection with depth mapped to [0, 1].
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, Self::NEAR, Self::FAR)
    }

    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }

    /// Restores a persisted front vector verbatim and re-derives yaw/pitch
    /// from it so subsequent mouse input continues from the same heading.
    ///
    /// A front steeper than the pitch limit is clamped to it; a vertical one
    /// keeps the current yaw.
    pub fn set_front(&mut self, front: Vec3) {
        let dir = front.normalize_or_zero();
        if dir == Vec3::ZERO || !dir.is_finite() {
            return;
        }

        if dir.x != 0.0 || dir.z != 0.0 {
            self.yaw = dir.z.atan2(dir.x).to_degrees();
        }
        let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
        if pitch.abs() > Self::PITCH_LIMIT {
            self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
            self.update_vectors();
            return;
        }

        self.pitch = pitch;
        self.front = front;
        self.right = dir.cross(self.world_up).normalize_or_zero();
        self.up = self.right.cross(dir).normalize_or_zero();
    }

    /// Recomputes `front`, `right` and `up` from yaw and pitch.
    pub fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}
