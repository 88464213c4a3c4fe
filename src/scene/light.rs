//! Scene Lights
//!
//! One directional light, three point lights and a camera-mounted spotlight,
//! plus the per-frame [`ActiveEmitter`] selection used by the tangent-space
//! shaders.

use glam::Vec3;

use super::camera::FlyCamera;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.2, 1.0, 0.3),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
        }
    }
}

/// Distance attenuation `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    #[must_use]
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Attenuation,
}

impl PointLight {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ambient: Vec3::splat(0.6),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ONE,
            attenuation: Attenuation {
                constant: 1.0,
                linear: 0.09,
                quadratic: 0.032,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    /// Cosine of the inner cone angle.
    pub cut_off: f32,
    /// Cosine of the outer cone angle.
    pub outer_cut_off: f32,
    pub attenuation: Attenuation,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            cut_off: 3.0_f32.to_radians().cos(),
            outer_cut_off: 21.0_f32.to_radians().cos(),
            attenuation: Attenuation {
                constant: 1.0,
                linear: 0.07,
                quadratic: 0.001,
            },
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }
}

/// All scene lights.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingState {
    pub dir: DirLight,
    pub points: [PointLight; 3],
    pub spot: SpotLight,
    pub spotlight_enabled: bool,
    /// Alternate emitter used while bloom is on. Its y follows point light 0.
    pub bloom_emitter: Vec3,
}

impl LightingState {
    pub const POINT_LIGHT_POSITIONS: [Vec3; 3] = [
        Vec3::new(-4.0, 4.0, 2.0),
        Vec3::new(4.0, 4.0, -2.0),
        Vec3::new(2.0, 4.0, -4.0),
    ];

    /// Speed of point light 2 under arrow-key control, in units per second.
    pub const MOVE_SPEED: f32 = 4.0;

    /// The spotlight as it should be shaded this frame: mounted on the
    /// camera, dark when disabled.
    #[must_use]
    pub fn resolved_spotlight(&self, camera: &FlyCamera) -> SpotLight {
        let (diffuse, specular) = if self.spotlight_enabled {
            (self.spot.diffuse, self.spot.specular)
        } else {
            (Vec3::ZERO, Vec3::ZERO)
        };
        SpotLight {
            position: camera.position,
            direction: camera.front,
            diffuse,
            specular,
            ..self.spot
        }
    }

    /// Translates point light 2 (the bloom source).
    pub fn move_bloom_light(&mut self, direction: Vec3, delta_time: f32) {
        self.points[2].position += direction * Self::MOVE_SPEED * delta_time;
    }
}

impl Default for LightingState {
    fn default() -> Self {
        let points = Self::POINT_LIGHT_POSITIONS.map(PointLight::at);
        Self {
            dir: DirLight::default(),
            spot: SpotLight::default(),
            spotlight_enabled: false,
            bloom_emitter: Vec3::new(3.0, points[0].position.y, 1.0),
            points,
        }
    }
}

/// Which light drives the tangent-space (normal/parallax) shaders this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveEmitter {
    /// Point light 0.
    PointLight0,
    /// The alternate bloom emitter.
    Bloom,
}

impl ActiveEmitter {
    #[must_use]
    pub fn select(bloom_enabled: bool) -> Self {
        if bloom_enabled { Self::Bloom } else { Self::PointLight0 }
    }

    #[must_use]
    pub fn position(self, lighting: &LightingState) -> Vec3 {
        match self {
            Self::PointLight0 => lighting.points[0].position,
            Self::Bloom => lighting.bloom_emitter,
        }
    }
}
