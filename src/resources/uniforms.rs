//! Uniform Blocks
//!
//! Every uniform block is declared once with [`define_uniform_struct!`], which
//! emits the `Pod` Rust struct, its `Default` impl and the matching WGSL struct
//! definition. Fields starting with `__` are explicit padding and are left out
//! of the WGSL side, where the natural `vec3` alignment reproduces them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use crate::scene::camera::FlyCamera;
use crate::scene::light::{DirLight, LightingState, PointLight, SpotLight};
use crate::state::PostProcessState;

// ============================================================================
// Rust type -> WGSL type name
// ============================================================================

pub trait WgslType {
    fn wgsl_type_name() -> Cow<'static, str>;

    fn collect_wgsl_defs(_defs: &mut Vec<String>, _inserted: &mut HashSet<String>) {}
}

impl WgslType for f32 { fn wgsl_type_name() -> Cow<'static, str> { "f32".into() } }
impl WgslType for u32 { fn wgsl_type_name() -> Cow<'static, str> { "u32".into() } }
impl WgslType for Vec3 { fn wgsl_type_name() -> Cow<'static, str> { "vec3<f32>".into() } }
impl WgslType for Vec4 { fn wgsl_type_name() -> Cow<'static, str> { "vec4<f32>".into() } }
impl WgslType for Mat4 { fn wgsl_type_name() -> Cow<'static, str> { "mat4x4<f32>".into() } }

/// Fixed-size array usable as a uniform field.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformArray<T: Pod, const N: usize>(pub [T; N]);

unsafe impl<T: Pod, const N: usize> Zeroable for UniformArray<T, N> {}
unsafe impl<T: Pod, const N: usize> Pod for UniformArray<T, N> {}

impl<T: WgslType + Pod, const N: usize> WgslType for UniformArray<T, N> {
    fn wgsl_type_name() -> Cow<'static, str> {
        format!("array<{}, {}>", T::wgsl_type_name(), N).into()
    }

    fn collect_wgsl_defs(defs: &mut Vec<String>, inserted: &mut HashSet<String>) {
        T::collect_wgsl_defs(defs, inserted);
    }
}

impl<T: Default + Pod, const N: usize> Default for UniformArray<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Pod, const N: usize> Deref for UniformArray<T, N> {
    type Target = [T; N];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Pod, const N: usize> DerefMut for UniformArray<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Pod, const N: usize> From<[T; N]> for UniformArray<T, N> {
    fn from(arr: [T; N]) -> Self {
        Self(arr)
    }
}

/// A top-level uniform block with a generated WGSL definition.
pub trait WgslStruct: Pod + Zeroable {
    /// WGSL source for this struct and every struct it nests, dependencies first.
    fn wgsl_struct_def(struct_name: &str) -> String;
}

// ============================================================================
// Declaration macro
// ============================================================================

macro_rules! define_uniform_struct {
    (
        $(#[$meta:meta])* struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $vis:vis $field_name:ident : $field_type:ty $(= $default_val:expr)?
            ),* $(,)?
        }
    ) => {
        define_uniform_struct!(@def_struct
            $(#[$meta])* struct $name {
                $( $(#[$field_meta])* $vis $field_name : $field_type ),* }
        );

        define_uniform_struct!(@impl_default
            $name {
                $( $field_name : $field_type $(= $default_val)? ),* }
        );

        define_uniform_struct!(@impl_wgsl_type
            $name {
                $( $field_name : $field_type ),* }
        );

        define_uniform_struct!(@impl_uniform_block
            $name {
                $( $field_name : $field_type ),* }
        );
    };

    (@def_struct $(#[$meta:meta])* struct $name:ident { $( $(#[$field_meta:meta])* $vis:vis $field_name:ident : $field_type:ty ),* }) => {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
        $(#[$meta])*
        pub struct $name {
            $( $(#[$field_meta])* $vis $field_name : $field_type, )*
        }
    };

    (@impl_default $name:ident { $( $vis:vis $field_name:ident : $field_type:ty $(= $default_val:expr)? ),* }) => {
        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field_name: define_uniform_struct!(@val_or_default $field_type $(, $default_val)?), )*
                }
            }
        }
    };
    (@val_or_default $type:ty, $val:expr) => { $val };
    (@val_or_default $type:ty) => { <$type as Default>::default() };

    (@gen_body $name_str:expr, { $( $vis:vis $field_name:ident : $field_type:ty ),* }) => {{
        let mut code = format!("struct {} {{\n", $name_str);
        $(
            if !stringify!($field_name).starts_with("__") {
                code.push_str(&format!(
                    "    {}: {},\n",
                    stringify!($field_name),
                    <$field_type as WgslType>::wgsl_type_name()
                ));
            }
        )*
        code.push_str("};\n");
        code
    }};

    (@impl_wgsl_type $name:ident { $( $vis:vis $field_name:ident : $field_type:ty ),* }) => {
        impl WgslType for $name {
            fn wgsl_type_name() -> Cow<'static, str> {
                stringify!($name).into()
            }

            fn collect_wgsl_defs(defs: &mut Vec<String>, inserted: &mut HashSet<String>) {
                $(
                    <$field_type as WgslType>::collect_wgsl_defs(defs, inserted);
                )*

                let my_name = stringify!($name);
                if !inserted.contains(my_name) {
                    let my_def = define_uniform_struct!(@gen_body my_name, { $( $field_name : $field_type ),* });
                    defs.push(my_def);
                    inserted.insert(my_name.to_string());
                }
            }
        }
    };

    (@impl_uniform_block $name:ident { $( $vis:vis $field_name:ident : $field_type:ty ),* }) => {
        impl WgslStruct for $name {
            fn wgsl_struct_def(struct_name: &str) -> String {
                let mut defs = Vec::new();
                let mut inserted = HashSet::new();

                $(
                    <$field_type as WgslType>::collect_wgsl_defs(&mut defs, &mut inserted);
                )*

                let top_def = define_uniform_struct!(@gen_body struct_name, { $( $vis $field_name : $field_type ),* });
                defs.push(top_def);
                defs.join("\n")
            }
        }
    };
}

// ============================================================================
// Blocks
// ============================================================================

define_uniform_struct!(
    /// Camera, timing and shading constants shared by every geometry draw.
    struct FrameUniforms {
        pub view: Mat4 = Mat4::IDENTITY,
        pub projection: Mat4 = Mat4::IDENTITY,
        /// View matrix without translation.
        pub skybox_view: Mat4 = Mat4::IDENTITY,

        pub view_position: Vec3 = Vec3::ZERO,
        pub time: f32 = 0.0,

        /// Light position used by normal-mapped and parallax surfaces.
        pub emitter_position: Vec3 = Vec3::ZERO,
        pub height_scale: f32 = 0.005,

        pub bright_threshold: f32 = 1.0,
        pub shininess: f32 = 32.0,
        pub(crate) __padding: UniformArray<f32, 2>,
    }
);

define_uniform_struct!(
    struct GpuDirLight {
        pub direction: Vec3,
        pub(crate) __pad0: f32,
        pub ambient: Vec3,
        pub(crate) __pad1: f32,
        pub diffuse: Vec3,
        pub(crate) __pad2: f32,
        pub specular: Vec3,
        pub(crate) __pad3: f32,
    }
);

define_uniform_struct!(
    struct GpuPointLight {
        pub position: Vec3,
        pub constant: f32,
        pub ambient: Vec3,
        pub linear: f32,
        pub diffuse: Vec3,
        pub quadratic: f32,
        pub specular: Vec3,
        pub(crate) __pad0: f32,
    }
);

define_uniform_struct!(
    struct GpuSpotLight {
        pub position: Vec3,
        pub cut_off: f32,
        pub direction: Vec3,
        pub outer_cut_off: f32,
        pub ambient: Vec3,
        pub constant: f32,
        pub diffuse: Vec3,
        pub linear: f32,
        pub specular: Vec3,
        pub quadratic: f32,
    }
);

define_uniform_struct!(
    /// All scene lights. The spotlight is already resolved against the camera.
    struct LightsUniforms {
        pub dir_light: GpuDirLight,
        pub point_lights: UniformArray<GpuPointLight, 3>,
        pub spot_light: GpuSpotLight,
    }
);

define_uniform_struct!(
    /// Per-draw transform and flat colour, bound with a dynamic offset.
    struct DrawUniforms {
        pub model: Mat4 = Mat4::IDENTITY,
        pub normal_matrix: Mat4 = Mat4::IDENTITY,
        pub color: Vec4 = Vec4::ONE,

        pub(crate) __padding: UniformArray<f32, 28>,
    }
);

define_uniform_struct!(
    struct BlurUniforms {
        pub horizontal: u32,
        pub(crate) __padding: UniformArray<u32, 3>,
    }
);

define_uniform_struct!(
    struct CompositeUniforms {
        pub exposure: f32 = 0.5,
        pub bloom_enabled: u32,
        /// 0 none, 1 invert, 2 greyscale, 3 blur.
        pub filter_index: u32,
        /// Set when the surface is not sRGB and the shader must encode gamma itself.
        pub apply_gamma: u32,
    }
);

// ============================================================================
// Conversions
// ============================================================================

impl From<&DirLight> for GpuDirLight {
    fn from(light: &DirLight) -> Self {
        Self {
            direction: light.direction,
            ambient: light.ambient,
            diffuse: light.diffuse,
            specular: light.specular,
            ..Self::default()
        }
    }
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position,
            constant: light.attenuation.constant,
            ambient: light.ambient,
            linear: light.attenuation.linear,
            diffuse: light.diffuse,
            quadratic: light.attenuation.quadratic,
            specular: light.specular,
            __pad0: 0.0,
        }
    }
}

impl From<&SpotLight> for GpuSpotLight {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: light.position,
            cut_off: light.cut_off,
            direction: light.direction,
            outer_cut_off: light.outer_cut_off,
            ambient: light.ambient,
            constant: light.attenuation.constant,
            diffuse: light.diffuse,
            linear: light.attenuation.linear,
            specular: light.specular,
            quadratic: light.attenuation.quadratic,
        }
    }
}

impl LightsUniforms {
    /// Packs every scene light. The spotlight follows the camera.
    #[must_use]
    pub fn from_lighting(lighting: &LightingState, camera: &FlyCamera) -> Self {
        Self {
            dir_light: (&lighting.dir).into(),
            point_lights: lighting.points.each_ref().map(GpuPointLight::from).into(),
            spot_light: (&lighting.resolved_spotlight(camera)).into(),
        }
    }
}

impl DrawUniforms {
    #[must_use]
    pub fn new(model: Mat4, color: Vec4) -> Self {
        Self {
            model,
            normal_matrix: model.inverse().transpose(),
            color,
            ..Self::default()
        }
    }
}

impl BlurUniforms {
    #[must_use]
    pub fn new(horizontal: bool) -> Self {
        Self {
            horizontal: u32::from(horizontal),
            ..Self::default()
        }
    }
}

impl CompositeUniforms {
    /// Composite inputs for the current post-process state.
    #[must_use]
    pub fn from_state(post: &PostProcessState, surface_is_srgb: bool) -> Self {
        Self {
            exposure: post.exposure(),
            bloom_enabled: u32::from(post.bloom_enabled),
            filter_index: post.filter.index(),
            apply_gamma: u32::from(!surface_is_srgb),
        }
    }
}
