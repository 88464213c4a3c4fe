//! Bind Group Layout Builder
//!
//! Collects bind group layout entries together with the names and WGSL types
//! of the bound resources, so one description produces both the
//! `wgpu::BindGroupLayout` and the matching WGSL declarations.
//!
//! Naming convention in the generated WGSL: uniforms are `u_{name}`, textures
//! `t_{name}` and samplers `s_{name}`.

use std::num::NonZeroU64;

use wgpu::ShaderStages;

use crate::resources::uniforms::WgslStruct;

type WgslStructGenerator = fn(&str) -> String;

#[derive(Default)]
pub struct LayoutBuilder {
    entries: Vec<wgpu::BindGroupLayoutEntry>,
    names: Vec<String>,
    struct_generators: Vec<Option<WgslStructGenerator>>,
    next_binding_index: u32,
}

impl LayoutBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, visibility: ShaderStages, ty: wgpu::BindingType, generator: Option<WgslStructGenerator>) {
        self.entries.push(wgpu::BindGroupLayoutEntry {
            binding: self.next_binding_index,
            visibility,
            ty,
            count: None,
        });
        self.names.push(name.to_string());
        self.struct_generators.push(generator);
        self.next_binding_index += 1;
    }

    #[must_use]
    pub fn uniform<T: WgslStruct>(mut self, name: &str, visibility: ShaderStages) -> Self {
        self.push(
            name,
            visibility,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            Some(T::wgsl_struct_def),
        );
        self
    }

    /// A uniform bound with a dynamic offset, one `T` per slot.
    #[must_use]
    pub fn dynamic_uniform<T: WgslStruct>(mut self, name: &str, visibility: ShaderStages) -> Self {
        self.push(
            name,
            visibility,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
            },
            Some(T::wgsl_struct_def),
        );
        self
    }

    #[must_use]
    pub fn texture(mut self, name: &str, view_dimension: wgpu::TextureViewDimension, visibility: ShaderStages) -> Self {
        self.push(
            name,
            visibility,
            wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension,
                multisampled: false,
            },
            None,
        );
        self
    }

    #[must_use]
    pub fn sampler(mut self, name: &str, visibility: ShaderStages) -> Self {
        self.push(
            name,
            visibility,
            wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            None,
        );
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[wgpu::BindGroupLayoutEntry] {
        &self.entries
    }

    #[must_use]
    pub fn build_layout(&self, device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &self.entries,
        })
    }

    /// WGSL struct definitions and `@group/@binding` declarations for this layout.
    #[must_use]
    pub fn generate_wgsl(&self, group_index: u32) -> String {
        let mut bindings_code = String::new();
        let mut struct_defs = String::new();

        for ((entry, name), generator) in self.entries.iter().zip(&self.names).zip(&self.struct_generators) {
            let binding_index = entry.binding;

            let decl = match entry.ty {
                wgpu::BindingType::Buffer { .. } => {
                    let struct_name = format!("Struct_{name}");
                    if let Some(generator) = generator {
                        struct_defs.push_str(&generator(&struct_name));
                        struct_defs.push('\n');
                    }
                    format!("@group({group_index}) @binding({binding_index}) var<uniform> u_{name}: {struct_name};")
                }
                wgpu::BindingType::Texture { view_dimension, .. } => {
                    let type_str = match view_dimension {
                        wgpu::TextureViewDimension::Cube => "texture_cube<f32>",
                        _ => "texture_2d<f32>",
                    };
                    format!("@group({group_index}) @binding({binding_index}) var t_{name}: {type_str};")
                }
                wgpu::BindingType::Sampler(_) => {
                    format!("@group({group_index}) @binding({binding_index}) var s_{name}: sampler;")
                }
                _ => String::new(),
            };

            bindings_code.push_str(&decl);
            bindings_code.push('\n');
        }

        format!("// --- Bindings (Group {group_index}) ---\n{struct_defs}\n{bindings_code}\n")
    }
}
