//! Shader & Configuration Tests
//!
//! Tests for:
//! - LayoutBuilder: binding order and generated WGSL declarations
//! - ShaderGenerator: template rendering, includes, defines
//! - naga validation of every generated shader
//! - Composite uniform packing
//! - RendererSettings JSON loading

use lumen::errors::LumenError;
use lumen::renderer::core::LayoutBuilder;
use lumen::renderer::graph::passes::{BlurPass, CompositePass, Program};
use lumen::renderer::pipeline::{ShaderCompilationOptions, ShaderGenerator, TangentVertex, VertexLayout};
use lumen::renderer::settings::{PowerMode, RendererSettings};
use lumen::resources::uniforms::{BlurUniforms, CompositeUniforms, FrameUniforms};
use lumen::state::{PostFilter, PostProcessState};
use wgpu::ShaderStages;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn blur_layout() -> LayoutBuilder {
    LayoutBuilder::new()
        .texture("image", wgpu::TextureViewDimension::D2, ShaderStages::FRAGMENT)
        .sampler("image", ShaderStages::FRAGMENT)
        .uniform::<BlurUniforms>("blur", ShaderStages::FRAGMENT)
}

// ============================================================================
// LayoutBuilder
// ============================================================================

#[test]
fn layout_bindings_are_numbered_in_declaration_order() {
    let layout = blur_layout();
    let bindings: Vec<u32> = layout.entries().iter().map(|e| e.binding).collect();
    assert_eq!(bindings, vec![0, 1, 2]);
}

#[test]
fn layout_wgsl_uses_prefixed_names() {
    let wgsl = blur_layout().generate_wgsl(0);

    assert!(wgsl.contains("@group(0) @binding(0) var t_image: texture_2d<f32>;"));
    assert!(wgsl.contains("@group(0) @binding(1) var s_image: sampler;"));
    assert!(wgsl.contains("@group(0) @binding(2) var<uniform> u_blur: Struct_blur;"));
    assert!(wgsl.contains("struct Struct_blur"));
}

#[test]
fn cube_textures_declare_cube_type() {
    let wgsl = LayoutBuilder::new()
        .texture("skybox", wgpu::TextureViewDimension::Cube, ShaderStages::FRAGMENT)
        .generate_wgsl(2);
    assert!(wgsl.contains("@group(2) @binding(0) var t_skybox: texture_cube<f32>;"));
}

#[test]
fn dynamic_uniform_sets_dynamic_offset() {
    let layout = LayoutBuilder::new().dynamic_uniform::<FrameUniforms>("frame", ShaderStages::VERTEX_FRAGMENT);
    match layout.entries()[0].ty {
        wgpu::BindingType::Buffer {
            has_dynamic_offset,
            min_binding_size,
            ..
        } => {
            assert!(has_dynamic_offset);
            assert_eq!(
                min_binding_size.map(std::num::NonZeroU64::get),
                Some(std::mem::size_of::<FrameUniforms>() as u64)
            );
        }
        ref other => panic!("expected a buffer binding, got {other:?}"),
    }
}

// ============================================================================
// ShaderGenerator
// ============================================================================

#[test]
fn blur_template_renders_with_fullscreen_include() {
    let bindings = blur_layout().generate_wgsl(0);
    let source =
        ShaderGenerator::generate_shader(None, &bindings, "post/blur", &ShaderCompilationOptions::new()).unwrap();

    assert!(source.starts_with("// === Generated Shader: post/blur ==="));
    assert!(source.contains("var t_image: texture_2d<f32>;"));
    assert!(source.contains("fn vs_main"));
    assert!(source.contains("fn fs_main"));
    assert!(!source.contains("{$"));
}

#[test]
fn parallax_define_enables_occlusion_march() {
    let vertex = TangentVertex::vertex_input_code();
    let plain = ShaderGenerator::generate_shader(
        Some(&vertex),
        "",
        Program::NormalMapped.template(),
        &Program::NormalMapped.options(),
    )
    .unwrap();
    let parallax =
        ShaderGenerator::generate_shader(Some(&vertex), "", Program::Parallax.template(), &Program::Parallax.options())
            .unwrap();

    assert!(!plain.contains("fn parallax_mapping"));
    assert!(parallax.contains("fn parallax_mapping"));
    assert!(parallax.contains("discard"));
}

#[test]
fn every_scene_program_renders_bright_output() {
    for program in Program::ALL {
        let vertex = program.vertex_input_code();
        let source = ShaderGenerator::generate_shader(Some(&vertex), "", program.template(), &program.options())
            .unwrap_or_else(|e| panic!("{program:?} failed to render: {e}"));

        assert!(source.contains("@location(1) bright: vec4<f32>"), "{program:?}");
        assert!(source.contains(&vertex), "{program:?}");
    }
}

#[test]
fn unknown_template_is_a_template_error() {
    let result = ShaderGenerator::generate_shader(None, "", "post/missing", &ShaderCompilationOptions::new());
    assert!(matches!(result, Err(LumenError::ShaderTemplateError(_))));
}

#[test]
fn compilation_options_are_order_independent() {
    let a = ShaderCompilationOptions::new().with_define("A", "1").with_define("B", "2");
    let b = ShaderCompilationOptions::new().with_define("B", "2").with_define("A", "1");
    assert_eq!(a, b);
}

// ============================================================================
// WGSL validation
// ============================================================================

/// Parses and validates `source` with naga, reporting the shader by `label`.
fn validate_wgsl(label: &str, source: &str) {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{label} failed to parse:\n{}", e.emit_to_string(source)));
    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{label} failed validation: {e:?}"));
}

#[test]
fn scene_programs_are_valid_wgsl() {
    for program in Program::ALL {
        let vertex = program.vertex_input_code();
        let source = ShaderGenerator::generate_shader(
            Some(&vertex),
            &program.binding_code(),
            program.template(),
            &program.options(),
        )
        .unwrap_or_else(|e| panic!("{program:?} failed to render: {e}"));

        validate_wgsl(&format!("{program:?}"), &source);
    }
}

#[test]
fn post_process_shaders_are_valid_wgsl() {
    for (template, layout) in [
        (BlurPass::TEMPLATE, BlurPass::layout()),
        (CompositePass::TEMPLATE, CompositePass::layout()),
    ] {
        let source =
            ShaderGenerator::generate_shader(None, &layout.generate_wgsl(0), template, &ShaderCompilationOptions::new())
                .unwrap_or_else(|e| panic!("{template} failed to render: {e}"));

        validate_wgsl(template, &source);
    }
}

#[test]
fn scene_bindings_cover_three_groups_when_textured() {
    let lit = Program::LitModel.binding_code();
    assert!(lit.contains("@group(0) @binding(0) var<uniform> u_frame: Struct_frame;"));
    assert!(lit.contains("@group(0) @binding(1) var<uniform> u_lights: Struct_lights;"));
    assert!(lit.contains("@group(1) @binding(0) var<uniform> u_draw: Struct_draw;"));
    assert!(lit.contains("@group(2) @binding(0) var t_diffuse: texture_2d<f32>;"));

    let unlit = Program::Unlit.binding_code();
    assert!(!unlit.contains("@group(2)"));
}

// ============================================================================
// Composite uniforms
// ============================================================================

#[test]
fn composite_uniforms_mirror_post_state() {
    let mut post = PostProcessState::default();
    post.toggle_bloom();
    post.set_exposure(1.25);
    post.toggle_filter(PostFilter::Greyscale);

    let uniforms = CompositeUniforms::from_state(&post, true);
    assert!(approx(uniforms.exposure, 1.25));
    assert_eq!(uniforms.bloom_enabled, 1);
    assert_eq!(uniforms.filter_index, 2);
    assert_eq!(uniforms.apply_gamma, 0);
}

#[test]
fn linear_surface_requests_shader_gamma() {
    let uniforms = CompositeUniforms::from_state(&PostProcessState::default(), false);
    assert_eq!(uniforms.apply_gamma, 1);
    assert_eq!(uniforms.bloom_enabled, 0);
    assert_eq!(uniforms.filter_index, 0);
}

#[test]
fn blur_uniforms_encode_axis() {
    assert_eq!(BlurUniforms::new(true).horizontal, 1);
    assert_eq!(BlurUniforms::new(false).horizontal, 0);
}

// ============================================================================
// RendererSettings
// ============================================================================

#[test]
fn settings_defaults() {
    let settings = RendererSettings::default();
    assert_eq!((settings.width, settings.height), (800, 600));
    assert_eq!(settings.blur_iterations, 10);
    assert!(approx(settings.bright_threshold, 1.0));
    assert_eq!(settings.depth_format, wgpu::TextureFormat::Depth32Float);
    assert!(approx(settings.aspect_ratio(), 800.0 / 600.0));
}

#[test]
fn settings_json_overrides_only_given_fields() {
    let settings = RendererSettings::from_json(r#"{ "width": 1280, "blur_iterations": 4, "power_mode": "low_power" }"#).unwrap();

    assert_eq!(settings.width, 1280);
    assert_eq!(settings.height, 600);
    assert_eq!(settings.blur_iterations, 4);
    assert_eq!(settings.power_mode, PowerMode::LowPower);
    assert_eq!(settings.power_preference(), wgpu::PowerPreference::LowPower);
}

#[test]
fn malformed_settings_json_is_a_config_error() {
    let result = RendererSettings::from_json("{ width: ");
    assert!(matches!(result, Err(LumenError::ConfigError(_))));
}

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let settings = RendererSettings::load_or_default("no/such/settings.json");
    assert_eq!(settings.blur_iterations, RendererSettings::default().blur_iterations);
}

#[test]
fn resources_resolve_under_root() {
    let settings = RendererSettings::from_json(r#"{ "resource_root": "assets" }"#).unwrap();
    assert_eq!(
        settings.resource("textures/window.png"),
        std::path::Path::new("assets").join("textures/window.png")
    );
}
