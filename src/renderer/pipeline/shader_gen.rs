//! Shader Code Generator
//!
//! Renders a WGSL template with the vertex input struct, the generated
//! bindings and a set of string defines.

use std::collections::BTreeMap;

use minijinja::value::Value;
use serde::Serialize;

use super::shader_manager::{LocationAllocator, get_env};
use crate::errors::Result;

/// Template defines, ordered so equal option sets render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShaderCompilationOptions {
    defines: BTreeMap<String, String>,
}

impl ShaderCompilationOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_define(&mut self, key: &str, value: &str) {
        self.defines.insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn with_define(mut self, key: &str, value: &str) -> Self {
        self.add_define(key, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn defines(&self) -> &BTreeMap<String, String> {
        &self.defines
    }
}

#[derive(Serialize)]
struct ShaderContext<'a> {
    #[serde(flatten)]
    defines: &'a BTreeMap<String, String>,
    vertex_input_code: Option<&'a str>,
    binding_code: &'a str,
    loc: Value,
}

pub struct ShaderGenerator;

impl ShaderGenerator {
    pub fn generate_shader(
        vertex_input_code: Option<&str>,
        binding_code: &str,
        template_name: &str,
        options: &ShaderCompilationOptions,
    ) -> Result<String> {
        let env = get_env();

        let ctx = ShaderContext {
            defines: options.defines(),
            vertex_input_code,
            binding_code,
            loc: Value::from_object(LocationAllocator::new()),
        };

        let template = env.get_template(template_name)?;
        let source = template.render(&ctx)?;

        Ok(format!("// === Generated Shader: {template_name} ===\n{source}"))
    }
}
