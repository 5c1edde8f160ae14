//! Shader sources for the sketches, their uniform tables, and CPU mirrors of
//! the shader math.
//!
//! GLSL pairs follow three.js `ShaderMaterial` conventions (`position`,
//! `normal`, `uv`, `modelViewMatrix` and `projectionMatrix` are injected by
//! the host). The radial pulse point pair also exists as WGSL for WebGPU
//! hosts and is validated with naga before a sketch hands it out.

pub mod glsl;
pub mod reference;
pub mod validate;
pub mod wgsl;

use serde::Serialize;

pub use validate::{validate_wgsl, ShaderError};

/// Source language of a [`ShaderPair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ShaderLanguage {
    Glsl,
    Wgsl,
}

/// Default value of a uniform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UniformValue {
    Float(f32),
    Vec3([f32; 3]),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UniformDecl {
    pub name: &'static str,
    pub value: UniformValue,
}

impl UniformDecl {
    pub const fn float(name: &'static str, value: f32) -> Self {
        Self {
            name,
            value: UniformValue::Float(value),
        }
    }

    pub const fn vec3(name: &'static str, value: [f32; 3]) -> Self {
        Self {
            name,
            value: UniformValue::Vec3(value),
        }
    }
}

/// Vertex + fragment source with the uniforms the pair reads.
///
/// For WGSL both entry points live in one module, so `vertex` and
/// `fragment` hold the same source.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShaderPair {
    pub language: ShaderLanguage,
    pub vertex: &'static str,
    pub fragment: &'static str,
    pub uniforms: Vec<UniformDecl>,
}

impl ShaderPair {
    pub fn glsl(vertex: &'static str, fragment: &'static str, uniforms: &[UniformDecl]) -> Self {
        Self {
            language: ShaderLanguage::Glsl,
            vertex,
            fragment,
            uniforms: uniforms.to_vec(),
        }
    }

    /// Build a WGSL pair, validating the module first.
    pub fn wgsl(module: &'static str, uniforms: &[UniformDecl]) -> Result<Self, ShaderError> {
        validate_wgsl(module)?;
        Ok(Self {
            language: ShaderLanguage::Wgsl,
            vertex: module,
            fragment: module,
            uniforms: uniforms.to_vec(),
        })
    }

    /// Look up a uniform default by name.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.value)
    }

    /// Replace a uniform default; unknown names are ignored.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if let Some(u) = self.uniforms.iter_mut().find(|u| u.name == name) {
            u.value = value;
        }
    }
}

/// Uniform block of the WGSL point pair: 112 bytes, matches `PointUniforms`
/// in [`wgsl::RADIAL_PULSE`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniforms {
    pub view_proj: [[f32; 4]; 4], // 64 bytes
    pub center: [f32; 3],         // 12 bytes
    pub time: f32,                //  4 bytes
    pub radius: f32,              //  4 bytes
    pub point_size: f32,          //  4 bytes
    pub point_scale: f32,         //  4 bytes
    pub pixel_ratio: f32,         //  4 bytes
    pub viewport: [f32; 2],       //  8 bytes
    /// 0 = uniform pulse, 1 = distance ripple.
    pub ripple: f32,
    pub _pad: f32,
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            center: [0.0; 3],
            time: 0.0,
            radius: 2.0,
            point_size: 0.06 * 60.0,
            point_scale: 6.0,
            pixel_ratio: 1.0,
            viewport: [1.0, 1.0],
            ripple: 0.0,
            _pad: 0.0,
        }
    }
}
