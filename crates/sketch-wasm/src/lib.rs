use std::fmt;
use std::sync::Once;

use glam::{Mat4, Vec3};
use sketch_core::buffer::PointBuffer;
use sketch_core::shaders::{PointUniforms, ShaderError, ShaderLanguage, ShaderPair, UniformValue};
use sketch_core::sketches::{Primitive, Sketch, SketchKind};
use wasm_bindgen::prelude::*;

static PANIC_HOOK: Once = Once::new();

/// Failure to turn a host config into a running sketch.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Shader(ShaderError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(err) => write!(f, "invalid sketch config: {}", err),
            ConfigError::Shader(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl From<ShaderError> for ConfigError {
    fn from(err: ShaderError) -> Self {
        ConfigError::Shader(err)
    }
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Decode a `{"kind": ...}` config; an empty string selects the default.
fn parse_kind(config_json: &str) -> Result<SketchKind, ConfigError> {
    if config_json.trim().is_empty() {
        return Ok(SketchKind::default());
    }
    Ok(serde_json::from_str(config_json)?)
}

fn start(config_json: &str) -> Result<(Box<dyn Sketch>, PointBuffer), ConfigError> {
    let kind = parse_kind(config_json)?;
    let mut sketch = kind.into_sketch()?;
    let buffer = sketch.build();
    Ok((sketch, buffer))
}

fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

fn report(err: ConfigError) -> JsValue {
    web_sys::console::error_1(&format!("sketch config rejected: {}", err).into());
    err.into()
}

#[wasm_bindgen]
pub struct SketchWorld {
    sketch: Box<dyn Sketch>,
    buffer: PointBuffer,
    shader: Option<ShaderPair>,
    uniforms: PointUniforms,
}

#[wasm_bindgen]
impl SketchWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SketchWorld, JsValue> {
        PANIC_HOOK.call_once(console_error_panic_hook::set_once);

        let (sketch, buffer) = start(config_json).map_err(report)?;
        log(&format!(
            "WASM SketchWorld created: {} ({} points)",
            sketch.name(),
            buffer.len()
        ));

        let mut world = SketchWorld {
            shader: sketch.shader(),
            sketch,
            buffer,
            uniforms: PointUniforms::default(),
        };
        world.sync_uniforms();
        Ok(world)
    }

    /// Replace the running sketch. On error the current sketch keeps running.
    #[wasm_bindgen]
    pub fn rebuild(&mut self, config_json: &str) -> Result<(), JsValue> {
        let (sketch, buffer) = start(config_json).map_err(report)?;
        log(&format!(
            "WASM SketchWorld rebuilt: {} ({} points)",
            sketch.name(),
            buffer.len()
        ));
        self.shader = sketch.shader();
        self.sketch = sketch;
        self.buffer = buffer;
        self.sync_uniforms();
        Ok(())
    }

    /// Advance to `time` seconds; returns the milliseconds spent.
    #[wasm_bindgen]
    pub fn frame(&mut self, time: f32) -> f32 {
        let start = js_sys::Date::now();
        self.sketch.frame(&mut self.buffer, time);
        self.uniforms.time = time;
        let elapsed = js_sys::Date::now() - start;
        elapsed as f32
    }

    #[wasm_bindgen]
    pub fn name(&self) -> String {
        self.sketch.name().to_string()
    }

    /// `"points"`, `"line-strip"` or `"triangles"`.
    #[wasm_bindgen]
    pub fn primitive(&self) -> String {
        match self.sketch.primitive() {
            Primitive::Points => "points",
            Primitive::LineStrip => "line-strip",
            Primitive::Triangles => "triangles",
        }
        .to_string()
    }

    #[wasm_bindgen]
    pub fn point_count(&self) -> usize {
        self.buffer.len()
    }

    #[wasm_bindgen]
    pub fn positions_ptr(&self) -> *const f32 {
        self.buffer.positions().as_ptr()
    }

    #[wasm_bindgen]
    pub fn positions_len(&self) -> usize {
        self.buffer.positions().len()
    }

    #[wasm_bindgen]
    pub fn colors_ptr(&self) -> *const f32 {
        self.buffer.colors().as_ptr()
    }

    #[wasm_bindgen]
    pub fn colors_len(&self) -> usize {
        self.buffer.colors().len()
    }

    /// 3 for RGB, 4 for RGBA.
    #[wasm_bindgen]
    pub fn color_components(&self) -> u32 {
        self.buffer.layout().components() as u32
    }

    /// Bit 0: positions changed, bit 1: colors changed. Clears the flags.
    #[wasm_bindgen]
    pub fn take_dirty_mask(&mut self) -> u32 {
        self.buffer.take_dirty().mask()
    }

    /// Model rotation quaternion `[x, y, z, w]`.
    #[wasm_bindgen]
    pub fn rotation(&self) -> Vec<f32> {
        self.sketch.rotation().to_array().to_vec()
    }

    #[wasm_bindgen]
    pub fn draw_count(&self) -> Option<u32> {
        self.sketch.draw_count()
    }

    #[wasm_bindgen]
    pub fn set_camera(&mut self, x: f32, y: f32, z: f32) {
        self.sketch.set_camera(Vec3::new(x, y, z));
    }

    #[wasm_bindgen]
    pub fn shader_language(&self) -> Option<String> {
        self.shader.as_ref().map(|s| match s.language {
            ShaderLanguage::Glsl => "glsl".to_string(),
            ShaderLanguage::Wgsl => "wgsl".to_string(),
        })
    }

    #[wasm_bindgen]
    pub fn vertex_shader(&self) -> Option<String> {
        self.shader.as_ref().map(|s| s.vertex.to_string())
    }

    #[wasm_bindgen]
    pub fn fragment_shader(&self) -> Option<String> {
        self.shader.as_ref().map(|s| s.fragment.to_string())
    }

    /// Uniform defaults as `[{"name": ..., "value": ...}]`.
    #[wasm_bindgen]
    pub fn uniforms_json(&self) -> Result<String, JsValue> {
        let uniforms = self.shader.as_ref().map(|s| s.uniforms.as_slice()).unwrap_or(&[]);
        serde_json::to_string(uniforms).map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Pointer to an extra float buffer (per-vertex attribute or overlay
    /// segments such as `prismEdges`), null if the sketch has none by that
    /// name.
    #[wasm_bindgen]
    pub fn attribute_ptr(&self, name: &str) -> *const f32 {
        self.sketch
            .attribute(name)
            .map_or(std::ptr::null(), |a| a.as_ptr())
    }

    #[wasm_bindgen]
    pub fn attribute_len(&self, name: &str) -> usize {
        self.sketch.attribute(name).map_or(0, |a| a.len())
    }

    #[wasm_bindgen]
    pub fn indices_ptr(&self) -> *const u32 {
        self.sketch.indices().map_or(std::ptr::null(), |i| i.as_ptr())
    }

    #[wasm_bindgen]
    pub fn indices_len(&self) -> usize {
        self.sketch.indices().map_or(0, |i| i.len())
    }

    /// Column-major view-projection matrix for the WGSL pair.
    #[wasm_bindgen]
    pub fn set_view_proj(&mut self, m: &[f32]) {
        if let Ok(cols) = <&[f32; 16]>::try_from(m) {
            self.uniforms.view_proj = Mat4::from_cols_array(cols).to_cols_array_2d();
        }
    }

    #[wasm_bindgen]
    pub fn set_viewport(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.uniforms.viewport = [width.max(1.0), height.max(1.0)];
        self.uniforms.pixel_ratio = pixel_ratio.max(0.1);
    }

    /// Uniform block for the WGSL pair, ready for `writeBuffer`.
    #[wasm_bindgen]
    pub fn uniforms_ptr(&self) -> *const u8 {
        bytemuck::bytes_of(&self.uniforms).as_ptr()
    }

    #[wasm_bindgen]
    pub fn uniforms_byte_length(&self) -> usize {
        std::mem::size_of::<PointUniforms>()
    }
}

impl SketchWorld {
    /// Copy shader defaults into the WGSL uniform block.
    fn sync_uniforms(&mut self) {
        let Some(pair) = self.shader.as_ref() else {
            return;
        };
        let float = |name: &str| match pair.uniform(name) {
            Some(UniformValue::Float(v)) => Some(v),
            _ => None,
        };
        let u = &mut self.uniforms;
        if let Some(UniformValue::Vec3(c)) = pair.uniform("center") {
            u.center = c;
        }
        if let Some(v) = float("radius") {
            u.radius = v;
        }
        if let Some(v) = float("point_size") {
            u.point_size = v;
        }
        if let Some(v) = float("point_scale") {
            u.point_scale = v;
        }
        if let Some(v) = float("ripple") {
            u.ripple = v;
        }
    }
}
