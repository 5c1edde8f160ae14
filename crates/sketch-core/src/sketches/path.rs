//! Nested square frames drawn as a growing line strip, and the same frames
//! swept into a tube with a bulge travelling along it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{Primitive, Sketch};
use crate::animate::DrawRange;
use crate::buffer::{ColorLayout, PointBuffer};
use crate::color::hsl_to_rgb;
use crate::curve::{CatmullRom, TubeMesh};
use crate::shaders::glsl::{
    LINE_PULSE_FRAGMENT, LINE_PULSE_UNIFORMS, LINE_PULSE_VERTEX, TUBE_FLOW_FRAGMENT,
    TUBE_FLOW_UNIFORMS, TUBE_FLOW_VERTEX,
};
use crate::shaders::reference::flow_blob;
use crate::shaders::{ShaderPair, UniformValue};

/// Half-sizes of the default frames.
pub const FRAME_SIZES: [f32; 6] = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0];

/// Eight corners per frame of half-size `k`: up the `-x` side, across the
/// top, and down the `+x` side.
pub fn nested_frames(sizes: &[f32]) -> Vec<Vec3> {
    sizes
        .iter()
        .flat_map(|&k| {
            [
                Vec3::new(-k, 0.0, -k),
                Vec3::new(-k, 0.0, 0.0),
                Vec3::new(-k, k, 0.0),
                Vec3::new(-k, k, -k),
                Vec3::new(k, k, -k),
                Vec3::new(k, k, 0.0),
                Vec3::new(k, 0.0, 0.0),
                Vec3::new(k, 0.0, -k),
            ]
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePathConfig {
    pub sizes: Vec<f32>,
    /// Uniform scale baked into the positions.
    pub scale: f32,
    /// Vertices revealed per second.
    pub draw_rate: f32,
    pub amplitude: f32,
}

impl Default for LinePathConfig {
    fn default() -> Self {
        Self {
            sizes: FRAME_SIZES.to_vec(),
            scale: 0.45,
            draw_rate: 30.0,
            amplitude: 0.1,
        }
    }
}

pub struct LinePath {
    config: LinePathConfig,
    index: Vec<f32>,
    range: DrawRange,
}

impl LinePath {
    pub fn new(config: LinePathConfig) -> Self {
        let range = DrawRange::new(0, config.draw_rate);
        Self {
            config,
            index: Vec::new(),
            range,
        }
    }
}

impl Sketch for LinePath {
    fn name(&self) -> &'static str {
        "line-path"
    }

    fn primitive(&self) -> Primitive {
        Primitive::LineStrip
    }

    fn build(&mut self) -> PointBuffer {
        let points = nested_frames(&self.config.sizes);
        let n = points.len();
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, n);
        for (i, p) in points.iter().enumerate() {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };
            buffer.push_rgb(*p * self.config.scale, hsl_to_rgb(0.6, 1.0, 0.5 + 0.5 * t));
        }
        self.index = (0..n).map(|i| i as f32).collect();
        self.range = DrawRange::new(n as u32, self.config.draw_rate);
        buffer
    }

    fn frame(&mut self, _buffer: &mut PointBuffer, time: f32) {
        self.range.advance(time);
    }

    fn shader(&self) -> Option<ShaderPair> {
        let mut pair = ShaderPair::glsl(LINE_PULSE_VERTEX, LINE_PULSE_FRAGMENT, LINE_PULSE_UNIFORMS);
        pair.set_uniform("u_maxPoints", UniformValue::Float(self.index.len() as f32));
        pair.set_uniform("u_amp", UniformValue::Float(self.config.amplitude));
        Some(pair)
    }

    fn attribute(&self, name: &str) -> Option<&[f32]> {
        (name == "aIndex").then_some(self.index.as_slice())
    }

    fn draw_count(&self) -> Option<u32> {
        Some(self.range.count())
    }
}

/// Along-tube gradient of the flow fragment.
pub fn tube_gradient(u: f32) -> Vec3 {
    Vec3::new(0.1, 0.3, 0.7).lerp(Vec3::new(0.2, 0.6, 1.0), u.clamp(0.0, 1.0))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeFlowConfig {
    pub sizes: Vec<f32>,
    pub tubular_segments: usize,
    pub radial_segments: usize,
    pub radius: f32,
    /// Arc-length table resolution.
    pub divisions: usize,
    pub speed: f32,
    pub width: f32,
    /// Peak bulge along the normal.
    pub bulge: f32,
    /// Also apply the bulge on the CPU.
    pub cpu_mirror: bool,
}

impl Default for TubeFlowConfig {
    fn default() -> Self {
        Self {
            sizes: FRAME_SIZES.to_vec(),
            tubular_segments: 200,
            radial_segments: 16,
            radius: 0.2,
            divisions: 200,
            speed: 0.2,
            width: 0.05,
            bulge: 0.3,
            cpu_mirror: false,
        }
    }
}

pub struct TubeFlow {
    config: TubeFlowConfig,
    rest: Vec<Vec3>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl TubeFlow {
    pub fn new(config: TubeFlowConfig) -> Self {
        Self {
            config,
            rest: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn normal(&self, i: usize) -> Vec3 {
        self.normals
            .get(i * 3..i * 3 + 3)
            .map_or(Vec3::ZERO, Vec3::from_slice)
    }
}

impl Sketch for TubeFlow {
    fn name(&self) -> &'static str {
        "tube-flow"
    }

    fn primitive(&self) -> Primitive {
        Primitive::Triangles
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let curve = CatmullRom::new(nested_frames(&c.sizes), c.divisions);
        let mesh = TubeMesh::sweep(&curve, c.tubular_segments, c.radius, c.radial_segments);

        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, mesh.vertex_count());
        for (p, uv) in mesh.positions.iter().zip(&mesh.uvs) {
            buffer.push_rgb(*p, tube_gradient(uv.x));
        }
        self.normals = mesh.normals.iter().flat_map(|n| n.to_array()).collect();
        self.uvs = mesh.uvs.iter().flat_map(|uv: &Vec2| uv.to_array()).collect();
        self.indices = mesh.indices;
        self.rest = mesh.positions;
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        if !self.config.cpu_mirror || buffer.len() != self.rest.len() {
            return;
        }
        let c = &self.config;
        for i in 0..self.rest.len() {
            let u = self.uvs[i * 2];
            let blob = flow_blob(u, time, c.speed, c.width);
            buffer.set_position(i, self.rest[i] + self.normal(i) * c.bulge * blob);
        }
    }

    fn shader(&self) -> Option<ShaderPair> {
        let c = &self.config;
        let mut pair = ShaderPair::glsl(TUBE_FLOW_VERTEX, TUBE_FLOW_FRAGMENT, TUBE_FLOW_UNIFORMS);
        pair.set_uniform("u_speed", UniformValue::Float(c.speed));
        pair.set_uniform("u_width", UniformValue::Float(c.width));
        pair.set_uniform("u_radius", UniformValue::Float(c.bulge));
        Some(pair)
    }

    fn attribute(&self, name: &str) -> Option<&[f32]> {
        match name {
            "normal" => Some(&self.normals),
            "uv" => Some(&self.uvs),
            _ => None,
        }
    }

    fn indices(&self) -> Option<&[u32]> {
        Some(&self.indices)
    }
}
