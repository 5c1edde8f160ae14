//! Polar petal clouds.
//!
//! Every variant samples a polar angle, turns it into a radius through a
//! petal shape and lifts the point into one of the height intervals. The
//! layered variants additionally shrink the flower from an outer to an inner
//! scale across five layers.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{rand_in_range, rand_in_ranges, CycleSpin, Sketch, STRATA_INTERVALS};
use crate::animate::{petal_shape, FrameAnimator, PetalBloom, Spin};
use crate::buffer::{clamp_count, ColorLayout, PointBuffer};
use crate::shaders::glsl::{FLOWER_FRAGMENT, FLOWER_UNIFORMS, FLOWER_VERTEX};
use crate::shaders::reference::{flower_gradient, flower_radius, FlowerParams};
use crate::shaders::{ShaderPair, UniformValue};

/// Height slabs of the clamped flower; the outer two are tall.
pub const CLAMPED_INTERVALS: [[f32; 2]; 7] = [
    [-5.0, -1.0],
    [-0.85, -0.65],
    [-0.45, -0.25],
    [-0.10, 0.10],
    [0.25, 0.45],
    [0.65, 0.85],
    [1.0, 5.0],
];

/// Height factors of the stepped and spiral flowers. Point `i` uses the sum
/// of both ends of interval `i % 7` as a multiplier.
pub const STEPPED_INTERVALS: [[f32; 2]; 7] = [
    [-2.0, -1.0],
    [-0.85, -0.65],
    [-0.45, -0.25],
    [-0.10, 0.10],
    [0.25, 0.45],
    [0.65, 0.85],
    [1.0, 2.0],
];

/// Layer count of the layered variants.
pub const FLOWER_LAYERS: usize = 5;
/// Scale of the innermost layer.
pub const INNER_SCALE: f32 = 1.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowerVariant {
    /// `min(5 |sin(a n)|, 1)` petals with an `atanh` height warp.
    #[default]
    Clamped,
    /// Quantized `atanh(tan(a n))` petals.
    Stepped,
    /// Stepped petals swept into a curling spiral.
    Spiral,
    /// Five layers of `sin(a n / 5)` petals.
    LayeredSine,
    /// Opposite quadrant pairs with different petal frequencies.
    Quadrant,
}

impl FlowerVariant {
    pub fn default_petals(self) -> f32 {
        match self {
            FlowerVariant::Clamped => 50.0,
            FlowerVariant::Stepped | FlowerVariant::Spiral => 20.0,
            FlowerVariant::LayeredSine => 35.0,
            FlowerVariant::Quadrant => 100.0,
        }
    }

    pub fn default_scale(self) -> f32 {
        match self {
            FlowerVariant::Clamped => 5.0,
            FlowerVariant::Stepped | FlowerVariant::Spiral => 2.5,
            FlowerVariant::LayeredSine | FlowerVariant::Quadrant => 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub variant: FlowerVariant,
    pub count: usize,
    /// Overrides the variant's petal frequency.
    pub petals: Option<f32>,
    /// Overrides the variant's (outer) scale.
    pub scale: Option<f32>,
    pub color_speed: f32,
    pub spin: Vec3,
    pub seed: u64,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            variant: FlowerVariant::Clamped,
            count: 50_000,
            petals: None,
            scale: None,
            color_speed: 0.2,
            spin: Vec3::new(0.0, 0.1, 0.1),
            seed: 1,
        }
    }
}

/// Quantized `|atanh(v) * 0.9|` rounded to steps of 0.05.
fn stepped_shape(v: f32) -> f32 {
    let main = (v * 0.9).abs();
    if main.is_finite() {
        (main * 10.0).round() / 20.0
    } else {
        0.0
    }
}

/// `atanh` inside its domain, `atan` outside it.
fn safe_atanh(raw: f32) -> f32 {
    if raw.abs() < 0.999 {
        raw.atanh()
    } else {
        raw.atan()
    }
}

fn interval_factor(intervals: &[[f32; 2]], i: usize) -> f32 {
    let [a, b] = intervals[i % intervals.len()];
    a + b
}

/// Scale of `layer` when shrinking from `outer` to [`INNER_SCALE`].
pub fn layer_scale(outer: f32, layer: usize) -> f32 {
    let t = layer as f32 / (FLOWER_LAYERS - 1) as f32;
    outer - t * (outer - INNER_SCALE)
}

fn polar(angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Sample point `i` of `count` for a variant.
pub fn sample_flower<R: Rng + ?Sized>(
    variant: FlowerVariant,
    rng: &mut R,
    i: usize,
    count: usize,
    petals: f32,
    scale: f32,
) -> Vec3 {
    match variant {
        FlowerVariant::Clamped => {
            let angle = rng.gen::<f32>() * TAU;
            let shape = ((angle * petals).sin().abs() * 5.0).min(1.0);
            let radius = scale * shape;
            let (x, z) = (angle.cos() * radius, angle.sin() * radius);
            let (tx, tz) = (x.tan(), z.tan());
            let warp = ((tx + tz) * tx.hypot(tz) * 0.01).atanh();
            let y = warp * rand_in_ranges(rng, &CLAMPED_INTERVALS);
            Vec3::new(x, if y.is_finite() { y } else { 0.0 }, z)
        }
        FlowerVariant::Stepped => {
            let angle = rng.gen::<f32>() * TAU;
            let radius = scale * stepped_shape((angle * petals).tan().atanh());
            polar(angle, radius, radius * interval_factor(&STEPPED_INTERVALS, i))
        }
        FlowerVariant::Spiral => {
            const TURNS: f32 = 3.0;
            const LAYERS: f32 = 4.0;
            const JITTER: f32 = 0.18;
            const CURL: f32 = 0.35;

            let u = (i as f32 + 0.5) / count.max(1) as f32;
            let layer = (u * LAYERS).floor();
            let lf = (layer + rng.gen::<f32>()) / LAYERS;
            let angle = rng.gen::<f32>() * TAU + lf * TURNS * TAU;

            let shape = stepped_shape(safe_atanh((angle * petals).tan()));
            let mut radius = scale * shape * (u.sqrt() * 0.9 + 0.1);
            radius += (rng.gen::<f32>() - 0.5) * JITTER * lf;

            let curled = angle + CURL * (angle * 2.0 + i as f32 * 0.0009).sin();
            let mut y = radius * (0.4 + lf);
            y += (rng.gen::<f32>() - 0.5) * 0.12 * (1.0 - lf);
            polar(curled, radius, y * interval_factor(&STEPPED_INTERVALS, i))
        }
        FlowerVariant::LayeredSine => {
            let scale = layer_scale(scale, i % FLOWER_LAYERS);
            let angle = rng.gen::<f32>() * TAU;
            let radius = scale * petal_shape(angle, petals);
            polar(angle, radius, rand_in_ranges(rng, &STRATA_INTERVALS))
        }
        FlowerVariant::Quadrant => {
            let scale = layer_scale(scale, i % FLOWER_LAYERS);
            let quadrant = rng.gen::<f32>() * FRAC_PI_2;
            let flip = rng.gen::<f32>() < 0.5;
            let (offset, shape) = if i % 2 == 0 {
                (if flip { 0.0 } else { PI }, (quadrant * petals).sin())
            } else {
                (
                    if flip { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 },
                    (quadrant * 16.0).sin(),
                )
            };
            polar(quadrant + offset, scale * shape, rand_in_ranges(rng, &STRATA_INTERVALS))
        }
    }
}

pub struct Flower {
    config: FlowerConfig,
    anim: CycleSpin,
}

impl Flower {
    pub fn new(config: FlowerConfig) -> Self {
        let anim = CycleSpin::new(config.color_speed, config.spin);
        Self { config, anim }
    }
}

impl Sketch for Flower {
    fn name(&self) -> &'static str {
        match self.config.variant {
            FlowerVariant::Clamped => "flower-clamped",
            FlowerVariant::Stepped => "flower-stepped",
            FlowerVariant::Spiral => "flower-spiral",
            FlowerVariant::LayeredSine => "flower-layered",
            FlowerVariant::Quadrant => "flower-quadrant",
        }
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let petals = c.petals.unwrap_or_else(|| c.variant.default_petals());
        let scale = c.scale.unwrap_or_else(|| c.variant.default_scale());
        let mut rng = StdRng::seed_from_u64(c.seed);

        let count = clamp_count(c.count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);
        for i in 0..count {
            let p = sample_flower(c.variant, &mut rng, i, count, petals, scale);
            buffer.push_rgb(p, Vec3::ZERO);
        }
        self.anim.prime(&mut buffer);
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        self.anim.frame(buffer, time);
    }

    fn rotation(&self) -> Quat {
        self.anim.spin.rotation()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetalBloomConfig {
    pub count: usize,
    pub outer_scale: f32,
    pub initial_petals: f32,
    /// Seconds per open/close cycle.
    pub cycle: f32,
    pub min_petals: f32,
    pub max_petals: f32,
    pub color_speed: f32,
    pub spin: Vec3,
    pub seed: u64,
}

impl Default for PetalBloomConfig {
    fn default() -> Self {
        Self {
            count: 50_000,
            outer_scale: 10.0,
            initial_petals: 35.0,
            cycle: 7.0,
            min_petals: 1.0,
            max_petals: 7.0,
            color_speed: 0.2,
            spin: Vec3::new(0.0, 0.1, 0.1),
            seed: 1,
        }
    }
}

/// Layered sine flower whose petal count follows a spring.
pub struct PetalBloomSketch {
    config: PetalBloomConfig,
    bloom: Option<PetalBloom>,
    anim: CycleSpin,
}

impl PetalBloomSketch {
    pub fn new(config: PetalBloomConfig) -> Self {
        let anim = CycleSpin::new(config.color_speed, config.spin);
        Self {
            config,
            bloom: None,
            anim,
        }
    }

    /// Current (spring) petal parameter.
    pub fn petals(&self) -> f32 {
        self.bloom
            .as_ref()
            .map_or(self.config.initial_petals, PetalBloom::petals)
    }
}

impl Sketch for PetalBloomSketch {
    fn name(&self) -> &'static str {
        "petal-bloom"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        let count = clamp_count(c.count);
        let mut angles = Vec::with_capacity(count);
        let mut scales = Vec::with_capacity(count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);

        for i in 0..count {
            let scale = layer_scale(c.outer_scale, i % FLOWER_LAYERS);
            let angle = rng.gen::<f32>() * TAU;
            let radius = scale * petal_shape(angle, c.initial_petals);
            let y = rand_in_ranges(&mut rng, &STRATA_INTERVALS);
            angles.push(angle);
            scales.push(scale);
            buffer.push_rgb(polar(angle, radius, y), Vec3::ZERO);
        }

        let mut bloom = PetalBloom::new(angles, scales, c.initial_petals);
        bloom.cycle = c.cycle;
        bloom.min_petals = c.min_petals;
        bloom.max_petals = c.max_petals;
        self.bloom = Some(bloom);

        self.anim.prime(&mut buffer);
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        if let Some(bloom) = self.bloom.as_mut() {
            bloom.animate(buffer, time);
        }
        self.anim.frame(buffer, time);
    }

    fn rotation(&self) -> Quat {
        self.anim.spin.rotation()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerShaderConfig {
    pub count: usize,
    pub intervals: Vec<[f32; 2]>,
    pub params: FlowerParams,
    /// Also move the points on the CPU, for hosts without the GLSL pair.
    pub cpu_mirror: bool,
    /// Y rotation in radians per second.
    pub spin: f32,
    pub seed: u64,
}

impl Default for FlowerShaderConfig {
    fn default() -> Self {
        Self {
            count: 50_000,
            intervals: STRATA_INTERVALS.to_vec(),
            params: FlowerParams::default(),
            cpu_mirror: false,
            spin: 0.12,
            seed: 1,
        }
    }
}

/// Angle/layer/height attributes for the flower vertex shader.
pub struct FlowerShader {
    config: FlowerShaderConfig,
    angles: Vec<f32>,
    layers: Vec<f32>,
    heights: Vec<f32>,
    spin: Spin,
}

impl FlowerShader {
    pub fn new(config: FlowerShaderConfig) -> Self {
        let spin = Spin::new(Vec3::new(0.0, config.spin, 0.0));
        Self {
            config,
            angles: Vec::new(),
            layers: Vec::new(),
            heights: Vec::new(),
            spin,
        }
    }
}

impl Sketch for FlowerShader {
    fn name(&self) -> &'static str {
        "flower-shader"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        self.angles.clear();
        self.layers.clear();
        self.heights.clear();

        let count = clamp_count(c.count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);
        if !c.intervals.is_empty() {
            for i in 0..count {
                let layer = i % c.intervals.len();
                let angle = rng.gen::<f32>() * TAU;
                let y = rand_in_range(&mut rng, c.intervals[layer]);
                let radius = flower_radius(angle, 0.0, &c.params);
                self.angles.push(angle);
                self.layers.push(layer as f32);
                self.heights.push(y);
                buffer.push_rgb(polar(angle, radius, y), flower_gradient(y));
            }
        }
        self.spin = Spin::new(self.spin.rates);
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        self.spin.advance(time);
        if !self.config.cpu_mirror {
            return;
        }
        let (angles, params) = (&self.angles, &self.config.params);
        buffer.map_positions(|i, p| match angles.get(i) {
            Some(&angle) => polar(angle, flower_radius(angle, time, params), p.y),
            None => p,
        });
    }

    fn shader(&self) -> Option<ShaderPair> {
        let p = &self.config.params;
        let mut pair = ShaderPair::glsl(FLOWER_VERTEX, FLOWER_FRAGMENT, FLOWER_UNIFORMS);
        pair.set_uniform("u_numPetals", UniformValue::Float(p.num_petals));
        pair.set_uniform("u_petalSpeed", UniformValue::Float(p.petal_speed));
        pair.set_uniform("u_warpFreq", UniformValue::Float(p.warp_freq));
        pair.set_uniform("u_warpSpeed", UniformValue::Float(p.warp_speed));
        pair.set_uniform("u_baseRadius", UniformValue::Float(p.base_radius));
        Some(pair)
    }

    fn attribute(&self, name: &str) -> Option<&[f32]> {
        match name {
            "aAngle" => Some(&self.angles),
            "aLayer" => Some(&self.layers),
            "aY" => Some(&self.heights),
            _ => None,
        }
    }

    fn rotation(&self) -> Quat {
        self.spin.rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_scale_spans_outer_to_inner() {
        assert_eq!(layer_scale(10.0, 0), 10.0);
        assert!((layer_scale(10.0, FLOWER_LAYERS - 1) - INNER_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_stepped_shape_quantizes_and_drops_nan() {
        assert_eq!(stepped_shape(f32::NAN), 0.0);
        assert!((stepped_shape(1.0) - 0.45).abs() < 1e-6);
    }
}
