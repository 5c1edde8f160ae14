//! Height-stacked clouds colored by the navy-to-gold cycle: a tower of disks
//! drilled with cylindrical holes, random slabs, and deterministic grids.

use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{rand_in_range, rand_in_ranges, CycleSpin, Sketch, STRATA_INTERVALS};
use crate::buffer::{clamp_count, ColorLayout, PointBuffer};

/// Cap on drilled holes.
pub const MAX_HOLES: usize = 4096;
/// Cap on rejection-sampling attempts per point.
pub const MAX_ATTEMPTS: u32 = 1024;

/// Uniform point in a disk of `radius` (area-uniform via `sqrt`).
pub fn rand_point_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let r = rng.gen::<f32>().sqrt() * radius;
    let theta = rng.gen::<f32>() * TAU;
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Vertical cylinder spanning one height interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hole {
    pub center: Vec2,
    pub radius: f32,
    pub y: [f32; 2],
}

impl Hole {
    pub fn contains(&self, p: Vec3) -> bool {
        p.y >= self.y[0]
            && p.y <= self.y[1]
            && Vec2::new(p.x, p.z).distance_squared(self.center) < self.radius * self.radius
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    pub count: usize,
    pub hole_count: usize,
    pub hole_radius: [f32; 2],
    /// One disk per interval; disk `i` has radius `base_radius + i * radius_step`.
    pub intervals: Vec<[f32; 2]>,
    pub base_radius: f32,
    pub radius_step: f32,
    /// Rejection-sampling budget per point; points that never land outside
    /// every hole are dropped.
    pub max_attempts: u32,
    pub color_speed: f32,
    pub spin: Vec3,
    pub seed: u64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            count: 150_000,
            hole_count: 150,
            hole_radius: [0.3, 0.8],
            intervals: vec![
                [-5.0, -4.0],
                [-3.5, -2.5],
                [-2.0, -1.0],
                [-0.5, 0.5],
                [1.0, 2.0],
                [2.5, 3.5],
                [4.0, 5.0],
            ],
            base_radius: 1.0,
            radius_step: 0.5,
            max_attempts: 64,
            color_speed: 0.2,
            spin: Vec3::new(0.0, 0.1, 0.05),
            seed: 1,
        }
    }
}

pub struct CarvedTower {
    config: TowerConfig,
    holes: Vec<Hole>,
    anim: CycleSpin,
}

impl CarvedTower {
    pub fn new(config: TowerConfig) -> Self {
        let anim = CycleSpin::new(config.color_speed, config.spin);
        Self {
            config,
            holes: Vec::new(),
            anim,
        }
    }

    /// Holes drilled by the last build.
    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    fn disk_radius(&self, layer: usize) -> f32 {
        self.config.base_radius + layer as f32 * self.config.radius_step
    }
}

impl Sketch for CarvedTower {
    fn name(&self) -> &'static str {
        "carved-tower"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        let layers = c.intervals.len();
        let count = clamp_count(c.count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);
        if layers == 0 {
            self.holes.clear();
            return buffer;
        }

        let hole_disk = self.disk_radius(layers - 1);
        self.holes = (0..c.hole_count.min(MAX_HOLES))
            .map(|_| {
                let center = rand_point_in_disk(&mut rng, hole_disk);
                let radius = rand_in_range(&mut rng, c.hole_radius);
                let y = c.intervals[rng.gen_range(0..layers)];
                Hole { center, radius, y }
            })
            .collect();

        for _ in 0..count {
            for _ in 0..c.max_attempts.clamp(1, MAX_ATTEMPTS) {
                let layer = rng.gen_range(0..layers);
                let xz = rand_point_in_disk(&mut rng, self.disk_radius(layer));
                let y = rand_in_range(&mut rng, c.intervals[layer]);
                let p = Vec3::new(xz.x, y, xz.y);
                if !self.holes.iter().any(|h| h.contains(p)) {
                    buffer.push_rgb(p, Vec3::ZERO);
                    break;
                }
            }
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

/// Random points in horizontal slabs over a square footprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrataConfig {
    pub count: usize,
    /// Half-size of the square footprint in x and z.
    pub half_extent: f32,
    pub intervals: Vec<[f32; 2]>,
    pub color_speed: f32,
    pub spin: Vec3,
    pub seed: u64,
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            half_extent: 1.25,
            intervals: STRATA_INTERVALS.to_vec(),
            color_speed: 0.2,
            spin: Vec3::new(0.0, 0.1, 0.1),
            seed: 1,
        }
    }
}

pub struct Strata {
    config: StrataConfig,
    anim: CycleSpin,
}

impl Strata {
    pub fn new(config: StrataConfig) -> Self {
        let anim = CycleSpin::new(config.color_speed, config.spin);
        Self { config, anim }
    }
}

impl Sketch for Strata {
    fn name(&self) -> &'static str {
        "strata"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        let count = clamp_count(c.count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);
        let span = c.half_extent * 2.0;
        for _ in 0..count {
            let x = (rng.gen::<f32>() - 0.5) * span;
            let z = (rng.gen::<f32>() - 0.5) * span;
            let y = rand_in_ranges(&mut rng, &c.intervals);
            buffer.push_rgb(Vec3::new(x, y, z), Vec3::ZERO);
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

/// Deterministic grids, one per height interval. Within a layer the height
/// ramps linearly across the interval in row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredGridConfig {
    pub count: usize,
    pub x_range: f32,
    pub z_range: f32,
    pub intervals: Vec<[f32; 2]>,
    pub color_speed: f32,
    pub spin: Vec3,
}

impl Default for LayeredGridConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            x_range: 2.0,
            z_range: 2.0,
            intervals: STRATA_INTERVALS.to_vec(),
            color_speed: 0.2,
            spin: Vec3::new(0.0, 0.2, 0.05),
        }
    }
}

/// Points in layer `layer` of `layers` when `count` is spread as evenly as
/// possible, earlier layers taking the remainder.
pub fn layer_share(count: usize, layers: usize, layer: usize) -> usize {
    if layers == 0 {
        return 0;
    }
    let base = count / layers;
    if layer < count % layers {
        base + 1
    } else {
        base
    }
}

pub struct LayeredGrid {
    config: LayeredGridConfig,
    anim: CycleSpin,
}

impl LayeredGrid {
    pub fn new(config: LayeredGridConfig) -> Self {
        let anim = CycleSpin::new(config.color_speed, config.spin);
        Self { config, anim }
    }
}

impl Sketch for LayeredGrid {
    fn name(&self) -> &'static str {
        "layered-grid"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let layers = c.intervals.len();
        let count = clamp_count(c.count);
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, count);

        for (li, &[y0, y1]) in c.intervals.iter().enumerate() {
            let layer_count = layer_share(count, layers, li);
            if layer_count == 0 {
                continue;
            }
            let cols = (layer_count as f32).sqrt().ceil().max(1.0) as usize;
            let rows = layer_count.div_ceil(cols);
            let spacing_x = c.x_range / cols as f32;
            let spacing_z = c.z_range / rows as f32;
            let start_x = -c.x_range / 2.0 + spacing_x / 2.0;
            let start_z = -c.z_range / 2.0 + spacing_z / 2.0;

            for idx in 0..layer_count {
                let (r, col) = (idx / cols, idx % cols);
                let t = if layer_count > 1 {
                    (idx as f32 / (layer_count - 1) as f32).min(1.0)
                } else {
                    0.5
                };
                let p = Vec3::new(
                    start_x + col as f32 * spacing_x,
                    y0 + t * (y1 - y0),
                    start_z + r as f32 * spacing_z,
                );
                buffer.push_rgb(p, Vec3::ZERO);
            }
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
