//! Per-frame animators.
//!
//! Elapsed time in seconds is the only input. Animators that touch a
//! [`PointBuffer`] go through its mutable accessors, which mark the touched
//! attribute dirty so the host knows to re-upload it.

pub mod spring;

pub use spring::Spring;

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::buffer::PointBuffer;
use crate::color::{cycle_phase, HslGradient};
use crate::shaders::reference::{displace, pulse_delta, wave_delta};

pub trait FrameAnimator {
    fn animate(&mut self, buffer: &mut PointBuffer, time: f32);
}

/// Height-driven color cycle: every frame each point's gradient parameter is
/// its normalized height shifted by `fract(time * speed)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCycle {
    pub gradient: HslGradient,
    pub speed: f32,
    y_min: f32,
    y_range: f32,
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new(HslGradient::NAVY_TO_GOLD, 0.2)
    }
}

impl ColorCycle {
    pub fn new(gradient: HslGradient, speed: f32) -> Self {
        Self {
            gradient,
            speed,
            y_min: 0.0,
            y_range: 1.0,
        }
    }

    /// Capture the height range of `buffer`.
    pub fn fit(&mut self, buffer: &PointBuffer) {
        let (min, range) = buffer.y_bounds();
        self.y_min = min;
        self.y_range = range;
    }

    pub fn fitted(mut self, buffer: &PointBuffer) -> Self {
        self.fit(buffer);
        self
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.y_min, self.y_range)
    }

    #[inline]
    pub fn color_at(&self, y: f32, time: f32) -> Vec3 {
        let base = (y - self.y_min) / self.y_range;
        self.gradient.sample(cycle_phase(base, time, self.speed))
    }

    /// Write the colors for `time` into an already-sized buffer without
    /// marking anything.
    fn write(&self, positions: &[f32], colors: &mut [f32], components: usize, time: f32) {
        #[cfg(feature = "parallel")]
        {
            colors
                .par_chunks_exact_mut(components)
                .zip(positions.par_chunks_exact(3))
                .for_each(|(c, p)| {
                    let rgb = self.color_at(p[1], time);
                    c[..3].copy_from_slice(&rgb.to_array());
                });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (c, p) in colors
                .chunks_exact_mut(components)
                .zip(positions.chunks_exact(3))
            {
                let rgb = self.color_at(p[1], time);
                c[..3].copy_from_slice(&rgb.to_array());
            }
        }
    }
}

impl FrameAnimator for ColorCycle {
    fn animate(&mut self, buffer: &mut PointBuffer, time: f32) {
        let components = buffer.layout().components();
        let (positions, colors) = buffer.split_colors_mut();
        self.write(positions, colors, components, time);
    }
}

/// Spring-driven petal count for the layered sine flower.
///
/// Points keep their height; x/z are recomputed each frame from the stored
/// polar angle and layer scale as `scale * sin(angle * petals / 5)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PetalBloom {
    angles: Vec<f32>,
    scales: Vec<f32>,
    pub spring: Spring,
    /// Seconds for one open/close cycle of the target.
    pub cycle: f32,
    pub min_petals: f32,
    pub max_petals: f32,
}

/// Petal parameter to radius factor.
pub fn petal_shape(angle: f32, petals: f32) -> f32 {
    (angle * petals / 5.0).sin()
}

impl PetalBloom {
    pub fn new(angles: Vec<f32>, scales: Vec<f32>, initial_petals: f32) -> Self {
        Self {
            angles,
            scales,
            spring: Spring::at(initial_petals),
            cycle: 7.0,
            min_petals: 1.0,
            max_petals: 7.0,
        }
    }

    /// Spring target at `time`: oscillates between `min_petals * 5` and
    /// `max_petals * 5`.
    pub fn target(&self, time: f32) -> f32 {
        let cycle = if self.cycle > 0.0 { self.cycle } else { 1.0 };
        let wave = ((time * TAU / cycle).sin() + 1.0) / 2.0;
        (self.min_petals + wave * (self.max_petals - self.min_petals)) * 5.0
    }

    #[inline]
    pub fn petals(&self) -> f32 {
        self.spring.position
    }
}

impl FrameAnimator for PetalBloom {
    fn animate(&mut self, buffer: &mut PointBuffer, time: f32) {
        let petals = self.spring.step(self.target(time));
        let (angles, scales) = (&self.angles, &self.scales);
        buffer.map_positions(|i, p| {
            let (Some(&angle), Some(&scale)) = (angles.get(i), scales.get(i)) else {
                return p;
            };
            let radius = scale * petal_shape(angle, petals);
            Vec3::new(angle.cos() * radius, p.y, angle.sin() * radius)
        });
    }
}

/// How the pulse phase depends on the point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseMode {
    /// Every point breathes in phase: `sin(t) + 1`.
    #[default]
    Uniform,
    /// Phase delayed by distance from the center.
    Ripple,
}

/// CPU rendition of the radial pulse vertex shader, for hosts that draw
/// with a stock point material.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialPulse {
    rest: Vec<Vec3>,
    pub center: Vec3,
    pub radius: f32,
    pub mode: PulseMode,
    pub speed: f32,
    pub freq: f32,
}

impl RadialPulse {
    pub fn new(buffer: &PointBuffer, center: Vec3, radius: f32, mode: PulseMode) -> Self {
        Self {
            rest: (0..buffer.len()).map(|i| buffer.position(i)).collect(),
            center,
            radius,
            mode,
            speed: 5.0,
            freq: 1.0,
        }
    }

    /// Displacement factor for a point at rest position `p`.
    pub fn delta(&self, p: Vec3, time: f32) -> f32 {
        match self.mode {
            PulseMode::Uniform => pulse_delta(time),
            PulseMode::Ripple => wave_delta(time, p.distance(self.center), self.speed, self.freq),
        }
    }
}

impl FrameAnimator for RadialPulse {
    fn animate(&mut self, buffer: &mut PointBuffer, time: f32) {
        let rest = &self.rest;
        buffer.map_positions(|i, p| match rest.get(i) {
            Some(&r) => displace(r, self.center, self.radius * self.delta(r, time)),
            None => p,
        });
    }
}

/// Accumulated model rotation from per-axis rates (radians per second).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub rates: Vec3,
    euler: Vec3,
    last_time: Option<f32>,
}

impl Spin {
    pub fn new(rates: Vec3) -> Self {
        Self {
            rates,
            euler: Vec3::ZERO,
            last_time: None,
        }
    }

    /// Advance to `time` and return the model rotation. Time going
    /// backwards contributes nothing.
    pub fn advance(&mut self, time: f32) -> Quat {
        let dt = self.last_time.map_or(0.0, |last| (time - last).max(0.0));
        self.last_time = Some(time);
        self.euler += self.rates * dt;
        self.rotation()
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.euler.x, self.euler.y, self.euler.z)
    }
}

/// Progressive draw range: the drawn vertex count grows at `rate` per
/// second until it reaches `max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRange {
    count: f32,
    pub max: u32,
    pub rate: f32,
    last_time: Option<f32>,
}

impl DrawRange {
    pub fn new(max: u32, rate: f32) -> Self {
        Self {
            count: 0.0,
            max,
            rate,
            last_time: None,
        }
    }

    pub fn advance(&mut self, time: f32) -> u32 {
        let dt = self.last_time.map_or(0.0, |last| (time - last).max(0.0));
        self.last_time = Some(time);
        self.count = (self.count + self.rate.max(0.0) * dt).min(self.max as f32);
        self.count()
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count.floor() as u32
    }
}
