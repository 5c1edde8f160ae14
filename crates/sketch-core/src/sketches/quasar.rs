//! Quasar: a spiral accretion disk, a thin photon ring and two polar jets.
//!
//! Disk particles keep a polar orbit `(radius, theta)` and are re-placed every
//! frame; their height comes from value-noise turbulence plus a three-armed
//! spiral wave. Color is relativistic beaming toward the camera, so the
//! approaching side of the disk is brighter and bluer. Jet particles travel
//! outward along `y` and respawn near the core when their lifetime runs out.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Sketch;
use crate::buffer::{clamp_count, ColorLayout, PointBuffer, MAX_POINTS};
use crate::color::hsl_to_rgb;
use crate::math::noise3;

pub const BLACK_HOLE_RADIUS: f32 = 1.8;
pub const PHOTON_RADIUS: f32 = 1.85;
pub const DISK_MIN_RADIUS: f32 = 1.95;
pub const DISK_MAX_RADIUS: f32 = 8.0;
pub const JET_LENGTH: f32 = 30.0;
pub const JET_WIDTH: f32 = 0.5;
pub const MAX_BETA: f32 = 0.6;
pub const DOPPLER_EXPONENT: f32 = 3.5;
pub const SPIRAL_ARMS: u32 = 3;
pub const SPIRAL_TIGHTNESS: f32 = 0.4;
pub const PUFFINESS: f32 = 0.6;
pub const TURBULENCE: f32 = 0.8;
pub const WAVE_HEIGHT: f32 = 0.2;
/// Lensing only bends points whose impact parameter is below this.
pub const LENS_RANGE: f32 = 8.0;
pub const LENS_STRENGTH: f32 = BLACK_HOLE_RADIUS * 1.5;

/// Jet lifetime lost per frame.
const JET_DECAY: f32 = 0.01;
/// Jet travel per frame.
const JET_SPEED: f32 = 0.25;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuasarConfig {
    pub disk_count: usize,
    pub photon_count: usize,
    pub jet_count: usize,
    /// Initial camera position; hosts update it with `set_camera`.
    pub camera: Vec3,
    pub lensing: bool,
    pub seed: u64,
}

impl Default for QuasarConfig {
    fn default() -> Self {
        Self {
            disk_count: 30_000,
            photon_count: 5_000,
            jet_count: 20_000,
            camera: Vec3::new(10.0, 8.0, 18.0),
            lensing: true,
            seed: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Orbit {
    radius: f32,
    theta: f32,
    photon: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Jet {
    dir: f32,
    angle: f32,
    y: f32,
    lifetime: f32,
}

/// Orbital speed as a fraction of `c`, capped by the photon-ring value.
pub fn orbital_beta(radius: f32) -> f32 {
    MAX_BETA * (PHOTON_RADIUS / radius.max(BLACK_HOLE_RADIUS)).sqrt()
}

/// Relativistic Doppler factor `1 / (gamma (1 - beta cos))`.
pub fn doppler_factor(beta: f32, cos_theta: f32) -> f32 {
    let beta = beta.clamp(0.0, 0.99);
    let gamma = 1.0 / (1.0 - beta * beta).sqrt();
    1.0 / (gamma * (1.0 - beta * cos_theta))
}

/// Bend `p` toward the hole as seen along `view_dir` from `eye`.
pub fn lens(p: Vec3, eye: Vec3, view_dir: Vec3) -> Vec3 {
    if (p - eye).dot(view_dir) <= 0.0 {
        return p;
    }
    let projected = p - view_dir * view_dir.dot(p);
    let b = projected.length();
    if b >= LENS_RANGE {
        return p;
    }
    let bend = (1.0 / b.max(1e-5)).powf(1.5) * LENS_STRENGTH;
    p + projected.normalize_or_zero() * bend
}

/// Radius of the jet cone at height `y`.
pub fn jet_radius(y: f32) -> f32 {
    JET_WIDTH * (1.0 - y.abs() / JET_LENGTH).max(0.0).sqrt()
}

pub struct Quasar {
    config: QuasarConfig,
    eye: Vec3,
    orbits: Vec<Orbit>,
    jets: Vec<Jet>,
    rng: StdRng,
}

impl Quasar {
    pub fn new(config: QuasarConfig) -> Self {
        let eye = config.camera;
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            eye,
            orbits: Vec::new(),
            jets: Vec::new(),
            rng,
        }
    }

    pub fn camera(&self) -> Vec3 {
        self.eye
    }

    fn view_dir(&self) -> Vec3 {
        (-self.eye).normalize_or_zero()
    }

    fn place_orbits(&mut self, buffer: &mut PointBuffer, time: f32, advance: bool) {
        let view_dir = self.view_dir();
        let eye = self.eye;
        let lensing = self.config.lensing;

        for (i, orbit) in self.orbits.iter_mut().enumerate() {
            let beta = orbital_beta(orbit.radius);
            if advance {
                orbit.theta += beta * 0.5 / orbit.radius;
            }
            let r = orbit.radius;
            let (x, z) = (r * orbit.theta.cos(), r * orbit.theta.sin());
            let turb = noise3(x * 1.2, z * 1.2, time * 0.2) * TURBULENCE;
            let reach = r / DISK_MAX_RADIUS;
            let y = turb * PUFFINESS * reach * reach
                + (orbit.theta * SPIRAL_ARMS as f32).sin() * WAVE_HEIGHT * reach;

            let mut p = Vec3::new(x, y, z);
            if lensing {
                p = lens(p, eye, view_dir);
            }

            let velocity = Vec3::new(-z, 0.0, x).normalize_or_zero();
            let delta = doppler_factor(beta, velocity.dot(view_dir));
            let brightness = delta.powf(DOPPLER_EXPONENT);

            let color = if orbit.photon {
                hsl_to_rgb(0.15, 0.2, 0.7 * brightness * (0.8 + turb.abs()))
            } else {
                let heat = (r - DISK_MIN_RADIUS) / (DISK_MAX_RADIUS - DISK_MIN_RADIUS);
                let flux = brightness * (0.4 + turb.abs() * 1.2);
                let hue = 0.6 - (1.0 - heat) * 0.6 - (delta - 1.0) * 0.1;
                hsl_to_rgb(hue, 1.0, 0.5 * flux)
            };

            buffer.set_position(i, p);
            buffer.set_color(i, color.extend(1.0));
        }
    }

    fn place_jets(&mut self, buffer: &mut PointBuffer, advance: bool) {
        let offset = self.orbits.len();
        for (i, jet) in self.jets.iter_mut().enumerate() {
            if advance {
                jet.lifetime -= JET_DECAY;
                if jet.lifetime < 0.0 {
                    jet.y = jet.dir * self.rng.gen::<f32>() * 0.1;
                    jet.lifetime = self.rng.gen::<f32>() * JET_LENGTH;
                }
                jet.y = (jet.y + jet.dir * JET_SPEED).clamp(-JET_LENGTH, JET_LENGTH);
            }

            let radius = jet_radius(jet.y);
            let p = Vec3::new(jet.angle.cos() * radius, jet.y, jet.angle.sin() * radius);
            let energy = jet.y.abs() / JET_LENGTH;
            let shock = (energy * PI * 5.0).sin().powi(8);
            let color = hsl_to_rgb(0.55 + shock * 0.1, 1.0, 0.5 + energy * 0.5 + shock * 0.8);

            buffer.set_position(offset + i, p);
            buffer.set_color(offset + i, color.extend(1.0));
        }
    }
}

impl Sketch for Quasar {
    fn name(&self) -> &'static str {
        "quasar"
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        let arm_angle = TAU / SPIRAL_ARMS as f32;
        let disk_count = clamp_count(c.disk_count);
        let photon_count = c.photon_count.min(MAX_POINTS - disk_count);
        let jet_count = c.jet_count.min(MAX_POINTS - disk_count - photon_count);

        let disk = (0..disk_count).map(|i| {
            let u = rng.gen::<f32>();
            let radius = u * u * (DISK_MAX_RADIUS - DISK_MIN_RADIUS) + DISK_MIN_RADIUS;
            let arm = (i as u32 % SPIRAL_ARMS) as f32;
            let theta = radius * SPIRAL_TIGHTNESS + arm * arm_angle;
            let spread = (rng.gen::<f32>() - 0.5) * (radius / DISK_MAX_RADIUS) * 1.5;
            Orbit {
                radius,
                theta: theta + spread,
                photon: false,
            }
        });
        let mut orbits: Vec<Orbit> = disk.collect();
        orbits.extend((0..photon_count).map(|_| Orbit {
            radius: PHOTON_RADIUS + (rng.gen::<f32>() - 0.5) * 0.1,
            theta: rng.gen::<f32>() * TAU,
            photon: true,
        }));

        self.jets = (0..jet_count)
            .map(|i| {
                let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
                Jet {
                    dir,
                    angle: rng.gen::<f32>() * TAU,
                    y: rng.gen::<f32>() * JET_LENGTH * dir,
                    lifetime: rng.gen::<f32>() * JET_LENGTH,
                }
            })
            .collect();
        self.orbits = orbits;
        self.rng = rng;

        let total = self.orbits.len() + self.jets.len();
        let mut buffer = PointBuffer::with_capacity(ColorLayout::Rgb, total);
        for _ in 0..total {
            buffer.push_rgb(Vec3::ZERO, Vec3::ZERO);
        }
        self.place_orbits(&mut buffer, 0.0, false);
        self.place_jets(&mut buffer, false);
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        if buffer.len() != self.orbits.len() + self.jets.len() {
            return;
        }
        self.place_orbits(buffer, time, true);
        self.place_jets(buffer, true);
    }

    fn set_camera(&mut self, eye: Vec3) {
        if eye.is_finite() {
            self.eye = eye;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doppler_brightens_approaching_side() {
        let beta = orbital_beta(DISK_MIN_RADIUS);
        assert!(doppler_factor(beta, 1.0) > 1.0);
        assert!(doppler_factor(beta, -1.0) < 1.0);
    }

    #[test]
    fn test_lens_ignores_points_behind_camera() {
        let eye = Vec3::new(0.0, 0.0, 10.0);
        let view = (-eye).normalize();
        let behind = Vec3::new(1.0, 0.0, 12.0);
        assert_eq!(lens(behind, eye, view), behind);
    }

    #[test]
    fn test_jet_cone_closes_at_tip() {
        assert!((jet_radius(0.0) - JET_WIDTH).abs() < 1e-6);
        assert_eq!(jet_radius(JET_LENGTH), 0.0);
    }
}
