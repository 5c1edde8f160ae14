//! Carved lattices: a sampling lattice filtered by a carve pattern and
//! colored by a two-stop RGB gradient.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::Sketch;
use crate::animate::{FrameAnimator, PulseMode, RadialPulse, Spin};
use crate::buffer::{ColorLayout, PointBuffer};
use crate::carve::{CarvePattern, IndexDiagonals};
use crate::color::{weighted_mix, xz_mix, ColorParseError, RgbGradient};
use crate::lattice::{Lattice, LatticeConfig, LatticePoint};
use crate::shaders::{glsl, wgsl, ShaderError, ShaderPair, UniformValue};

/// Scalar fed to the gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMix {
    /// Normalized height.
    Height,
    /// Product of normalized x and z.
    #[default]
    Xz,
    /// `0.4 x + 0.4 z + 0.2 y`.
    Weighted,
}

impl ColorMix {
    pub fn value(self, normalized: Vec3) -> f32 {
        match self {
            ColorMix::Height => normalized.y,
            ColorMix::Xz => xz_mix(normalized),
            ColorMix::Weighted => weighted_mix(normalized),
        }
    }
}

fn shade(lattice: &Lattice, point: &LatticePoint, gradient: &RgbGradient, mix: ColorMix) -> Vec3 {
    gradient.sample(mix.value(lattice.normalized(point.position)))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarvedLatticeConfig {
    pub lattice: LatticeConfig,
    pub pattern: CarvePattern,
    pub gradient: RgbGradient,
    pub mix: ColorMix,
    pub spin: Vec3,
}

impl Default for CarvedLatticeConfig {
    fn default() -> Self {
        Self {
            lattice: LatticeConfig::default(),
            pattern: CarvePattern::default(),
            gradient: RgbGradient::default(),
            mix: ColorMix::Xz,
            spin: Vec3::ZERO,
        }
    }
}

impl CarvedLatticeConfig {
    /// Same pattern with a gradient given as `#rrggbb` strings.
    pub fn with_hex(mut self, bottom: &str, top: &str) -> Result<Self, ColorParseError> {
        self.gradient = RgbGradient::from_hex(bottom, top)?;
        Ok(self)
    }
}

pub struct CarvedLattice {
    config: CarvedLatticeConfig,
    /// Prism wireframe as flat `xyz` segment endpoints, empty for other
    /// patterns.
    edges: Vec<f32>,
    spin: Spin,
}

impl CarvedLattice {
    pub fn new(config: CarvedLatticeConfig) -> Self {
        let spin = Spin::new(config.spin);
        Self {
            config,
            edges: Vec::new(),
            spin,
        }
    }

    pub fn pattern(&self) -> &CarvePattern {
        &self.config.pattern
    }
}

impl Sketch for CarvedLattice {
    fn name(&self) -> &'static str {
        self.config.pattern.name()
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let lattice = Lattice::new(&c.lattice);
        self.spin = Spin::new(c.spin);
        self.edges = match &c.pattern {
            CarvePattern::Prism(prism) => prism
                .wire_edges(&lattice)
                .iter()
                .flat_map(|[a, b]| a.to_array().into_iter().chain(b.to_array()))
                .collect(),
            _ => Vec::new(),
        };
        lattice.carve(&c.pattern, ColorLayout::Rgb, |l, pt| {
            shade(l, pt, &c.gradient, c.mix).extend(1.0)
        })
    }

    fn frame(&mut self, _buffer: &mut PointBuffer, time: f32) {
        self.spin.advance(time);
    }

    fn rotation(&self) -> Quat {
        self.spin.rotation()
    }

    fn attribute(&self, name: &str) -> Option<&[f32]> {
        (name == "prismEdges" && !self.edges.is_empty()).then_some(self.edges.as_slice())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsingShellConfig {
    pub lattice: LatticeConfig,
    pub mode: PulseMode,
    pub center: Vec3,
    /// Peak displacement.
    pub radius: f32,
    pub point_size: f32,
    pub point_scale: f32,
    pub gradient: RgbGradient,
    /// Hand out the WGSL pair instead of GLSL.
    pub wgsl: bool,
    /// Displace the points on the CPU each frame, for hosts drawing with a
    /// stock point material.
    pub cpu_mirror: bool,
}

impl Default for PulsingShellConfig {
    fn default() -> Self {
        let lattice = LatticeConfig {
            spacing: 0.06,
            ..Default::default()
        };
        Self {
            point_size: lattice.spacing * 60.0,
            lattice,
            mode: PulseMode::Uniform,
            center: Vec3::ZERO,
            radius: 2.0,
            point_scale: 6.0,
            gradient: RgbGradient::default(),
            wgsl: false,
            cpu_mirror: false,
        }
    }
}

/// Surface of an index-diagonal lattice breathing away from its center.
pub struct PulsingShell {
    config: PulsingShellConfig,
    shader: ShaderPair,
    pulse: Option<RadialPulse>,
}

impl PulsingShell {
    /// Fails when the WGSL module does not validate.
    pub fn new(config: PulsingShellConfig) -> Result<Self, ShaderError> {
        let shader = Self::shader_pair(&config)?;
        Ok(Self {
            config,
            shader,
            pulse: None,
        })
    }

    fn shader_pair(c: &PulsingShellConfig) -> Result<ShaderPair, ShaderError> {
        let center = UniformValue::Vec3(c.center.to_array());
        let pair = if c.wgsl {
            let mut pair = ShaderPair::wgsl(wgsl::RADIAL_PULSE, wgsl::RADIAL_PULSE_UNIFORMS)?;
            pair.set_uniform("center", center);
            pair.set_uniform("radius", UniformValue::Float(c.radius));
            pair.set_uniform("point_size", UniformValue::Float(c.point_size));
            pair.set_uniform("point_scale", UniformValue::Float(c.point_scale));
            let ripple = if c.mode == PulseMode::Ripple { 1.0 } else { 0.0 };
            pair.set_uniform("ripple", UniformValue::Float(ripple));
            pair
        } else {
            let mut pair = match c.mode {
                PulseMode::Uniform => ShaderPair::glsl(
                    glsl::RADIAL_PULSE_VERTEX,
                    glsl::ROUND_POINT_FRAGMENT,
                    glsl::RADIAL_PULSE_UNIFORMS,
                ),
                PulseMode::Ripple => ShaderPair::glsl(
                    glsl::RIPPLE_PULSE_VERTEX,
                    glsl::GLOW_FRAGMENT,
                    glsl::RIPPLE_GLOW_UNIFORMS,
                ),
            };
            pair.set_uniform("u_center", center);
            pair.set_uniform("u_radius", UniformValue::Float(c.radius));
            pair.set_uniform("u_pointSize", UniformValue::Float(c.point_size));
            pair.set_uniform("u_pointScale", UniformValue::Float(c.point_scale));
            pair
        };
        Ok(pair)
    }
}

impl Sketch for PulsingShell {
    fn name(&self) -> &'static str {
        match self.config.mode {
            PulseMode::Uniform => "pulsing-shell",
            PulseMode::Ripple => "ripple-shell",
        }
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let lattice = Lattice::new(&c.lattice);
        let predicate = IndexDiagonals { surface_only: true };
        let buffer = lattice.carve(&predicate, ColorLayout::Rgb, |l, pt| {
            shade(l, pt, &c.gradient, ColorMix::Xz).extend(1.0)
        });
        self.pulse = c
            .cpu_mirror
            .then(|| RadialPulse::new(&buffer, c.center, c.radius, c.mode));
        buffer
    }

    fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        if let Some(pulse) = self.pulse.as_mut() {
            pulse.animate(buffer, time);
        }
    }

    fn shader(&self) -> Option<ShaderPair> {
        Some(self.shader.clone())
    }
}
