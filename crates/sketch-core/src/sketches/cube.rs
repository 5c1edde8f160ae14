//! Cubic lattice clouds: a hollow cube in several warps, nested translucent
//! shells, and the sine ribbon.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::Sketch;
use crate::buffer::{ColorLayout, PointBuffer, MAX_POINTS};
use crate::carve::CentralGap;
use crate::color::{bloom_boost, height_tint, radial_fade, with_alpha, RibbonMask};
use crate::lattice::{Lattice, LatticePoint, ShapePredicate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CubeMode {
    /// Hollow cube tinted by height.
    #[default]
    Plain,
    /// Every coordinate cubed, which pulls points toward the axes.
    Cubed,
    /// Cubed, with points near the gap pushed to full brightness.
    Bloom,
    /// Polar swirl whose angle grows with distance.
    Swirl,
    /// Alternating spheres and cubes shrinking by halves, RGBA.
    NestedShells,
    /// White points fading with distance from the unit sphere, RGBA.
    RadialFade,
}

impl CubeMode {
    pub fn default_count(self) -> u32 {
        match self {
            CubeMode::Plain => 20_000,
            _ => 100_000,
        }
    }

    pub fn default_gap(self) -> f32 {
        match self {
            CubeMode::Plain | CubeMode::Cubed => 0.25,
            CubeMode::Bloom => 0.5,
            CubeMode::Swirl | CubeMode::NestedShells | CubeMode::RadialFade => 0.0,
        }
    }

    pub fn default_spacing_multiplier(self) -> f32 {
        match self {
            CubeMode::Bloom | CubeMode::Swirl => 2.0,
            _ => 1.0,
        }
    }

    pub fn layout(self) -> ColorLayout {
        match self {
            CubeMode::NestedShells | CubeMode::RadialFade => ColorLayout::Rgba,
            _ => ColorLayout::Rgb,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HollowCubeConfig {
    pub mode: CubeMode,
    pub count: Option<u32>,
    pub gap_factor: Option<f32>,
    pub spacing_multiplier: Option<f32>,
    /// Bloom zone as a multiple of the gap.
    pub bloom_zone: f32,
    pub bloom_intensity: f32,
}

impl Default for HollowCubeConfig {
    fn default() -> Self {
        Self {
            mode: CubeMode::Plain,
            count: None,
            gap_factor: None,
            spacing_multiplier: None,
            bloom_zone: 1.5,
            bloom_intensity: 10.0,
        }
    }
}

/// Shells of the nested variant, outermost first: `(scale, is_sphere)`.
pub const NESTED_SHELLS: [(f32, bool); 6] = [
    (64.0, true),
    (32.0, false),
    (16.0, true),
    (8.0, false),
    (4.0, true),
    (2.0, false),
];

/// Opacity of a nested shell: inner shells are more opaque, spheres more
/// than cubes.
pub fn shell_opacity(scale: f32, sphere: bool) -> f32 {
    let (min_op, delta) = if sphere { (0.05, 0.15) } else { (0.02, 0.10) };
    min_op + delta * (64.0 - scale) / (64.0 - 2.0)
}

/// Swirl warp: summed pair angles plus `2r`, radius squared.
pub fn swirl(p: Vec3) -> Vec3 {
    let radius = (p * p).length();
    let theta = p.y.atan2(p.x) + p.z.atan2(p.x) + p.y.atan2(p.z) + radius * 2.0;
    let r = radius * radius;
    let (s, c) = theta.sin_cos();
    Vec3::new(r * c, r * s, p.z + r * c / FRAC_PI_2)
}

pub struct HollowCube {
    config: HollowCubeConfig,
}

impl HollowCube {
    pub fn new(config: HollowCubeConfig) -> Self {
        Self { config }
    }

    fn lattice(&self) -> Lattice {
        let mode = self.config.mode;
        Lattice::cubic(
            self.config.count.unwrap_or_else(|| mode.default_count()),
            self.config
                .spacing_multiplier
                .unwrap_or_else(|| mode.default_spacing_multiplier()),
        )
    }

    fn gap(&self) -> CentralGap {
        CentralGap {
            gap_factor: self
                .config
                .gap_factor
                .unwrap_or_else(|| self.config.mode.default_gap()),
        }
    }

    fn nested_shells(&self) -> PointBuffer {
        let count = self.config.count.unwrap_or_else(|| CubeMode::NestedShells.default_count());
        let gap = self.gap();
        let mut buffer = PointBuffer::new(ColorLayout::Rgba);
        for (scale, sphere) in NESTED_SHELLS {
            let lattice = Lattice::cubic(count, scale);
            let alpha = shell_opacity(scale, sphere);
            let keep = |l: &Lattice, pt: &LatticePoint| {
                gap.keep(l, pt) && (!sphere || pt.position.length() <= scale)
            };
            let shell = lattice.carve(&keep, ColorLayout::Rgba, |_, _| {
                Vec4::new(1.0, 1.0, 0.5, alpha)
            });
            for i in 0..shell.len().min(MAX_POINTS - buffer.len()) {
                buffer.push(shell.position(i), shell.color(i));
            }
        }
        buffer
    }
}

impl Sketch for HollowCube {
    fn name(&self) -> &'static str {
        match self.config.mode {
            CubeMode::Plain => "hollow-cube",
            CubeMode::Cubed => "hollow-cube-cubed",
            CubeMode::Bloom => "hollow-cube-bloom",
            CubeMode::Swirl => "hollow-cube-swirl",
            CubeMode::NestedShells => "nested-shells",
            CubeMode::RadialFade => "radial-fade",
        }
    }

    fn build(&mut self) -> PointBuffer {
        let mode = self.config.mode;
        if mode == CubeMode::NestedShells {
            return self.nested_shells();
        }

        let lattice = self.lattice();
        let gap = self.gap();
        let (zone, intensity) = (self.config.bloom_zone, self.config.bloom_intensity);

        let mut buffer = lattice.carve(&gap, mode.layout(), |l, pt| {
            let y = pt.position.y;
            match mode {
                CubeMode::Plain => height_tint(y, 0.5).extend(1.0),
                CubeMode::Bloom => {
                    let tint = height_tint(y, 0.1);
                    if gap.contains(l, pt.index, zone) {
                        bloom_boost(tint, intensity).extend(1.0)
                    } else {
                        tint.extend(1.0)
                    }
                }
                CubeMode::RadialFade => with_alpha(Vec3::ONE, radial_fade(pt.position)),
                _ => height_tint(y, 0.1).extend(1.0),
            }
        });

        match mode {
            CubeMode::Cubed | CubeMode::Bloom => buffer.map_positions(|_, p| p * p * p),
            CubeMode::Swirl => buffer.map_positions(|_, p| swirl(p)),
            _ => {}
        }
        buffer
    }

    fn frame(&mut self, _buffer: &mut PointBuffer, _time: f32) {}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineRibbonConfig {
    pub count: u32,
    pub gap_factor: f32,
    pub spacing_multiplier: f32,
    pub mask: RibbonMask,
    pub tint: Vec3,
}

impl Default for SineRibbonConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            gap_factor: 0.0,
            spacing_multiplier: 1.0,
            mask: RibbonMask::default(),
            tint: Vec3::ONE,
        }
    }
}

impl SineRibbonConfig {
    /// Amber ribbon that only shows inside a central ball.
    pub fn focused() -> Self {
        Self {
            mask: RibbonMask {
                z_weight: 0.25,
                focus: Some(Default::default()),
                ..Default::default()
            },
            tint: Vec3::new(0.85, 0.5, 0.1),
            ..Default::default()
        }
    }
}

/// Translucent cube where only a winding sine ribbon is nearly opaque.
pub struct SineRibbon {
    config: SineRibbonConfig,
}

impl SineRibbon {
    pub fn new(config: SineRibbonConfig) -> Self {
        Self { config }
    }
}

impl Sketch for SineRibbon {
    fn name(&self) -> &'static str {
        if self.config.mask.focus.is_some() {
            "sine-ribbon-focused"
        } else {
            "sine-ribbon"
        }
    }

    fn build(&mut self) -> PointBuffer {
        let c = &self.config;
        let lattice = Lattice::cubic(c.count, c.spacing_multiplier);
        let gap = CentralGap {
            gap_factor: c.gap_factor,
        };
        let spacing = lattice.spacing();
        let max_pos = lattice.midpoint().x * spacing;
        lattice.carve(&gap, ColorLayout::Rgba, |_, pt| {
            with_alpha(c.tint, c.mask.alpha(pt.position, max_pos, spacing))
        })
    }

    fn frame(&mut self, _buffer: &mut PointBuffer, _time: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_opacity_ends() {
        assert!((shell_opacity(64.0, true) - 0.05).abs() < 1e-6);
        assert!((shell_opacity(2.0, false) - 0.12).abs() < 1e-6);
    }

    #[test]
    fn test_swirl_keeps_origin() {
        let p = swirl(Vec3::ZERO);
        assert!(p.length() < 1e-6, "swirl(0) = {:?}", p);
    }
}
