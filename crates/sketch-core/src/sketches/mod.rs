//! The sketch catalog.
//!
//! A [`Sketch`] builds its attribute buffers once per configuration and then
//! mutates them in place every frame. [`SketchKind`] is the serializable
//! selector hosts send as JSON: `{"kind": "Quasar", "jet_count": 10000}`.

pub mod carved;
pub mod cube;
pub mod flower;
pub mod path;
pub mod quasar;
pub mod stacks;

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animate::{ColorCycle, FrameAnimator, Spin};
use crate::buffer::PointBuffer;
use crate::color::HslGradient;
use crate::shaders::{ShaderError, ShaderPair};

pub use carved::{CarvedLattice, CarvedLatticeConfig, PulsingShell, PulsingShellConfig};
pub use cube::{CubeMode, HollowCube, HollowCubeConfig, SineRibbon, SineRibbonConfig};
pub use flower::{
    Flower, FlowerConfig, FlowerShader, FlowerShaderConfig, FlowerVariant, PetalBloomConfig,
    PetalBloomSketch,
};
pub use path::{LinePath, LinePathConfig, TubeFlow, TubeFlowConfig};
pub use quasar::{Quasar, QuasarConfig};
pub use stacks::{
    CarvedTower, LayeredGrid, LayeredGridConfig, Strata, StrataConfig, TowerConfig,
};

/// Seven height slabs shared by the stacked and flower sketches.
pub const STRATA_INTERVALS: [[f32; 2]; 7] = [
    [-1.25, -1.0],
    [-0.85, -0.65],
    [-0.45, -0.25],
    [-0.10, 0.10],
    [0.25, 0.45],
    [0.65, 0.85],
    [1.0, 1.25],
];

/// Uniform sample in `[min, max)`.
pub fn rand_in_range<R: Rng + ?Sized>(rng: &mut R, [min, max]: [f32; 2]) -> f32 {
    min + rng.gen::<f32>() * (max - min)
}

/// Pick one interval uniformly, then sample inside it.
pub fn rand_in_ranges<R: Rng + ?Sized>(rng: &mut R, ranges: &[[f32; 2]]) -> f32 {
    if ranges.is_empty() {
        return 0.0;
    }
    let idx = rng.gen_range(0..ranges.len());
    rand_in_range(rng, ranges[idx])
}

/// How the host should draw the buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Primitive {
    #[default]
    Points,
    LineStrip,
    /// Indexed triangles; see [`Sketch::indices`].
    Triangles,
}

pub trait Sketch {
    fn name(&self) -> &'static str;

    fn primitive(&self) -> Primitive {
        Primitive::Points
    }

    /// Generate the attribute buffers for the current configuration.
    fn build(&mut self) -> PointBuffer;

    /// Per-frame update; `time` is elapsed seconds.
    fn frame(&mut self, buffer: &mut PointBuffer, time: f32);

    /// Shader pair the host should draw with, if the sketch has one.
    fn shader(&self) -> Option<ShaderPair> {
        None
    }

    /// Extra float buffer by name: per-vertex attributes (`aAngle`,
    /// `normal`, ...) or overlay line segments (`prismEdges`).
    fn attribute(&self, _name: &str) -> Option<&[f32]> {
        None
    }

    fn indices(&self) -> Option<&[u32]> {
        None
    }

    /// Model rotation to apply on the host side.
    fn rotation(&self) -> Quat {
        Quat::IDENTITY
    }

    /// Number of vertices to draw, when less than the whole buffer.
    fn draw_count(&self) -> Option<u32> {
        None
    }

    /// Camera position, for sketches with view-dependent effects.
    fn set_camera(&mut self, _eye: Vec3) {}
}

/// Color cycle plus model spin, the per-frame behaviour every height-cycled
/// cloud shares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleSpin {
    pub cycle: ColorCycle,
    pub spin: Spin,
}

impl CycleSpin {
    pub fn new(speed: f32, spin_rates: Vec3) -> Self {
        Self {
            cycle: ColorCycle::new(HslGradient::NAVY_TO_GOLD, speed),
            spin: Spin::new(spin_rates),
        }
    }

    /// Fit the cycle to `buffer` and write the time-zero colors.
    pub fn prime(&mut self, buffer: &mut PointBuffer) {
        self.cycle.fit(buffer);
        self.cycle.animate(buffer, 0.0);
        self.spin = Spin::new(self.spin.rates);
    }

    pub fn frame(&mut self, buffer: &mut PointBuffer, time: f32) {
        self.cycle.animate(buffer, time);
        self.spin.advance(time);
    }
}

/// Serializable sketch selector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SketchKind {
    CarvedTower(TowerConfig),
    Quasar(QuasarConfig),
    Strata(StrataConfig),
    Flower(FlowerConfig),
    PetalBloom(PetalBloomConfig),
    FlowerShader(FlowerShaderConfig),
    HollowCube(HollowCubeConfig),
    SineRibbon(SineRibbonConfig),
    LayeredGrid(LayeredGridConfig),
    CarvedLattice(CarvedLatticeConfig),
    PulsingShell(PulsingShellConfig),
    LinePath(LinePathConfig),
    TubeFlow(TubeFlowConfig),
}

impl Default for SketchKind {
    fn default() -> Self {
        SketchKind::CarvedLattice(CarvedLatticeConfig::default())
    }
}

impl SketchKind {
    /// Every kind with its default configuration, in catalog order.
    pub fn catalog() -> Vec<SketchKind> {
        vec![
            SketchKind::CarvedTower(TowerConfig::default()),
            SketchKind::Quasar(QuasarConfig::default()),
            SketchKind::Strata(StrataConfig::default()),
            SketchKind::Flower(FlowerConfig::default()),
            SketchKind::PetalBloom(PetalBloomConfig::default()),
            SketchKind::FlowerShader(FlowerShaderConfig::default()),
            SketchKind::HollowCube(HollowCubeConfig::default()),
            SketchKind::SineRibbon(SineRibbonConfig::default()),
            SketchKind::LayeredGrid(LayeredGridConfig::default()),
            SketchKind::CarvedLattice(CarvedLatticeConfig::default()),
            SketchKind::PulsingShell(PulsingShellConfig::default()),
            SketchKind::LinePath(LinePathConfig::default()),
            SketchKind::TubeFlow(TubeFlowConfig::default()),
        ]
    }

    /// Construct the sketch. Fails only when a WGSL shader does not validate.
    pub fn into_sketch(self) -> Result<Box<dyn Sketch>, ShaderError> {
        let sketch: Box<dyn Sketch> = match self {
            SketchKind::CarvedTower(c) => Box::new(CarvedTower::new(c)),
            SketchKind::Quasar(c) => Box::new(Quasar::new(c)),
            SketchKind::Strata(c) => Box::new(Strata::new(c)),
            SketchKind::Flower(c) => Box::new(Flower::new(c)),
            SketchKind::PetalBloom(c) => Box::new(PetalBloomSketch::new(c)),
            SketchKind::FlowerShader(c) => Box::new(FlowerShader::new(c)),
            SketchKind::HollowCube(c) => Box::new(HollowCube::new(c)),
            SketchKind::SineRibbon(c) => Box::new(SineRibbon::new(c)),
            SketchKind::LayeredGrid(c) => Box::new(LayeredGrid::new(c)),
            SketchKind::CarvedLattice(c) => Box::new(CarvedLattice::new(c)),
            SketchKind::PulsingShell(c) => Box::new(PulsingShell::new(c)?),
            SketchKind::LinePath(c) => Box::new(LinePath::new(c)),
            SketchKind::TubeFlow(c) => Box::new(TubeFlow::new(c)),
        };
        Ok(sketch)
    }
}
