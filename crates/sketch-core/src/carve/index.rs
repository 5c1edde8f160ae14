//! Index-space carve predicates. These look at lattice indices rather than
//! world positions, so they are exact and jitter does not affect them.

use glam::{UVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::lattice::{Lattice, LatticePoint, ShapePredicate};
use crate::math::hash01;

/// Removes the center index planes and the index diagonals of every face
/// pair. With `surface_only`, interior cells are removed as well.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDiagonals {
    pub surface_only: bool,
}

fn on_diagonal(a: u32, b: u32, na: u32, nb: u32) -> bool {
    a == b || a + b + 1 == na.min(nb)
}

impl ShapePredicate for IndexDiagonals {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let n = lattice.counts();
        let i = point.index;
        let center = n / 2;
        if i.x == center.x || i.y == center.y || i.z == center.z {
            return false;
        }
        if on_diagonal(i.x, i.z, n.x, n.z)
            || on_diagonal(i.y, i.z, n.y, n.z)
            || on_diagonal(i.x, i.y, n.x, n.y)
        {
            return false;
        }
        if self.surface_only {
            let on_face = |v: u32, n: u32| v == 0 || v + 1 == n;
            return on_face(i.x, n.x) || on_face(i.y, n.y) || on_face(i.z, n.z);
        }
        true
    }
}

/// How many axes must lie in a boundary layer for a cell to be kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryRule {
    /// At least one axis.
    Shell,
    /// At least two axes.
    #[default]
    Edges,
    /// All three axes.
    Corners,
    AtLeast(u32),
}

impl BoundaryRule {
    pub fn accepts(self, boundary_axes: u32) -> bool {
        match self {
            BoundaryRule::Shell => boundary_axes >= 1,
            BoundaryRule::Edges => boundary_axes >= 2,
            BoundaryRule::Corners => boundary_axes == 3,
            BoundaryRule::AtLeast(n) => boundary_axes >= n,
        }
    }
}

/// Keeps cells close to the lattice boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryShell {
    /// Layer thresholds counted from each boundary; a cell is in the
    /// boundary when it is closer than any of them.
    pub layers: Vec<u32>,
    pub rule: BoundaryRule,
    /// Keep the interior instead.
    pub invert: bool,
}

impl Default for BoundaryShell {
    fn default() -> Self {
        Self {
            layers: vec![1, 3],
            rule: BoundaryRule::Edges,
            invert: false,
        }
    }
}

impl BoundaryShell {
    fn in_layers(&self, index: u32, count: u32) -> bool {
        let dist = index.min(count.saturating_sub(1).saturating_sub(index));
        self.layers.iter().any(|&layer| dist < layer)
    }

    /// Number of axes on which `index` lies in a boundary layer.
    pub fn boundary_axes(&self, index: UVec3, counts: UVec3) -> u32 {
        self.in_layers(index.x, counts.x) as u32
            + self.in_layers(index.y, counts.y) as u32
            + self.in_layers(index.z, counts.z) as u32
    }
}

impl ShapePredicate for BoundaryShell {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let keep = self
            .rule
            .accepts(self.boundary_axes(point.index, lattice.counts()));
        keep != self.invert
    }
}

/// Periodic index slabs removed on the enabled axes, phased from the
/// rounded lattice center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodicGaps {
    pub period: u32,
    pub width: u32,
    /// Axes carrying gaps, in x/y/z order.
    pub axes: [bool; 3],
}

impl Default for PeriodicGaps {
    fn default() -> Self {
        Self {
            period: 5,
            width: 2,
            axes: [true; 3],
        }
    }
}

impl ShapePredicate for PeriodicGaps {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let period = self.period.max(1) as i64;
        let center = lattice.midpoint();
        let index = point.index.as_ivec3();
        let rel = [
            index.x as i64 - center.x.round() as i64,
            index.y as i64 - center.y.round() as i64,
            index.z as i64 - center.z.round() as i64,
        ];
        !rel.iter()
            .zip(self.axes)
            .any(|(&r, enabled)| enabled && r.rem_euclid(period) < self.width as i64)
    }
}

/// Beams along all three axes, placed at evenly spread index centers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralBeams {
    /// 2 gives edge beams only, 3 adds a center beam, more fill the interior.
    pub per_axis: u32,
    /// Half-thickness in index units.
    pub thickness: u32,
    /// Add two XZ diagonal braces.
    pub diagonals: bool,
}

impl Default for StructuralBeams {
    fn default() -> Self {
        Self {
            per_axis: 3,
            thickness: 1,
            diagonals: false,
        }
    }
}

/// Center `i` of `count` beam centers spread over the `steps` indices of an
/// axis, edges included. `count` is capped at `steps`.
pub fn beam_center(i: u32, count: u32, steps: u32) -> u32 {
    let last = steps.saturating_sub(1);
    let count = count.min(steps.max(1));
    if count <= 1 {
        return last / 2;
    }
    (i as f32 * last as f32 / (count - 1) as f32).round() as u32
}

/// Whether index `v` lies within `t` of any beam center. Only the centers
/// next to `v` are checked, so the cost does not grow with `count`.
pub fn near_beam(v: u32, count: u32, steps: u32, t: u32) -> bool {
    let count = count.min(steps.max(1));
    let last = steps.saturating_sub(1);
    if count <= 1 || last == 0 {
        return v.abs_diff(beam_center(0, count, steps)) <= t;
    }
    let step = last as f32 / (count - 1) as f32;
    let nearest = (v as f32 / step).round() as i64;
    (nearest - 1..=nearest + 1)
        .filter(|&i| i >= 0 && i < count as i64)
        .any(|i| v.abs_diff(beam_center(i as u32, count, steps)) <= t)
}

impl ShapePredicate for StructuralBeams {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let n = lattice.counts();
        let i = point.index;
        let t = self.thickness;
        let x_near = near_beam(i.x, self.per_axis, n.x, t);
        let y_near = near_beam(i.y, self.per_axis, n.y, t);
        let z_near = near_beam(i.z, self.per_axis, n.z, t);
        // beams along X need (z, y) near a center, and so on
        if (z_near && y_near) || (x_near && y_near) || (x_near && z_near) {
            return true;
        }

        if self.diagonals {
            let p = Vec3::new(i.x as f32, 0.0, i.z as f32);
            let far = Vec3::new(n.x.saturating_sub(1) as f32, 0.0, n.z.saturating_sub(1) as f32);
            let braces = [
                (Vec3::ZERO, far),
                (Vec3::new(0.0, 0.0, far.z), Vec3::new(far.x, 0.0, 0.0)),
            ];
            let limit = t as f32 + 0.5;
            return braces
                .iter()
                .any(|&(a, b)| super::tubes::segment_distance_3d(p, a, b) <= limit);
        }
        false
    }
}

/// 1-D column pattern (or 2-D radial ripple) used by [`ColumnPattern`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Sine,
    Tri,
    Bands,
    Bitmask,
    Mirror,
    #[default]
    Ripple,
}

/// Removes whole X columns by a 1-D pattern, or rings around the Y axis for
/// [`ColumnKind::Ripple`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPattern {
    pub pattern: ColumnKind,
    pub freq: f32,
    pub threshold: f32,
    pub period: u32,
    pub seed: u32,
    pub bitmask: u32,
    /// Also carve a column when its mirror column is carved.
    pub mirror: bool,
}

impl Default for ColumnPattern {
    fn default() -> Self {
        Self {
            pattern: ColumnKind::Ripple,
            freq: 3.0,
            threshold: 0.45,
            period: 6,
            seed: 7,
            bitmask: 0b1010,
            mirror: true,
        }
    }
}

impl ColumnPattern {
    /// Whether the 1-D pattern removes column `ix` of `cols`.
    pub fn column_carved(&self, ix: u32, cols: u32) -> bool {
        let nx = if cols > 1 {
            ix as f32 / (cols - 1) as f32
        } else {
            0.5
        };
        let period = self.period.max(1);
        let sine = || (nx * std::f32::consts::TAU * self.freq).sin().abs();
        match self.pattern {
            ColumnKind::Sine => sine() > self.threshold,
            ColumnKind::Tri => {
                let phase = (ix % period) as f32 / period as f32;
                1.0 - (phase * 2.0 - 1.0).abs() > self.threshold
            }
            ColumnKind::Bands => {
                hash01(ix.wrapping_add(self.seed) as f32) > self.threshold * 0.8 + 0.05
            }
            ColumnKind::Bitmask => (ix % 32) & self.bitmask != 0,
            ColumnKind::Mirror => sine() > self.threshold || (ix % period) & 1 == 1,
            ColumnKind::Ripple => false,
        }
    }
}

impl ShapePredicate for ColumnPattern {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        if self.pattern == ColumnKind::Ripple {
            let p = point.position;
            let ripple = (p.x.hypot(p.z) * self.freq).sin().abs();
            return ripple <= self.threshold;
        }
        let cols = lattice.counts().x;
        let ix = point.index.x;
        let mut carved = self.column_carved(ix, cols);
        if self.mirror {
            carved = carved || self.column_carved(cols - 1 - ix, cols);
        }
        !carved
    }
}

/// Central cube removed from a lattice: cells within `counts * gap / 2`
/// index steps of the midpoint on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralGap {
    pub gap_factor: f32,
}

impl Default for CentralGap {
    fn default() -> Self {
        Self { gap_factor: 0.25 }
    }
}

impl CentralGap {
    /// Whether `index` lies in the central cube scaled by `zone`
    /// (1.0 is the gap itself).
    pub fn contains(&self, lattice: &Lattice, index: UVec3, zone: f32) -> bool {
        let mid = lattice.midpoint();
        let threshold = lattice.counts().as_vec3() * self.gap_factor * zone / 2.0;
        let d = (index.as_vec3() - mid).abs();
        d.x < threshold.x && d.y < threshold.y && d.z < threshold.z
    }
}

impl ShapePredicate for CentralGap {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        !self.contains(lattice, point.index, 1.0)
    }
}
