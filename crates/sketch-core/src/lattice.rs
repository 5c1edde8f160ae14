//! Centered 3D index lattice and the carve loop that turns it into a
//! [`PointBuffer`].
//!
//! A lattice is described by per-axis step counts and a spacing. Index `i`
//! on an axis with `n` steps sits at `(i - (n - 1) / 2) * spacing`, so the
//! lattice is always centered on the origin.

use glam::{UVec3, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::buffer::{ColorLayout, PointBuffer, MAX_POINTS};
use crate::math::normalize_in;

/// Hard cap on steps per axis.
pub const MAX_AXIS_STEPS: u32 = 1024;

/// Largest `resol` with `resol^3 <= MAX_POINTS`.
pub const MAX_CUBIC_RESOLUTION: u32 = 101;

/// Lattice extents and sampling parameters (world units).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub spacing: f32,
    /// Vertical jitter as a fraction of `spacing`. Zero disables it.
    pub jitter_y: f32,
    pub seed: u64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 3.0,
            depth: 3.0,
            spacing: 0.05,
            jitter_y: 0.0,
            seed: 1,
        }
    }
}

/// Order in which cells are visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traversal {
    /// x outermost, then z, then y.
    #[default]
    Xzy,
    /// z outermost, then y, then x.
    Zyx,
}

/// One visited lattice cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticePoint {
    pub index: UVec3,
    /// World position, including any y-jitter.
    pub position: Vec3,
}

/// Keep/reject test evaluated for every lattice cell.
///
/// Implementations must be pure: the same lattice and point always give the
/// same answer.
pub trait ShapePredicate {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool;
}

impl<F> ShapePredicate for F
where
    F: Fn(&Lattice, &LatticePoint) -> bool,
{
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        self(lattice, point)
    }
}

/// Keeps every cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAll;

impl ShapePredicate for KeepAll {
    fn keep(&self, _: &Lattice, _: &LatticePoint) -> bool {
        true
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    counts: UVec3,
    spacing: f32,
    traversal: Traversal,
    jitter_y: f32,
    seed: u64,
}

/// Steps along one axis: `max(1, floor(extent / spacing) + 1)`, capped.
pub fn axis_steps(extent: f32, spacing: f32) -> u32 {
    if !spacing.is_finite() || spacing <= 0.0 || !extent.is_finite() || extent < 0.0 {
        return 1;
    }
    let steps = (extent / spacing).floor() + 1.0;
    if !steps.is_finite() {
        return 1;
    }
    steps.clamp(1.0, MAX_AXIS_STEPS as f32) as u32
}

fn cells(c: UVec3) -> usize {
    c.x as usize * c.y as usize * c.z as usize
}

/// Shrink per-axis counts until the lattice holds at most [`MAX_POINTS`]
/// cells. Every axis keeps at least one step.
pub fn fit_counts(counts: UVec3) -> UVec3 {
    let mut c = counts.max(UVec3::ONE);
    let total = cells(c);
    if total <= MAX_POINTS {
        return c;
    }
    let f = (MAX_POINTS as f64 / total as f64).cbrt();
    let shrink = |v: u32| ((v as f64 * f).floor() as u32).max(1);
    c = UVec3::new(shrink(c.x), shrink(c.y), shrink(c.z));
    while cells(c) > MAX_POINTS {
        if c.x >= c.y && c.x >= c.z {
            c.x -= 1;
        } else if c.y >= c.z {
            c.y -= 1;
        } else {
            c.z -= 1;
        }
    }
    c
}

fn sanitize_spacing(spacing: f32) -> f32 {
    if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        0.0
    }
}

impl Lattice {
    pub fn new(config: &LatticeConfig) -> Self {
        Self {
            counts: fit_counts(UVec3::new(
                axis_steps(config.width, config.spacing),
                axis_steps(config.height, config.spacing),
                axis_steps(config.depth, config.spacing),
            )),
            spacing: sanitize_spacing(config.spacing),
            traversal: Traversal::Xzy,
            jitter_y: if config.jitter_y.is_finite() {
                config.jitter_y.max(0.0)
            } else {
                0.0
            },
            seed: config.seed,
        }
    }

    /// Cube of `resol^3` cells spanning roughly `[-1, 1]` scaled by
    /// `spacing_multiplier`, with `resol = max(2, round(cbrt(count)))`.
    pub fn cubic(particle_count: u32, spacing_multiplier: f32) -> Self {
        let resol = cubic_resolution(particle_count);
        let multiplier = if spacing_multiplier.is_finite() {
            spacing_multiplier.max(0.1)
        } else {
            1.0
        };
        Self {
            counts: UVec3::splat(resol),
            spacing: 2.0 / resol as f32 * multiplier,
            traversal: Traversal::Zyx,
            jitter_y: 0.0,
            seed: 0,
        }
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    #[inline]
    pub fn counts(&self) -> UVec3 {
        self.counts
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Total number of cells, never more than [`MAX_POINTS`].
    pub fn cell_count(&self) -> usize {
        cells(self.counts)
    }

    /// Fractional center index `(n - 1) / 2` per axis.
    pub fn midpoint(&self) -> Vec3 {
        (self.counts.as_vec3() - Vec3::ONE) * 0.5
    }

    /// World position of an index, without jitter.
    #[inline]
    pub fn world(&self, index: UVec3) -> Vec3 {
        (index.as_vec3() - self.midpoint()) * self.spacing
    }

    pub fn min(&self) -> Vec3 {
        -self.midpoint() * self.spacing
    }

    pub fn max(&self) -> Vec3 {
        self.midpoint() * self.spacing
    }

    /// Span `max - min` per axis.
    pub fn size(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// Per-axis position in `[0, 1]` over the lattice bounds.
    pub fn normalized(&self, p: Vec3) -> Vec3 {
        let (min, max) = (self.min(), self.max());
        Vec3::new(
            normalize_in(p.x, min.x, max.x),
            normalize_in(p.y, min.y, max.y),
            normalize_in(p.z, min.z, max.z),
        )
    }

    /// Visit every cell index in traversal order.
    pub fn indices(&self) -> impl Iterator<Item = UVec3> + '_ {
        let c = self.counts;
        (0..self.cell_count()).map(move |n| {
            let n = n as u32;
            match self.traversal {
                Traversal::Xzy => {
                    let iy = n % c.y;
                    let iz = (n / c.y) % c.z;
                    let ix = n / (c.y * c.z);
                    UVec3::new(ix, iy, iz)
                }
                Traversal::Zyx => {
                    let ix = n % c.x;
                    let iy = (n / c.x) % c.y;
                    let iz = n / (c.x * c.y);
                    UVec3::new(ix, iy, iz)
                }
            }
        })
    }

    /// Run `predicate` over the lattice and collect the kept points, colored
    /// by `shade`.
    pub fn carve<P, S>(&self, predicate: &P, layout: ColorLayout, mut shade: S) -> PointBuffer
    where
        P: ShapePredicate + ?Sized,
        S: FnMut(&Lattice, &LatticePoint) -> Vec4,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let jitter = self.jitter_y * self.spacing;
        let mut buffer = PointBuffer::new(layout);

        for index in self.indices() {
            let mut position = self.world(index);
            if jitter > 0.0 {
                position.y += (rng.gen::<f32>() - 0.5) * jitter;
            }
            let point = LatticePoint { index, position };
            if !predicate.keep(self, &point) {
                continue;
            }
            buffer.push(position, shade(self, &point));
        }
        buffer
    }

    /// Count the cells the predicate keeps, ignoring jitter.
    pub fn count_kept<P: ShapePredicate + ?Sized>(&self, predicate: &P) -> usize {
        self.indices()
            .filter(|&index| {
                let point = LatticePoint {
                    index,
                    position: self.world(index),
                };
                predicate.keep(self, &point)
            })
            .count()
    }
}

/// `max(2, round(cbrt(count)))`, capped at [`MAX_CUBIC_RESOLUTION`].
pub fn cubic_resolution(particle_count: u32) -> u32 {
    ((particle_count as f32).cbrt().round() as u32).clamp(2, MAX_CUBIC_RESOLUTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_visit_every_cell_once() {
        let lattice = Lattice::new(&LatticeConfig {
            width: 0.2,
            height: 0.1,
            depth: 0.3,
            spacing: 0.1,
            ..Default::default()
        });
        let mut seen: Vec<UVec3> = lattice.indices().collect();
        assert_eq!(seen.len(), lattice.cell_count());
        seen.sort_by_key(|v| (v.x, v.y, v.z));
        seen.dedup();
        assert_eq!(seen.len(), lattice.cell_count(), "indices must be unique");
    }

    #[test]
    fn test_xzy_inner_axis_is_y() {
        let lattice = Lattice::new(&LatticeConfig {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            spacing: 0.5,
            ..Default::default()
        });
        let first: Vec<UVec3> = lattice.indices().take(2).collect();
        assert_eq!(first[0], UVec3::new(0, 0, 0));
        assert_eq!(first[1], UVec3::new(0, 1, 0), "y should vary fastest");
    }
}
