//! Distance-band carves: diagonal tubes and parabola bands.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::lattice::{Lattice, LatticePoint, ShapePredicate};

/// Distance from `p` to the segment `a..b`.
pub fn segment_distance_2d(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let v = b - a;
    let c1 = v.dot(p - a);
    if c1 <= 0.0 {
        return p.distance(a);
    }
    let c2 = v.length_squared();
    if c2 <= c1 {
        return p.distance(b);
    }
    p.distance(a + v * (c1 / c2))
}

pub fn segment_distance_3d(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let v = b - a;
    let c1 = v.dot(p - a);
    if c1 <= 0.0 {
        return p.distance(a);
    }
    let c2 = v.length_squared();
    if c2 <= c1 {
        return p.distance(b);
    }
    p.distance(a + v * (c1 / c2))
}

/// Removes thick center planes, the six face diagonals and the main space
/// diagonal. Thicknesses are multiples of the lattice spacing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagonalTubes {
    pub center_thickness: f32,
    pub diag_thickness: f32,
    pub space_diag_thickness: f32,
}

impl Default for DiagonalTubes {
    fn default() -> Self {
        Self {
            center_thickness: 2.0,
            diag_thickness: 2.0,
            space_diag_thickness: 2.0,
        }
    }
}

impl ShapePredicate for DiagonalTubes {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let p = point.position;
        let s = lattice.spacing();
        let center = self.center_thickness * s;
        if p.x.abs() < center || p.y.abs() < center || p.z.abs() < center {
            return false;
        }

        let h = lattice.size() * 0.5;
        let diag = self.diag_thickness * s;
        // (point, half-extents) for the XZ, YZ and XY planes
        let planes = [
            (Vec2::new(p.x, p.z), Vec2::new(h.x, h.z)),
            (Vec2::new(p.y, p.z), Vec2::new(h.y, h.z)),
            (Vec2::new(p.x, p.y), Vec2::new(h.x, h.y)),
        ];
        for (q, e) in planes {
            if segment_distance_2d(q, -e, e) < diag {
                return false;
            }
            let anti = Vec2::new(e.x, -e.y);
            if segment_distance_2d(q, -anti, anti) < diag {
                return false;
            }
        }

        segment_distance_3d(p, -h, h) >= self.space_diag_thickness * s
    }
}

/// Which half of the Z axis a parabola band occupies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParabolaSide {
    Positive,
    Negative,
    #[default]
    Both,
}

/// Band around `z = ±(a / 2) x^2`, where `a` makes the parabola reach
/// `curvature * max_z` at the X boundary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParabolaBand {
    pub curvature: f32,
    /// Band half-width as a multiple of spacing, floored at `min_thickness`.
    pub thickness: f32,
    pub min_thickness: f32,
    pub side: ParabolaSide,
}

impl Default for ParabolaBand {
    fn default() -> Self {
        Self {
            curvature: 0.95,
            thickness: 0.6,
            min_thickness: 0.1,
            side: ParabolaSide::Both,
        }
    }
}

impl ParabolaBand {
    /// Quadratic coefficient `a` for this lattice.
    pub fn coefficient(&self, lattice: &Lattice) -> f32 {
        let max = lattice.max();
        let x_limit = if max.x > 0.0 { max.x } else { 1.0 };
        max.z * self.curvature / (x_limit * x_limit)
    }
}

impl ShapePredicate for ParabolaBand {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let p = point.position;
        let band = (lattice.spacing() * self.thickness).max(self.min_thickness);
        let z_par = self.coefficient(lattice) * 0.5 * p.x * p.x;
        let inside = match self.side {
            ParabolaSide::Both => (p.z - z_par).abs() <= band || (p.z + z_par).abs() <= band,
            ParabolaSide::Positive => p.z >= 0.0 && (p.z - z_par).abs() <= band,
            ParabolaSide::Negative => p.z <= 0.0 && (p.z + z_par).abs() <= band,
        };
        !inside
    }
}
