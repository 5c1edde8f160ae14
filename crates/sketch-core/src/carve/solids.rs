//! World-space carve predicates: spheres, helices, boxes, prisms and shells.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::lattice::{Lattice, LatticePoint, ShapePredicate};

/// Regular lattice of spherical cavities filling the lattice bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereLattice {
    /// Distance between neighbouring sphere centers.
    pub gap: f32,
    pub radius: f32,
}

impl Default for SphereLattice {
    fn default() -> Self {
        Self {
            gap: 1.0,
            radius: 0.6,
        }
    }
}

impl SphereLattice {
    fn centers_along(&self, extent: f32) -> u32 {
        ((extent / self.gap - 1e-4).ceil() as u32).max(1)
    }

    /// Nearest sphere center to `p`. Centers form a separable grid, so the
    /// nearest one is found independently per axis.
    pub fn nearest_center(&self, lattice: &Lattice, p: Vec3) -> Vec3 {
        let size = lattice.size();
        let axis = |coord: f32, extent: f32| {
            let n = self.centers_along(extent);
            let offset = -((n - 1) as f32 / 2.0) * self.gap;
            let s = ((coord - offset) / self.gap).round().clamp(0.0, (n - 1) as f32);
            offset + s * self.gap
        };
        Vec3::new(axis(p.x, size.x), axis(p.y, size.y), axis(p.z, size.z))
    }
}

impl ShapePredicate for SphereLattice {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        if self.gap.is_nan() || self.gap <= 0.0 {
            return true;
        }
        let c = self.nearest_center(lattice, point.position);
        point.position.distance(c) >= self.radius
    }
}

/// Helical tunnel around the Y axis; the phase follows normalized height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixTunnel {
    pub radius: f32,
    pub turns: f32,
    pub tunnel_radius: f32,
}

impl Default for HelixTunnel {
    fn default() -> Self {
        Self {
            radius: 1.1,
            turns: 3.0,
            tunnel_radius: 0.35,
        }
    }
}

impl ShapePredicate for HelixTunnel {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let p = point.position;
        let u = lattice.normalized(p).y;
        let t = u * self.turns * TAU;
        let center = Vec2::new(self.radius * t.cos(), self.radius * t.sin());
        Vec2::new(p.x, p.z).distance(center) >= self.tunnel_radius
    }
}

/// Axis-aligned box given by center and full size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cavity {
    pub center: Vec3,
    pub size: Vec3,
}

impl Cavity {
    pub fn contains(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        let half = self.size * 0.5;
        d.x <= half.x && d.y <= half.y && d.z <= half.z
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxCavities {
    pub boxes: Vec<Cavity>,
}

impl Default for BoxCavities {
    fn default() -> Self {
        Self {
            boxes: vec![
                Cavity {
                    center: Vec3::new(-1.4, 0.0, -0.6),
                    size: Vec3::splat(1.0),
                },
                Cavity {
                    center: Vec3::new(1.2, 0.0, 0.6),
                    size: Vec3::new(1.0, 1.3, 0.9),
                },
                Cavity {
                    center: Vec3::new(0.0, 1.2, -1.6),
                    size: Vec3::new(0.9, 0.8, 0.9),
                },
            ],
        }
    }
}

impl ShapePredicate for BoxCavities {
    fn keep(&self, _: &Lattice, point: &LatticePoint) -> bool {
        !self.boxes.iter().any(|b| b.contains(point.position))
    }
}

/// Two opposite equilateral triangles in XZ, extruded along Y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangularPrism {
    /// Triangle edge length relative to the lattice X span.
    pub size_factor: f32,
    /// Rotation of the first triangle around Y (radians).
    pub rotation: f32,
    pub offset_z: f32,
    /// Prism height as a fraction of the lattice Y span.
    pub extrude_frac: f32,
}

impl Default for TriangularPrism {
    fn default() -> Self {
        Self {
            size_factor: 0.6,
            rotation: 0.0,
            offset_z: 0.0,
            extrude_frac: 1.0,
        }
    }
}

/// Barycentric point-in-triangle test in the XZ plane. Degenerate
/// triangles contain nothing.
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let denom = v0.perp_dot(v1);
    if denom.abs() < 1e-8 {
        return false;
    }
    let u = v2.perp_dot(v1) / denom;
    let v = v0.perp_dot(v2) / denom;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

impl TriangularPrism {
    /// Both triangles as `[a, b, c]` in XZ.
    pub fn triangles(&self, lattice: &Lattice) -> [[Vec2; 3]; 2] {
        let size = (lattice.size().x * self.size_factor).max(0.001);
        let h = 3f32.sqrt() / 2.0 * size;
        let local = [
            Vec2::new(-size / 2.0, -h / 3.0),
            Vec2::new(size / 2.0, -h / 3.0),
            Vec2::new(0.0, 2.0 * h / 3.0),
        ];
        let make = |rotation: f32, shift: f32| {
            let rot = Vec2::from_angle(rotation);
            local.map(|v| rot.rotate(v) + Vec2::new(0.0, shift))
        };
        [
            make(self.rotation, self.offset_z),
            make(self.rotation + PI, -self.offset_z),
        ]
    }

    fn half_height(&self, lattice: &Lattice) -> f32 {
        lattice.size().y * self.extrude_frac / 2.0
    }

    /// Wireframe segments (caps and vertical edges) of both prisms.
    pub fn wire_edges(&self, lattice: &Lattice) -> Vec<[Vec3; 2]> {
        const PAIRS: [(usize, usize); 9] = [
            (0, 1),
            (1, 2),
            (2, 0),
            (3, 4),
            (4, 5),
            (5, 3),
            (0, 3),
            (1, 4),
            (2, 5),
        ];
        let half = self.half_height(lattice);
        let mut segments = Vec::with_capacity(PAIRS.len() * 2);
        for tri in self.triangles(lattice) {
            let mut verts = [Vec3::ZERO; 6];
            for (i, v) in tri.iter().enumerate() {
                verts[i] = Vec3::new(v.x, -half, v.y);
                verts[i + 3] = Vec3::new(v.x, half, v.y);
            }
            segments.extend(PAIRS.iter().map(|&(a, b)| [verts[a], verts[b]]));
        }
        segments
    }
}

impl ShapePredicate for TriangularPrism {
    fn keep(&self, lattice: &Lattice, point: &LatticePoint) -> bool {
        let p = point.position;
        if p.y.abs() > self.half_height(lattice) {
            return true;
        }
        let q = Vec2::new(p.x, p.z);
        !self
            .triangles(lattice)
            .iter()
            .any(|t| point_in_triangle(q, t[0], t[1], t[2]))
    }
}

/// Band around the quadric surface `|(x^2 - cx^2, y^2 - cy^2, z^2 - cz^2)| = r`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadricShell {
    pub center: Vec3,
    pub radius: f32,
    pub half_width: f32,
}

impl Default for QuadricShell {
    fn default() -> Self {
        Self {
            center: Vec3::splat(0.5),
            radius: 2.5,
            half_width: 0.5,
        }
    }
}

impl ShapePredicate for QuadricShell {
    fn keep(&self, _: &Lattice, point: &LatticePoint) -> bool {
        let p = point.position;
        let d = (p * p - self.center * self.center).length();
        (d - self.radius).abs() > self.half_width
    }
}

/// Keeps only points inside a ball around the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidSphere {
    pub radius: f32,
}

impl Default for SolidSphere {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl ShapePredicate for SolidSphere {
    fn keep(&self, _: &Lattice, point: &LatticePoint) -> bool {
        point.position.length() <= self.radius
    }
}
