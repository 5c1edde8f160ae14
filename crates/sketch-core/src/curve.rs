//! Centripetal Catmull-Rom curves and tube meshes swept along them.
//!
//! Parameterization, arc-length mapping and frame transport follow three.js
//! (`CatmullRomCurve3`, `Curve.computeFrenetFrames`, `TubeGeometry`) so a host
//! mixing these buffers with three.js geometry gets identical results.

use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};

/// Exponent on squared chord length: 0.25 is centripetal.
const CENTRIPETAL: f32 = 0.25;

/// Cap on arc-length table entries.
pub const MAX_DIVISIONS: usize = 1 << 16;
/// Caps on tube segments; `(4095 + 1) * (255 + 1)` vertices is exactly
/// `MAX_POINTS`.
pub const MAX_TUBULAR_SEGMENTS: usize = 4095;
pub const MAX_RADIAL_SEGMENTS: usize = 255;

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` for one axis of one span.
#[derive(Clone, Copy, Debug)]
struct Cubic {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl Cubic {
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Non-uniform Catmull-Rom span from `x1` to `x2` with knot gaps
    /// `dt0..dt2`.
    fn nonuniform(x: [f32; 4], dt0: f32, dt1: f32, dt2: f32) -> Self {
        let [x0, x1, x2, x3] = x;
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    #[inline]
    fn at(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

/// Open centripetal Catmull-Rom curve with a cached arc-length table.
#[derive(Clone, Debug, PartialEq)]
pub struct CatmullRom {
    points: Vec<Vec3>,
    arc_lengths: Vec<f32>,
}

impl CatmullRom {
    /// `divisions` is the resolution of the arc-length table.
    pub fn new(points: Vec<Vec3>, divisions: usize) -> Self {
        let mut curve = Self {
            points,
            arc_lengths: Vec::new(),
        };
        let divisions = divisions.clamp(1, MAX_DIVISIONS);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = curve.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for p in 1..=divisions {
            let current = curve.point(p as f32 / divisions as f32);
            sum += current.distance(last);
            lengths.push(sum);
            last = current;
        }
        curve.arc_lengths = lengths;
        curve
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Approximate total length.
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at curve parameter `t` in `[0, 1]` (not arc-length uniform).
    pub fn point(&self, t: f32) -> Vec3 {
        let pts = &self.points;
        let l = pts.len();
        match l {
            0 => return Vec3::ZERO,
            1 => return pts[0],
            _ => {}
        }

        let p = (l - 1) as f32 * t.clamp(0.0, 1.0);
        let mut seg = p.floor() as usize;
        let mut weight = p - seg as f32;
        if seg >= l - 1 {
            seg = l - 2;
            weight = 1.0;
        }

        let p0 = if seg > 0 {
            pts[seg - 1]
        } else {
            2.0 * pts[0] - pts[1]
        };
        let (p1, p2) = (pts[seg], pts[seg + 1]);
        let p3 = if seg + 2 < l {
            pts[seg + 2]
        } else {
            2.0 * pts[l - 1] - pts[l - 2]
        };

        let mut dt0 = p0.distance_squared(p1).powf(CENTRIPETAL);
        let mut dt1 = p1.distance_squared(p2).powf(CENTRIPETAL);
        let mut dt2 = p2.distance_squared(p3).powf(CENTRIPETAL);
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let axis = |f: fn(Vec3) -> f32| {
            Cubic::nonuniform([f(p0), f(p1), f(p2), f(p3)], dt0, dt1, dt2).at(weight)
        };
        Vec3::new(axis(|v| v.x), axis(|v| v.y), axis(|v| v.z))
    }

    /// Map arc-length fraction `u` to curve parameter `t`.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let n = lengths.len();
        if n < 2 {
            return 0.0;
        }
        let target = u.clamp(0.0, 1.0) * self.length();

        // last index whose length does not exceed the target
        let i = lengths.partition_point(|&len| len <= target).saturating_sub(1);
        if i + 1 >= n || lengths[i] == target {
            return i as f32 / (n - 1) as f32;
        }
        let before = lengths[i];
        let segment = lengths[i + 1] - before;
        let fraction = if segment > 0.0 {
            (target - before) / segment
        } else {
            0.0
        };
        (i as f32 + fraction) / (n - 1) as f32
    }

    /// Point at arc-length fraction `u`.
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.u_to_t(u))
    }

    /// Unit tangent at curve parameter `t`, by central difference.
    pub fn tangent(&self, t: f32) -> Vec3 {
        const DELTA: f32 = 1e-4;
        let t1 = (t - DELTA).max(0.0);
        let t2 = (t + DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or_zero()
    }

    pub fn tangent_at(&self, u: f32) -> Vec3 {
        self.tangent(self.u_to_t(u))
    }

    /// Parallel-transported frames at `segments + 1` arc-length samples.
    pub fn frenet_frames(&self, segments: usize) -> Frames {
        let segments = segments.clamp(1, MAX_TUBULAR_SEGMENTS);
        let tangents: Vec<Vec3> = (0..=segments)
            .map(|i| self.tangent_at(i as f32 / segments as f32))
            .collect();

        let mut normals = Vec::with_capacity(segments + 1);
        let mut binormals = Vec::with_capacity(segments + 1);

        let t0 = tangents[0];
        let a = t0.abs();
        let seed = if a.x <= a.y && a.x <= a.z {
            Vec3::X
        } else if a.y <= a.z {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let side = t0.cross(seed).normalize_or_zero();
        normals.push(t0.cross(side));
        binormals.push(t0.cross(normals[0]));

        for i in 1..=segments {
            let mut normal = normals[i - 1];
            let axis = tangents[i - 1].cross(tangents[i]);
            if axis.length() > f32::EPSILON {
                let theta = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
                normal = Quat::from_axis_angle(axis.normalize(), theta) * normal;
            }
            normals.push(normal);
            binormals.push(tangents[i].cross(normal));
        }

        Frames {
            tangents,
            normals,
            binormals,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frames {
    pub tangents: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub binormals: Vec<Vec3>,
}

/// Indexed triangle mesh with per-vertex normals and uvs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TubeMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl TubeMesh {
    /// Sweep a circle of `radius` along `curve`. Rings are `radial + 1`
    /// vertices (seam duplicated); `uv.x` runs along the tube, `uv.y` around
    /// it.
    pub fn sweep(curve: &CatmullRom, tubular: usize, radius: f32, radial: usize) -> Self {
        let tubular = tubular.clamp(1, MAX_TUBULAR_SEGMENTS);
        let radial = radial.clamp(3, MAX_RADIAL_SEGMENTS);
        let frames = curve.frenet_frames(tubular);
        let ring = radial + 1;
        let mut mesh = TubeMesh {
            positions: Vec::with_capacity((tubular + 1) * ring),
            normals: Vec::with_capacity((tubular + 1) * ring),
            uvs: Vec::with_capacity((tubular + 1) * ring),
            indices: Vec::with_capacity(tubular * radial * 6),
        };

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32;
            let center = curve.point_at(u);
            let (n, b) = (frames.normals[i], frames.binormals[i]);
            for j in 0..=radial {
                let v = j as f32 / radial as f32;
                let (sin, cos) = (v * TAU).sin_cos();
                let normal = (-cos * n + sin * b).normalize_or_zero();
                mesh.positions.push(center + normal * radius);
                mesh.normals.push(normal);
                mesh.uvs.push(Vec2::new(u, v));
            }
        }

        let ring = ring as u32;
        for j in 1..=tubular as u32 {
            for i in 1..=radial as u32 {
                let a = ring * (j - 1) + (i - 1);
                let b = ring * j + (i - 1);
                let c = ring * j + i;
                let d = ring * (j - 1) + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}
