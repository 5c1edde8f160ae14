/// Hash float to [0,1) - port of GLSL hash11
pub fn hash11(p: f32) -> f32 {
    let mut p = fract(p * 0.1031);
    p *= p + 33.33;
    p *= p + p;
    fract(p)
}

/// Sine hash to [0,1), the classic `fract(sin(n) * 43758.5453)` variant.
pub fn hash01(n: f32) -> f32 {
    ((n * 127.1).sin() * 43_758.547).abs() % 1.0
}

/// GLSL `fract`: always in [0,1), also for negative inputs.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Smooth interpolation - port of GLSL smoothstep
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp to [0,1]; NaN maps to 0.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Normalise `x` into `[0,1]` over `[min, max]`. A degenerate range maps to 0.
#[inline]
pub fn normalize_in(x: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range.abs() < f32::EPSILON {
        0.0
    } else {
        clamp01((x - min) / range)
    }
}

fn lattice_hash(ix: f32, iy: f32, iz: f32) -> f32 {
    hash11(ix + iy * 57.0 + iz * 113.0)
}

/// Trilinear value noise in [-1, 1].
///
/// Stand-in for the simplex turbulence of the quasar sketch: continuous,
/// deterministic, zero-mean enough for vertical churn.
pub fn noise3(x: f32, y: f32, z: f32) -> f32 {
    let (ix, iy, iz) = (x.floor(), y.floor(), z.floor());
    let (fx, fy, fz) = (x - ix, y - iy, z - iz);
    // quintic fade
    let fade = |t: f32| t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
    let (u, v, w) = (fade(fx), fade(fy), fade(fz));

    let c000 = lattice_hash(ix, iy, iz);
    let c100 = lattice_hash(ix + 1.0, iy, iz);
    let c010 = lattice_hash(ix, iy + 1.0, iz);
    let c110 = lattice_hash(ix + 1.0, iy + 1.0, iz);
    let c001 = lattice_hash(ix, iy, iz + 1.0);
    let c101 = lattice_hash(ix + 1.0, iy, iz + 1.0);
    let c011 = lattice_hash(ix, iy + 1.0, iz + 1.0);
    let c111 = lattice_hash(ix + 1.0, iy + 1.0, iz + 1.0);

    let x00 = lerp(c000, c100, u);
    let x10 = lerp(c010, c110, u);
    let x01 = lerp(c001, c101, u);
    let x11 = lerp(c011, c111, u);
    let y0 = lerp(x00, x10, v);
    let y1 = lerp(x01, x11, v);
    lerp(y0, y1, w) * 2.0 - 1.0
}
