//! CPU ports of the shader math, used by headless animators and tests.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{fract, smoothstep};

/// Uniform pulse factor in `[0, 2]`: `sin(t) + 1`.
#[inline]
pub fn pulse_delta(time: f32) -> f32 {
    time.sin() + 1.0
}

/// Distance-phased wave in `[0, 1]`: `(sin(t * speed - dist * freq) + 1) / 2`.
#[inline]
pub fn wave_delta(time: f32, dist: f32, speed: f32, freq: f32) -> f32 {
    ((time * speed - dist * freq).sin() + 1.0) * 0.5
}

/// Move `p` away from `center` by `amount`. A point sitting on the center
/// stays put (GLSL would produce NaN there).
#[inline]
pub fn displace(p: Vec3, center: Vec3, amount: f32) -> Vec3 {
    p + (p - center).normalize_or_zero() * amount
}

/// Round-point mask for a sprite coordinate in `[0, 1]^2`. `None` means the
/// fragment is discarded; otherwise the soft radial falloff used by the
/// glow fragment.
pub fn point_mask(coord: Vec2) -> Option<f32> {
    let dist = (coord - Vec2::splat(0.5)).length();
    if dist > 0.5 {
        return None;
    }
    Some(1.0 - smoothstep(0.0, 0.5, dist))
}

/// Perspective-attenuated point size in pixels.
pub fn point_size(size: f32, scale: f32, depth: f32, pixel_ratio: f32) -> f32 {
    (size * scale / depth.max(0.1)).clamp(1.0, 120.0) * pixel_ratio
}

/// Uniforms of the glow fragment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowParams {
    pub glow: f32,
    pub ripple_speed: f32,
    pub ripple_freq: f32,
    pub alpha: f32,
}

impl Default for GlowParams {
    fn default() -> Self {
        Self {
            glow: 2.0,
            ripple_speed: 5.0,
            ripple_freq: 100.0,
            alpha: 10.0,
        }
    }
}

/// Glow fragment output for a vertex color, sprite coordinate and pulse.
/// Color is not clamped, matching what the shader writes before blending.
pub fn glow_shade(color: Vec3, coord: Vec2, pulse: f32, time: f32, params: &GlowParams) -> Option<Vec4> {
    let mask = point_mask(coord)?;
    let dist = (coord - Vec2::splat(0.5)).length();
    let ripple = 0.5 + 0.5 * (time * params.ripple_speed - dist * params.ripple_freq).sin();
    let brightness = (0.6 + (1.6 - 0.6) * pulse) * (0.6 + 0.4 * ripple);
    let glow = mask.powf(1.8) * params.glow * (0.4 + 0.6 * pulse);
    let lit = color * (brightness + glow);
    let alpha = (mask * (0.5 + 0.6 * pulse)).clamp(0.0, 1.0) * params.alpha;
    let rgb = (lit * 0.85).lerp(Vec3::ONE, 0.12 * pulse);
    Some(rgb.extend(alpha))
}

/// Gaussian blob travelling along `u` in `[0, 1]`.
pub fn flow_blob(u: f32, time: f32, speed: f32, width: f32) -> f32 {
    let t = fract(time * speed);
    let d = fract(u - t + 1.0) - 0.5;
    if width <= 0.0 {
        return 0.0;
    }
    (-(d * d) / (2.0 * width * width)).exp()
}

/// Brightness multiplier of the line pulse fragment: `1 + pulse + glow`.
pub fn line_pulse(progress: f32, time: f32) -> f32 {
    let pulse = smoothstep(0.4, 0.5, (progress * 20.0 - time * 3.0).sin());
    let glow = smoothstep(0.7, 0.9, (progress * 10.0 - time * 1.5).sin()) * 0.3;
    1.0 + pulse + glow
}

/// Radial vibration of the line pulse vertex shader.
#[inline]
pub fn line_vibration(progress: f32, time: f32, amp: f32) -> f32 {
    (time * 20.0 + progress * 50.0).sin() * amp
}

/// Flower vertex shader uniforms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerParams {
    pub num_petals: f32,
    pub petal_speed: f32,
    pub warp_freq: f32,
    pub warp_speed: f32,
    pub base_radius: f32,
}

impl Default for FlowerParams {
    fn default() -> Self {
        Self {
            num_petals: 12.0,
            petal_speed: 2.0,
            warp_freq: 7.0,
            warp_speed: 1.5,
            base_radius: 2.0,
        }
    }
}

/// Radius of the flower vertex shader for polar angle `angle`.
pub fn flower_radius(angle: f32, time: f32, params: &FlowerParams) -> f32 {
    let petal = (angle * params.num_petals + time * params.petal_speed).sin().abs();
    let warp = (angle * params.warp_freq - time * params.warp_speed).cos() * 0.3 + 1.0;
    params.base_radius * petal * warp
}

/// Flower fragment gradient for height `y`. GLSL `mix` does not clamp, so
/// heights outside `[-1.25, 1.25]` extrapolate.
pub fn flower_gradient(y: f32) -> Vec3 {
    let t = (y + 1.25) / 2.5;
    Vec3::new(0.1, 0.2, 0.5).lerp(Vec3::new(0.9, 0.7, 0.3), t)
}
