//! Color mapping: HSL/HSV conversion, two-stop gradients and the scalar
//! features the sketches feed through them.
//!
//! Every function here returns channels inside `[0, 1]`; scalar inputs are
//! clamped before interpolation so the mapping is total and deterministic.

use std::fmt;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::{clamp01, fract, lerp};

/// Hue/saturation/lightness triple, all in `[0, 1]` (hue wraps).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgb(self) -> Vec3 {
        hsl_to_rgb(self.h, self.s, self.l)
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = fract(t);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// HSL to RGB with the same conventions as `THREE.Color.setHSL` (hue wraps,
/// saturation and lightness clamped), without any colour-space conversion.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = if h.is_finite() { fract(h) } else { 0.0 };
    let s = clamp01(s);
    let l = clamp01(l);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        clamp01(hue_to_channel(p, q, h + 1.0 / 3.0)),
        clamp01(hue_to_channel(p, q, h)),
        clamp01(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

/// Two-stop gradient interpolating hue and lightness (saturation taken from
/// the first stop, as every height-cycled sketch does).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HslGradient {
    pub from: Hsl,
    pub to: Hsl,
}

impl HslGradient {
    /// Navy (220deg, L 0.15) to gold (60deg, L 0.50).
    pub const NAVY_TO_GOLD: Self = Self {
        from: Hsl::new(220.0 / 360.0, 1.0, 0.15),
        to: Hsl::new(60.0 / 360.0, 1.0, 0.50),
    };

    pub fn sample(&self, t: f32) -> Vec3 {
        let t = clamp01(t);
        hsl_to_rgb(
            lerp(self.from.h, self.to.h, t),
            self.from.s,
            lerp(self.from.l, self.to.l, t),
        )
    }
}

impl Default for HslGradient {
    fn default() -> Self {
        Self::NAVY_TO_GOLD
    }
}

/// Error returned when a `#rrggbb` string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color '{}', expected #rrggbb", self.input)
    }
}

impl std::error::Error for ColorParseError {}

/// Parse `#rrggbb` (leading `#` optional) into an RGB triple in `[0, 1]`.
pub fn parse_hex(input: &str) -> Result<Vec3, ColorParseError> {
    let err = || ColorParseError {
        input: input.to_string(),
    };
    let hex = input.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(err());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| err())
    };
    Ok(Vec3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Two-stop RGB lerp gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RgbGradient {
    pub bottom: Vec3,
    pub top: Vec3,
}

impl RgbGradient {
    pub fn new(bottom: Vec3, top: Vec3) -> Self {
        Self {
            bottom: bottom.clamp(Vec3::ZERO, Vec3::ONE),
            top: top.clamp(Vec3::ZERO, Vec3::ONE),
        }
    }

    /// Build from two hex strings (`bottom`, `top`).
    pub fn from_hex(bottom: &str, top: &str) -> Result<Self, ColorParseError> {
        Ok(Self::new(parse_hex(bottom)?, parse_hex(top)?))
    }

    pub fn sample(&self, t: f32) -> Vec3 {
        self.bottom.lerp(self.top, clamp01(t))
    }
}

impl Default for RgbGradient {
    /// Royal blue (#0345fc) to pale gold (#ffe08a).
    fn default() -> Self {
        Self::new(
            Vec3::new(3.0 / 255.0, 69.0 / 255.0, 252.0 / 255.0),
            Vec3::new(1.0, 224.0 / 255.0, 138.0 / 255.0),
        )
    }
}

/// Time-shifted phase: `fract(base + fract(time * speed))`.
pub fn cycle_phase(base: f32, time: f32, speed: f32) -> f32 {
    fract(clamp01(base) + fract(time * speed))
}

/// Product of the normalised X and Z coordinates (corner-to-corner sweep).
pub fn xz_mix(normalized: Vec3) -> f32 {
    clamp01(normalized.x) * clamp01(normalized.z)
}

/// Weighted blend `0.4 x + 0.4 z + 0.2 y` of normalised coordinates.
pub fn weighted_mix(normalized: Vec3) -> f32 {
    clamp01(normalized.x * 0.4 + normalized.z * 0.4 + normalized.y * 0.2)
}

/// Red/green/blue height ramp used by the hollow cubes.
///
/// `t = (y / 1.2 + 1) * scale`, then red rises while green and blue fall.
pub fn height_tint(y: f32, scale: f32) -> Vec3 {
    let t = clamp01((y / 1.2 + 1.0) * scale);
    Vec3::new(
        0.2 + 0.8 * t,
        0.6 * (1.0 - t),
        0.9 * (0.5 + 0.5 * (1.0 - t)),
    )
}

/// Saturating brightness boost for points inside a bloom zone.
pub fn bloom_boost(color: Vec3, intensity: f32) -> Vec3 {
    (color * intensity.max(0.0)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Soft spherical window restricting the ribbon to a central ball.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereFocus {
    /// Ball radius relative to the cube half-size.
    pub radius: f32,
    /// Width of the soft edge relative to the ball radius.
    pub edge: f32,
    pub softness: f32,
}

impl Default for SphereFocus {
    fn default() -> Self {
        Self {
            radius: 1.0 / 1.2,
            edge: 0.15,
            softness: 10.0,
        }
    }
}

impl SphereFocus {
    /// 1 inside the ball, falling to 0 across the edge band.
    pub fn mask(&self, p: Vec3, max_pos: f32) -> f32 {
        let radius = max_pos * self.radius;
        let edge = radius * self.edge;
        let d = p.length();
        let m = if d <= radius {
            1.0
        } else if edge > 0.0 && d <= radius + edge {
            1.0 - (d - radius) / edge
        } else {
            0.0
        };
        m.max(0.0).powf(self.softness)
    }
}

/// Parameters of the sine-ribbon line mask.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonMask {
    pub freq_multiplier: f32,
    pub amplitude_y: f32,
    pub amplitude_z: f32,
    pub x_weight: f32,
    pub z_weight: f32,
    pub thickness_multiplier: f32,
    pub softness: f32,
    pub focus: Option<SphereFocus>,
}

impl Default for RibbonMask {
    fn default() -> Self {
        Self {
            freq_multiplier: 2.0,
            amplitude_y: 0.48,
            amplitude_z: 0.28,
            x_weight: 0.9,
            z_weight: 0.6,
            thickness_multiplier: 2.0,
            softness: 1.5,
            focus: None,
        }
    }
}

impl RibbonMask {
    /// Alpha for a point at `p` inside a cube of half-size `max_pos`.
    ///
    /// A sine ribbon winds through the cube; points close to it are nearly
    /// opaque, the rest fade towards the cube boundary. With a focus ball the
    /// ribbon only shows inside it and the background is suppressed there.
    pub fn alpha(&self, p: Vec3, max_pos: f32, spacing: f32) -> f32 {
        if !(max_pos > 0.0 && spacing > 0.0) {
            return 0.0;
        }
        let freq = std::f32::consts::TAU * self.freq_multiplier / (2.0 * max_pos);
        let t = p.x * self.x_weight + p.z * self.z_weight;
        let center_y = (t * freq).sin() * max_pos * self.amplitude_y;
        let center_z = (t * freq).cos() * max_pos * self.amplitude_z;

        let max_norm = p.abs().max_element() / max_pos;
        let falloff = 1.0 - max_norm;

        let dist = (p.y - center_y).hypot(p.z - center_z);
        let thickness = spacing * self.thickness_multiplier;
        let line = (1.0 - dist / (thickness * 4.0)).max(0.0).powf(self.softness);

        let base = 0.06 + 0.22 * (((p.x * freq).sin() + 1.0) / 2.0) * falloff;
        let alpha = match self.focus {
            None => (0.94 * line).max(base * falloff * 0.9),
            Some(focus) => {
                let sphere = focus.mask(p, max_pos);
                let suppressed = 1.0 - 0.85 * sphere;
                (0.94 * line * sphere).max(base * falloff * suppressed * 0.9)
            }
        };
        clamp01(alpha)
    }
}

/// Alpha fading out with distance from the origin: `|1 - |p||`, clamped.
pub fn radial_fade(p: Vec3) -> f32 {
    clamp01((1.0 - p.length()).abs())
}

/// Attach alpha to an RGB triple.
#[inline]
pub fn with_alpha(rgb: Vec3, alpha: f32) -> Vec4 {
    rgb.extend(alpha)
}
