//! Flat position/color attribute storage shared by every sketch.
//!
//! Positions are `xyz` triples, colors `rgb` or `rgba` depending on the
//! [`ColorLayout`]. Both vectors grow and shrink together so index `i` always
//! refers to the same point in either buffer.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::math::clamp01;

/// Upper bound on the points any sketch generates.
pub const MAX_POINTS: usize = 1 << 20;

/// Requested point count capped at [`MAX_POINTS`].
#[inline]
pub fn clamp_count(count: usize) -> usize {
    count.min(MAX_POINTS)
}

/// Number of color components stored per point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorLayout {
    #[default]
    Rgb,
    Rgba,
}

impl ColorLayout {
    #[inline]
    pub fn components(self) -> usize {
        match self {
            ColorLayout::Rgb => 3,
            ColorLayout::Rgba => 4,
        }
    }
}

/// Which attributes changed since the host last uploaded them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub positions: bool,
    pub colors: bool,
}

impl DirtyFlags {
    /// Bitmask for the JS side: bit 0 positions, bit 1 colors.
    pub fn mask(self) -> u32 {
        (self.positions as u32) | ((self.colors as u32) << 1)
    }

    pub fn any(self) -> bool {
        self.positions || self.colors
    }
}

/// Point cloud attribute buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
    layout: ColorLayout,
    positions: Vec<f32>,
    colors: Vec<f32>,
    dirty: DirtyFlags,
}

impl PointBuffer {
    pub fn new(layout: ColorLayout) -> Self {
        Self::with_capacity(layout, 0)
    }

    /// `points` is a hint and is capped at [`MAX_POINTS`].
    pub fn with_capacity(layout: ColorLayout, points: usize) -> Self {
        let points = clamp_count(points);
        Self {
            layout,
            positions: Vec::with_capacity(points * 3),
            colors: Vec::with_capacity(points * layout.components()),
            dirty: DirtyFlags {
                positions: true,
                colors: true,
            },
        }
    }

    #[inline]
    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append a point. RGB layouts ignore `color.w`; channels are clamped.
    pub fn push(&mut self, position: Vec3, color: Vec4) {
        self.positions.extend_from_slice(&position.to_array());
        let c = color.to_array();
        self.colors
            .extend(c[..self.layout.components()].iter().map(|&v| clamp01(v)));
        self.dirty.positions = true;
        self.dirty.colors = true;
    }

    /// Append an opaque point.
    pub fn push_rgb(&mut self, position: Vec3, rgb: Vec3) {
        self.push(position, rgb.extend(1.0));
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
        self.dirty.positions = true;
    }

    /// Color of point `i`; RGB layouts report alpha 1.
    pub fn color(&self, i: usize) -> Vec4 {
        let n = self.layout.components();
        let c = &self.colors[i * n..i * n + n];
        match self.layout {
            ColorLayout::Rgb => Vec4::new(c[0], c[1], c[2], 1.0),
            ColorLayout::Rgba => Vec4::from_slice(c),
        }
    }

    pub fn set_color(&mut self, i: usize, color: Vec4) {
        let n = self.layout.components();
        let c = color.to_array();
        for (dst, &src) in self.colors[i * n..i * n + n].iter_mut().zip(&c[..n]) {
            *dst = clamp01(src);
        }
        self.dirty.colors = true;
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Mutable positions; marks them dirty.
    pub fn positions_mut(&mut self) -> &mut [f32] {
        self.dirty.positions = true;
        &mut self.positions
    }

    /// Mutable colors; marks them dirty. Callers are responsible for
    /// keeping the written values inside `[0, 1]`.
    pub fn colors_mut(&mut self) -> &mut [f32] {
        self.dirty.colors = true;
        &mut self.colors
    }

    /// Read positions while writing colors; marks colors dirty.
    pub fn split_colors_mut(&mut self) -> (&[f32], &mut [f32]) {
        self.dirty.colors = true;
        (&self.positions, &mut self.colors)
    }

    /// Rewrite every position through `f(index, position)`.
    pub fn map_positions(&mut self, mut f: impl FnMut(usize, Vec3) -> Vec3) {
        for (i, chunk) in self.positions.chunks_exact_mut(3).enumerate() {
            let p = f(i, Vec3::from_slice(chunk));
            chunk.copy_from_slice(&p.to_array());
        }
        self.dirty.positions = true;
    }

    /// Rewrite every color through `f(index, position)`, clamping the result.
    pub fn map_colors(&mut self, mut f: impl FnMut(usize, Vec3) -> Vec4) {
        let n = self.layout.components();
        for (i, (pos, col)) in self
            .positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact_mut(n))
            .enumerate()
        {
            let c = f(i, Vec3::from_slice(pos)).to_array();
            for (dst, &src) in col.iter_mut().zip(&c[..n]) {
                *dst = clamp01(src);
            }
        }
        self.dirty.colors = true;
    }

    /// Lowest height and the height range; the range falls back to `1.0`
    /// when the buffer is empty or flat.
    pub fn y_bounds(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for y in self.positions.iter().skip(1).step_by(3) {
            min = min.min(*y);
            max = max.max(*y);
        }
        if !min.is_finite() {
            return (0.0, 1.0);
        }
        let range = max - min;
        (min, if range > f32::EPSILON { range } else { 1.0 })
    }

    /// Return the dirty flags and clear them.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Drop every point, keeping the allocation.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.dirty = DirtyFlags {
            positions: true,
            colors: true,
        };
    }
}
