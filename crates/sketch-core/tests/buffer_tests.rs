use glam::{Vec3, Vec4};
use sketch_core::buffer::*;

#[test]
fn test_push_keeps_buffers_in_step() {
    let mut buf = PointBuffer::new(ColorLayout::Rgba);
    for i in 0..10 {
        buf.push(Vec3::splat(i as f32), Vec4::new(0.5, 0.5, 0.5, 0.2));
    }
    assert_eq!(buf.len(), 10);
    assert_eq!(buf.positions().len(), 30);
    assert_eq!(buf.colors().len(), 40, "RGBA stores four channels per point");
}

#[test]
fn test_push_clamps_channels() {
    let mut buf = PointBuffer::new(ColorLayout::Rgba);
    buf.push(Vec3::ZERO, Vec4::new(-1.0, 2.0, f32::NAN, 0.5));
    assert_eq!(buf.color(0), Vec4::new(0.0, 1.0, 0.0, 0.5));
}

#[test]
fn test_take_dirty_clears_flags() {
    let mut buf = PointBuffer::new(ColorLayout::Rgb);
    buf.push_rgb(Vec3::ZERO, Vec3::ONE);
    assert_eq!(buf.take_dirty().mask(), 3);
    assert!(!buf.dirty().any(), "flags should be cleared after take");

    buf.set_position(0, Vec3::X);
    let flags = buf.take_dirty();
    assert!(flags.positions && !flags.colors, "only positions changed: {:?}", flags);
}

#[test]
fn test_map_colors_clamps_and_marks() {
    let mut buf = PointBuffer::new(ColorLayout::Rgb);
    buf.push_rgb(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
    buf.take_dirty();
    buf.map_colors(|_, p| Vec4::new(p.y, -p.y, 0.5, 1.0));
    assert_eq!(buf.color(0), Vec4::new(1.0, 0.0, 0.5, 1.0));
    assert!(buf.dirty().colors);
}

#[test]
fn test_y_bounds_fallbacks() {
    let empty = PointBuffer::new(ColorLayout::Rgb);
    assert_eq!(empty.y_bounds(), (0.0, 1.0), "empty buffer");

    let mut flat = PointBuffer::new(ColorLayout::Rgb);
    flat.push_rgb(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE);
    flat.push_rgb(Vec3::new(1.0, 3.0, 0.0), Vec3::ONE);
    assert_eq!(flat.y_bounds(), (3.0, 1.0), "flat buffer reports range 1");

    let mut tall = PointBuffer::new(ColorLayout::Rgb);
    tall.push_rgb(Vec3::new(0.0, -1.0, 0.0), Vec3::ONE);
    tall.push_rgb(Vec3::new(0.0, 2.0, 0.0), Vec3::ONE);
    assert_eq!(tall.y_bounds(), (-1.0, 3.0));
}

#[test]
fn test_byte_views_match_float_len() {
    let mut buf = PointBuffer::new(ColorLayout::Rgb);
    buf.push_rgb(Vec3::ONE, Vec3::ONE);
    assert_eq!(buf.position_bytes().len(), 12);
    assert_eq!(buf.color_bytes().len(), 12);
}

#[test]
fn test_clear_marks_dirty() {
    let mut buf = PointBuffer::new(ColorLayout::Rgb);
    buf.push_rgb(Vec3::ONE, Vec3::ONE);
    buf.take_dirty();
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.dirty().mask(), 3);
}

#[test]
fn test_capacity_hint_is_capped() {
    assert_eq!(clamp_count(usize::MAX), MAX_POINTS);
    assert_eq!(clamp_count(12), 12);
    let buf = PointBuffer::with_capacity(ColorLayout::Rgba, usize::MAX);
    assert!(buf.is_empty(), "an oversized hint must not panic or allocate unbounded");
}
