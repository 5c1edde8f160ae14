use glam::Vec3;
use sketch_core::color::*;

fn in_unit_cube(c: Vec3) -> bool {
    c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all()
}

#[test]
fn test_hsl_gray_and_extremes() {
    assert_eq!(hsl_to_rgb(0.3, 0.0, 0.5), Vec3::splat(0.5), "zero saturation is gray");
    assert_eq!(hsl_to_rgb(0.0, 1.0, 0.0), Vec3::ZERO);
    assert_eq!(hsl_to_rgb(0.0, 1.0, 1.0), Vec3::ONE);
}

#[test]
fn test_hsl_handles_bad_input() {
    for (h, s, l) in [(f32::NAN, 1.0, 0.5), (-3.7, 2.0, -1.0), (f32::INFINITY, 0.5, 0.5)] {
        let c = hsl_to_rgb(h, s, l);
        assert!(in_unit_cube(c), "hsl({}, {}, {}) = {:?}", h, s, l, c);
    }
}

#[test]
fn test_gradients_stay_in_range() {
    let hsl = HslGradient::NAVY_TO_GOLD;
    let rgb = RgbGradient::default();
    for i in -10..=30 {
        let t = i as f32 / 20.0;
        assert!(in_unit_cube(hsl.sample(t)), "hsl gradient at {}", t);
        assert!(in_unit_cube(rgb.sample(t)), "rgb gradient at {}", t);
    }
    assert_eq!(rgb.sample(-1.0), rgb.bottom, "t is clamped below");
    assert_eq!(rgb.sample(2.0), rgb.top, "t is clamped above");
}

#[test]
fn test_parse_hex() {
    assert_eq!(parse_hex("#ff0000").unwrap(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(parse_hex("00ff00").unwrap(), Vec3::new(0.0, 1.0, 0.0), "hash is optional");
    for bad in ["", "#fff", "#gg0000", "#ff00001", "#ff00é"] {
        let err = parse_hex(bad).unwrap_err();
        assert_eq!(err.input, bad);
    }
}

#[test]
fn test_gradient_from_hex() {
    let g = RgbGradient::from_hex("#000000", "#ffffff").unwrap();
    assert_eq!(g.sample(0.5), Vec3::splat(0.5));
    assert!(RgbGradient::from_hex("#000000", "white").is_err());
}

#[test]
fn test_cycle_phase_wraps() {
    for i in 0..50 {
        let p = cycle_phase(0.7, i as f32 * 0.37, 0.2);
        assert!((0.0..1.0).contains(&p), "phase {}", p);
    }
    assert!((cycle_phase(0.5, 0.0, 0.2) - 0.5).abs() < 1e-6);
}

#[test]
fn test_feature_mixes() {
    assert_eq!(xz_mix(Vec3::new(1.0, 0.0, 1.0)), 1.0);
    assert_eq!(xz_mix(Vec3::new(1.0, 1.0, 0.0)), 0.0);
    assert!((weighted_mix(Vec3::ONE) - 1.0).abs() < 1e-6);
    assert_eq!(weighted_mix(Vec3::splat(-2.0)), 0.0);
}

#[test]
fn test_height_tint_and_bloom() {
    for y in [-5.0, -1.2, 0.0, 1.2, 5.0] {
        assert!(in_unit_cube(height_tint(y, 0.5)), "tint at y={}", y);
    }
    assert_eq!(bloom_boost(Vec3::splat(0.2), 10.0), Vec3::ONE);
    assert_eq!(bloom_boost(Vec3::splat(0.2), -1.0), Vec3::ZERO);
}

#[test]
fn test_radial_fade() {
    assert_eq!(radial_fade(Vec3::ZERO), 1.0);
    assert_eq!(radial_fade(Vec3::X), 0.0);
    assert_eq!(radial_fade(Vec3::X * 5.0), 1.0, "clamped past two units");
}

#[test]
fn test_ribbon_alpha_range() {
    let plain = RibbonMask::default();
    let focused = RibbonMask {
        focus: Some(SphereFocus::default()),
        ..plain
    };
    for i in 0..100 {
        let t = i as f32 * 0.13;
        let p = Vec3::new(t.sin(), (t * 1.7).cos(), (t * 0.3).sin()) * 0.9;
        for mask in [plain, focused] {
            let a = mask.alpha(p, 1.0, 0.02);
            assert!((0.0..=1.0).contains(&a), "alpha {} at {:?}", a, p);
        }
    }
    assert_eq!(plain.alpha(Vec3::ZERO, 0.0, 0.02), 0.0, "empty cube");
    assert_eq!(plain.alpha(Vec3::ZERO, 1.0, f32::NAN), 0.0, "bad spacing");
}

#[test]
fn test_sphere_focus_mask() {
    let focus = SphereFocus::default();
    assert_eq!(focus.mask(Vec3::ZERO, 1.0), 1.0);
    assert_eq!(focus.mask(Vec3::X * 2.0, 1.0), 0.0);
}
