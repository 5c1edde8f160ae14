use glam::{UVec3, Vec3, Vec4};
use sketch_core::buffer::{ColorLayout, MAX_POINTS};
use sketch_core::lattice::*;

fn config(spacing: f32) -> LatticeConfig {
    LatticeConfig {
        width: 1.0,
        height: 1.0,
        depth: 1.0,
        spacing,
        ..Default::default()
    }
}

#[test]
fn test_axis_steps() {
    assert_eq!(axis_steps(1.0, 0.25), 5);
    assert_eq!(axis_steps(0.1, 0.25), 1, "extent smaller than spacing");
    assert_eq!(axis_steps(1.0, 0.0), 1, "zero spacing");
    assert_eq!(axis_steps(1.0, f32::NAN), 1, "NaN spacing");
    assert_eq!(axis_steps(1.0e9, 1.0), MAX_AXIS_STEPS, "capped");
}

#[test]
fn test_degenerate_spacing_gives_single_cell() {
    for spacing in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let lattice = Lattice::new(&config(spacing));
        assert_eq!(lattice.cell_count(), 1, "spacing {} should give one cell", spacing);
        let buf = lattice.carve(&KeepAll, ColorLayout::Rgb, |_, _| Vec4::ONE);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.position(0), Vec3::ZERO);
    }
}

#[test]
fn test_lattice_is_centered() {
    let lattice = Lattice::new(&config(0.25));
    assert_eq!(lattice.counts(), UVec3::splat(5));
    assert_eq!(lattice.world(UVec3::splat(2)), Vec3::ZERO);
    assert!((lattice.min() + lattice.max()).length() < 1e-6, "bounds symmetric");
    assert!((lattice.size() - Vec3::ONE).length() < 1e-6);
}

#[test]
fn test_normalized_covers_unit_range() {
    let lattice = Lattice::new(&config(0.25));
    assert_eq!(lattice.normalized(lattice.min()), Vec3::ZERO);
    assert_eq!(lattice.normalized(lattice.max()), Vec3::ONE);
}

#[test]
fn test_carve_keeps_predicate_matches_in_order() {
    let lattice = Lattice::new(&config(0.5));
    let upper = |_: &Lattice, p: &LatticePoint| p.position.y > 0.0;
    let buf = lattice.carve(&upper, ColorLayout::Rgb, |_, _| Vec4::ONE);
    assert_eq!(buf.len(), 9, "one of three y layers");
    assert_eq!(buf.len(), lattice.count_kept(&upper));
    for i in 0..buf.len() {
        assert!(buf.position(i).y > 0.0);
    }
}

#[test]
fn test_jitter_is_seeded() {
    let cfg = LatticeConfig {
        jitter_y: 0.5,
        seed: 9,
        ..config(0.25)
    };
    let a = Lattice::new(&cfg).carve(&KeepAll, ColorLayout::Rgb, |_, _| Vec4::ONE);
    let b = Lattice::new(&cfg).carve(&KeepAll, ColorLayout::Rgb, |_, _| Vec4::ONE);
    assert_eq!(a, b, "same seed must give the same jitter");
    let max_offset = (0..a.len())
        .map(|i| {
            let p = a.position(i);
            (p.y - (p.y / 0.25).round() * 0.25).abs()
        })
        .fold(0.0, f32::max);
    assert!(max_offset <= 0.0625 + 1e-5, "jitter exceeds half of jitter_y*spacing: {}", max_offset);
}

#[test]
fn test_cubic_resolution() {
    assert_eq!(cubic_resolution(20_000), 27);
    assert_eq!(cubic_resolution(0), 2, "at least two steps");
    let lattice = Lattice::cubic(1000, 1.0);
    assert_eq!(lattice.counts(), UVec3::splat(10));
    assert_eq!(lattice.traversal(), Traversal::Zyx);
}

#[test]
fn test_zyx_inner_axis_is_x() {
    let lattice = Lattice::cubic(27, 1.0);
    let first: Vec<UVec3> = lattice.indices().take(2).collect();
    assert_eq!(first[1], UVec3::new(1, 0, 0), "x should vary fastest");
}

#[test]
fn test_cubic_resolution_is_capped() {
    assert_eq!(cubic_resolution(u32::MAX), MAX_CUBIC_RESOLUTION);
    let r = MAX_CUBIC_RESOLUTION as usize;
    assert!(r * r * r <= MAX_POINTS && (r + 1) * (r + 1) * (r + 1) > MAX_POINTS);
    assert!(Lattice::cubic(u32::MAX, 1.0).cell_count() <= MAX_POINTS);
}

#[test]
fn test_fit_counts() {
    let small = UVec3::new(10, 20, 30);
    assert_eq!(fit_counts(small), small, "small lattices untouched");
    assert_eq!(fit_counts(UVec3::ZERO), UVec3::ONE);
    for counts in [
        UVec3::splat(MAX_AXIS_STEPS),
        UVec3::new(1, MAX_AXIS_STEPS, MAX_AXIS_STEPS),
        UVec3::new(2, 1024, 700),
    ] {
        let fitted = fit_counts(counts);
        let cells = fitted.x as usize * fitted.y as usize * fitted.z as usize;
        assert!(cells <= MAX_POINTS, "{:?} -> {:?}", counts, fitted);
        assert!(fitted.cmpge(UVec3::ONE).all() && fitted.cmple(counts).all());
    }
}

#[test]
fn test_tiny_spacing_is_capped() {
    let lattice = Lattice::new(&config(1e-9));
    assert!(lattice.cell_count() <= MAX_POINTS, "{} cells", lattice.cell_count());
    assert!(lattice.cell_count() > MAX_POINTS / 2, "the cap should not shrink far below itself");
}
