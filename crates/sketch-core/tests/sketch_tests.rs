use glam::{Quat, Vec3};
use sketch_core::buffer::{ColorLayout, PointBuffer, MAX_POINTS};
use sketch_core::carve::{CarvePattern, TriangularPrism};
use sketch_core::curve::{MAX_RADIAL_SEGMENTS, MAX_TUBULAR_SEGMENTS};
use sketch_core::lattice::{Lattice, LatticeConfig};
use sketch_core::shaders::{ShaderLanguage, UniformValue};
use sketch_core::sketches::quasar::{JET_LENGTH, JET_WIDTH};
use sketch_core::sketches::stacks::{layer_share, MAX_HOLES};
use sketch_core::sketches::*;

/// Catalog entry with counts cut down for debug-mode tests.
fn shrink(kind: SketchKind) -> SketchKind {
    match kind {
        SketchKind::CarvedTower(c) => SketchKind::CarvedTower(TowerConfig {
            count: 2_000,
            hole_count: 20,
            ..c
        }),
        SketchKind::Quasar(c) => SketchKind::Quasar(QuasarConfig {
            disk_count: 600,
            photon_count: 100,
            jet_count: 400,
            ..c
        }),
        SketchKind::Strata(c) => SketchKind::Strata(StrataConfig { count: 1_000, ..c }),
        SketchKind::Flower(c) => SketchKind::Flower(FlowerConfig { count: 1_000, ..c }),
        SketchKind::PetalBloom(c) => SketchKind::PetalBloom(PetalBloomConfig { count: 1_000, ..c }),
        SketchKind::FlowerShader(c) => {
            SketchKind::FlowerShader(FlowerShaderConfig { count: 1_000, ..c })
        }
        SketchKind::HollowCube(c) => SketchKind::HollowCube(HollowCubeConfig {
            count: Some(1_000),
            ..c
        }),
        SketchKind::SineRibbon(c) => SketchKind::SineRibbon(SineRibbonConfig { count: 1_000, ..c }),
        SketchKind::LayeredGrid(c) => SketchKind::LayeredGrid(LayeredGridConfig { count: 700, ..c }),
        SketchKind::CarvedLattice(c) => SketchKind::CarvedLattice(CarvedLatticeConfig {
            lattice: coarse(),
            ..c
        }),
        SketchKind::PulsingShell(c) => SketchKind::PulsingShell(PulsingShellConfig {
            lattice: coarse(),
            ..c
        }),
        SketchKind::LinePath(c) => SketchKind::LinePath(c),
        SketchKind::TubeFlow(c) => SketchKind::TubeFlow(TubeFlowConfig {
            tubular_segments: 40,
            radial_segments: 8,
            divisions: 50,
            ..c
        }),
    }
}

fn coarse() -> LatticeConfig {
    LatticeConfig {
        spacing: 0.25,
        ..Default::default()
    }
}

fn small_catalog() -> Vec<SketchKind> {
    SketchKind::catalog().into_iter().map(shrink).collect()
}

fn assert_sane(name: &str, buf: &PointBuffer) {
    let n = buf.layout().components();
    assert_eq!(buf.positions().len() % 3, 0, "{}: ragged positions", name);
    assert_eq!(
        buf.positions().len() / 3,
        buf.colors().len() / n,
        "{}: positions and colors out of step",
        name
    );
    assert!(buf.positions().iter().all(|v| v.is_finite()), "{}: non-finite position", name);
    assert!(
        buf.colors().iter().all(|v| (0.0..=1.0).contains(v)),
        "{}: color channel outside [0, 1]",
        name
    );
}

#[test]
fn test_catalog_builds_and_animates() {
    for kind in small_catalog() {
        let mut sketch = kind.into_sketch().unwrap();
        let name = sketch.name();
        let mut buf = sketch.build();
        assert!(!buf.is_empty(), "{} built nothing", name);
        assert_sane(name, &buf);

        for frame in 0..5 {
            sketch.frame(&mut buf, frame as f32 / 60.0);
            assert_sane(name, &buf);
        }
    }
}

#[test]
fn test_builds_are_deterministic() {
    for kind in small_catalog() {
        let mut a = kind.clone().into_sketch().unwrap();
        let mut b = kind.into_sketch().unwrap();
        assert_eq!(a.build(), b.build(), "{} differs between builds", a.name());
    }
}

#[test]
fn test_rebuild_resets_state() {
    let kind = shrink(SketchKind::catalog().remove(0));
    let mut sketch = kind.into_sketch().unwrap();
    let first = sketch.build();
    let mut buf = first.clone();
    sketch.frame(&mut buf, 0.0);
    sketch.frame(&mut buf, 3.0);
    assert_eq!(sketch.build(), first, "second build should start over");
}

#[test]
fn test_seed_changes_output() {
    let mut a = CarvedTower::new(TowerConfig {
        count: 500,
        hole_count: 5,
        seed: 1,
        ..Default::default()
    });
    let mut b = CarvedTower::new(TowerConfig {
        count: 500,
        hole_count: 5,
        seed: 2,
        ..Default::default()
    });
    assert_ne!(a.build().positions(), b.build().positions());
}

#[test]
fn test_sketch_names_are_unique() {
    let mut names: Vec<&str> = small_catalog()
        .into_iter()
        .map(|k| k.into_sketch().unwrap().name())
        .collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_kind_from_partial_json() {
    let kind: SketchKind = serde_json::from_str(r#"{"kind": "Strata", "count": 10}"#).unwrap();
    assert_eq!(
        kind,
        SketchKind::Strata(StrataConfig {
            count: 10,
            ..Default::default()
        })
    );

    let kind: SketchKind =
        serde_json::from_str(r#"{"kind": "HollowCube", "mode": "NestedShells"}"#).unwrap();
    match kind {
        SketchKind::HollowCube(c) => {
            assert_eq!(c.mode, CubeMode::NestedShells);
            assert_eq!(c.count, None);
        }
        other => panic!("wrong kind: {:?}", other),
    }

    assert!(serde_json::from_str::<SketchKind>(r#"{"kind": "Nope"}"#).is_err());
}

#[test]
fn test_kind_json_round_trip() {
    let kind = SketchKind::Quasar(QuasarConfig {
        camera: Vec3::new(1.0, 2.0, 3.0),
        lensing: false,
        ..Default::default()
    });
    let json = serde_json::to_string(&kind).unwrap();
    assert!(json.starts_with(r#"{"kind":"Quasar""#), "{}", json);
    let back: SketchKind = serde_json::from_str(&json).unwrap();
    assert_eq!(back, kind);
}

#[test]
fn test_tower_points_avoid_holes() {
    let mut tower = CarvedTower::new(TowerConfig {
        count: 3_000,
        hole_count: 40,
        ..Default::default()
    });
    let buf = tower.build();
    assert_eq!(tower.holes().len(), 40);
    assert!(buf.len() <= 3_000 && buf.len() > 2_000, "kept {}", buf.len());
    for i in 0..buf.len() {
        let p = buf.position(i);
        assert!(!tower.holes().iter().any(|h| h.contains(p)), "point {:?} inside a hole", p);
    }
}

#[test]
fn test_tower_spins() {
    let mut tower = CarvedTower::new(TowerConfig {
        count: 100,
        ..Default::default()
    });
    let mut buf = tower.build();
    tower.frame(&mut buf, 0.0);
    assert_eq!(tower.rotation(), Quat::IDENTITY);
    tower.frame(&mut buf, 10.0);
    assert!(tower.rotation().angle_between(Quat::IDENTITY) > 0.5);
}

#[test]
fn test_layered_grid_exact_counts() {
    assert_eq!((0..7).map(|l| layer_share(1_000, 7, l)).sum::<usize>(), 1_000);
    let mut grid = LayeredGrid::new(LayeredGridConfig {
        count: 1_000,
        ..Default::default()
    });
    let buf = grid.build();
    assert_eq!(buf.len(), 1_000);
    for i in 0..buf.len() {
        let p = buf.position(i);
        assert!(p.x.abs() <= 1.0 && p.z.abs() <= 1.0, "outside footprint: {:?}", p);
        assert!(
            STRATA_INTERVALS.iter().any(|[a, b]| p.y >= *a - 1e-5 && p.y <= *b + 1e-5),
            "height {} outside every layer",
            p.y
        );
    }
}

#[test]
fn test_strata_count_and_heights() {
    let mut strata = Strata::new(StrataConfig {
        count: 2_000,
        ..Default::default()
    });
    let buf = strata.build();
    assert_eq!(buf.len(), 2_000);
    for i in 0..buf.len() {
        assert!(buf.position(i).y.abs() <= 1.25 + 1e-5);
    }
}

#[test]
fn test_every_flower_variant_is_finite() {
    for variant in [
        FlowerVariant::Clamped,
        FlowerVariant::Stepped,
        FlowerVariant::Spiral,
        FlowerVariant::LayeredSine,
        FlowerVariant::Quadrant,
    ] {
        let mut flower = Flower::new(FlowerConfig {
            variant,
            count: 2_000,
            ..Default::default()
        });
        let buf = flower.build();
        assert_eq!(buf.len(), 2_000, "{:?} dropped points", variant);
        assert_sane(flower.name(), &buf);
    }
}

#[test]
fn test_petal_bloom_follows_spring() {
    let mut sketch = PetalBloomSketch::new(PetalBloomConfig {
        count: 500,
        ..Default::default()
    });
    let mut buf = sketch.build();
    assert_eq!(sketch.petals(), 35.0);
    let before = buf.clone();
    for frame in 0..10 {
        sketch.frame(&mut buf, frame as f32 / 60.0);
    }
    assert!(sketch.petals() < 35.0, "petals {}", sketch.petals());
    assert_ne!(before.positions(), buf.positions(), "bloom should move points");
}

#[test]
fn test_flower_shader_attributes() {
    let mut sketch = FlowerShader::new(FlowerShaderConfig {
        count: 700,
        cpu_mirror: true,
        ..Default::default()
    });
    let mut buf = sketch.build();
    assert_eq!(sketch.attribute("aAngle").map(<[f32]>::len), Some(700));
    assert_eq!(sketch.attribute("aY").map(<[f32]>::len), Some(700));
    let layers = sketch.attribute("aLayer").unwrap();
    assert!(layers.iter().all(|&l| l < STRATA_INTERVALS.len() as f32));
    assert!(sketch.attribute("aMissing").is_none());

    let pair = sketch.shader().unwrap();
    assert_eq!(pair.uniform("u_numPetals"), Some(UniformValue::Float(12.0)));

    let heights: Vec<f32> = (0..buf.len()).map(|i| buf.position(i).y).collect();
    sketch.frame(&mut buf, 0.0);
    sketch.frame(&mut buf, 0.7);
    for (i, &y) in heights.iter().enumerate() {
        assert_eq!(buf.position(i).y, y, "CPU mirror must keep heights");
    }
}

#[test]
fn test_quasar_layout_and_jets() {
    let config = QuasarConfig {
        disk_count: 300,
        photon_count: 50,
        jet_count: 200,
        ..Default::default()
    };
    let mut quasar = Quasar::new(config);
    let mut buf = quasar.build();
    assert_eq!(buf.len(), 550);

    for frame in 0..30 {
        quasar.frame(&mut buf, frame as f32 / 60.0);
    }
    for i in 350..550 {
        let p = buf.position(i);
        assert!(p.y.abs() <= JET_LENGTH + 1e-4, "jet escaped: {:?}", p);
        assert!(p.x.hypot(p.z) <= JET_WIDTH + 1e-4, "jet too wide: {:?}", p);
    }
    assert_sane("quasar", &buf);
}

#[test]
fn test_quasar_camera_guard() {
    let mut quasar = Quasar::new(QuasarConfig::default());
    quasar.set_camera(Vec3::new(f32::NAN, 0.0, 1.0));
    assert_eq!(quasar.camera(), QuasarConfig::default().camera);
    quasar.set_camera(Vec3::new(0.0, 0.0, 20.0));
    assert_eq!(quasar.camera(), Vec3::new(0.0, 0.0, 20.0));
}

#[test]
fn test_quasar_ignores_foreign_buffer() {
    let mut quasar = Quasar::new(QuasarConfig {
        disk_count: 10,
        photon_count: 0,
        jet_count: 0,
        ..Default::default()
    });
    quasar.build();
    let mut other = PointBuffer::new(ColorLayout::Rgb);
    quasar.frame(&mut other, 1.0);
    assert!(other.is_empty());
}

#[test]
fn test_hollow_cube_gap_count() {
    // 27^3 lattice minus a 7^3 central cube
    let mut cube = HollowCube::new(HollowCubeConfig::default());
    assert_eq!(cube.build().len(), 19_683 - 343);
}

#[test]
fn test_cube_modes_layouts() {
    for mode in [
        CubeMode::Plain,
        CubeMode::Cubed,
        CubeMode::Bloom,
        CubeMode::Swirl,
        CubeMode::NestedShells,
        CubeMode::RadialFade,
    ] {
        let mut cube = HollowCube::new(HollowCubeConfig {
            mode,
            count: Some(1_000),
            ..Default::default()
        });
        let buf = cube.build();
        assert_eq!(buf.layout(), mode.layout(), "{:?}", mode);
        assert!(!buf.is_empty(), "{:?} built nothing", mode);
        assert_sane(cube.name(), &buf);
    }
}

#[test]
fn test_bloom_brightens_gap_rim() {
    let mut plain = HollowCube::new(HollowCubeConfig {
        mode: CubeMode::Bloom,
        count: Some(8_000),
        bloom_intensity: 1.0,
        ..Default::default()
    });
    let mut bloom = HollowCube::new(HollowCubeConfig {
        mode: CubeMode::Bloom,
        count: Some(8_000),
        ..Default::default()
    });
    let (a, b) = (plain.build(), bloom.build());
    assert_eq!(a.len(), b.len());
    let brighter = (0..a.len())
        .filter(|&i| b.color(i).truncate().length() > a.color(i).truncate().length() + 1e-3)
        .count();
    assert!(brighter > 0, "no point was boosted");
}

#[test]
fn test_nested_shell_alphas() {
    let mut cube = HollowCube::new(HollowCubeConfig {
        mode: CubeMode::NestedShells,
        count: Some(1_000),
        ..Default::default()
    });
    let buf = cube.build();
    for i in 0..buf.len() {
        let a = buf.color(i).w;
        assert!((0.02..=0.2).contains(&a), "alpha {}", a);
    }
}

#[test]
fn test_sine_ribbon_alpha() {
    for config in [SineRibbonConfig::default(), SineRibbonConfig::focused()] {
        let mut ribbon = SineRibbon::new(SineRibbonConfig {
            count: 8_000,
            ..config
        });
        let buf = ribbon.build();
        assert_eq!(buf.layout(), ColorLayout::Rgba);
        assert_eq!(buf.len(), 8_000, "no gap by default");
        let opaque = (0..buf.len()).filter(|&i| buf.color(i).w > 0.5).count();
        assert!(opaque > 0, "{}: the ribbon should show", ribbon.name());
    }
}

#[test]
fn test_carved_lattice_takes_pattern_name() {
    let mut sketch = CarvedLattice::new(CarvedLatticeConfig {
        lattice: coarse(),
        pattern: CarvePattern::Full,
        ..Default::default()
    });
    assert_eq!(sketch.name(), "full");
    assert_eq!(sketch.build().len(), 13 * 13 * 13);
}

#[test]
fn test_carved_lattice_hex_gradient() {
    let config = CarvedLatticeConfig::default().with_hex("#000000", "#ffffff").unwrap();
    assert_eq!(config.gradient.top, Vec3::ONE);
    assert!(CarvedLatticeConfig::default().with_hex("nope", "#ffffff").is_err());
}

#[test]
fn test_pulsing_shell_shaders() {
    let glsl = PulsingShell::new(PulsingShellConfig {
        lattice: coarse(),
        radius: 1.5,
        ..Default::default()
    })
    .unwrap();
    let pair = glsl.shader().unwrap();
    assert_eq!(pair.language, ShaderLanguage::Glsl);
    assert_eq!(pair.uniform("u_radius"), Some(UniformValue::Float(1.5)));

    let wgsl = PulsingShell::new(PulsingShellConfig {
        lattice: coarse(),
        wgsl: true,
        ..Default::default()
    })
    .unwrap();
    let pair = wgsl.shader().unwrap();
    assert_eq!(pair.language, ShaderLanguage::Wgsl);
    assert_eq!(pair.uniform("ripple"), Some(UniformValue::Float(0.0)));
}

#[test]
fn test_pulsing_shell_cpu_mirror() {
    let mut shell = PulsingShell::new(PulsingShellConfig {
        lattice: coarse(),
        cpu_mirror: true,
        ..Default::default()
    })
    .unwrap();
    let mut buf = shell.build();
    let rest: Vec<Vec3> = (0..buf.len()).map(|i| buf.position(i)).collect();
    shell.frame(&mut buf, 0.0);
    for (i, r) in rest.iter().enumerate() {
        let moved = buf.position(i);
        assert!(moved.length() > r.length(), "point {} did not move out", i);
    }
}

#[test]
fn test_line_path_reveals_progressively() {
    let mut path = LinePath::new(LinePathConfig::default());
    let mut buf = path.build();
    assert_eq!(path.primitive(), Primitive::LineStrip);
    assert_eq!(buf.len(), 48);
    assert_eq!(path.attribute("aIndex").map(<[f32]>::len), Some(48));
    assert_eq!(
        path.shader().unwrap().uniform("u_maxPoints"),
        Some(UniformValue::Float(48.0))
    );

    assert_eq!(path.draw_count(), Some(0));
    path.frame(&mut buf, 0.0);
    path.frame(&mut buf, 1.0);
    assert_eq!(path.draw_count(), Some(30));
    path.frame(&mut buf, 5.0);
    assert_eq!(path.draw_count(), Some(48));
}

#[test]
fn test_tube_flow_mesh() {
    let mut tube = TubeFlow::new(TubeFlowConfig {
        tubular_segments: 40,
        radial_segments: 8,
        divisions: 50,
        cpu_mirror: true,
        ..Default::default()
    });
    let mut buf = tube.build();
    let vertices = 41 * 9;
    assert_eq!(tube.primitive(), Primitive::Triangles);
    assert_eq!(buf.len(), vertices);
    assert_eq!(tube.attribute("normal").map(<[f32]>::len), Some(vertices * 3));
    assert_eq!(tube.attribute("uv").map(<[f32]>::len), Some(vertices * 2));

    let indices = tube.indices().unwrap();
    assert_eq!(indices.len(), 40 * 8 * 6);
    assert!(indices.iter().all(|&i| (i as usize) < vertices));

    let normals = tube.attribute("normal").unwrap();
    for n in normals.chunks_exact(3) {
        let len = Vec3::from_slice(n).length();
        assert!((len - 1.0).abs() < 1e-3, "normal length {}", len);
    }

    let before = buf.clone();
    tube.frame(&mut buf, 1.0);
    assert_ne!(before.positions(), buf.positions(), "bulge should move the tube");
}

/// `usize::MAX`, as a host might send it.
const HUGE: &str = "18446744073709551615";

fn build_from_json(json: &str) -> PointBuffer {
    let kind: SketchKind = serde_json::from_str(json).unwrap();
    let mut sketch = kind.into_sketch().unwrap();
    let mut buf = sketch.build();
    sketch.frame(&mut buf, 0.5);
    assert_sane(sketch.name(), &buf);
    buf
}

#[test]
fn test_huge_counts_are_capped() {
    for kind in ["Strata", "LayeredGrid", "Flower", "PetalBloom", "FlowerShader"] {
        let json = format!(r#"{{"kind": "{}", "count": {}}}"#, kind, HUGE);
        let buf = build_from_json(&json);
        assert_eq!(buf.len(), MAX_POINTS, "{} should degrade to the cap", kind);
    }

    let json = format!(
        r#"{{"kind": "Quasar", "disk_count": {0}, "photon_count": {0}, "jet_count": {0}}}"#,
        HUGE
    );
    assert_eq!(build_from_json(&json).len(), MAX_POINTS, "quasar parts share one cap");
}

#[test]
fn test_huge_tower_parameters_are_capped() {
    let json = format!(r#"{{"kind": "CarvedTower", "count": {}, "hole_count": 0}}"#, HUGE);
    assert_eq!(build_from_json(&json).len(), MAX_POINTS);

    let config: TowerConfig = serde_json::from_str(&format!(
        r#"{{"count": 10, "hole_count": {}, "max_attempts": 4294967295}}"#,
        HUGE
    ))
    .unwrap();
    let mut tower = CarvedTower::new(config);
    let buf = tower.build();
    assert_eq!(tower.holes().len(), MAX_HOLES);
    assert!(buf.len() <= 10);
}

#[test]
fn test_huge_lattices_are_capped() {
    let jsons = [
        r#"{"kind": "HollowCube", "count": 4294967295}"#.to_string(),
        r#"{"kind": "HollowCube", "mode": "NestedShells", "count": 4294967295}"#.to_string(),
        r#"{"kind": "SineRibbon", "count": 4294967295}"#.to_string(),
        r#"{"kind": "CarvedLattice", "lattice": {"spacing": 1e-9}}"#.to_string(),
        r#"{"kind": "PulsingShell", "lattice": {"spacing": 1e-9}}"#.to_string(),
    ];
    for json in &jsons {
        let buf = build_from_json(json);
        assert!(buf.len() <= MAX_POINTS, "{} built {} points", json, buf.len());
    }
}

#[test]
fn test_huge_tube_segments_are_capped() {
    let json = format!(
        r#"{{"kind": "TubeFlow", "tubular_segments": {0}, "radial_segments": {0}, "divisions": {0}}}"#,
        HUGE
    );
    let kind: SketchKind = serde_json::from_str(&json).unwrap();
    let mut sketch = kind.into_sketch().unwrap();
    let buf = sketch.build();
    assert_eq!(buf.len(), MAX_POINTS);

    let indices = sketch.indices().unwrap();
    assert_eq!(indices.len(), MAX_TUBULAR_SEGMENTS * MAX_RADIAL_SEGMENTS * 6);
    assert!(indices.iter().all(|&i| (i as usize) < buf.len()));
}

#[test]
fn test_prism_wireframe_is_exposed() {
    let prism = TriangularPrism::default();
    let mut sketch = CarvedLattice::new(CarvedLatticeConfig {
        lattice: coarse(),
        pattern: CarvePattern::Prism(prism),
        ..Default::default()
    });
    let _cloud = sketch.build();
    let edges = sketch.attribute("prismEdges").unwrap();
    assert_eq!(edges.len(), 18 * 2 * 3, "18 segments of two xyz endpoints");

    let half = Lattice::new(&coarse()).size().y * prism.extrude_frac / 2.0;
    for p in edges.chunks(3) {
        assert!((p[1].abs() - half).abs() < 1e-5, "endpoint off the caps: {:?}", p);
    }

    let mut boxes = CarvedLattice::new(CarvedLatticeConfig {
        lattice: coarse(),
        ..Default::default()
    });
    let _cloud = boxes.build();
    assert!(boxes.attribute("prismEdges").is_none(), "only prisms have a wireframe");
}
