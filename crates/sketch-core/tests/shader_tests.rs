use glam::{Vec2, Vec3};
use sketch_core::shaders::reference::*;
use sketch_core::shaders::*;

#[test]
fn test_radial_pulse_wgsl_validates() {
    if let Err(err) = validate_wgsl(wgsl::RADIAL_PULSE) {
        panic!("bundled WGSL should validate: {}", err);
    }
}

#[test]
fn test_garbage_wgsl_is_a_parse_error() {
    let err = validate_wgsl("fn main( {").unwrap_err();
    assert_eq!(err.stage, "parse");
    assert!(err.to_string().starts_with("WGSL parse error"), "{}", err);
}

#[test]
fn test_wgsl_pair_shares_module() {
    let pair = ShaderPair::wgsl(wgsl::RADIAL_PULSE, wgsl::RADIAL_PULSE_UNIFORMS).unwrap();
    assert_eq!(pair.language, ShaderLanguage::Wgsl);
    assert_eq!(pair.vertex, pair.fragment);
    assert_eq!(pair.uniform("radius"), Some(UniformValue::Float(2.0)));
}

#[test]
fn test_uniform_overrides() {
    let mut pair = ShaderPair::glsl(
        glsl::RADIAL_PULSE_VERTEX,
        glsl::ROUND_POINT_FRAGMENT,
        glsl::RADIAL_PULSE_UNIFORMS,
    );
    pair.set_uniform("u_radius", UniformValue::Float(0.5));
    pair.set_uniform("u_missing", UniformValue::Float(9.0));
    assert_eq!(pair.uniform("u_radius"), Some(UniformValue::Float(0.5)));
    assert_eq!(pair.uniform("u_missing"), None, "unknown names are not added");
    assert_eq!(pair.uniforms.len(), glsl::RADIAL_PULSE_UNIFORMS.len());
}

#[test]
fn test_uniforms_serialize_untagged() {
    let json = serde_json::to_string(&[
        UniformDecl::float("u_time", 1.5),
        UniformDecl::vec3("u_center", [1.0, 2.0, 3.0]),
    ])
    .unwrap();
    assert_eq!(
        json,
        r#"[{"name":"u_time","value":1.5},{"name":"u_center","value":[1.0,2.0,3.0]}]"#
    );
}

#[test]
fn test_point_uniforms_block_size() {
    assert_eq!(std::mem::size_of::<PointUniforms>(), 112);
    let u = PointUniforms::default();
    assert_eq!(bytemuck::bytes_of(&u).len(), 112);
}

#[test]
fn test_point_fragments_discard() {
    for src in [glsl::ROUND_POINT_FRAGMENT, glsl::GLOW_FRAGMENT] {
        assert!(src.contains("discard"), "point fragments must cut round sprites");
    }
}

#[test]
fn test_point_mask() {
    assert_eq!(point_mask(Vec2::splat(0.5)), Some(1.0), "sprite center is fully lit");
    assert_eq!(point_mask(Vec2::ZERO), None, "corner is discarded");
    let edge = point_mask(Vec2::new(1.0, 0.5)).unwrap();
    assert!(edge.abs() < 1e-6, "edge fades to zero: {}", edge);
}

#[test]
fn test_point_size_clamps() {
    assert_eq!(point_size(3.6, 6.0, 1000.0, 1.0), 1.0);
    assert_eq!(point_size(3.6, 6.0, 0.0, 2.0), 240.0, "depth floor then clamp");
}

#[test]
fn test_pulse_and_wave_ranges() {
    assert_eq!(pulse_delta(0.0), 1.0);
    for i in 0..100 {
        let t = i as f32 * 0.21;
        assert!((0.0..=2.0).contains(&pulse_delta(t)));
        let w = wave_delta(t, i as f32 * 0.05, 5.0, 1.0);
        assert!((0.0..=1.0).contains(&w), "wave {}", w);
    }
}

#[test]
fn test_displace() {
    assert_eq!(displace(Vec3::ZERO, Vec3::ZERO, 3.0), Vec3::ZERO);
    let p = displace(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 1.0);
    assert!((p - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_glow_shade() {
    let params = GlowParams::default();
    assert!(glow_shade(Vec3::ONE, Vec2::ZERO, 1.0, 0.0, &params).is_none());
    let lit = glow_shade(Vec3::splat(0.5), Vec2::splat(0.5), 1.0, 0.0, &params).unwrap();
    assert!(lit.w > 0.0, "center should be visible: {:?}", lit);
}

#[test]
fn test_line_pulse_is_brightening() {
    for i in 0..50 {
        let b = line_pulse(i as f32 / 50.0, i as f32 * 0.1);
        assert!((1.0..=2.3 + 1e-5).contains(&b), "brightness {}", b);
    }
    assert!(line_vibration(0.3, 1.0, 0.1).abs() <= 0.1);
}

#[test]
fn test_flower_reference() {
    let params = FlowerParams::default();
    assert_eq!(flower_radius(0.0, 0.0, &params), 0.0, "petal node at angle zero");
    for i in 0..60 {
        let r = flower_radius(i as f32 * 0.1, 1.0, &params);
        assert!(r >= 0.0 && r <= params.base_radius * 1.3 + 1e-5, "radius {}", r);
    }
    assert_eq!(flower_gradient(-1.25), Vec3::new(0.1, 0.2, 0.5));
}

#[test]
fn test_tube_flow_keys_on_along_tube_coordinate() {
    let (vertex, fragment) = (glsl::TUBE_FLOW_VERTEX, glsl::TUBE_FLOW_FRAGMENT);
    assert!(vertex.contains("uv.x") && !vertex.contains("uv.y"), "bulge must travel along the tube");
    assert!(fragment.contains("v_uv.x") && !fragment.contains("v_uv.y"));
}
