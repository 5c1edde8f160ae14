//! WGSL sources for WebGPU hosts.
//!
//! WebGPU has no point sprites, so the radial pulse pair draws each point as
//! an instanced six-vertex quad: per-instance `position`/`color` attributes,
//! `vertex_index` picks the corner.

use super::UniformDecl;

pub const RADIAL_PULSE: &str = r#"
struct PointUniforms {
    view_proj: mat4x4<f32>,
    center: vec3<f32>,
    time: f32,
    radius: f32,
    point_size: f32,
    point_scale: f32,
    pixel_ratio: f32,
    viewport: vec2<f32>,
    ripple: f32,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> u: PointUniforms;

struct VertexIn {
    @builtin(vertex_index) corner: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) coord: vec2<f32>,
};

fn quad_corner(i: u32) -> vec2<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, 0.5),
        vec2<f32>(-0.5, 0.5),
    );
    return corners[i % 6u];
}

fn pulse(position: vec3<f32>) -> f32 {
    if (u.ripple > 0.5) {
        let dist = length(position - u.center);
        return (sin(u.time * 5.0 - dist) + 1.0) * 0.5;
    }
    return sin(u.time) + 1.0;
}

@vertex
fn vs_main(input: VertexIn) -> VertexOut {
    let offset = input.position - u.center;
    var dir = vec3<f32>(0.0, 0.0, 0.0);
    if (length(offset) > 0.0) {
        dir = normalize(offset);
    }
    let moved = input.position + dir * (u.radius * pulse(input.position));
    let clip = u.view_proj * vec4<f32>(moved, 1.0);

    // perspective size attenuation, in pixels
    let size = clamp(u.point_size * u.point_scale / max(0.1, clip.w), 1.0, 120.0) * u.pixel_ratio;
    let corner = quad_corner(input.corner);
    let viewport = max(u.viewport, vec2<f32>(1.0, 1.0));
    let shift = corner * size * 2.0 / viewport * clip.w;

    var out: VertexOut;
    out.clip = clip + vec4<f32>(shift, 0.0, 0.0);
    out.color = input.color;
    out.coord = corner;
    return out;
}

@fragment
fn fs_main(input: VertexOut) -> @location(0) vec4<f32> {
    if (length(input.coord) > 0.5) {
        discard;
    }
    return vec4<f32>(input.color, 1.0);
}
"#;

pub const RADIAL_PULSE_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::vec3("center", [0.0, 0.0, 0.0]),
    UniformDecl::float("time", 0.0),
    UniformDecl::float("radius", 2.0),
    UniformDecl::float("point_size", 3.6),
    UniformDecl::float("point_scale", 6.0),
    UniformDecl::float("pixel_ratio", 1.0),
    UniformDecl::float("ripple", 0.0),
];
