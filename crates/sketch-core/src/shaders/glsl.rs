//! GLSL pairs for three.js `ShaderMaterial`.
//!
//! Vertex shaders that read per-vertex colors declare `attribute vec3 color`
//! themselves, so the host must not also enable `vertexColors` on the
//! material (three.js would inject a second declaration).

use super::UniformDecl;

/// Points pushed radially away from `u_center` by `u_radius * (sin(t) + 1)`.
pub const RADIAL_PULSE_VERTEX: &str = r#"
attribute vec3 color;
uniform float u_time;
uniform float u_radius;
uniform float u_pointSize;
uniform float u_pointScale;
uniform float u_pixelRatio;
uniform vec3 u_center;
varying vec3 vColor;

void main() {
    vColor = color;

    float delta = (sin(u_time) + 1.0) * 1.0;
    vec3 dir = normalize(position - u_center);
    vec3 disp = dir * (u_radius * delta);
    vec3 newPos = position + disp;

    vec4 mvPosition = modelViewMatrix * vec4(newPos, 1.0);
    gl_Position = projectionMatrix * mvPosition;

    float zDepth = max(0.1, -mvPosition.z);
    float size = (u_pointSize * u_pointScale) / zDepth;
    size = clamp(size, 1.0, 120.0);
    gl_PointSize = size * u_pixelRatio;
}
"#;

/// Round points: discards outside the inscribed circle of the point sprite.
pub const ROUND_POINT_FRAGMENT: &str = r#"
precision mediump float;
varying vec3 vColor;
uniform float u_time;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);
    if (dist > 0.5) discard;
    gl_FragColor = vec4(vColor, 1.0);
}
"#;

pub const RADIAL_PULSE_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::float("u_time", 0.0),
    UniformDecl::float("u_radius", 2.0),
    UniformDecl::float("u_pointSize", 0.06 * 60.0),
    UniformDecl::float("u_pointScale", 6.0),
    UniformDecl::float("u_pixelRatio", 1.0),
    UniformDecl::vec3("u_center", [0.0, 0.0, 0.0]),
];

/// Distance-phased pulse; passes the pulse value on to the glow fragment.
pub const RIPPLE_PULSE_VERTEX: &str = r#"
precision mediump float;
precision mediump int;

attribute vec3 color;
uniform float u_time;
uniform float u_radius;
uniform float u_pointSize;
uniform float u_pointScale;
uniform float u_pixelRatio;
uniform vec3 u_center;
varying vec3 vColor;
varying float vPulse;

void main() {
    vColor = color;

    float dist = length(position - u_center);
    float freq = 1.0;
    float speed = 5.0;
    float phase = u_time * speed - dist * freq;
    float delta = (sin(phase) + 1.0) * 0.5;
    vPulse = delta;

    vec3 dir = normalize(position - u_center);
    vec3 disp = dir * (u_radius * delta);
    vec3 newPos = position + disp;

    vec4 mvPosition = modelViewMatrix * vec4(newPos, 1.0);
    gl_Position = projectionMatrix * mvPosition;

    float zDepth = max(0.1, -mvPosition.z);
    float size = (u_pointSize * u_pointScale) / zDepth;
    size = clamp(size, 1.0, 120.0);
    gl_PointSize = size * u_pixelRatio;
}
"#;

pub const GLOW_FRAGMENT: &str = r#"
precision mediump float;
precision mediump int;

varying vec3 vColor;
varying float vPulse;
uniform float u_time;
uniform float u_glow;
uniform float u_rippleSpeed;
uniform float u_rippleFreq;
uniform float u_alpha;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);
    if (dist > 0.5) discard;

    float mask = 1.0 - smoothstep(0.0, 0.5, dist);
    float ripple = 0.5 + 0.5 * sin(u_time * u_rippleSpeed - dist * u_rippleFreq);
    float brightness = mix(0.6, 1.6, vPulse) * (0.6 + 0.4 * ripple);
    float glow = pow(mask, 1.8) * u_glow * (0.4 + 0.6 * vPulse);

    vec3 color = vColor * (brightness + glow);
    float alpha = clamp(mask * (0.5 + 0.6 * vPulse), 0.0, 1.0) * u_alpha;
    vec3 finalColor = mix(color * 0.85, vec3(1.0), 0.12 * vPulse);

    gl_FragColor = vec4(finalColor, alpha);
}
"#;

pub const RIPPLE_GLOW_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::float("u_time", 0.0),
    UniformDecl::float("u_radius", 2.0),
    UniformDecl::float("u_pointSize", 0.06 * 60.0),
    UniformDecl::float("u_pointScale", 6.0),
    UniformDecl::float("u_pixelRatio", 1.0),
    UniformDecl::vec3("u_center", [0.0, 0.0, 0.0]),
    UniformDecl::float("u_glow", 2.0),
    UniformDecl::float("u_rippleSpeed", 5.0),
    UniformDecl::float("u_rippleFreq", 100.0),
    UniformDecl::float("u_alpha", 10.0),
];

/// Polar flower: radius from `|sin(a * n + t * speed)|` with a cosine warp.
pub const FLOWER_VERTEX: &str = r#"
attribute float aAngle;
attribute float aLayer;
attribute float aY;
uniform float u_time, u_numPetals, u_petalSpeed, u_warpFreq, u_warpSpeed, u_baseRadius;
varying float vY;

void main() {
    vY = aY;

    float petal = abs(sin(aAngle * u_numPetals + u_time * u_petalSpeed));
    float warp = cos(aAngle * u_warpFreq - u_time * u_warpSpeed) * 0.3 + 1.0;
    float r = u_baseRadius * (petal * warp);

    vec3 pos = vec3(cos(aAngle) * r, aY, sin(aAngle) * r);

    gl_Position = projectionMatrix * modelViewMatrix * vec4(pos, 1.0);
    gl_PointSize = 2.0;
}
"#;

/// Vertical gradient over `y` in `[-1.25, 1.25]`.
pub const FLOWER_FRAGMENT: &str = r#"
precision highp float;
varying float vY;

void main() {
    float t = (vY + 1.25) / 2.5;
    gl_FragColor = vec4(mix(vec3(0.1, 0.2, 0.5), vec3(0.9, 0.7, 0.3), t), 1.0);
}
"#;

pub const FLOWER_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::float("u_time", 0.0),
    UniformDecl::float("u_numPetals", 12.0),
    UniformDecl::float("u_petalSpeed", 2.0),
    UniformDecl::float("u_warpFreq", 7.0),
    UniformDecl::float("u_warpSpeed", 1.5),
    UniformDecl::float("u_baseRadius", 2.0),
];

/// Line strip vibrating radially, with pulses travelling along `aIndex`.
pub const LINE_PULSE_VERTEX: &str = r#"
attribute vec3 color;
attribute float aIndex;
uniform float u_maxPoints;
uniform float u_time;
uniform float u_amp;

varying float v_progress;
varying vec3 v_color;

void main() {
    v_color = color;
    v_progress = aIndex / u_maxPoints;

    float vib = sin(u_time * 20.0 + v_progress * 50.0) * u_amp;
    vec3 displaced = position + normalize(position) * vib;

    gl_Position = projectionMatrix * modelViewMatrix * vec4(displaced, 1.0);
}
"#;

pub const LINE_PULSE_FRAGMENT: &str = r#"
precision highp float;
uniform float u_time;
varying float v_progress;
varying vec3 v_color;

void main() {
    float pulse = sin(v_progress * 20.0 - u_time * 3.0);
    pulse = smoothstep(0.4, 0.5, pulse);

    float glow = sin(v_progress * 10.0 - u_time * 1.5);
    glow = smoothstep(0.7, 0.9, glow) * 0.3;

    vec3 col = v_color * (1.0 + pulse + glow);
    gl_FragColor = vec4(col, 1.0);
}
"#;

pub const LINE_PULSE_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::float("u_time", 0.0),
    UniformDecl::float("u_maxPoints", 0.0),
    UniformDecl::float("u_amp", 0.1),
];

/// Gaussian bulge travelling along the tube.
///
/// Reads `uv.x`, which runs along the tube's length. In three.js
/// `TubeGeometry` `uv.y` runs around the tube, so reading `uv.y` here would
/// sweep the bulge around each ring instead of along the path.
pub const TUBE_FLOW_VERTEX: &str = r#"
uniform float u_time, u_speed, u_width, u_radius;
varying vec2 v_uv;

void main() {
    v_uv = uv;
    float t = fract(u_time * u_speed);
    float d = mod(uv.x - t + 1.0, 1.0) - 0.5;
    float blob = exp(-(d * d) / (2.0 * u_width * u_width));
    vec3 displaced = position + normal * u_radius * blob;
    gl_Position = projectionMatrix * modelViewMatrix * vec4(displaced, 1.0);
}
"#;

/// Along-tube gradient keyed on `uv.x`, like the vertex stage.
pub const TUBE_FLOW_FRAGMENT: &str = r#"
precision highp float;
uniform float u_time;
varying vec2 v_uv;

void main() {
    vec3 base = mix(vec3(0.1, 0.3, 0.7), vec3(0.2, 0.6, 1.0), v_uv.x);
    gl_FragColor = vec4(base, 1.0);
}
"#;

pub const TUBE_FLOW_UNIFORMS: &[UniformDecl] = &[
    UniformDecl::float("u_time", 0.0),
    UniformDecl::float("u_speed", 0.2),
    UniformDecl::float("u_width", 0.05),
    UniformDecl::float("u_radius", 0.3),
];
