//! WGSL source for the particle render pipeline.
//!
//! The vertex stage displaces and sizes each particle, the fragment stage
//! cuts a soft disc out of each quad. Constants come from
//! [`crate::displacement`] so the GPU and the CPU mirror cannot drift apart.

use crate::displacement::{
    ALPHA_DISCARD, ALPHA_INNER, ALPHA_OUTER, BREATH_AMPLITUDE, BREATH_FREQUENCY,
    BREATH_PHASE_SCALE, DIRECTION_EPSILON, MIN_VIEW_DEPTH,
};

/// Vertex entry point name.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment entry point name.
pub const FRAGMENT_ENTRY: &str = "fs_main";
/// Vertices drawn per particle instance (two triangles).
pub const VERTICES_PER_PARTICLE: u32 = 6;

/// WGSL `Uniforms` struct. Must match [`crate::uniforms::FrameUniforms`].
const UNIFORMS_WGSL: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    color1: vec4<f32>,
    color2: vec4<f32>,
    cursor: vec2<f32>,
    viewport: vec2<f32>,
    time: f32,
    interaction_radius: f32,
    repulsion_strength: f32,
    field_radius: f32,
    point_size: f32,
};"#;

/// Format an `f32` as a WGSL float literal.
fn lit(v: f32) -> String {
    format!("{:?}", v)
}

/// Generate the render shader.
pub fn render_shader() -> String {
    let uniforms = UNIFORMS_WGSL;
    let breath_amplitude = lit(BREATH_AMPLITUDE);
    let phase_scale = lit(BREATH_PHASE_SCALE);
    let [fx, fy, fz] = BREATH_FREQUENCY.map(lit);
    let alpha_inner = lit(ALPHA_INNER);
    let alpha_outer = lit(ALPHA_OUTER);
    let alpha_discard = lit(ALPHA_DISCARD);
    let direction_epsilon = lit(DIRECTION_EPSILON);
    let min_view_depth = lit(MIN_VIEW_DEPTH);

    format!(
        r#"{uniforms}

const BREATH_AMPLITUDE: f32 = {breath_amplitude};
const BREATH_PHASE_SCALE: f32 = {phase_scale};
const BREATH_FREQUENCY: vec3<f32> = vec3<f32>({fx}, {fy}, {fz});
const ALPHA_INNER: f32 = {alpha_inner};
const ALPHA_OUTER: f32 = {alpha_outer};
const ALPHA_DISCARD: f32 = {alpha_discard};
const DIRECTION_EPSILON: f32 = {direction_epsilon};
const MIN_VIEW_DEPTH: f32 = {min_view_depth};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
}};

// Linear falloff away from the cursor; no push when the particle sits
// exactly under it.
fn repulsion_offset(screen: vec2<f32>, cursor: vec2<f32>) -> vec2<f32> {{
    let delta = screen - cursor;
    let dist = length(delta);
    if dist >= uniforms.interaction_radius || dist <= DIRECTION_EPSILON {{
        return vec2<f32>(0.0, 0.0);
    }}
    let magnitude = (1.0 - dist / uniforms.interaction_radius) * uniforms.repulsion_strength;
    return delta / dist * magnitude;
}}

fn breathing_offset(time: f32, seed: f32) -> vec3<f32> {{
    let phase = seed * BREATH_PHASE_SCALE;
    let angle = vec3<f32>(time) * BREATH_FREQUENCY + vec3<f32>(phase);
    return vec3<f32>(sin(angle.x), cos(angle.y), sin(angle.z)) * BREATH_AMPLITUDE;
}}

fn height_color(rest_y: f32) -> vec3<f32> {{
    let t = select(
        0.5,
        clamp(rest_y / (2.0 * uniforms.field_radius) + 0.5, 0.0, 1.0),
        uniforms.field_radius > 0.0,
    );
    return mix(uniforms.color1.rgb, uniforms.color2.rgb, t);
}}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) rest_position: vec3<f32>,
    @location(1) seed: f32,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad_pos = quad_vertices[vertex_index];

    var position = rest_position;

    let rest_clip = uniforms.view_proj * vec4<f32>(rest_position, 1.0);
    if rest_clip.w > DIRECTION_EPSILON {{
        let screen = rest_clip.xy / rest_clip.w;
        let push = repulsion_offset(screen, uniforms.cursor);
        // Camera right and up axes, rows of the view rotation
        let right = vec3<f32>(uniforms.view[0].x, uniforms.view[1].x, uniforms.view[2].x);
        let up = vec3<f32>(uniforms.view[0].y, uniforms.view[1].y, uniforms.view[2].y);
        position += right * push.x + up * push.y;
    }}

    position += breathing_offset(uniforms.time, seed);

    let view_position = uniforms.view * vec4<f32>(position, 1.0);
    var clip_pos = uniforms.projection * view_position;

    // Sprite diameter in pixels, larger when closer
    let size = uniforms.point_size / max(-view_position.z, MIN_VIEW_DEPTH);
    let half_extent = 0.5 * size * (2.0 / uniforms.viewport);
    clip_pos.x += quad_pos.x * half_extent.x * clip_pos.w;
    clip_pos.y += quad_pos.y * half_extent.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = height_color(rest_position.y);
    // Sprite-local coordinates, edge of the disc at 0.5
    out.uv = quad_pos * 0.5;

    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let dist = length(in.uv);
    let alpha = 1.0 - smoothstep(ALPHA_INNER, ALPHA_OUTER, dist);
    if alpha < ALPHA_DISCARD {{
        discard;
    }}
    return vec4<f32>(in.color, alpha);
}}
"#
    )
}
