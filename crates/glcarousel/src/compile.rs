//! Assembles the two-stage transition graph into a single GLSL program.
//!
//! Effect bodies follow the gl-transitions convention: they define
//! `vec4 transition(vec2 uv)` and read `getFromColor`, `getToColor`,
//! `progress`, `ratio` and `resolution`. Each body is spliced in behind a set
//! of macros that rename those symbols per stage, so the inner (backward)
//! stage becomes the outer (forward) stage's `getFromColor`.

use crate::effect::TransitionEffect;

/// Produces the fragment program for `outer` (forward) wrapping `inner`
/// (backward).
pub fn compose_program(outer: &dyn TransitionEffect, inner: &dyn TransitionEffect) -> String {
    let inner_body = sanitize_effect(inner.glsl());
    let outer_body = sanitize_effect(outer.glsl());
    format!(
        "{HEADER}\n\
         // backward stage: {inner_name}\n\
         #define transition carousel_backward_transition\n\
         #define getFromColor carousel_current\n\
         #define getToColor carousel_next\n\
         #define progress ubo.progress_backward\n\
         #line 1\n\
         {inner_body}\
         {UNDEFINE}\n\
         // forward stage: {outer_name}\n\
         #define transition carousel_forward_transition\n\
         #define getFromColor carousel_backward_transition\n\
         #define getToColor carousel_previous\n\
         #define progress ubo.progress_forward\n\
         #line 1\n\
         {outer_body}\
         {UNDEFINE}\n\
         {FOOTER}",
        inner_name = inner.name(),
        outer_name = outer.name(),
    )
}

/// Strips `#version` directives and uniform declarations that would clash
/// with the injected block.
fn sanitize_effect(source: &str) -> String {
    let mut sanitized = String::with_capacity(source.len());
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#version") {
            continue;
        }
        let clashing_uniform = trimmed.starts_with("uniform ")
            && (trimmed.contains("progress")
                || trimmed.contains("ratio")
                || trimmed.contains("resolution"));
        if clashing_uniform {
            continue;
        }
        sanitized.push_str(line);
        sanitized.push('\n');
    }
    sanitized
}

const UNDEFINE: &str = "#undef transition
#undef getFromColor
#undef getToColor
#undef progress";

/// Uniform block, texture bindings and cover-fit samplers.
///
/// The block layout must match [`crate::CompositionUniforms`].
const HEADER: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform CarouselParams {
    vec2 resolution;
    float progress_forward;
    float progress_backward;
    vec4 cover[3];
} ubo;

layout(set = 1, binding = 0) uniform texture2D carousel_previous_texture;
layout(set = 1, binding = 1) uniform texture2D carousel_current_texture;
layout(set = 1, binding = 2) uniform texture2D carousel_next_texture;
layout(set = 1, binding = 3) uniform sampler carousel_sampler;

#define resolution ubo.resolution
#define ratio (resolution.x / resolution.y)

vec4 carousel_fetch(texture2D tex, vec4 cover, vec2 uv) {
    vec2 fitted = clamp(uv * cover.xy + cover.zw, vec2(0.0), vec2(1.0));
    return texture(sampler2D(tex, carousel_sampler), fitted);
}

vec4 carousel_previous(vec2 uv) { return carousel_fetch(carousel_previous_texture, ubo.cover[0], uv); }
vec4 carousel_current(vec2 uv) { return carousel_fetch(carousel_current_texture, ubo.cover[1], uv); }
vec4 carousel_next(vec2 uv) { return carousel_fetch(carousel_next_texture, ubo.cover[2], uv); }
";

const FOOTER: &str = r"void main() {
    // Top-left origin to match texture space.
    vec2 uv = vec2(v_uv.x, 1.0 - v_uv.y);
    outColor = carousel_forward_transition(uv);
}
";

/// Full-screen triangle vertex shader paired with [`compose_program`].
pub const VERTEX_SHADER: &str = r"#version 450
layout(location = 0) out vec2 v_uv;

const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    uint vertex_index = uint(gl_VertexIndex);
    vec2 pos = positions[vertex_index];
    v_uv = pos * 0.5 + vec2(0.5, 0.5);
    gl_Position = vec4(pos, 0.0, 1.0);
}
";
