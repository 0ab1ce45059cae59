use crate::effect::{fract, Sampler, TransitionEffect};
use crate::types::{Rgba, Uv, Viewport};

/// Per-channel displacement glitch that settles as progress completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlitchMemories;

const GLSL: &str = r"vec4 transition(vec2 p) {
  vec2 block = floor(p.xy / vec2(16));
  vec2 uv_noise = block / vec2(64);
  uv_noise += floor(vec2(progress) * vec2(1200.0, 3500.0)) / vec2(64);
  vec2 dist = progress > 0.0 ? (fract(uv_noise) - 0.5) * 0.3 * (1.0 - progress) : vec2(0.0);
  vec2 red = p + dist * 0.2;
  vec2 green = p + dist * 0.3;
  vec2 blue = p + dist * 0.5;
  return vec4(
    mix(getFromColor(red), getToColor(red), progress).r,
    mix(getFromColor(green), getToColor(green), progress).g,
    mix(getFromColor(blue), getToColor(blue), progress).b,
    1.0
  );
}
";

impl GlitchMemories {
    fn displacement(uv: Uv, progress: f32) -> (f32, f32) {
        if progress <= 0.0 {
            return (0.0, 0.0);
        }
        let noise_x = (uv.x / 16.0).floor() / 64.0 + (progress * 1200.0).floor() / 64.0;
        let noise_y = (uv.y / 16.0).floor() / 64.0 + (progress * 3500.0).floor() / 64.0;
        let falloff = 0.3 * (1.0 - progress);
        (
            (fract(noise_x) - 0.5) * falloff,
            (fract(noise_y) - 0.5) * falloff,
        )
    }
}

impl TransitionEffect for GlitchMemories {
    fn name(&self) -> &str {
        "glitch_memories"
    }

    fn evaluate(
        &self,
        uv: Uv,
        from: &dyn Sampler,
        to: &dyn Sampler,
        progress: f32,
        _resolution: Viewport,
    ) -> Rgba {
        let (dx, dy) = Self::displacement(uv, progress);
        let channel = |scale: f32| {
            let shifted = uv.offset(dx * scale, dy * scale);
            from.sample(shifted).mix(to.sample(shifted), progress)
        };
        Rgba::opaque(channel(0.2).r, channel(0.3).g, channel(0.5).b)
    }

    fn glsl(&self) -> &str {
        GLSL
    }
}
