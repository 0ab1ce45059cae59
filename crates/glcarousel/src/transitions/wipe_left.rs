use crate::effect::{step, Sampler, TransitionEffect};
use crate::types::{Rgba, Uv, Viewport};

/// Hard edge sweeping from the right side towards the left.
#[derive(Debug, Clone, Copy, Default)]
pub struct WipeLeft;

const GLSL: &str = r"vec4 transition(vec2 uv) {
  vec4 a = getFromColor(uv);
  vec4 b = getToColor(uv);
  return mix(a, b, step(1.0 - uv.x, progress));
}
";

impl TransitionEffect for WipeLeft {
    fn name(&self) -> &str {
        "wipe_left"
    }

    fn evaluate(
        &self,
        uv: Uv,
        from: &dyn Sampler,
        to: &dyn Sampler,
        progress: f32,
        _resolution: Viewport,
    ) -> Rgba {
        from.sample(uv).mix(to.sample(uv), step(1.0 - uv.x, progress))
    }

    fn glsl(&self) -> &str {
        GLSL
    }
}
