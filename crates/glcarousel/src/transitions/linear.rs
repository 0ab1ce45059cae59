use crate::effect::{Sampler, TransitionEffect};
use crate::types::{Rgba, Uv, Viewport};

/// Straight cross-dissolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

const GLSL: &str = r"vec4 transition(vec2 uv) {
  return mix(
    getFromColor(uv),
    getToColor(uv),
    progress
  );
}
";

impl TransitionEffect for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn evaluate(
        &self,
        uv: Uv,
        from: &dyn Sampler,
        to: &dyn Sampler,
        progress: f32,
        _resolution: Viewport,
    ) -> Rgba {
        from.sample(uv).mix(to.sample(uv), progress)
    }

    fn glsl(&self) -> &str {
        GLSL
    }
}
