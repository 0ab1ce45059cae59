use std::f32::consts::PI;

use crate::effect::{mix, Sampler, TransitionEffect};
use crate::types::{Rgba, Uv, Viewport};

const DEFAULT_RADIUS: f32 = 1.0;

/// Twists both images around the centre, peaking at half progress.
#[derive(Debug, Clone)]
pub struct Swirl {
    radius: f32,
    glsl: String,
}

impl Default for Swirl {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

const GLSL_TEMPLATE: &str = r"vec4 transition(vec2 uv) {
  float radius = {radius};
  float t = progress;
  uv -= vec2(0.5, 0.5);
  float dist = length(uv);
  if (dist < radius) {
    float percent = (radius - dist) / radius;
    float a = (t <= 0.5) ? mix(0.0, 1.0, t / 0.5) : mix(1.0, 0.0, (t - 0.5) / 0.5);
    float theta = percent * percent * a * 8.0 * 3.14159;
    float s = sin(theta);
    float c = cos(theta);
    uv = vec2(dot(uv, vec2(c, -s)), dot(uv, vec2(s, c)));
  }
  uv += vec2(0.5, 0.5);
  return mix(getFromColor(uv), getToColor(uv), t);
}
";

impl Swirl {
    /// `radius` is the size of the twisted disc in uv units. Values that are
    /// not finite and positive fall back to 1.0.
    pub fn new(radius: f32) -> Self {
        let radius = if radius.is_finite() && radius > 0.0 {
            radius
        } else {
            DEFAULT_RADIUS
        };
        Self {
            radius,
            glsl: GLSL_TEMPLATE.replace("{radius}", &format!("{radius:?}")),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn twist(&self, uv: Uv, t: f32) -> Uv {
        let cx = uv.x - 0.5;
        let cy = uv.y - 0.5;
        let dist = (cx * cx + cy * cy).sqrt();
        if dist >= self.radius {
            return uv;
        }
        let percent = (self.radius - dist) / self.radius;
        let amount = if t <= 0.5 {
            mix(0.0, 1.0, t / 0.5)
        } else {
            mix(1.0, 0.0, (t - 0.5) / 0.5)
        };
        let theta = percent * percent * amount * 8.0 * PI;
        let (s, c) = theta.sin_cos();
        Uv::new(cx * c - cy * s + 0.5, cx * s + cy * c + 0.5)
    }
}

impl TransitionEffect for Swirl {
    fn name(&self) -> &str {
        "swirl"
    }

    fn evaluate(
        &self,
        uv: Uv,
        from: &dyn Sampler,
        to: &dyn Sampler,
        progress: f32,
        _resolution: Viewport,
    ) -> Rgba {
        let twisted = self.twist(uv, progress);
        from.sample(twisted).mix(to.sample(twisted), progress)
    }

    fn glsl(&self) -> &str {
        &self.glsl
    }
}
