use std::fmt;
use std::sync::Arc;

use crate::types::{Rgba, Uv, Viewport};

/// Anything that can be sampled for a colour at a normalised coordinate.
///
/// Images, nested composition stages, and plain closures all implement this so
/// an effect never needs to know what it is blending.
pub trait Sampler {
    fn sample(&self, uv: Uv) -> Rgba;
}

impl<F> Sampler for F
where
    F: Fn(Uv) -> Rgba,
{
    fn sample(&self, uv: Uv) -> Rgba {
        self(uv)
    }
}

/// A pure per-pixel transition between two sources.
///
/// Implementations must be deterministic and free of side effects. They are
/// expected (not required) to return the `from` colour at `progress == 0` and
/// the `to` colour at `progress == 1`.
///
/// `glsl` returns the body of the effect for GPU pipelines. It must define
/// `vec4 transition(vec2 uv)` and may use `getFromColor`, `getToColor`,
/// `progress` and `ratio`/`resolution`; see [`crate::compile`].
pub trait TransitionEffect: Send + Sync + fmt::Debug {
    /// Name the effect is registered under.
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        uv: Uv,
        from: &dyn Sampler,
        to: &dyn Sampler,
        progress: f32,
        resolution: Viewport,
    ) -> Rgba;

    fn glsl(&self) -> &str;
}

/// Shared handle to a registered effect.
pub type EffectRef = Arc<dyn TransitionEffect>;

/// GLSL `mix` on scalars.
pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL `step`.
pub(crate) fn step(edge: f32, x: f32) -> f32 {
    if x < edge {
        0.0
    } else {
        1.0
    }
}

/// GLSL `fract`.
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}
