//! Built-in transition catalog.
//!
//! Every effect ships a CPU evaluation used by the reference rasteriser and a
//! GLSL body for GPU pipelines. Names follow the registry's lookup keys.

mod glitch_memories;
mod linear;
mod swirl;
mod wipe_left;

use std::sync::Arc;

use crate::effect::EffectRef;

pub use glitch_memories::GlitchMemories;
pub use linear::Linear;
pub use swirl::Swirl;
pub use wipe_left::WipeLeft;

/// Returns one instance of every built-in effect, in catalog order.
pub fn builtin() -> Vec<EffectRef> {
    vec![
        Arc::new(Linear),
        Arc::new(Swirl::default()),
        Arc::new(WipeLeft),
        Arc::new(GlitchMemories),
    ]
}
