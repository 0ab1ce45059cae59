//! Swipeable image carousel whose page transitions are shader effects.
//!
//! A horizontal drag drives one of two gesture channels. Dragging right
//! advances the forward channel towards the previous image, dragging left
//! advances the backward channel towards the next one. Each frame the
//! compositor nests the two effects and draws the result:
//!
//! ```text
//!   touch source ──▶ GestureSender ═══▶ GestureFeed
//!                                           │ pump()
//!                                           ▼
//!                             CarouselController ──▶ SharedFrame (seqlock)
//!                               ├─ forward  GestureChannel      │
//!                               └─ backward GestureChannel      │ snapshot()
//!                                                               ▼
//!                              RenderPipeline ◀── Compositor ◀── CarouselReader
//! ```
//!
//! The controller is the only writer. It publishes the offset and both
//! progress values as one frame, so a renderer on another thread never sees
//! a committed offset paired with the progress that led to it.
//!
//! [`Carousel`] holds the fixed image and effect sequences, indexed
//! circularly by the controller's offset. Effects come from a
//! [`TransitionRegistry`]; each one carries a CPU evaluator and the matching
//! gl-transitions GLSL body, which [`compose_program`] splices into a single
//! fragment program for GPU backends.

mod carousel;
mod circular;
mod compile;
mod compositor;
mod controller;
mod effect;
mod feed;
mod gesture;
mod raster;
mod registry;
mod snap;
mod source;
mod state;
mod timeline;
pub mod transitions;
mod types;
mod uniforms;

pub use carousel::{Carousel, CarouselError, Visible};
pub use circular::{at, wrap_index};
pub use compile::{compose_program, VERTEX_SHADER};
pub use compositor::{
    Composition, Compositor, InnerStage, OuterStage, RenderError, RenderPipeline,
};
pub use controller::{Arbitration, CarouselController};
pub use effect::{EffectRef, Sampler, TransitionEffect};
pub use feed::{gesture_feed, FeedClosed, GestureFeed, GestureSender, TouchEvent};
pub use gesture::{
    ChannelPhase, GestureChannel, GestureTuning, SettleOutcome, DEFAULT_ACTIVATION_THRESHOLD,
    DEFAULT_SETTLE_DURATION,
};
pub use raster::CpuRasterizer;
pub use registry::{normalize_name, RegistryBuilder, TransitionRegistry};
pub use snap::{snap_point, SnapResolver, DEFAULT_DECELERATION, SNAP_POINTS};
pub use source::{cover_transform, Bitmap, ImageLoadError, ImageRef, ImageSource, SolidColor};
pub use state::{CarouselReader, FrameState};
pub use timeline::SettleCurve;
pub use types::{Rgba, SwipeDirection, Uv, Viewport};
pub use uniforms::{CompositionUniforms, TEXTURE_SLOTS};
