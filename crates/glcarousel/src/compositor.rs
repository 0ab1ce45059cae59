//! Per-frame assembly of the nested transition graph.
//!
//! ```text
//!   forward effect (progress_forward)
//!     ├─ from: backward effect (progress_backward)
//!     │          ├─ from: current image
//!     │          └─ to:   next image
//!     └─ to:   previous image
//! ```
//!
//! With both progress values at zero the frame is the current image; full
//! forward progress shows the previous image and full backward progress the
//! next one.
//!
//! The depth is always exactly two, so the graph is two concrete structs
//! rather than a recursive node type.

use crate::carousel::Carousel;
use crate::compile::compose_program;
use crate::effect::{EffectRef, Sampler};
use crate::source::{ImageRef, Placed};
use crate::state::{CarouselReader, FrameState};
use crate::types::{Rgba, Uv, Viewport};
use crate::uniforms::CompositionUniforms;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to encode frame: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("render pipeline rejected the frame: {0}")]
    Pipeline(String),
}

/// Whatever executes a composition: a GPU backend, the CPU rasteriser, a
/// recorder in tests.
pub trait RenderPipeline {
    /// Draws one full-viewport frame.
    fn submit(&mut self, composition: &Composition) -> Result<(), RenderError>;
}

/// Backward stage: blends the current image into the next one.
#[derive(Debug, Clone)]
pub struct InnerStage {
    pub effect: EffectRef,
    pub progress: f32,
    pub from: ImageRef,
    pub to: ImageRef,
}

/// Forward stage: blends the backward stage's output into the previous image.
#[derive(Debug, Clone)]
pub struct OuterStage {
    pub effect: EffectRef,
    pub progress: f32,
    pub from: InnerStage,
    pub to: ImageRef,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct Composition {
    pub resolution: Viewport,
    /// Offset the frame was built from.
    pub offset: i64,
    pub root: OuterStage,
}

struct InnerSampler<'a> {
    stage: &'a InnerStage,
    resolution: Viewport,
}

impl Sampler for InnerSampler<'_> {
    fn sample(&self, uv: Uv) -> Rgba {
        let from = Placed {
            image: self.stage.from.as_ref(),
            viewport: self.resolution,
        };
        let to = Placed {
            image: self.stage.to.as_ref(),
            viewport: self.resolution,
        };
        self.stage
            .effect
            .evaluate(uv, &from, &to, self.stage.progress, self.resolution)
    }
}

impl Composition {
    /// Builds the graph for `frame` against `carousel`.
    pub fn build(carousel: &Carousel, frame: FrameState) -> Self {
        let visible = carousel.visible(frame.offset);
        Self {
            resolution: carousel.viewport(),
            offset: frame.offset,
            root: OuterStage {
                effect: visible.forward_effect.clone(),
                progress: frame.progress_forward,
                from: InnerStage {
                    effect: visible.backward_effect.clone(),
                    progress: frame.progress_backward,
                    from: visible.current.clone(),
                    to: visible.next.clone(),
                },
                to: visible.previous.clone(),
            },
        }
    }

    /// Final colour at `uv`, evaluating both stages on the CPU.
    pub fn shade(&self, uv: Uv) -> Rgba {
        let outer = &self.root;
        let from = InnerSampler {
            stage: &outer.from,
            resolution: self.resolution,
        };
        let to = Placed {
            image: outer.to.as_ref(),
            viewport: self.resolution,
        };
        outer
            .effect
            .evaluate(uv, &from, &to, outer.progress, self.resolution)
    }

    /// Images in texture-slot order: previous, current, next.
    pub fn textures(&self) -> [&ImageRef; 3] {
        [&self.root.to, &self.root.from.from, &self.root.from.to]
    }

    pub fn uniforms(&self) -> CompositionUniforms {
        let mut uniforms = CompositionUniforms::new(self.resolution);
        uniforms.set_progress(self.root.progress, self.root.from.progress);
        let [previous, current, next] = self.textures();
        uniforms.set_textures([previous.as_ref(), current.as_ref(), next.as_ref()]);
        uniforms
    }

    /// Single-pass GLSL program for GPU pipelines.
    pub fn program(&self) -> String {
        compose_program(self.root.effect.as_ref(), self.root.from.effect.as_ref())
    }
}

/// Reads the controller's published state once per frame and hands the
/// resulting graph to a pipeline.
#[derive(Debug, Clone)]
pub struct Compositor {
    reader: CarouselReader,
}

impl Compositor {
    pub fn new(reader: CarouselReader) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &CarouselReader {
        &self.reader
    }

    pub fn compose(&self) -> Composition {
        let frame = self.reader.snapshot();
        Composition::build(self.reader.carousel(), frame)
    }

    /// Composes the current frame and submits it. Returns the composition
    /// that was drawn.
    pub fn draw<P>(&self, pipeline: &mut P) -> Result<Composition, RenderError>
    where
        P: RenderPipeline + ?Sized,
    {
        let composition = self.compose();
        pipeline.submit(&composition)?;
        Ok(composition)
    }
}
