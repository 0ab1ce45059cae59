use crate::circular::wrap_index;
use crate::effect::EffectRef;
use crate::registry::TransitionRegistry;
use crate::source::ImageRef;
use crate::types::Viewport;

/// Construction-time failures. Nothing in the engine fails after a
/// [`Carousel`] exists.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    #[error("carousel requires at least one image")]
    EmptyImages,
    #[error("carousel requires at least one transition")]
    EmptyTransitions,
    #[error("unknown transition '{0}'")]
    UnknownTransition(String),
    #[error("transition '{0}' is registered more than once")]
    DuplicateTransition(String),
    #[error("viewport {0} must have positive, finite dimensions")]
    InvalidViewport(Viewport),
}

/// Fixed image and effect sequences plus the session viewport.
#[derive(Debug)]
pub struct Carousel {
    images: Vec<ImageRef>,
    effects: Vec<EffectRef>,
    viewport: Viewport,
}

/// The three images on screen and the two effects blending them, for one
/// offset.
#[derive(Debug, Clone, Copy)]
pub struct Visible<'a> {
    pub previous: &'a ImageRef,
    pub current: &'a ImageRef,
    pub next: &'a ImageRef,
    /// Blends the backward stage into `previous`; driven by forward progress.
    pub forward_effect: &'a EffectRef,
    /// Blends `current` into `next`; driven by backward progress.
    pub backward_effect: &'a EffectRef,
}

impl Carousel {
    pub fn new(
        images: Vec<ImageRef>,
        effects: Vec<EffectRef>,
        viewport: Viewport,
    ) -> Result<Self, CarouselError> {
        if images.is_empty() {
            return Err(CarouselError::EmptyImages);
        }
        if effects.is_empty() {
            return Err(CarouselError::EmptyTransitions);
        }
        if !viewport.is_valid() {
            return Err(CarouselError::InvalidViewport(viewport));
        }
        Ok(Self {
            images,
            effects,
            viewport,
        })
    }

    /// Resolves `transitions` through `registry` and builds the carousel.
    pub fn from_names<S: AsRef<str>>(
        images: Vec<ImageRef>,
        transitions: &[S],
        registry: &TransitionRegistry,
        viewport: Viewport,
    ) -> Result<Self, CarouselError> {
        if images.is_empty() {
            return Err(CarouselError::EmptyImages);
        }
        if transitions.is_empty() {
            return Err(CarouselError::EmptyTransitions);
        }
        let effects = registry.resolve_all(transitions)?;
        Self::new(images, effects, viewport)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn effects(&self) -> &[EffectRef] {
        &self.effects
    }

    pub fn image_at(&self, index: i64) -> &ImageRef {
        &self.images[wrap_index(index, self.images.len())]
    }

    pub fn effect_at(&self, index: i64) -> &EffectRef {
        &self.effects[wrap_index(index, self.effects.len())]
    }

    pub fn visible(&self, offset: i64) -> Visible<'_> {
        Visible {
            previous: self.image_at(offset.wrapping_sub(1)),
            current: self.image_at(offset),
            next: self.image_at(offset.wrapping_add(1)),
            forward_effect: self.effect_at(offset.wrapping_sub(1)),
            backward_effect: self.effect_at(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SolidColor;
    use crate::types::Rgba;
    use std::sync::Arc;

    fn images(labels: &[&str]) -> Vec<ImageRef> {
        labels
            .iter()
            .map(|label| Arc::new(SolidColor::new(*label, Rgba::BLACK)) as ImageRef)
            .collect()
    }

    fn viewport() -> Viewport {
        Viewport::new(320.0, 480.0)
    }

    #[test]
    fn rejects_empty_inputs() {
        let registry = TransitionRegistry::with_builtins();
        let none: [&str; 0] = [];
        assert!(matches!(
            Carousel::from_names(Vec::new(), &["linear"], &registry, viewport()),
            Err(CarouselError::EmptyImages)
        ));
        assert!(matches!(
            Carousel::from_names(images(&["a"]), &none, &registry, viewport()),
            Err(CarouselError::EmptyTransitions)
        ));
    }

    #[test]
    fn rejects_unresolved_names_and_bad_viewports() {
        let registry = TransitionRegistry::with_builtins();
        assert!(matches!(
            Carousel::from_names(images(&["a"]), &["nope"], &registry, viewport()),
            Err(CarouselError::UnknownTransition(_))
        ));
        assert!(matches!(
            Carousel::from_names(
                images(&["a"]),
                &["linear"],
                &registry,
                Viewport::new(0.0, 10.0)
            ),
            Err(CarouselError::InvalidViewport(_))
        ));
    }

    #[test]
    fn visible_triple_wraps_around() {
        let registry = TransitionRegistry::with_builtins();
        let carousel = Carousel::from_names(
            images(&["A", "B", "C"]),
            &["linear", "swirl"],
            &registry,
            viewport(),
        )
        .expect("carousel");

        let labels = |offset: i64| {
            let visible = carousel.visible(offset);
            (
                visible.previous.label().to_string(),
                visible.current.label().to_string(),
                visible.next.label().to_string(),
            )
        };
        assert_eq!(labels(0), ("C".into(), "A".into(), "B".into()));
        assert_eq!(labels(1), ("A".into(), "B".into(), "C".into()));
        assert_eq!(labels(-1), ("B".into(), "C".into(), "A".into()));

        let visible = carousel.visible(0);
        assert_eq!(visible.forward_effect.name(), "swirl");
        assert_eq!(visible.backward_effect.name(), "linear");
    }

    #[test]
    fn single_image_is_its_own_neighbour() {
        let registry = TransitionRegistry::with_builtins();
        let carousel =
            Carousel::from_names(images(&["solo"]), &["linear"], &registry, viewport())
                .expect("carousel");
        let visible = carousel.visible(42);
        assert!(Arc::ptr_eq(visible.previous, visible.next));
        assert!(Arc::ptr_eq(visible.current, visible.next));
    }
}
