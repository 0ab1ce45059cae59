//! Frame-consistent state shared between the gesture and render contexts.
//!
//! A sequence lock over three atomics: the single writer bumps the sequence to
//! an odd value, stores the fields, then bumps it back to even. Readers retry
//! until they observe the same even sequence on both sides of their loads, so
//! a frame never sees an offset from one publish mixed with progress from
//! another.

use std::hint;
use std::sync::atomic::{fence, AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::carousel::{Carousel, Visible};
use crate::types::SwipeDirection;

/// Everything the renderer needs from the controller for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    pub offset: i64,
    pub progress_forward: f32,
    pub progress_backward: f32,
}

impl FrameState {
    pub fn progress(&self, direction: SwipeDirection) -> f32 {
        match direction {
            SwipeDirection::Forward => self.progress_forward,
            SwipeDirection::Backward => self.progress_backward,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SharedFrame {
    seq: AtomicU64,
    offset: AtomicI64,
    forward: AtomicU32,
    backward: AtomicU32,
}

impl SharedFrame {
    pub fn new(initial: FrameState) -> Self {
        let shared = Self::default();
        shared.publish(initial);
        shared
    }

    /// Must only be called from the single writer.
    pub fn publish(&self, frame: FrameState) {
        let seq = self.seq.load(Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        self.offset.store(frame.offset, Ordering::Relaxed);
        self.forward
            .store(frame.progress_forward.to_bits(), Ordering::Relaxed);
        self.backward
            .store(frame.progress_backward.to_bits(), Ordering::Relaxed);
        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    pub fn load(&self) -> FrameState {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 1 {
                hint::spin_loop();
                continue;
            }
            let frame = FrameState {
                offset: self.offset.load(Ordering::Relaxed),
                progress_forward: f32::from_bits(self.forward.load(Ordering::Relaxed)),
                progress_backward: f32::from_bits(self.backward.load(Ordering::Relaxed)),
            };
            fence(Ordering::Acquire);
            if self.seq.load(Ordering::Relaxed) == before {
                return frame;
            }
            hint::spin_loop();
        }
    }

    /// Number of completed publishes.
    pub fn generation(&self) -> u64 {
        self.seq.load(Ordering::Acquire) / 2
    }
}

/// Read-only view of a carousel for the render context.
///
/// Cheap to clone and `Send + Sync`; hand one to every thread that draws.
#[derive(Debug, Clone)]
pub struct CarouselReader {
    carousel: Arc<Carousel>,
    shared: Arc<SharedFrame>,
}

impl CarouselReader {
    pub(crate) fn new(carousel: Arc<Carousel>, shared: Arc<SharedFrame>) -> Self {
        Self { carousel, shared }
    }

    pub fn carousel(&self) -> &Arc<Carousel> {
        &self.carousel
    }

    /// One consistent observation of offset and both progress values.
    pub fn snapshot(&self) -> FrameState {
        self.shared.load()
    }

    /// Visible images and active effects for the current snapshot.
    pub fn visible(&self) -> (FrameState, Visible<'_>) {
        let frame = self.snapshot();
        (frame, self.carousel.visible(frame.offset))
    }

    /// Increments every time the controller publishes a change.
    pub fn generation(&self) -> u64 {
        self.shared.generation()
    }
}
