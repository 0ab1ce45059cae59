use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::carousel::{Carousel, Visible};
use crate::feed::{GestureFeed, TouchEvent};
use crate::gesture::{GestureChannel, GestureTuning, SettleOutcome};
use crate::state::{CarouselReader, FrameState, SharedFrame};
use crate::types::SwipeDirection;

/// Race-mode arbitration for the current touch sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arbitration {
    /// No touch sequence in progress.
    Inactive,
    /// Touch began but neither channel has crossed its threshold yet.
    Pending { translation_x: f32 },
    /// This channel won the race and receives the rest of the sequence.
    Claimed(SwipeDirection),
}

/// Owns the offset and both gesture channels; the single writer of the
/// shared frame state.
#[derive(Debug)]
pub struct CarouselController {
    carousel: Arc<Carousel>,
    offset: i64,
    forward: GestureChannel,
    backward: GestureChannel,
    arbitration: Arbitration,
    shared: Arc<SharedFrame>,
}

impl CarouselController {
    pub fn new(carousel: Arc<Carousel>, tuning: GestureTuning) -> Self {
        let width = carousel.viewport().width;
        Self {
            carousel,
            offset: 0,
            forward: GestureChannel::new(SwipeDirection::Forward, width, tuning),
            backward: GestureChannel::new(SwipeDirection::Backward, width, tuning),
            arbitration: Arbitration::Inactive,
            shared: Arc::new(SharedFrame::new(FrameState::default())),
        }
    }

    /// A handle for the render context.
    pub fn reader(&self) -> CarouselReader {
        CarouselReader::new(Arc::clone(&self.carousel), Arc::clone(&self.shared))
    }

    pub fn carousel(&self) -> &Arc<Carousel> {
        &self.carousel
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn arbitration(&self) -> Arbitration {
        self.arbitration
    }

    pub fn channel(&self, direction: SwipeDirection) -> &GestureChannel {
        match direction {
            SwipeDirection::Forward => &self.forward,
            SwipeDirection::Backward => &self.backward,
        }
    }

    fn channel_mut(&mut self, direction: SwipeDirection) -> &mut GestureChannel {
        match direction {
            SwipeDirection::Forward => &mut self.forward,
            SwipeDirection::Backward => &mut self.backward,
        }
    }

    pub fn progress_forward(&self) -> f32 {
        self.forward.progress()
    }

    pub fn progress_backward(&self) -> f32 {
        self.backward.progress()
    }

    pub fn frame(&self) -> FrameState {
        FrameState {
            offset: self.offset,
            progress_forward: self.forward.progress(),
            progress_backward: self.backward.progress(),
        }
    }

    pub fn visible(&self) -> Visible<'_> {
        self.carousel.visible(self.offset)
    }

    /// True when neither channel is dragging or settling.
    pub fn is_idle(&self) -> bool {
        self.forward.is_idle() && self.backward.is_idle()
    }

    /// Applies one touch event, arbitrating between the two channels.
    pub fn handle(&mut self, event: TouchEvent, now: Instant) {
        match event {
            TouchEvent::Began => self.on_began(now),
            TouchEvent::Changed { delta_x } => self.on_changed(delta_x),
            TouchEvent::Ended { velocity_x } => self.on_ended(velocity_x, now),
        }
        self.publish();
    }

    /// Drains every queued event, then advances settle animations.
    /// Returns the number of events applied.
    pub fn pump(&mut self, feed: &GestureFeed, now: Instant) -> usize {
        let mut applied = 0;
        for event in feed.drain() {
            self.handle(event, now);
            applied += 1;
        }
        self.tick(now);
        applied
    }

    /// Advances both settle animations and applies any that complete.
    pub fn tick(&mut self, now: Instant) {
        let before = self.frame();
        for direction in [SwipeDirection::Forward, SwipeDirection::Backward] {
            if let Some(outcome) = self.channel_mut(direction).tick(now) {
                self.apply(direction, outcome);
            }
        }
        if self.frame() != before {
            self.publish();
        }
    }

    /// Shifts the offset for `direction` and resets that channel.
    ///
    /// Both changes reach readers in one publish, so no frame shows the new
    /// offset next to a stale full-progress value.
    pub fn commit(&mut self, direction: SwipeDirection) {
        self.offset = self.offset.wrapping_add(direction.offset_step());
        self.channel_mut(direction).reset();
        debug!(%direction, offset = self.offset, "committed page change");
        self.publish();
    }

    fn apply(&mut self, direction: SwipeDirection, outcome: SettleOutcome) {
        match outcome {
            SettleOutcome::Commit => self.commit(direction),
            SettleOutcome::Rebound => {
                debug!(%direction, offset = self.offset, "rebounded without page change");
            }
        }
    }

    /// A settle in flight keeps running until the new touch claims its
    /// channel, so a tap without a drag lets a pending commit land.
    fn on_began(&mut self, now: Instant) {
        if let Arbitration::Claimed(direction) = self.arbitration {
            warn!(%direction, "touch began while previous sequence was still active; releasing it");
            if let Some(outcome) = self.channel_mut(direction).end(0.0, now) {
                self.apply(direction, outcome);
            }
        }
        self.arbitration = Arbitration::Pending { translation_x: 0.0 };
    }

    fn on_changed(&mut self, delta_x: f32) {
        match self.arbitration {
            Arbitration::Inactive => {
                warn!(delta_x, "drag change without touch begin; ignoring");
            }
            Arbitration::Pending { translation_x } => {
                let translation_x = translation_x + delta_x;
                let winner = [SwipeDirection::Forward, SwipeDirection::Backward]
                    .into_iter()
                    .find(|direction| self.channel(*direction).activates(translation_x));
                match winner {
                    Some(direction) => {
                        debug!(%direction, translation_x, "channel claimed touch sequence");
                        self.arbitration = Arbitration::Claimed(direction);
                        let channel = self.channel_mut(direction);
                        channel.begin();
                        channel.change(translation_x);
                    }
                    None => {
                        self.arbitration = Arbitration::Pending { translation_x };
                    }
                }
            }
            Arbitration::Claimed(direction) => self.channel_mut(direction).change(delta_x),
        }
    }

    fn on_ended(&mut self, velocity_x: f32, now: Instant) {
        if let Arbitration::Claimed(direction) = self.arbitration {
            if let Some(outcome) = self.channel_mut(direction).end(velocity_x, now) {
                self.apply(direction, outcome);
            }
        }
        self.arbitration = Arbitration::Inactive;
    }

    fn publish(&self) {
        self.shared.publish(self.frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TransitionRegistry;
    use crate::source::{ImageRef, SolidColor};
    use crate::types::{Rgba, Viewport};
    use std::time::Duration;

    const WIDTH: f32 = 300.0;

    fn controller(labels: &[&str]) -> CarouselController {
        let images = labels
            .iter()
            .map(|label| Arc::new(SolidColor::new(*label, Rgba::BLACK)) as ImageRef)
            .collect();
        let carousel = Carousel::from_names(
            images,
            &["linear"],
            &TransitionRegistry::with_builtins(),
            Viewport::new(WIDTH, 500.0),
        )
        .expect("carousel");
        CarouselController::new(Arc::new(carousel), GestureTuning::default())
    }

    fn drag(controller: &mut CarouselController, deltas: &[f32], velocity: f32, now: Instant) {
        controller.handle(TouchEvent::Began, now);
        for delta in deltas {
            controller.handle(TouchEvent::Changed { delta_x: *delta }, now);
        }
        controller.handle(TouchEvent::Ended { velocity_x: velocity }, now);
    }

    #[test]
    fn below_threshold_changes_nothing() {
        let mut controller = controller(&["A", "B"]);
        let now = Instant::now();
        controller.handle(TouchEvent::Began, now);
        controller.handle(TouchEvent::Changed { delta_x: 2.0 }, now);
        controller.handle(TouchEvent::Changed { delta_x: -4.0 }, now);
        assert_eq!(
            controller.arbitration(),
            Arbitration::Pending { translation_x: -2.0 }
        );
        assert_eq!(controller.frame(), FrameState::default());
        controller.handle(TouchEvent::Ended { velocity_x: 900.0 }, now);
        assert!(controller.is_idle());
        assert_eq!(controller.offset(), 0);
    }

    #[test]
    fn travel_before_the_threshold_counts_towards_progress() {
        let mut controller = controller(&["A", "B"]);
        let now = Instant::now();
        controller.handle(TouchEvent::Began, now);
        for _ in 0..3 {
            controller.handle(TouchEvent::Changed { delta_x: -2.0 }, now);
        }
        assert_eq!(
            controller.arbitration(),
            Arbitration::Claimed(SwipeDirection::Backward)
        );
        assert!((controller.progress_backward() - 6.0 / WIDTH).abs() < 1e-6);

        controller.handle(TouchEvent::Changed { delta_x: -24.0 }, now);
        assert!((controller.progress_backward() - 30.0 / WIDTH).abs() < 1e-6);
    }

    #[test]
    fn first_channel_past_threshold_owns_the_sequence() {
        let mut controller = controller(&["A", "B", "C"]);
        let now = Instant::now();
        controller.handle(TouchEvent::Began, now);
        controller.handle(TouchEvent::Changed { delta_x: 30.0 }, now);
        assert_eq!(
            controller.arbitration(),
            Arbitration::Claimed(SwipeDirection::Forward)
        );
        let backward_before = controller.channel(SwipeDirection::Backward).clone();

        // Swinging back left must not wake the backward channel.
        controller.handle(TouchEvent::Changed { delta_x: -90.0 }, now);
        controller.handle(TouchEvent::Changed { delta_x: -90.0 }, now);
        controller.handle(TouchEvent::Ended { velocity_x: -2000.0 }, now);

        let backward = controller.channel(SwipeDirection::Backward);
        assert_eq!(backward.phase(), backward_before.phase());
        assert_eq!(backward.progress(), backward_before.progress());
        assert_eq!(controller.progress_forward(), 0.0);
    }

    #[test]
    fn commit_moves_offset_and_resets_only_its_channel() {
        let mut controller = controller(&["A", "B", "C"]);
        let start = Instant::now();

        // Leave the forward channel mid-settle, then commit a backward swipe.
        drag(&mut controller, &[10.0, 140.0], 0.0, start);
        drag(&mut controller, &[-10.0, -WIDTH], 0.0, start);
        assert!(controller.progress_forward() > 0.0);
        let forward_phase = controller.channel(SwipeDirection::Forward).phase();

        controller.commit(SwipeDirection::Backward);
        assert_eq!(controller.offset(), 1);
        assert_eq!(controller.progress_backward(), 0.0);
        assert_eq!(controller.channel(SwipeDirection::Forward).phase(), forward_phase);
        assert!(controller.progress_forward() > 0.0);
    }

    #[test]
    fn settled_commit_is_applied_on_tick() {
        let mut controller = controller(&["A", "B", "C"]);
        let start = Instant::now();
        drag(&mut controller, &[-10.0, -WIDTH], 0.0, start);
        assert_eq!(controller.offset(), 0);

        controller.tick(start + Duration::from_millis(40));
        assert_eq!(controller.offset(), 0);
        controller.tick(start + Duration::from_millis(100));
        assert_eq!(controller.offset(), 1);
        assert_eq!(controller.progress_backward(), 0.0);
        assert!(controller.is_idle());

        controller.tick(start + Duration::from_millis(500));
        assert_eq!(controller.offset(), 1);
    }

    #[test]
    fn forward_commit_wraps_below_zero() {
        let mut controller = controller(&["A", "B", "C"]);
        let start = Instant::now();
        drag(&mut controller, &[10.0, WIDTH], 0.0, start);
        controller.tick(start + Duration::from_millis(100));
        assert_eq!(controller.offset(), -1);
        assert_eq!(controller.visible().current.label(), "C");
    }

    #[test]
    fn new_drag_cancels_pending_commit() {
        let mut controller = controller(&["A", "B", "C"]);
        let start = Instant::now();
        drag(&mut controller, &[-10.0, -WIDTH], 0.0, start);
        controller.tick(start + Duration::from_millis(30));

        let later = start + Duration::from_millis(50);
        controller.handle(TouchEvent::Began, later);
        controller.handle(TouchEvent::Changed { delta_x: -6.0 }, later);
        controller.tick(start + Duration::from_millis(400));
        assert_eq!(controller.offset(), 0);
        assert!((controller.progress_backward() - 6.0 / WIDTH).abs() < 1e-6);
    }

    #[test]
    fn tap_during_settle_lets_the_commit_land() {
        let mut controller = controller(&["A", "B", "C"]);
        let start = Instant::now();
        drag(&mut controller, &[-10.0, -WIDTH], 0.0, start);
        controller.tick(start + Duration::from_millis(30));

        drag(&mut controller, &[], 0.0, start + Duration::from_millis(50));
        controller.tick(start + Duration::from_millis(400));
        assert_eq!(controller.offset(), 1);
        assert!(controller.is_idle());
    }

    #[test]
    fn unmatched_events_are_tolerated() {
        let mut controller = controller(&["A"]);
        let now = Instant::now();
        controller.handle(TouchEvent::Changed { delta_x: 80.0 }, now);
        controller.handle(TouchEvent::Ended { velocity_x: 80.0 }, now);
        assert_eq!(controller.frame(), FrameState::default());
        assert_eq!(controller.arbitration(), Arbitration::Inactive);
    }

    #[test]
    fn reader_sees_every_publish() {
        let mut controller = controller(&["A", "B", "C"]);
        let reader = controller.reader();
        let now = Instant::now();
        controller.handle(TouchEvent::Began, now);
        controller.handle(TouchEvent::Changed { delta_x: -150.0 }, now);
        let snapshot = reader.snapshot();
        assert_eq!(snapshot.offset, 0);
        assert!((snapshot.progress_backward - 0.5).abs() < 1e-6);

        controller.commit(SwipeDirection::Backward);
        assert_eq!(
            reader.snapshot(),
            FrameState {
                offset: 1,
                progress_forward: 0.0,
                progress_backward: 0.0,
            }
        );
    }
}
