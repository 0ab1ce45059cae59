//! Channel carrying raw touch events from a gesture context to the controller.

use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};

/// One event from the external pan recogniser, for a single touch sequence.
///
/// Deltas and velocities are horizontal and in pixels (per second for
/// velocity), positive to the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Began,
    Changed { delta_x: f32 },
    Ended { velocity_x: f32 },
}

/// The receiving side has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("carousel controller is no longer receiving gesture events")]
pub struct FeedClosed;

/// Sending half, safe to move onto the thread that recognises gestures.
#[derive(Debug, Clone)]
pub struct GestureSender {
    tx: Sender<TouchEvent>,
}

impl GestureSender {
    pub fn send(&self, event: TouchEvent) -> Result<(), FeedClosed> {
        self.tx.send(event).map_err(|_| FeedClosed)
    }

    pub fn began(&self) -> Result<(), FeedClosed> {
        self.send(TouchEvent::Began)
    }

    pub fn changed(&self, delta_x: f32) -> Result<(), FeedClosed> {
        self.send(TouchEvent::Changed { delta_x })
    }

    pub fn ended(&self, velocity_x: f32) -> Result<(), FeedClosed> {
        self.send(TouchEvent::Ended { velocity_x })
    }
}

/// Receiving half, drained by [`CarouselController::pump`](crate::CarouselController::pump).
#[derive(Debug)]
pub struct GestureFeed {
    rx: Receiver<TouchEvent>,
}

impl GestureFeed {
    /// Events queued so far, without blocking.
    pub fn drain(&self) -> TryIter<'_, TouchEvent> {
        self.rx.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Creates a connected sender/feed pair.
pub fn gesture_feed() -> (GestureSender, GestureFeed) {
    let (tx, rx) = unbounded();
    (GestureSender { tx }, GestureFeed { rx })
}
