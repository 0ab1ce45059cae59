//! One direction's drag → settle → commit lifecycle.
//!
//! A channel never touches the carousel offset itself. Settling reports a
//! [`SettleOutcome`] and the owning controller applies it, so the offset change
//! and the progress reset can be published to readers together.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::snap::{SnapResolver, DEFAULT_DECELERATION};
use crate::timeline::{SettleCurve, SettleEnvelope};
use crate::types::SwipeDirection;

/// Default settle animation length.
pub const DEFAULT_SETTLE_DURATION: Duration = Duration::from_millis(100);

/// Horizontal travel, in pixels, before a channel claims a touch sequence.
pub const DEFAULT_ACTIVATION_THRESHOLD: f32 = 5.0;

/// Knobs shared by both channels of a carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    pub settle_duration: Duration,
    pub activation_threshold: f32,
    pub snap_deceleration: f32,
    pub settle_curve: SettleCurve,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            settle_duration: DEFAULT_SETTLE_DURATION,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            snap_deceleration: DEFAULT_DECELERATION,
            settle_curve: SettleCurve::default(),
        }
    }
}

/// Observable lifecycle stage.
///
/// Release is instantaneous: `end` moves straight from `Dragging` to
/// `Settling` (or back to `Idle` when the settle duration is zero).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelPhase {
    Idle,
    Dragging,
    Settling { destination: f32 },
}

/// Result of a completed settle animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Settled at 1: the owning controller must shift the offset.
    Commit,
    /// Settled at 0: nothing changes besides the progress reset.
    Rebound,
}

#[derive(Debug, Clone)]
pub struct GestureChannel {
    direction: SwipeDirection,
    viewport_width: f32,
    progress: f32,
    phase: ChannelPhase,
    envelope: Option<SettleEnvelope>,
    resolver: SnapResolver,
    tuning: GestureTuning,
}

impl GestureChannel {
    pub fn new(direction: SwipeDirection, viewport_width: f32, tuning: GestureTuning) -> Self {
        Self {
            direction,
            viewport_width: viewport_width.max(1.0),
            progress: 0.0,
            phase: ChannelPhase::Idle,
            envelope: None,
            resolver: SnapResolver::new(tuning.snap_deceleration),
            tuning,
        }
    }

    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ChannelPhase::Idle)
    }

    /// Whether an accumulated translation has moved far enough in this
    /// channel's direction to claim the touch sequence.
    pub fn activates(&self, translation_x: f32) -> bool {
        let travelled = translation_x * self.direction.sign();
        travelled > 0.0 && travelled >= self.tuning.activation_threshold
    }

    /// Starts a drag. Any in-flight settle is abandoned along with its
    /// pending outcome.
    pub fn begin(&mut self) {
        if let Some(envelope) = self.envelope.take() {
            debug!(
                direction = %self.direction,
                destination = envelope.destination(),
                "drag interrupted settle animation"
            );
        }
        self.progress = 0.0;
        self.phase = ChannelPhase::Dragging;
    }

    /// Applies a horizontal drag delta in pixels. Ignored outside a drag.
    pub fn change(&mut self, delta_x: f32) {
        if !matches!(self.phase, ChannelPhase::Dragging) {
            warn!(direction = %self.direction, "drag change without an active drag; ignoring");
            return;
        }
        if !delta_x.is_finite() {
            return;
        }
        let step = delta_x * self.direction.sign() / self.viewport_width;
        self.progress = (self.progress + step).clamp(0.0, 1.0);
        trace!(direction = %self.direction, progress = self.progress, "drag");
    }

    /// Releases the drag with a horizontal velocity in pixels per second.
    ///
    /// Returns an outcome straight away only when the settle duration is
    /// zero; otherwise the outcome is reported by a later [`tick`](Self::tick).
    pub fn end(&mut self, velocity_x: f32, now: Instant) -> Option<SettleOutcome> {
        if !matches!(self.phase, ChannelPhase::Dragging) {
            warn!(direction = %self.direction, "drag end without an active drag; ignoring");
            return None;
        }
        let velocity = velocity_x * self.direction.sign() / self.viewport_width;
        let destination = self.resolver.resolve(self.progress, velocity);
        debug!(
            direction = %self.direction,
            progress = self.progress,
            velocity,
            destination,
            "drag released"
        );
        match SettleEnvelope::new(
            self.progress,
            destination,
            self.tuning.settle_duration,
            self.tuning.settle_curve,
            now,
        ) {
            Some(envelope) => {
                self.envelope = Some(envelope);
                self.phase = ChannelPhase::Settling { destination };
                None
            }
            None => Some(self.finish(destination)),
        }
    }

    /// Advances the settle animation. Reports the outcome exactly once, on
    /// the tick where the animation completes.
    pub fn tick(&mut self, now: Instant) -> Option<SettleOutcome> {
        let envelope = self.envelope?;
        let (value, finished) = envelope.value(now);
        if finished {
            self.envelope = None;
            return Some(self.finish(envelope.destination()));
        }
        self.progress = value;
        None
    }

    /// Drops back to idle with zero progress without reporting anything.
    pub fn reset(&mut self) {
        self.envelope = None;
        self.progress = 0.0;
        self.phase = ChannelPhase::Idle;
    }

    fn finish(&mut self, destination: f32) -> SettleOutcome {
        self.reset();
        if destination >= 1.0 {
            SettleOutcome::Commit
        } else {
            SettleOutcome::Rebound
        }
    }
}
