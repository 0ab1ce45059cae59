use std::time::{Duration, Instant};

/// Easing applied while a released channel settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettleCurve {
    Linear,
    Smoothstep,
    /// Quadratic ease-in-out.
    #[default]
    EaseInOut,
}

impl SettleCurve {
    pub fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            SettleCurve::Linear => clamped,
            SettleCurve::Smoothstep => clamped * clamped * (3.0 - 2.0 * clamped),
            SettleCurve::EaseInOut => {
                if clamped < 0.5 {
                    2.0 * clamped * clamped
                } else {
                    -1.0 + (4.0 - 2.0 * clamped) * clamped
                }
            }
        }
    }
}

/// Timed interpolation of a progress value towards its snap point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SettleEnvelope {
    origin: f32,
    destination: f32,
    start: Instant,
    duration: Duration,
    curve: SettleCurve,
}

impl SettleEnvelope {
    /// Returns `None` for a zero duration; the caller settles immediately.
    pub fn new(
        origin: f32,
        destination: f32,
        duration: Duration,
        curve: SettleCurve,
        now: Instant,
    ) -> Option<Self> {
        if duration.is_zero() {
            None
        } else {
            Some(Self {
                origin,
                destination,
                start: now,
                duration,
                curve,
            })
        }
    }

    pub fn destination(&self) -> f32 {
        self.destination
    }

    /// Current value and whether the envelope has run its full duration.
    pub fn value(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
        let finished = t >= 1.0;
        if finished {
            return (self.destination, true);
        }
        let eased = self.curve.sample(t);
        (self.origin + (self.destination - self.origin) * eased, false)
    }
}
