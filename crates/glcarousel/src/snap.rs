/// Candidate settle destinations for a progress channel.
pub const SNAP_POINTS: [f32; 2] = [0.0, 1.0];

/// Default deceleration constant `k`: how far one unit of velocity carries
/// the projected position.
pub const DEFAULT_DECELERATION: f32 = 0.2;

/// Picks where a released channel settles.
///
/// The pure function of `(position, velocity)`: project the position by
/// `velocity * deceleration`, then choose the nearest snap point. Ties go to
/// the first candidate, so an exactly-centred release without momentum
/// rebounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResolver {
    deceleration: f32,
}

impl SnapResolver {
    pub fn new(deceleration: f32) -> Self {
        Self { deceleration }
    }

    pub fn deceleration(&self) -> f32 {
        self.deceleration
    }

    /// `velocity` is in progress units per second (viewport widths per second).
    pub fn resolve(&self, position: f32, velocity: f32) -> f32 {
        snap_point(position, velocity, &SNAP_POINTS, self.deceleration)
    }
}

impl Default for SnapResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DECELERATION)
    }
}

/// Nearest of `points` to `value + velocity * deceleration`.
///
/// Non-finite projections (NaN velocity) resolve using the raw position.
pub fn snap_point(value: f32, velocity: f32, points: &[f32], deceleration: f32) -> f32 {
    let mut projected = value + velocity * deceleration;
    if !projected.is_finite() {
        projected = value;
    }
    let mut best = match points.first() {
        Some(first) => *first,
        None => return value,
    };
    let mut best_delta = (projected - best).abs();
    for point in &points[1..] {
        let delta = (projected - point).abs();
        if delta < best_delta {
            best = *point;
            best_delta = delta;
        }
    }
    best
}
