//! Rate-limited smoothing of pitch and yaw intents.

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
///
/// A negative `max_delta` is treated as zero.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = max_delta.max(0.0);
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Moves `current` toward `target` at no more than `max_rate` units per second
/// over `dt` seconds.
pub fn advance(current: f32, target: f32, max_rate: f32, dt: f32) -> f32 {
    move_towards(current, target, max_rate * dt)
}

/// A smoothed control axis.
///
/// Holds the smoothed intent of one axis between steps. The intent is kept in
/// `[-1, 1]` since targets are clamped to that range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedAxis {
    value: f32,
    max_rate: f32,
}

impl SmoothedAxis {
    /// An axis at rest changing by at most `max_rate` per second.
    pub fn new(max_rate: f32) -> Self {
        Self {
            value: 0.0,
            max_rate,
        }
    }

    /// Current smoothed intent.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advances toward `target` over `dt` seconds and returns the new intent.
    pub fn advance(&mut self, target: f32, dt: f32) -> f32 {
        self.value = advance(self.value, target.clamp(-1.0, 1.0), self.max_rate, dt);
        self.value
    }

    /// Discards the smoothing state.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
