//! Fixed interval timers driven by frame deltas.

/// Fires every `interval` seconds of accumulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    interval: f32,
    accumulated: f32,
}

impl IntervalTimer {
    /// Create a timer. Intervals below one millisecond are raised to one.
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval: interval_secs.max(0.001),
            accumulated: 0.0,
        }
    }

    /// Create a timer that fires on the very first tick.
    pub fn primed(interval_secs: f32) -> Self {
        let mut timer = Self::new(interval_secs);
        timer.accumulated = timer.interval;
        timer
    }

    /// Accumulate `dt` seconds and report whether the timer fired.
    ///
    /// At most one firing is reported per tick; surplus time beyond one
    /// interval is dropped so a stalled frame does not produce a burst.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.accumulated += dt.max(0.0);
        if self.accumulated >= self.interval {
            self.accumulated = (self.accumulated - self.interval).min(self.interval);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
