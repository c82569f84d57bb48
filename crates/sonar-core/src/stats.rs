//! Drifting HUD readings.
//!
//! None of these are computed from anything: each reading walks in a trend
//! direction with added noise and bounces off its clamp range.

use rand::Rng;

/// A bounded reading that drifts once per ping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftingStat {
    value: f32,
    min: f32,
    max: f32,
    /// Signed step applied every drift.
    trend: f32,
    /// Amplitude of uniform noise added every drift.
    noise: f32,
}

impl DriftingStat {
    pub const fn new(value: f32, min: f32, max: f32, trend: f32, noise: f32) -> Self {
        Self {
            value,
            min,
            max,
            trend,
            noise,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Apply one trend step plus noise, clamping to range.
    ///
    /// Hitting either bound reverses the trend.
    pub fn drift<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let jitter = if self.noise > 0.0 {
            rng.gen_range(-self.noise..=self.noise)
        } else {
            0.0
        };
        let next = self.value + self.trend + jitter;

        if next >= self.max {
            self.value = self.max;
            self.trend = -self.trend.abs();
        } else if next <= self.min {
            self.value = self.min;
            self.trend = self.trend.abs();
        } else {
            self.value = next;
        }
    }
}

/// Every reading mutated by a ping event.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayStats {
    /// Own-ship depth in metres.
    pub depth: DriftingStat,
    /// Return signal strength in percent.
    pub signal: DriftingStat,
    /// Deviation from the nominal ping frequency in Hz.
    pub freq_variance: DriftingStat,
    /// Water temperature in degrees Celsius.
    pub temperature: DriftingStat,
    pub ping_count: u64,
}

impl Default for DisplayStats {
    fn default() -> Self {
        Self {
            depth: DriftingStat::new(150.0, 60.0, 400.0, 0.8, 2.5),
            signal: DriftingStat::new(87.0, 0.0, 100.0, 0.3, 4.0),
            freq_variance: DriftingStat::new(0.0, -15.0, 15.0, 0.1, 1.5),
            temperature: DriftingStat::new(4.2, 1.0, 12.0, 0.02, 0.08),
            ping_count: 0,
        }
    }
}

impl DisplayStats {
    /// Apply one ping's worth of drift to every reading.
    pub fn on_ping<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.depth.drift(rng);
        self.signal.drift(rng);
        self.freq_variance.drift(rng);
        self.temperature.drift(rng);
        self.ping_count += 1;
    }
}
