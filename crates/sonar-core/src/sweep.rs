//! Rotating sweep line.

/// Sweep beam position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sweep {
    /// Current angle in degrees, always in [0, 360).
    angle_deg: f32,
    /// Completed revolutions since start.
    revolutions: u64,
}

impl Sweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn revolutions(&self) -> u64 {
        self.revolutions
    }

    /// Advance the sweep by `dt` seconds at `deg_per_sec`.
    ///
    /// Negative rates or deltas are ignored so the angle never runs backwards.
    pub fn advance(&mut self, dt: f32, deg_per_sec: f32) {
        let delta = (dt * deg_per_sec).max(0.0);
        if !delta.is_finite() {
            return;
        }

        let raw = self.angle_deg + delta;
        let mut wraps = (raw / 360.0).floor() as u64;
        let mut angle = raw - wraps as f32 * 360.0;
        // f32 rounding can land exactly on 360.0
        if angle >= 360.0 {
            angle = 0.0;
            wraps += 1;
        }
        self.angle_deg = angle.max(0.0);
        self.revolutions += wraps;
    }

    /// Degrees the beam has travelled past `bearing`, in [0, 360).
    ///
    /// Zero means the beam is on the bearing right now; small values mean it
    /// has just swept over it.
    pub fn degrees_since(&self, bearing_deg: f32) -> f32 {
        let since = (self.angle_deg - bearing_deg).rem_euclid(360.0);
        if since >= 360.0 { 0.0 } else { since }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let mut sweep = Sweep::new();
        sweep.advance(3.0, 100.0);
        assert!((sweep.angle_deg() - 300.0).abs() < 1e-3);
        sweep.advance(1.0, 100.0);
        assert!((sweep.angle_deg() - 40.0).abs() < 1e-3);
        assert_eq!(sweep.revolutions(), 1);
    }

    #[test]
    fn test_angle_stays_in_range() {
        let mut sweep = Sweep::new();
        for i in 0..10_000 {
            sweep.advance(0.016 + (i % 7) as f32 * 0.003, 180.0);
            let a = sweep.angle_deg();
            assert!((0.0..360.0).contains(&a), "angle {a} out of range");
        }
    }

    #[test]
    fn test_monotonic_modulo_wrap() {
        let mut sweep = Sweep::new();
        let mut prev = sweep.angle_deg();
        let mut prev_revs = sweep.revolutions();
        for _ in 0..2_000 {
            sweep.advance(0.033, 90.0);
            let a = sweep.angle_deg();
            if sweep.revolutions() == prev_revs {
                assert!(a >= prev);
            } else {
                assert!(sweep.revolutions() > prev_revs);
            }
            prev = a;
            prev_revs = sweep.revolutions();
        }
    }

    #[test]
    fn test_large_step_counts_all_revolutions() {
        let mut sweep = Sweep::new();
        sweep.advance(8.0, 90.0);
        assert_eq!(sweep.revolutions(), 2);
        assert!(sweep.angle_deg().abs() < 1e-3);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut sweep = Sweep::new();
        sweep.advance(1.0, 90.0);
        sweep.advance(-1.0, 90.0);
        assert!((sweep.angle_deg() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_degrees_since() {
        let mut sweep = Sweep::new();
        sweep.advance(0.5, 20.0);
        assert!((sweep.degrees_since(350.0) - 20.0).abs() < 1e-3);
        assert!((sweep.degrees_since(10.0)).abs() < 1e-3);
    }
}
