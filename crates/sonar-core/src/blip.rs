//! Transient contact markers.

use rand::Rng;

/// Distance band (fraction of scope radius) new contacts spawn in.
pub const SPAWN_DISTANCE: (f32, f32) = (0.15, 0.95);

/// Lifetime band in seconds for new contacts.
pub const SPAWN_LIFETIME: (f32, f32) = (4.0, 9.0);

/// A contact marker that fades out over its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Blip {
    /// Sequence id, unique for the session.
    pub id: u64,
    /// Spawn angle in degrees, [0, 360).
    pub angle_deg: f32,
    /// Distance from center as a fraction of the scope radius.
    pub distance: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until fully faded.
    pub lifetime: f32,
    /// Fade level, 1.0 at spawn and 0.0 when expired.
    pub alpha: f32,
    /// Range shown on the HUD, in metres.
    pub range_m: f32,
}

impl Blip {
    pub fn new(id: u64, angle_deg: f32, distance: f32, lifetime: f32, max_range_m: f32) -> Self {
        let distance = distance.clamp(0.0, 1.0);
        Self {
            id,
            angle_deg: angle_deg.rem_euclid(360.0),
            distance,
            age: 0.0,
            lifetime: lifetime.max(f32::EPSILON),
            alpha: 1.0,
            range_m: distance * max_range_m,
        }
    }

    /// Spawn a contact at a uniformly random position and lifetime.
    pub fn random<R: Rng + ?Sized>(id: u64, rng: &mut R, max_range_m: f32) -> Self {
        let angle = rng.gen_range(0.0..360.0);
        let distance = rng.gen_range(SPAWN_DISTANCE.0..SPAWN_DISTANCE.1);
        let lifetime = rng.gen_range(SPAWN_LIFETIME.0..SPAWN_LIFETIME.1);
        Self::new(id, angle, distance, lifetime, max_range_m)
    }

    /// Advance age by `dt` seconds and recompute the fade.
    pub fn age_by(&mut self, dt: f32) {
        self.age += dt.max(0.0);
        self.alpha = (1.0 - self.age / self.lifetime).clamp(0.0, 1.0);
    }

    /// True once the blip has faded out completely.
    pub fn is_expired(&self) -> bool {
        self.alpha <= 0.0
    }

    /// Whole-degree bearing for display.
    pub fn bearing(&self) -> u16 {
        (self.angle_deg.round() as u16) % 360
    }

    /// Position relative to scope center with bearing 0 pointing up.
    ///
    /// Returns `(x, y)` in [-1, 1] with y growing upwards.
    pub fn position(&self) -> (f32, f32) {
        let theta = self.angle_deg.to_radians();
        (self.distance * theta.sin(), self.distance * theta.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_alpha_non_increasing() {
        let mut blip = Blip::new(1, 45.0, 0.5, 5.0, 4000.0);
        let mut prev = blip.alpha;
        for _ in 0..400 {
            blip.age_by(0.016);
            assert!(blip.alpha <= prev);
            prev = blip.alpha;
        }
        assert!(blip.is_expired());
    }

    #[test]
    fn test_expires_exactly_at_zero_alpha() {
        let mut blip = Blip::new(1, 0.0, 0.5, 2.0, 4000.0);
        blip.age_by(1.5);
        assert!((blip.alpha - 0.25).abs() < 1e-6);
        assert!(!blip.is_expired());
        blip.age_by(0.5);
        assert_eq!(blip.alpha, 0.0);
        assert!(blip.is_expired());
    }

    #[test]
    fn test_position_orientation() {
        let north = Blip::new(1, 0.0, 1.0, 5.0, 1000.0);
        let (x, y) = north.position();
        assert!(x.abs() < 1e-5 && (y - 1.0).abs() < 1e-5);

        let east = Blip::new(2, 90.0, 0.5, 5.0, 1000.0);
        let (x, y) = east.position();
        assert!((x - 0.5).abs() < 1e-5 && y.abs() < 1e-5);
    }

    #[test]
    fn test_bearing_and_range() {
        let blip = Blip::new(7, 359.7, 0.25, 5.0, 4000.0);
        assert_eq!(blip.bearing(), 0);
        assert!((blip.range_m - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_random_within_bands() {
        let mut rng = StdRng::seed_from_u64(42);
        for id in 0..500 {
            let blip = Blip::random(id, &mut rng, 4000.0);
            assert!((0.0..360.0).contains(&blip.angle_deg));
            assert!(blip.distance >= SPAWN_DISTANCE.0 && blip.distance < SPAWN_DISTANCE.1);
            assert!(blip.lifetime >= SPAWN_LIFETIME.0 && blip.lifetime < SPAWN_LIFETIME.1);
            assert_eq!(blip.alpha, 1.0);
        }
    }
}
