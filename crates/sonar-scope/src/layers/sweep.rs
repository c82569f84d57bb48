//! Sweep line and its fading trail.

use super::CellPaint;
use crate::chars::{SWEEP_CHAR, TRAIL_CHARS, by_intensity};
use crate::geometry::ScopeGeometry;
use sonar_core::Sweep;

/// Degrees of fading trail behind the beam.
pub const TRAIL_DEGREES: f32 = 40.0;

const TRAIL_PEAK: f32 = 0.7;

/// Paint the beam for a cell at polar `(distance, bearing)`.
pub fn paint(
    geometry: &ScopeGeometry,
    sweep: &Sweep,
    distance: f32,
    bearing: f32,
) -> Option<CellPaint> {
    if distance > 1.0 {
        return None;
    }

    let since = sweep.degrees_since(bearing);
    let ahead = 360.0 - since;
    let tolerance = line_tolerance(geometry, distance);

    if since <= tolerance || ahead <= tolerance {
        return Some(CellPaint::new(SWEEP_CHAR, 1.0));
    }

    if since < TRAIL_DEGREES {
        let intensity = TRAIL_PEAK * (1.0 - since / TRAIL_DEGREES);
        return Some(CellPaint::new(
            by_intensity(TRAIL_CHARS, intensity / TRAIL_PEAK),
            intensity,
        ));
    }

    None
}

/// Half-width of the beam in degrees at `distance`: about half a column.
fn line_tolerance(geometry: &ScopeGeometry, distance: f32) -> f32 {
    let half_col = 0.5 / geometry.radius_cols().max(1.0);
    (half_col / distance.max(1e-3)).to_degrees().clamp(0.8, 45.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn geometry() -> ScopeGeometry {
        ScopeGeometry::fit(Rect::new(0, 0, 90, 42))
    }

    #[test]
    fn test_beam_on_sweep_angle() {
        let mut sweep = Sweep::new();
        sweep.advance(1.0, 90.0);
        let paint = paint(&geometry(), &sweep, 0.5, 90.0).unwrap();
        assert_eq!(paint.ch, SWEEP_CHAR);
    }

    #[test]
    fn test_trail_fades_behind_beam() {
        let mut sweep = Sweep::new();
        sweep.advance(1.0, 90.0);
        let g = geometry();
        let near = paint(&g, &sweep, 0.8, 80.0).unwrap();
        let far = paint(&g, &sweep, 0.8, 60.0).unwrap();
        assert!(near.intensity > far.intensity);
        // nothing ahead of the beam
        assert_eq!(paint(&g, &sweep, 0.8, 120.0), None);
        assert_eq!(paint(&g, &sweep, 1.2, 90.0), None);
    }
}
