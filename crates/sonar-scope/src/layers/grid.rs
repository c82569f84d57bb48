//! Range rings and cross-hair.

use super::CellPaint;
use crate::chars::{HAIR_CENTER, HAIR_HORIZONTAL, HAIR_VERTICAL, RING_CHAR};
use crate::geometry::ScopeGeometry;

/// Ring radii as fractions of the scope radius.
pub const RINGS: [f32; 4] = [0.25, 0.5, 0.75, 1.0];

const RING_INTENSITY: f32 = 0.22;
const RIM_INTENSITY: f32 = 0.4;
const HAIR_INTENSITY: f32 = 0.16;

/// Paint rings and cross-hair for the cell at `(x, y)` with polar `distance`.
pub fn paint(geometry: &ScopeGeometry, x: u16, y: u16, distance: f32) -> Option<CellPaint> {
    let tolerance = geometry.cell_span() * 0.5;

    for ring in RINGS {
        if (distance - ring).abs() <= tolerance {
            let intensity = if ring >= 1.0 {
                RIM_INTENSITY
            } else {
                RING_INTENSITY
            };
            return Some(CellPaint::new(RING_CHAR, intensity));
        }
    }

    if distance > 1.0 {
        return None;
    }

    let on_vertical = x == geometry.center_x.floor() as u16;
    let on_horizontal = y == geometry.center_y.floor() as u16;
    match (on_vertical, on_horizontal) {
        (true, true) => Some(CellPaint::new(HAIR_CENTER, HAIR_INTENSITY)),
        (true, false) => Some(CellPaint::new(HAIR_VERTICAL, HAIR_INTENSITY)),
        (false, true) => Some(CellPaint::new(HAIR_HORIZONTAL, HAIR_INTENSITY)),
        (false, false) => None,
    }
}
