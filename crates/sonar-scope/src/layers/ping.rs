//! Expanding ring drawn after each ping.

use super::CellPaint;
use crate::chars::PING_CHAR;
use crate::geometry::ScopeGeometry;

const PING_PEAK: f32 = 0.85;

/// Paint the ping ring at `progress` (0 at the center, 1 at the rim).
pub fn paint(geometry: &ScopeGeometry, progress: f32, distance: f32) -> Option<CellPaint> {
    if distance > 1.0 || progress <= 0.0 {
        return None;
    }
    if (distance - progress).abs() <= geometry.cell_span() * 0.5 {
        Some(CellPaint::new(PING_CHAR, PING_PEAK * (1.0 - progress)))
    } else {
        None
    }
}
