//! Contact markers.

use super::CellPaint;
use crate::chars::BLIP_CHARS;
use crate::geometry::ScopeGeometry;
use sonar_core::{Blip, Sweep};

/// Degrees after the beam passes during which a contact glows brighter.
pub const AFTERGLOW_DEGREES: f32 = 90.0;

/// A contact resolved to a cell for this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlip {
    pub x: u16,
    pub y: u16,
    pub paint: CellPaint,
}

/// Resolve every contact to a cell and paint.
pub fn place(geometry: &ScopeGeometry, sweep: &Sweep, blips: &[Blip]) -> Vec<PlacedBlip> {
    blips
        .iter()
        .filter(|b| b.alpha > 0.0)
        .map(|blip| {
            let (x, y) = geometry.position_to_cell(blip.position());
            PlacedBlip {
                x,
                y,
                paint: paint_blip(sweep, blip),
            }
        })
        .collect()
}

fn paint_blip(sweep: &Sweep, blip: &Blip) -> CellPaint {
    let since = sweep.degrees_since(blip.angle_deg);
    let afterglow = (1.0 - since / AFTERGLOW_DEGREES).max(0.0);
    let intensity = blip.alpha * (0.6 + 0.6 * afterglow);

    let idx = ((1.0 - blip.alpha) * BLIP_CHARS.len() as f32) as usize;
    CellPaint::new(BLIP_CHARS[idx.min(BLIP_CHARS.len() - 1)], intensity)
}

/// Brightest placed contact at `(x, y)`.
pub fn at(placed: &[PlacedBlip], x: u16, y: u16) -> Option<CellPaint> {
    placed
        .iter()
        .filter(|p| p.x == x && p.y == y)
        .map(|p| p.paint)
        .reduce(|a, b| a.brighter(Some(b)))
}
