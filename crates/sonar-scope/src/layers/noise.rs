//! Background speckle driven by self-noise level.

use super::CellPaint;
use crate::chars::NOISE_CHARS;

/// Speckle probability per cell at full self-noise.
const MAX_DENSITY: f32 = 0.05;

/// Milliseconds each speckle pattern is held.
pub const NOISE_FRAME_MS: u64 = 120;

/// Paint speckle for a cell; `level` is the self-noise level in [0, 1].
pub fn paint(x: u16, y: u16, level: f32, elapsed_ms: u64, seed: u64) -> Option<CellPaint> {
    let level = level.clamp(0.0, 1.0);
    if level <= 0.0 {
        return None;
    }
    let frame = elapsed_ms / NOISE_FRAME_MS;
    let h = hash(x, y, frame ^ seed);
    let roll = (h % 10_000) as f32 / 10_000.0;
    if roll < level * MAX_DENSITY {
        let ch = NOISE_CHARS[(h >> 16) as usize % NOISE_CHARS.len()];
        Some(CellPaint::new(ch, 0.08 + 0.12 * level))
    } else {
        None
    }
}

/// Cheap integer hash of a cell and frame.
fn hash(x: u16, y: u16, frame: u64) -> u64 {
    let mut h = (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ frame.wrapping_mul(0x1656_67B1_9E37_79F9);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}
