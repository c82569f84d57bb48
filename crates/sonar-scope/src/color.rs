//! Phosphor shading helpers.

use ratatui::style::Color;
use sonar_core::ColorTheme;

/// Lightness of a cell at zero intensity.
const BASE_LIGHTNESS: f32 = 0.06;

/// Lightness added at full intensity.
const LIGHTNESS_RANGE: f32 = 0.58;

/// Shade the theme hue by `intensity` (0.0-1.0, values above 1.0 glow white).
pub fn phosphor(theme: ColorTheme, intensity: f32) -> Color {
    let intensity = intensity.max(0.0);
    let lightness = if intensity > 1.0 {
        // overdriven returns bleed towards white
        (BASE_LIGHTNESS + LIGHTNESS_RANGE + (intensity - 1.0) * 0.3).min(0.92)
    } else {
        BASE_LIGHTNESS + intensity * LIGHTNESS_RANGE
    };
    hsl_to_rgb(theme.hue(), theme.saturation(), lightness)
}

/// Convert HSL to RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Color {
    let l = l.clamp(0.0, 1.0);
    if s <= 0.0 {
        let v = (l * 255.0) as u8;
        return Color::Rgb(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
