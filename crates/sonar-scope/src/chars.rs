//! Glyphs used on the scope.

/// Sweep trail glyphs from faintest to brightest.
pub const TRAIL_CHARS: &[char] = &['·', '░', '▒', '▓'];

/// Glyph for the sweep line itself.
pub const SWEEP_CHAR: char = '█';

/// Range ring glyph.
pub const RING_CHAR: char = '·';

/// Cross-hair glyphs.
pub const HAIR_VERTICAL: char = '│';
pub const HAIR_HORIZONTAL: char = '─';
pub const HAIR_CENTER: char = '┼';

/// Contact glyphs from freshest to nearly faded.
pub const BLIP_CHARS: &[char] = &['◉', '●', '•', '∙'];

/// Ping ring glyph.
pub const PING_CHAR: char = '○';

/// Background noise speckle.
pub const NOISE_CHARS: &[char] = &['.', '·', '˙', ','];

/// Pick a glyph from `chars` by intensity in [0, 1].
pub fn by_intensity(chars: &[char], intensity: f32) -> char {
    let last = chars.len().saturating_sub(1);
    let idx = (intensity.clamp(0.0, 1.0) * last as f32).round() as usize;
    chars[idx.min(last)]
}
