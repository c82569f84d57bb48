//! Display themes and sweep speeds.

use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// All themes in cycle order.
const THEMES: [ColorTheme; 6] = [
    ColorTheme::Green,
    ColorTheme::Amber,
    ColorTheme::Cyan,
    ColorTheme::Blue,
    ColorTheme::Red,
    ColorTheme::White,
];

/// Phosphor color theme for the scope and HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTheme {
    #[default]
    Green,
    Amber,
    Cyan,
    Blue,
    Red,
    White,
}

impl ColorTheme {
    /// Cycle to the next color theme.
    pub fn next(self) -> Self {
        match self {
            ColorTheme::Green => ColorTheme::Amber,
            ColorTheme::Amber => ColorTheme::Cyan,
            ColorTheme::Cyan => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::White,
            ColorTheme::White => ColorTheme::Green,
        }
    }

    /// Base hue in degrees used when shading the scope.
    pub fn hue(self) -> f32 {
        match self {
            ColorTheme::Green => 120.0,
            ColorTheme::Amber => 38.0,
            ColorTheme::Cyan => 180.0,
            ColorTheme::Blue => 215.0,
            ColorTheme::Red => 0.0,
            ColorTheme::White => 0.0,
        }
    }

    /// Saturation for the theme. White phosphor is unsaturated.
    pub fn saturation(self) -> f32 {
        match self {
            ColorTheme::White => 0.0,
            _ => 0.9,
        }
    }

    /// Flat accent color for HUD text.
    pub fn color(self) -> Color {
        match self {
            ColorTheme::Green => Color::Green,
            ColorTheme::Amber => Color::Yellow,
            ColorTheme::Cyan => Color::Cyan,
            ColorTheme::Blue => Color::Blue,
            ColorTheme::Red => Color::Red,
            ColorTheme::White => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Green => "green",
            ColorTheme::Amber => "amber",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Blue => "blue",
            ColorTheme::Red => "red",
            ColorTheme::White => "white",
        }
    }
}

impl FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        THEMES
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = THEMES.iter().map(|t| t.name()).collect();
                format!("unknown theme '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Rotation rate of the sweep line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl SweepSpeed {
    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            SweepSpeed::Slow => SweepSpeed::Medium,
            SweepSpeed::Medium => SweepSpeed::Fast,
            SweepSpeed::Fast => SweepSpeed::Slow,
        }
    }

    /// Degrees of rotation per second.
    pub fn degrees_per_sec(self) -> f32 {
        match self {
            SweepSpeed::Slow => 45.0,
            SweepSpeed::Medium => 90.0,
            SweepSpeed::Fast => 180.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SweepSpeed::Slow => "slow",
            SweepSpeed::Medium => "medium",
            SweepSpeed::Fast => "fast",
        }
    }
}

impl FromStr for SweepSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(SweepSpeed::Slow),
            "medium" => Ok(SweepSpeed::Medium),
            "fast" => Ok(SweepSpeed::Fast),
            _ => Err(format!("unknown sweep speed '{s}', expected slow, medium or fast")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle_returns_to_start() {
        let mut theme = ColorTheme::default();
        for _ in 0..6 {
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Green);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Amber".parse::<ColorTheme>(), Ok(ColorTheme::Amber));
        assert_eq!("fast".parse::<SweepSpeed>(), Ok(SweepSpeed::Fast));
        assert!("purple".parse::<ColorTheme>().is_err());
        for theme in THEMES {
            assert_eq!(theme.name().parse::<ColorTheme>(), Ok(theme));
        }
    }

    #[test]
    fn test_speed_ordering() {
        assert!(SweepSpeed::Slow.degrees_per_sec() < SweepSpeed::Medium.degrees_per_sec());
        assert!(SweepSpeed::Medium.degrees_per_sec() < SweepSpeed::Fast.degrees_per_sec());
        assert_eq!(SweepSpeed::Fast.next(), SweepSpeed::Slow);
    }
}
