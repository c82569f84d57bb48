//! Per-cell scope layers, composited by [`crate::ScopeState`].

pub mod blips;
pub mod grid;
pub mod noise;
pub mod ping;
pub mod sweep;

/// What a layer wants drawn in one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPaint {
    pub ch: char,
    /// Brightness in [0, 1]; above 1 is overdriven.
    pub intensity: f32,
}

impl CellPaint {
    pub const fn new(ch: char, intensity: f32) -> Self {
        Self { ch, intensity }
    }

    /// Keep the brighter of two paints, preferring `self` on ties.
    pub fn brighter(self, other: Option<CellPaint>) -> CellPaint {
        match other {
            Some(other) if other.intensity > self.intensity => other,
            _ => self,
        }
    }
}

/// Fold layer results into the brightest paint.
pub fn composite<I>(layers: I) -> Option<CellPaint>
where
    I: IntoIterator<Item = Option<CellPaint>>,
{
    layers
        .into_iter()
        .fold(None, |acc: Option<CellPaint>, paint| match (acc, paint) {
            (Some(acc), paint) => Some(acc.brighter(paint)),
            (None, paint) => paint,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_takes_brightest_first_on_tie() {
        let a = Some(CellPaint::new('a', 0.5));
        let b = Some(CellPaint::new('b', 0.9));
        let c = Some(CellPaint::new('c', 0.9));
        assert_eq!(composite([a, None, b, c]), b);
        assert_eq!(composite([None, None]), None);
    }
}
