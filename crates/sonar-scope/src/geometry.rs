//! Mapping between terminal cells and scope polar coordinates.
//!
//! Terminal cells are roughly twice as tall as they are wide, so the scope
//! uses two columns per row of radius to stay circular.

use ratatui::layout::Rect;

/// Columns per row needed to draw a circle.
pub const CELL_ASPECT: f32 = 2.0;

/// Scope placement inside a render area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeGeometry {
    /// Center in cell coordinates (fractional).
    pub center_x: f32,
    pub center_y: f32,
    /// Radius measured in rows.
    pub radius: f32,
}

impl ScopeGeometry {
    /// Fit the largest circular scope into `area`, leaving one row/column
    /// margin for bearing labels.
    pub fn fit(area: Rect) -> Self {
        let by_height = (area.height as f32 - 2.0) / 2.0;
        let by_width = (area.width as f32 - 4.0) / (2.0 * CELL_ASPECT);
        Self {
            center_x: area.x as f32 + area.width as f32 / 2.0,
            center_y: area.y as f32 + area.height as f32 / 2.0,
            radius: by_height.min(by_width).max(0.0),
        }
    }

    /// Radius measured in columns.
    pub fn radius_cols(&self) -> f32 {
        self.radius * CELL_ASPECT
    }

    /// True when the scope is too small to draw anything useful.
    pub fn is_degenerate(&self) -> bool {
        self.radius < 2.0
    }

    /// Polar position `(distance, bearing_deg)` of the center of cell `(x, y)`.
    ///
    /// Distance is a fraction of the scope radius; bearing 0 points up and
    /// grows clockwise.
    pub fn cell_to_polar(&self, x: u16, y: u16) -> (f32, f32) {
        if self.radius <= 0.0 {
            return (f32::INFINITY, 0.0);
        }
        let dx = (x as f32 + 0.5 - self.center_x) / self.radius_cols();
        let dy = (self.center_y - (y as f32 + 0.5)) / self.radius;
        let distance = (dx * dx + dy * dy).sqrt();
        let bearing = dx.atan2(dy).to_degrees().rem_euclid(360.0);
        (distance, if bearing >= 360.0 { 0.0 } else { bearing })
    }

    /// Cell containing the polar position `(distance, bearing_deg)`.
    pub fn polar_to_cell(&self, distance: f32, bearing_deg: f32) -> (u16, u16) {
        let theta = bearing_deg.to_radians();
        self.position_to_cell((distance * theta.sin(), distance * theta.cos()))
    }

    /// Cell containing a position relative to the center, in radii, with y
    /// growing upwards.
    pub fn position_to_cell(&self, (px, py): (f32, f32)) -> (u16, u16) {
        let x = self.center_x + px * self.radius_cols();
        let y = self.center_y - py * self.radius;
        (x.floor().max(0.0) as u16, y.floor().max(0.0) as u16)
    }

    /// Size of one cell as a fraction of the radius, along the radius.
    pub fn cell_span(&self) -> f32 {
        if self.radius <= 0.0 {
            1.0
        } else {
            1.0 / self.radius
        }
    }
}
