//! Scope rendering state.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use sonar_core::{ColorTheme, Controller};

use crate::color::phosphor;
use crate::geometry::ScopeGeometry;
use crate::layers::{self, CellPaint, blips::PlacedBlip};

/// Per-frame inputs that do not come from the controller.
#[derive(Debug, Clone, Copy)]
pub struct ScopeStyle {
    pub theme: ColorTheme,
    /// Self-noise level in [0, 1] driving background speckle.
    pub self_noise: f32,
    /// Milliseconds since the console started.
    pub elapsed_ms: u64,
}

/// Scope renderer with cached geometry.
#[derive(Debug)]
pub struct ScopeState {
    /// Area the cached geometry was fitted to.
    last_area: Rect,
    geometry: ScopeGeometry,
    /// Seed captured at initialization for speckle.
    init_seed: u64,
}

impl Default for ScopeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeState {
    pub fn new() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let init_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        Self {
            last_area: Rect::default(),
            geometry: ScopeGeometry::fit(Rect::default()),
            init_seed,
        }
    }

    /// Render the scope into `area`.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        controller: &Controller,
        style: &ScopeStyle,
    ) {
        if area != self.last_area {
            self.geometry = ScopeGeometry::fit(area);
            self.last_area = area;
        }

        if self.geometry.is_degenerate() {
            let notice = Paragraph::new("SCOPE OFFLINE: terminal too small")
                .style(Style::new().fg(style.theme.color()))
                .alignment(Alignment::Center);
            frame.render_widget(notice, area);
            return;
        }

        let placed = layers::blips::place(&self.geometry, controller.sweep(), controller.blips());
        let ping = controller.ping_ring_progress();

        let lines: Vec<Line> = (area.top()..area.bottom())
            .map(|y| {
                let spans: Vec<Span> = (area.left()..area.right())
                    .map(|x| self.render_cell(x, y, controller, style, &placed, ping))
                    .collect();
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
        self.render_labels(frame, area, controller, style);
    }

    /// Composite all layers for one cell.
    fn render_cell(
        &self,
        x: u16,
        y: u16,
        controller: &Controller,
        style: &ScopeStyle,
        placed: &[PlacedBlip],
        ping: Option<f32>,
    ) -> Span<'static> {
        let g = &self.geometry;
        let (distance, bearing) = g.cell_to_polar(x, y);
        if distance > 1.0 + g.cell_span() {
            return Span::raw(" ");
        }

        let paint = layers::composite([
            layers::blips::at(placed, x, y),
            ping.and_then(|p| layers::ping::paint(g, p, distance)),
            layers::sweep::paint(g, controller.sweep(), distance, bearing),
            layers::grid::paint(g, x, y, distance),
            layers::noise::paint(x, y, style.self_noise, style.elapsed_ms, self.init_seed),
        ]);

        let mut cell_style = Style::new();
        if distance <= 1.0 {
            cell_style = cell_style.bg(phosphor(style.theme, 0.0));
        }

        match paint {
            Some(CellPaint { ch, intensity }) => Span::styled(
                ch.to_string(),
                cell_style.fg(phosphor(style.theme, intensity)),
            ),
            None => Span::styled(" ", cell_style),
        }
    }

    /// Bearing labels around the rim plus range and pause indicators.
    fn render_labels(
        &self,
        frame: &mut Frame,
        area: Rect,
        controller: &Controller,
        style: &ScopeStyle,
    ) {
        let g = &self.geometry;
        let label_style = Style::new().fg(phosphor(style.theme, 0.55));
        let cx = g.center_x.floor();
        let cy = g.center_y.floor();

        let labels = [
            ("000", cx - 1.0, cy - g.radius - 1.0),
            ("090", cx + g.radius_cols() + 1.0, cy),
            ("180", cx - 1.0, cy + g.radius + 1.0),
            ("270", cx - g.radius_cols() - 4.0, cy),
        ];

        let buf = frame.buffer_mut();
        for (text, x, y) in labels {
            if let Some((x, y)) = clip(area, x, y, text.len()) {
                buf.set_string(x, y, text, label_style);
            }
        }

        let range = format!("RNG {:.0} m", controller.settings().max_range_m);
        if let Some((x, y)) = clip(area, area.x as f32, area.bottom() as f32 - 1.0, range.len()) {
            buf.set_string(x, y, &range, label_style);
        }

        if controller.is_paused()
            && let Some((x, y)) = clip(area, area.x as f32, area.y as f32, 6)
        {
            buf.set_string(x, y, "PAUSED", label_style);
        }
    }
}

/// Position of a `len`-wide label if it fits entirely inside `area`.
fn clip(area: Rect, x: f32, y: f32, len: usize) -> Option<(u16, u16)> {
    if x < area.x as f32 || y < area.y as f32 {
        return None;
    }
    let (x, y) = (x as u16, y as u16);
    if x as usize + len <= area.right() as usize && y < area.bottom() {
        Some((x, y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use sonar_core::ControllerSettings;

    fn style() -> ScopeStyle {
        ScopeStyle {
            theme: ColorTheme::Green,
            self_noise: 0.0,
            elapsed_ms: 0,
        }
    }

    fn draw(controller: &Controller, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut state = ScopeState::new();
        terminal
            .draw(|frame| state.render(frame, frame.area(), controller, &style()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_beam_and_labels() {
        let mut controller = Controller::new(ControllerSettings::default(), Some(3));
        controller.tick(0.2);
        let rendered = text(&draw(&controller, 90, 42));
        assert!(rendered.contains('█'));
        assert!(rendered.contains("000"));
        assert!(rendered.contains("090"));
        assert!(rendered.contains("RNG 4000 m"));
    }

    #[test]
    fn test_renders_contacts() {
        let settings = ControllerSettings {
            spawn_interval: 0.05,
            ..Default::default()
        };
        let mut controller = Controller::new(settings, Some(8));
        for _ in 0..10 {
            controller.tick(0.05);
        }
        assert!(!controller.blips().is_empty());
        let rendered = text(&draw(&controller, 90, 42));
        assert!(rendered.contains('◉'));
    }

    #[test]
    fn test_paused_indicator() {
        let mut controller = Controller::new(ControllerSettings::default(), Some(3));
        controller.toggle_pause();
        let rendered = text(&draw(&controller, 90, 42));
        assert!(rendered.contains("PAUSED"));
    }

    #[test]
    fn test_tiny_terminal_shows_notice() {
        let controller = Controller::new(ControllerSettings::default(), Some(3));
        let rendered = text(&draw(&controller, 40, 3));
        assert!(rendered.contains("SCOPE OFFLINE"));
    }

    #[test]
    fn test_clip() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(clip(area, 2.0, 1.0, 3), Some((2, 1)));
        assert_eq!(clip(area, 8.0, 1.0, 3), None);
        assert_eq!(clip(area, -1.0, 1.0, 3), None);
        assert_eq!(clip(area, 2.0, 5.0, 3), None);
    }
}
