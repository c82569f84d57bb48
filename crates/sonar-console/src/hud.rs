//! Side panel with the console readouts.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use sonar_core::{ColorTheme, HudSnapshot, SensorStatus};

use crate::sensors::{Reading, SensorReadings};

/// Width of the panel including borders.
pub const PANEL_WIDTH: u16 = 32;

const LABEL_WIDTH: usize = 11;
const SIGNAL_BAR_WIDTH: usize = 16;

/// Everything the panel shows for one frame.
#[derive(Debug)]
pub struct HudContext<'a> {
    pub hud: &'a HudSnapshot,
    pub sensors: &'a SensorReadings,
    pub audio_label: &'static str,
    pub audio_status: Option<SensorStatus>,
    pub theme: ColorTheme,
    pub now: DateTime<Utc>,
}

/// Text for a missing value, by source state.
fn absent<T>(reading: &Reading<T>) -> String {
    if !reading.enabled {
        "UNKNOWN".into()
    } else {
        reading.status.label().into()
    }
}

/// Label/value pairs in display order.
pub fn field_values(ctx: &HudContext) -> Vec<(&'static str, String)> {
    let hud = ctx.hud;
    let s = ctx.sensors;

    let heading = match s.orientation.value.and_then(|o| o.heading) {
        Some(heading) => format!("{heading:03.0}°"),
        None if s.orientation.value.is_some() => "UNKNOWN".into(),
        None => absent(&s.orientation),
    };
    let orient = match s.orientation.value {
        Some(o) => format!("P{:+.0}° R{:+.0}°", o.pitch, o.roll),
        None => absent(&s.orientation),
    };
    let nearest = match hud.nearest {
        Some((bearing, range)) => format!("{bearing:03}° {range:.0} m"),
        None => "NONE".into(),
    };
    let coords = match &s.position.value {
        Some(p) => p.coords(),
        None => absent(&s.position),
    };
    let location = match &s.position.value {
        Some(p) => p.place.clone().unwrap_or_else(|| "UNKNOWN".into()),
        None => absent(&s.position),
    };
    let device = |status: SensorStatus| {
        if s.audio_devices.enabled {
            status.label().to_string()
        } else {
            absent(&s.audio_devices)
        }
    };
    let self_noise = match s.host_load.value {
        Some(load) => format!("{:.0}%", load * 100.0),
        None => absent(&s.host_load),
    };

    vec![
        ("BEARING", format!("{:03}°", hud.bearing_deg)),
        ("HEADING", heading),
        ("DEPTH", format!("{:.1} m", hud.depth_m)),
        ("TEMP", format!("{:.1} °C", hud.temperature_c)),
        ("SIGNAL", format!("{:.0}%", hud.signal_pct)),
        ("FREQ VAR", format!("{:+.1} Hz", hud.freq_variance_hz)),
        ("CONTACTS", hud.contacts.to_string()),
        ("PINGS", hud.ping_count.to_string()),
        ("NEAREST", nearest),
        ("COORDS", coords),
        ("LOCATION", location),
        ("SPEAKER", device(s.speaker_status())),
        ("MIC", device(s.mic_status())),
        ("ORIENT", orient),
        ("AUDIO", ctx.audio_label.into()),
        ("SELF NOISE", self_noise),
        ("STATUS", s.system_status(ctx.audio_status).label().into()),
    ]
}

/// Bar of `width` cells filled by `pct` percent.
fn signal_bar(pct: f32, width: usize) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * width as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render(frame: &mut Frame, area: Rect, ctx: &HudContext) {
    let color = ctx.theme.color();
    let value_style = Style::new().fg(color);

    let mut lines: Vec<Line> = Vec::new();
    for (label, value) in field_values(ctx) {
        let value_style = if value == SensorStatus::Offline.label() || value == "DEGRADED" {
            value_style.bold()
        } else {
            value_style
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{label:<LABEL_WIDTH$}")).dark_gray(),
            Span::styled(value, value_style),
        ]));
        if label == "SIGNAL" {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(LABEL_WIDTH)),
                Span::styled(signal_bar(ctx.hud.signal_pct, SIGNAL_BAR_WIDTH), value_style),
            ]));
        }
    }
    lines.push(Line::default());
    lines.push(
        Line::from(ctx.now.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .style(value_style)
            .centered(),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(color))
        .title(" SONAR ".bold().fg(color));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorHub;
    use crate::sensors::audio_devices::AudioDevices;
    use ratatui::{Terminal, backend::TestBackend};

    fn snapshot() -> HudSnapshot {
        HudSnapshot {
            bearing_deg: 7,
            depth_m: 150.0,
            signal_pct: 87.0,
            freq_variance_hz: -1.3,
            temperature_c: 4.2,
            contacts: 3,
            ping_count: 12,
            nearest: Some((45, 812.4)),
            paused: false,
        }
    }

    fn value<'a>(fields: &'a [(&'static str, String)], label: &str) -> &'a str {
        fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_field_values() {
        let hud = snapshot();
        let sensors = SensorHub::disabled().readings();
        let ctx = HudContext {
            hud: &hud,
            sensors: &sensors,
            audio_label: "OFF",
            audio_status: None,
            theme: ColorTheme::Green,
            now: Utc::now(),
        };
        let fields = field_values(&ctx);
        assert_eq!(fields.len(), 17);
        assert_eq!(value(&fields, "BEARING"), "007°");
        assert_eq!(value(&fields, "DEPTH"), "150.0 m");
        assert_eq!(value(&fields, "FREQ VAR"), "-1.3 Hz");
        assert_eq!(value(&fields, "NEAREST"), "045° 812 m");
        assert_eq!(value(&fields, "COORDS"), "UNKNOWN");
        assert_eq!(value(&fields, "SPEAKER"), "UNKNOWN");
        assert_eq!(value(&fields, "MIC"), "UNKNOWN");
        assert_eq!(value(&fields, "STATUS"), "NOMINAL");
    }

    #[test]
    fn test_audio_device_labels() {
        let hud = snapshot();
        let mut sensors = SensorHub::disabled().readings();
        sensors.audio_devices = Reading {
            status: SensorStatus::Online,
            value: Some(AudioDevices {
                playback: 1,
                capture: 0,
            }),
            enabled: true,
        };
        let ctx = HudContext {
            hud: &hud,
            sensors: &sensors,
            audio_label: "OFF",
            audio_status: None,
            theme: ColorTheme::Green,
            now: Utc::now(),
        };
        let fields = field_values(&ctx);
        assert_eq!(value(&fields, "SPEAKER"), "ONLINE");
        assert_eq!(value(&fields, "MIC"), "OFFLINE");
    }

    #[test]
    fn test_signal_bar() {
        assert_eq!(signal_bar(50.0, 4), "██░░");
        assert_eq!(signal_bar(150.0, 3), "███");
        assert_eq!(signal_bar(-5.0, 2), "░░");
    }

    #[test]
    fn test_renders_panel() {
        let hud = snapshot();
        let sensors = SensorHub::disabled().readings();
        let ctx = HudContext {
            hud: &hud,
            sensors: &sensors,
            audio_label: "MUTED",
            audio_status: Some(SensorStatus::Online),
            theme: ColorTheme::Amber,
            now: Utc::now(),
        };
        let mut terminal = Terminal::new(TestBackend::new(PANEL_WIDTH, 24)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &ctx))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("SONAR"));
        assert!(text.contains("SELF NOISE"));
        assert!(text.contains("MUTED"));
        assert!(text.contains("UTC"));
    }
}
