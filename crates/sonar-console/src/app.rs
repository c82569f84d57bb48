use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};
use sonar_config::Config;
use sonar_core::{Controller, TickEvents};
use sonar_scope::{ScopeState, ScopeStyle};
use tracing::{debug, info, warn};

use crate::audio::{PingAudio, PingOutcome};
use crate::hud::{self, HudContext, PANEL_WIDTH};
use crate::sensors::SensorHub;

/// Event poll timeout, roughly 30 frames per second.
const FRAME_TIMEOUT: Duration = Duration::from_millis(33);

/// Narrowest scope kept when the HUD panel is shown.
const MIN_SCOPE_WIDTH: u16 = 24;

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    controller: Controller,
    scope: ScopeState,
    sensors: SensorHub,
    audio: PingAudio,
    config: Config,
    /// Where setting changes are saved; `None` means the default location.
    config_path: Option<PathBuf>,
    /// Save setting changes back to the config file.
    persist: bool,
    started: Instant,
    last_frame: Instant,
}

impl App {
    /// Construct the console, starting sensor monitors and ping audio.
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        persist: bool,
        seed: Option<u64>,
    ) -> Self {
        let sensors = SensorHub::start(&config.sensors);
        let audio = PingAudio::from_config(&config.audio, Config::data_dir().as_deref());
        let mut app = Self::with_parts(config, sensors, audio, seed);
        app.config_path = config_path;
        app.persist = persist;
        app
    }

    /// Construct from already built parts. Nothing is persisted.
    pub fn with_parts(
        config: Config,
        sensors: SensorHub,
        audio: PingAudio,
        seed: Option<u64>,
    ) -> Self {
        let now = Instant::now();
        Self {
            running: false,
            controller: Controller::new(config.controller_settings(), seed),
            scope: ScopeState::new(),
            sensors,
            audio,
            config,
            config_path: None,
            persist: false,
            started: now,
            last_frame: now,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!(
            theme = self.config.display.theme.name(),
            speed = self.config.display.sweep_speed.name(),
            "console started"
        );
        while self.running {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            self.advance(dt);

            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.sensors.stop();
        info!(pings = self.controller.stats().ping_count, "console stopped");
        Ok(())
    }

    /// Advance the simulation and react to what happened.
    fn advance(&mut self, dt: f32) -> TickEvents {
        let events = self.controller.tick(dt);
        if events.pinged {
            match self.audio.on_ping() {
                PingOutcome::Busy => debug!("ping skipped, previous still playing"),
                PingOutcome::Played | PingOutcome::Muted | PingOutcome::Disabled => {}
            }
        }
        events
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let [main, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        let (scope_area, hud_area) = self.split_main(main);

        let readings = self.sensors.readings();
        let theme = self.config.display.theme;
        let style = ScopeStyle {
            theme,
            self_noise: readings.self_noise(),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        };
        self.scope.render(frame, scope_area, &self.controller, &style);

        if let Some(area) = hud_area {
            let ctx = HudContext {
                hud: self.controller.hud(),
                sensors: &readings,
                audio_label: self.audio.label(),
                audio_status: self.audio.status(),
                theme,
                now: Utc::now(),
            };
            hud::render(frame, area, &ctx);
        }

        frame.render_widget(self.help_line(), help);
    }

    /// Scope area and, when shown and there is room, the HUD panel area.
    fn split_main(&self, area: Rect) -> (Rect, Option<Rect>) {
        if !self.config.display.show_hud || area.width < PANEL_WIDTH + MIN_SCOPE_WIDTH {
            return (area, None);
        }
        let [scope, panel] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(PANEL_WIDTH)]).areas(area);
        (scope, Some(panel))
    }

    fn help_line(&self) -> Line<'static> {
        let color = self.config.display.theme.color();
        let pause = if self.controller.is_paused() {
            " resume  "
        } else {
            " pause  "
        };
        let mute = if self.audio.is_muted() {
            " unmute  "
        } else {
            " mute  "
        };
        Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "space".bold().fg(color),
            pause.dark_gray(),
            "n".bold().fg(color),
            " step  ".dark_gray(),
            "r".bold().fg(color),
            " reset  ".dark_gray(),
            "c".bold().fg(color),
            " color  ".dark_gray(),
            "s".bold().fg(color),
            " speed  ".dark_gray(),
            "m".bold().fg(color),
            mute.dark_gray(),
            "h".bold().fg(color),
            " hud".dark_gray(),
        ])
        .centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with a frame-length timeout so the display keeps animating.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(FRAME_TIMEOUT)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => debug!(width, height, "terminal resized"),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.controller.toggle_pause(),
            (_, KeyCode::Char('.') | KeyCode::Char('n')) => self.controller.step(),
            (_, KeyCode::Char('r')) => {
                self.controller.reset();
                info!("contacts reset");
            }
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('s')) => self.cycle_sweep_speed(),
            (_, KeyCode::Char('m')) => self.toggle_mute(),
            (_, KeyCode::Char('h')) => self.toggle_hud(),
            _ => {}
        }
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.config.display.theme = self.config.display.theme.next();
        self.save_settings();
    }

    fn cycle_sweep_speed(&mut self) {
        let speed = self.config.display.sweep_speed.next();
        self.config.display.sweep_speed = speed;
        self.controller.set_sweep_speed(speed);
        self.save_settings();
    }

    fn toggle_mute(&mut self) {
        self.config.audio.muted = self.audio.toggle_mute();
        self.save_settings();
    }

    fn toggle_hud(&mut self) {
        self.config.display.show_hud = !self.config.display.show_hud;
        self.save_settings();
    }

    /// Best-effort write of the current settings.
    fn save_settings(&self) {
        if !self.persist {
            return;
        }
        if let Err(err) = self.config.save(self.config_path.as_deref()) {
            warn!(error = %err, "could not save settings");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
