//! The display controller: one call per animation frame.

use rand::{SeedableRng, rngs::StdRng};

use crate::blip::Blip;
use crate::stats::DisplayStats;
use crate::sweep::Sweep;
use crate::theme::SweepSpeed;
use crate::timer::IntervalTimer;

/// Longest frame delta accepted by [`Controller::tick`].
pub const MAX_FRAME_DT: f32 = 0.25;

/// Frame length used when single-stepping a paused display.
pub const STEP_DT: f32 = 1.0 / 30.0;

/// Seconds the expanding ping ring stays visible.
pub const PING_RING_DURATION: f32 = 1.5;

/// Tunables for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub sweep_speed: SweepSpeed,
    /// Seconds between pings.
    pub ping_interval: f32,
    /// Seconds between contact spawns.
    pub spawn_interval: f32,
    /// Seconds between HUD snapshot refreshes.
    pub hud_refresh: f32,
    /// Contacts beyond this count are not spawned.
    pub max_contacts: usize,
    /// Range represented by the scope rim, in metres.
    pub max_range_m: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            sweep_speed: SweepSpeed::Medium,
            ping_interval: 1.0,
            spawn_interval: 2.0,
            hud_refresh: 0.25,
            max_contacts: 12,
            max_range_m: 4000.0,
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// A ping fired this frame.
    pub pinged: bool,
    /// Id of the contact spawned this frame.
    pub spawned: Option<u64>,
    /// Number of contacts that faded out this frame.
    pub expired: usize,
    /// The HUD snapshot was rebuilt this frame.
    pub hud_refreshed: bool,
}

/// HUD readings captured at the refresh cadence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub bearing_deg: u16,
    pub depth_m: f32,
    pub signal_pct: f32,
    pub freq_variance_hz: f32,
    pub temperature_c: f32,
    pub contacts: usize,
    pub ping_count: u64,
    /// Bearing and range of the closest contact.
    pub nearest: Option<(u16, f32)>,
    pub paused: bool,
}

/// Owns all per-frame display state.
#[derive(Debug)]
pub struct Controller {
    settings: ControllerSettings,
    sweep: Sweep,
    blips: Vec<Blip>,
    stats: DisplayStats,
    ping_timer: IntervalTimer,
    spawn_timer: IntervalTimer,
    hud_timer: IntervalTimer,
    /// Seconds since the last ping, while the ring is visible.
    ping_ring_age: Option<f32>,
    next_blip_id: u64,
    paused: bool,
    pending_steps: u32,
    hud: HudSnapshot,
    rng: StdRng,
}

impl Controller {
    /// Create a controller. A seed makes contact spawning reproducible.
    pub fn new(settings: ControllerSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut controller = Self {
            ping_timer: IntervalTimer::primed(settings.ping_interval),
            spawn_timer: IntervalTimer::new(settings.spawn_interval),
            hud_timer: IntervalTimer::new(settings.hud_refresh),
            settings,
            sweep: Sweep::new(),
            blips: Vec::new(),
            stats: DisplayStats::default(),
            ping_ring_age: None,
            next_blip_id: 1,
            paused: false,
            pending_steps: 0,
            hud: HudSnapshot::default(),
            rng,
        };
        controller.refresh_hud();
        controller
    }

    /// Advance the display by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickEvents {
        let dt = if self.paused {
            if self.pending_steps == 0 {
                return TickEvents::default();
            }
            self.pending_steps -= 1;
            STEP_DT
        } else if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        let mut events = TickEvents::default();

        self.sweep
            .advance(dt, self.settings.sweep_speed.degrees_per_sec());

        for blip in &mut self.blips {
            blip.age_by(dt);
        }
        let before = self.blips.len();
        self.blips.retain(|b| !b.is_expired());
        events.expired = before - self.blips.len();

        if self.spawn_timer.tick(dt) && self.blips.len() < self.settings.max_contacts {
            let id = self.next_blip_id;
            self.next_blip_id += 1;
            self.blips
                .push(Blip::random(id, &mut self.rng, self.settings.max_range_m));
            events.spawned = Some(id);
        }

        if let Some(age) = self.ping_ring_age.as_mut() {
            *age += dt;
            if *age >= PING_RING_DURATION {
                self.ping_ring_age = None;
            }
        }

        if self.ping_timer.tick(dt) {
            self.stats.on_ping(&mut self.rng);
            self.ping_ring_age = Some(0.0);
            events.pinged = true;
        }

        if self.hud_timer.tick(dt) {
            self.refresh_hud();
            events.hud_refreshed = true;
        }

        events
    }

    /// Pause or resume the animation.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.pending_steps = 0;
        self.refresh_hud();
    }

    /// Queue a single fixed-length frame while paused.
    pub fn step(&mut self) {
        if self.paused {
            self.pending_steps += 1;
        }
    }

    /// Drop all contacts and restart the timers. Readings are kept.
    pub fn reset(&mut self) {
        self.blips.clear();
        self.ping_timer = IntervalTimer::primed(self.settings.ping_interval);
        self.spawn_timer.reset();
        self.hud_timer.reset();
        self.ping_ring_age = None;
        self.refresh_hud();
    }

    pub fn set_sweep_speed(&mut self, speed: SweepSpeed) {
        self.settings.sweep_speed = speed;
    }

    fn refresh_hud(&mut self) {
        let nearest = self
            .blips
            .iter()
            .min_by(|a, b| a.range_m.total_cmp(&b.range_m))
            .map(|b| (b.bearing(), b.range_m));

        self.hud = HudSnapshot {
            bearing_deg: (self.sweep.angle_deg().floor() as u16) % 360,
            depth_m: self.stats.depth.value(),
            signal_pct: self.stats.signal.value(),
            freq_variance_hz: self.stats.freq_variance.value(),
            temperature_c: self.stats.temperature.value(),
            contacts: self.blips.len(),
            ping_count: self.stats.ping_count,
            nearest,
            paused: self.paused,
        };
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn blips(&self) -> &[Blip] {
        &self.blips
    }

    pub fn stats(&self) -> &DisplayStats {
        &self.stats
    }

    pub fn hud(&self) -> &HudSnapshot {
        &self.hud
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Expansion of the ping ring in [0, 1], if one is visible.
    pub fn ping_ring_progress(&self) -> Option<f32> {
        self.ping_ring_age
            .map(|age| (age / PING_RING_DURATION).clamp(0.0, 1.0))
    }
}
