//! Core simulation state for the sonar console.
//!
//! Nothing here touches the terminal: the [`Controller`] is advanced by
//! frame deltas and exposes the sweep, contacts and readings for rendering.

mod blip;
mod controller;
mod stats;
mod status;
mod sweep;
mod theme;
mod timer;

pub use blip::{Blip, SPAWN_DISTANCE, SPAWN_LIFETIME};
pub use controller::{
    Controller, ControllerSettings, HudSnapshot, MAX_FRAME_DT, PING_RING_DURATION, STEP_DT,
    TickEvents,
};
pub use stats::{DisplayStats, DriftingStat};
pub use status::{SensorStatus, SystemStatus};
pub use sweep::Sweep;
pub use theme::{ColorTheme, SweepSpeed};
pub use timer::IntervalTimer;
