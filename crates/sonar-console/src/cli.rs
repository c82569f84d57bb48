//! Command-line overrides for the config file.

use std::path::PathBuf;

use clap::Parser;
use sonar_config::{AudioMode, Config};
use sonar_core::{ColorTheme, SweepSpeed};

/// Simulated submarine sonar console.
#[derive(Parser, Debug, Default)]
#[command(name = "sonar", version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Color theme (green, amber, cyan, blue, red, white).
    #[arg(short, long)]
    pub theme: Option<ColorTheme>,

    /// Sweep speed (slow, medium, fast).
    #[arg(short, long)]
    pub speed: Option<SweepSpeed>,

    /// Milliseconds between pings.
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(50..))]
    pub ping_interval: Option<u64>,

    /// Seed for reproducible contacts.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with ping audio muted.
    #[arg(short, long)]
    pub mute: bool,

    /// Ping audio output (player, bell, off).
    #[arg(long, value_name = "MODE")]
    pub audio: Option<AudioMode>,

    /// Allow an IP-based position lookup over the network.
    #[arg(long)]
    pub geolocate: bool,

    /// Write logs here instead of the data directory.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Write the ping sound as a WAV file and exit.
    #[arg(long, value_name = "PATH")]
    pub export_ping: Option<PathBuf>,

    /// Do not write setting changes back to the config file.
    #[arg(long)]
    pub no_save: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(theme) = self.theme {
            config.display.theme = theme;
        }
        if let Some(speed) = self.speed {
            config.display.sweep_speed = speed;
        }
        if let Some(ms) = self.ping_interval {
            config.timing.ping_interval_ms = ms;
        }
        if self.mute {
            config.audio.muted = true;
        }
        if let Some(mode) = self.audio {
            config.audio.mode = mode;
        }
        if self.geolocate {
            config.sensors.geolocation = true;
        }
    }

    /// Whether in-session setting changes may be saved.
    ///
    /// One-off overrides would otherwise end up in the file on the next
    /// save, so any of them disables persistence too.
    pub fn persist(&self) -> bool {
        !self.no_save
            && self.theme.is_none()
            && self.speed.is_none()
            && self.ping_interval.is_none()
            && !self.mute
            && self.audio.is_none()
            && !self.geolocate
    }
}
