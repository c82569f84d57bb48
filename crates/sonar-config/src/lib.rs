//! Configuration for the sonar console.
//!
//! Settings live in `config.toml` under the platform config directory. A
//! missing file yields defaults; an unreadable one is logged and replaced
//! by defaults so the console always starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sonar_core::{ColorTheme, ControllerSettings, SweepSpeed};
use thiserror::Error;
use tracing::{debug, warn};

const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no home directory to place the config in")]
    NoConfigDir,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// How ping sounds are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioMode {
    /// Play a synthesized WAV through an external player.
    #[default]
    Player,
    /// Ring the terminal bell.
    Bell,
    Off,
}

impl FromStr for AudioMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "player" => Ok(AudioMode::Player),
            "bell" => Ok(AudioMode::Bell),
            "off" => Ok(AudioMode::Off),
            _ => Err(format!("unknown audio mode '{s}', expected player, bell or off")),
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: ColorTheme,
    pub sweep_speed: SweepSpeed,
    pub show_hud: bool,
    pub max_contacts: usize,
    /// Range represented by the scope rim, in metres.
    pub max_range_m: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: ColorTheme::default(),
            sweep_speed: SweepSpeed::default(),
            show_hud: true,
            max_contacts: 12,
            max_range_m: 4000.0,
        }
    }
}

/// `[timing]` section. All values in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub ping_interval_ms: u64,
    pub spawn_interval_ms: u64,
    pub hud_refresh_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            ping_interval_ms: 1000,
            spawn_interval_ms: 2000,
            hud_refresh_ms: 250,
        }
    }
}

/// `[audio]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub mode: AudioMode,
    pub muted: bool,
    /// Player command; autodetected when unset.
    pub player: Option<String>,
    /// Ping sound to play instead of the synthesized one.
    pub sound_path: Option<PathBuf>,
}

/// `[sensors]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Allow an IP-based position lookup over the network.
    pub geolocation: bool,
    /// Manual position, overrides the lookup when both are set.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub audio_devices: bool,
    pub orientation: bool,
    pub host_load: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            geolocation: false,
            latitude: None,
            longitude: None,
            audio_devices: true,
            orientation: true,
            host_load: true,
        }
    }
}

impl SensorConfig {
    /// Manually configured position, if both coordinates are present.
    pub fn manual_position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
    pub sensors: SensorConfig,
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "sonar-console")
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Directory for logs and generated sound files.
    pub fn data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    /// Load from `path`, or the default location when `None`.
    ///
    /// Never fails: problems are logged and defaults returned.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                warn!("no config directory available, using defaults");
                return Self::default();
            }
        };

        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Read and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, or the default location when `None`.
    pub fn save(&self, path: Option<&Path>) -> Result<(), ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Serialize to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Controller tunables derived from the display and timing sections.
    pub fn controller_settings(&self) -> ControllerSettings {
        let secs = |ms: u64| ms.max(1) as f32 / 1000.0;
        ControllerSettings {
            sweep_speed: self.display.sweep_speed,
            ping_interval: secs(self.timing.ping_interval_ms),
            spawn_interval: secs(self.timing.spawn_interval_ms),
            hud_refresh: secs(self.timing.hud_refresh_ms),
            max_contacts: self.display.max_contacts,
            max_range_m: self.display.max_range_m.max(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sonar-config-test-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_defaults_match_controller_defaults() {
        let settings = Config::default().controller_settings();
        assert_eq!(settings, ControllerSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [display]
            theme = "amber"
            sweep_speed = "fast"

            [timing]
            ping_interval_ms = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.display.theme, ColorTheme::Amber);
        assert_eq!(config.display.sweep_speed, SweepSpeed::Fast);
        assert!(config.display.show_hud);
        assert_eq!(config.timing.ping_interval_ms, 3000);
        assert_eq!(config.timing.spawn_interval_ms, 2000);
        assert_eq!(config.audio.mode, AudioMode::Player);
        assert!(!config.sensors.geolocation);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.display.theme = ColorTheme::Cyan;
        config.audio.mode = AudioMode::Bell;
        config.audio.muted = true;
        config.sensors.latitude = Some(59.91);
        config.sensors.longitude = Some(10.75);

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.sensors.manual_position(), Some((59.91, 10.75)));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = scratch_dir("invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "[display]\ntheme = 42\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(Config::load(Some(&path)), Config::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = scratch_dir("missing");
        assert_eq!(Config::load(Some(&dir.join(CONFIG_FILE))), Config::default());
    }

    #[test]
    fn test_manual_position_needs_both() {
        let sensors = SensorConfig {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(sensors.manual_position(), None);
    }

    #[test]
    fn test_parse_audio_mode() {
        assert_eq!("BELL".parse::<AudioMode>(), Ok(AudioMode::Bell));
        assert!("speaker".parse::<AudioMode>().is_err());
    }

    #[test]
    fn test_zero_intervals_are_raised() {
        let mut config = Config::default();
        config.timing.ping_interval_ms = 0;
        assert!(config.controller_settings().ping_interval > 0.0);
    }
}
