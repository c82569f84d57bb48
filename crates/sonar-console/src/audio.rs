//! Ping sound synthesis and playback.
//!
//! The ping is a short 10 kHz tone with a soft attack and release. It is
//! rendered to a WAV file once and handed to an external player on each
//! ping, or replaced by the terminal bell. A ping that arrives while the
//! previous one is still sounding is skipped.

use std::f32::consts::TAU;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use sonar_config::{AudioConfig, AudioMode};
use sonar_core::SensorStatus;
use thiserror::Error;
use tracing::{debug, info, warn};

const SAMPLE_RATE: u32 = 44_100;
const TONE_HZ: f32 = 10_000.0;
const DURATION_SECS: f32 = 0.15;
const HARMONIC_RATIO: f32 = 2.5;
const HARMONIC_GAIN: f32 = 0.15;
const AMPLITUDE: f32 = 32_000.0;

/// Players tried in order when none is configured.
const KNOWN_PLAYERS: [&str; 4] = ["aplay", "paplay", "pw-play", "afplay"];

const PING_FILE: &str = "ping.wav";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio player found (tried {})", KNOWN_PLAYERS.join(", "))]
    NoPlayer,
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to start {player}: {source}")]
    Spawn {
        player: String,
        #[source]
        source: io::Error,
    },
    #[error("{player} exited with {status}")]
    PlayerFailed { player: String, status: String },
    #[error("terminal bell failed: {0}")]
    Bell(#[source] io::Error),
}

/// Mono 16-bit PCM ping.
#[derive(Debug, Clone)]
pub struct PingSound {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl PingSound {
    /// The console's standard ping.
    pub fn standard() -> Self {
        Self::synthesize(TONE_HZ, DURATION_SECS, SAMPLE_RATE)
    }

    /// Tone with a 30% rise, 40% sustain and 30% fall, plus a faint
    /// inharmonic overtone.
    pub fn synthesize(freq: f32, duration: f32, sample_rate: u32) -> Self {
        let count = (duration * sample_rate as f32) as usize;
        let ramp = duration * 0.3;
        let samples = (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let envelope = if t < ramp {
                    (t / ramp).powf(1.5)
                } else if t > duration - ramp {
                    ((duration - t) / ramp).max(0.0).powf(1.5)
                } else {
                    1.0
                };
                let tone = (TAU * freq * t).sin()
                    + HARMONIC_GAIN * (TAU * freq * HARMONIC_RATIO * t).sin();
                (tone * envelope * AMPLITUDE).clamp(i16::MIN as f32, i16::MAX as f32) as i16
            })
            .collect();
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Encode as a RIFF/WAVE byte stream.
    pub fn to_wav(&self) -> Vec<u8> {
        let data_len = (self.samples.len() * 2) as u32;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&(self.sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for sample in self.samples() {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        out
    }

    pub fn write_wav(&self, path: &Path) -> Result<(), AudioError> {
        let write_err = |source| AudioError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.to_wav()).map_err(write_err)
    }
}

/// Something that can sound a ping.
pub trait PingSink: std::fmt::Debug {
    /// True while a previously started ping is still sounding.
    fn is_playing(&mut self) -> Result<bool, AudioError>;

    /// Start sounding a ping.
    fn play(&mut self) -> Result<(), AudioError>;
}

/// Plays a WAV file through an external command.
#[derive(Debug)]
pub struct PlayerSink {
    player: String,
    sound: PathBuf,
    child: Option<Child>,
}

impl PlayerSink {
    pub fn new(player: String, sound: PathBuf) -> Self {
        Self {
            player,
            sound,
            child: None,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.player);
        if Path::new(&self.player).file_name().is_some_and(|n| n == "aplay") {
            cmd.arg("-q");
        }
        cmd.arg(&self.sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl PingSink for PlayerSink {
    fn is_playing(&mut self) -> Result<bool, AudioError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(false);
        };
        match child.try_wait() {
            Ok(None) => Ok(true),
            Ok(Some(status)) => {
                self.child = None;
                if status.success() {
                    Ok(false)
                } else {
                    Err(AudioError::PlayerFailed {
                        player: self.player.clone(),
                        status: status.to_string(),
                    })
                }
            }
            Err(source) => {
                self.child = None;
                Err(AudioError::Spawn {
                    player: self.player.clone(),
                    source,
                })
            }
        }
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let child = self.command().spawn().map_err(|source| AudioError::Spawn {
            player: self.player.clone(),
            source,
        })?;
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for PlayerSink {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Rings the terminal bell, at most once per ping length.
#[derive(Debug)]
pub struct BellSink {
    cooldown: Duration,
    last: Option<Instant>,
}

impl BellSink {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }
}

impl PingSink for BellSink {
    fn is_playing(&mut self) -> Result<bool, AudioError> {
        Ok(self.last.is_some_and(|t| t.elapsed() < self.cooldown))
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(AudioError::Bell)?;
        self.last = Some(Instant::now());
        Ok(())
    }
}

/// Result of a ping reaching the audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    Played,
    /// Previous ping still sounding.
    Busy,
    Muted,
    /// Audio is off or has failed.
    Disabled,
}

/// Ping audio state shown on the HUD.
#[derive(Debug)]
pub struct PingAudio {
    sink: Option<Box<dyn PingSink>>,
    muted: bool,
    status: SensorStatus,
    /// False when audio was switched off in config.
    enabled: bool,
}

impl PingAudio {
    /// Build the sink selected by `config`. Failures leave audio offline.
    pub fn from_config(config: &AudioConfig, data_dir: Option<&Path>) -> Self {
        let sound = PingSound::standard();
        let sink: Result<Box<dyn PingSink>, AudioError> = match config.mode {
            AudioMode::Off => return Self::off(),
            AudioMode::Bell => Ok(Box::new(BellSink::new(sound.duration()))),
            AudioMode::Player => player_sink(config, data_dir, &sound),
        };

        match sink {
            Ok(sink) => {
                info!(mode = ?config.mode, "ping audio ready");
                Self::with_sink(sink, config.muted)
            }
            Err(err) => {
                warn!(error = %err, "ping audio unavailable");
                Self {
                    sink: None,
                    muted: config.muted,
                    status: SensorStatus::Offline,
                    enabled: true,
                }
            }
        }
    }

    pub fn with_sink(sink: Box<dyn PingSink>, muted: bool) -> Self {
        Self {
            sink: Some(sink),
            muted,
            status: SensorStatus::Online,
            enabled: true,
        }
    }

    /// Audio switched off entirely.
    pub fn off() -> Self {
        Self {
            sink: None,
            muted: false,
            status: SensorStatus::Offline,
            enabled: false,
        }
    }

    /// Sound a ping unless muted or one is already playing.
    pub fn on_ping(&mut self) -> PingOutcome {
        let Some(sink) = self.sink.as_mut() else {
            return PingOutcome::Disabled;
        };

        let result = sink.is_playing().and_then(|playing| {
            if playing {
                Ok(PingOutcome::Busy)
            } else if self.muted {
                Ok(PingOutcome::Muted)
            } else {
                sink.play().map(|()| PingOutcome::Played)
            }
        });

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "disabling ping audio");
                self.sink = None;
                self.status = SensorStatus::Offline;
                PingOutcome::Disabled
            }
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        debug!(muted = self.muted, "ping audio mute toggled");
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Status for the HUD, or `None` when audio is switched off.
    pub fn status(&self) -> Option<SensorStatus> {
        self.enabled.then_some(self.status)
    }

    pub fn label(&self) -> &'static str {
        match (self.enabled, self.status, self.muted) {
            (false, _, _) => "OFF",
            (_, SensorStatus::Offline, _) => "OFFLINE",
            (_, _, true) => "MUTED",
            _ => "ACTIVE",
        }
    }
}

fn player_sink(
    config: &AudioConfig,
    data_dir: Option<&Path>,
    sound: &PingSound,
) -> Result<Box<dyn PingSink>, AudioError> {
    let player = match &config.player {
        Some(player) => player.clone(),
        None => detect_player().ok_or(AudioError::NoPlayer)?,
    };

    let path = match &config.sound_path {
        Some(path) => path.clone(),
        None => {
            let path = data_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(std::env::temp_dir)
                .join(PING_FILE);
            sound.write_wav(&path)?;
            path
        }
    };

    debug!(player = %player, sound = %path.display(), "using external player");
    Ok(Box::new(PlayerSink::new(player, path)))
}

/// First known player found on `PATH`.
fn detect_player() -> Option<String> {
    let path = std::env::var_os("PATH")?;
    KNOWN_PLAYERS
        .iter()
        .find(|name| std::env::split_paths(&path).any(|dir| dir.join(name).is_file()))
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct FakeSink {
        playing: Rc<Cell<bool>>,
        plays: Rc<Cell<u32>>,
        fail: bool,
    }

    impl PingSink for FakeSink {
        fn is_playing(&mut self) -> Result<bool, AudioError> {
            Ok(self.playing.get())
        }

        fn play(&mut self) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::NoPlayer);
            }
            self.plays.set(self.plays.get() + 1);
            self.playing.set(true);
            Ok(())
        }
    }

    fn fake(fail: bool) -> (PingAudio, Rc<Cell<bool>>, Rc<Cell<u32>>) {
        let playing = Rc::new(Cell::new(false));
        let plays = Rc::new(Cell::new(0));
        let sink = FakeSink {
            playing: playing.clone(),
            plays: plays.clone(),
            fail,
        };
        (PingAudio::with_sink(Box::new(sink), false), playing, plays)
    }

    #[test]
    fn test_no_retrigger_while_playing() {
        let (mut audio, playing, plays) = fake(false);
        assert_eq!(audio.on_ping(), PingOutcome::Played);
        assert_eq!(audio.on_ping(), PingOutcome::Busy);
        assert_eq!(plays.get(), 1);

        playing.set(false);
        assert_eq!(audio.on_ping(), PingOutcome::Played);
        assert_eq!(plays.get(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_player_busy_until_child_exits() {
        let sink = PlayerSink::new("sleep".into(), PathBuf::from("0.3"));
        let mut audio = PingAudio::with_sink(Box::new(sink), false);
        assert_eq!(audio.on_ping(), PingOutcome::Played);
        assert_eq!(audio.on_ping(), PingOutcome::Busy);

        std::thread::sleep(Duration::from_millis(800));
        assert_eq!(audio.on_ping(), PingOutcome::Played);
        assert_eq!(audio.status(), Some(SensorStatus::Online));
    }

    #[test]
    fn test_bell_busy_during_cooldown() {
        let sink = BellSink::new(Duration::from_millis(100));
        let mut audio = PingAudio::with_sink(Box::new(sink), false);
        assert_eq!(audio.on_ping(), PingOutcome::Played);
        assert_eq!(audio.on_ping(), PingOutcome::Busy);

        std::thread::sleep(Duration::from_millis(250));
        assert_eq!(audio.on_ping(), PingOutcome::Played);
    }

    #[test]
    fn test_muted_skips_playback() {
        let (mut audio, _, plays) = fake(false);
        assert!(audio.toggle_mute());
        assert_eq!(audio.on_ping(), PingOutcome::Muted);
        assert_eq!(plays.get(), 0);
        assert_eq!(audio.label(), "MUTED");
    }

    #[test]
    fn test_failure_disables_audio() {
        let (mut audio, _, _) = fake(true);
        assert_eq!(audio.on_ping(), PingOutcome::Disabled);
        assert_eq!(audio.status(), Some(SensorStatus::Offline));
        assert_eq!(audio.label(), "OFFLINE");
        assert_eq!(audio.on_ping(), PingOutcome::Disabled);
    }

    #[test]
    fn test_off_mode() {
        let config = AudioConfig {
            mode: AudioMode::Off,
            ..Default::default()
        };
        let mut audio = PingAudio::from_config(&config, None);
        assert_eq!(audio.status(), None);
        assert_eq!(audio.label(), "OFF");
        assert_eq!(audio.on_ping(), PingOutcome::Disabled);
    }

    #[test]
    fn test_missing_player_is_offline() {
        let config = AudioConfig {
            player: Some("/nonexistent/sonar-player".into()),
            ..Default::default()
        };
        let dir = std::env::temp_dir().join(format!("sonar-audio-test-{}", std::process::id()));
        let mut audio = PingAudio::from_config(&config, Some(&dir));
        assert_eq!(audio.status(), Some(SensorStatus::Online));
        assert_eq!(audio.on_ping(), PingOutcome::Disabled);
        assert_eq!(audio.status(), Some(SensorStatus::Offline));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_ping_sound_shape() {
        let sound = PingSound::standard();
        assert!((6614..=6615).contains(&sound.samples().len()));
        assert!((sound.duration().as_secs_f64() - 0.15).abs() < 1e-3);
        assert_eq!(sound.samples()[0], 0);
        let peak = sound.samples().iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak > 25_000);
        // envelope tails off
        let tail = sound.samples()[6600..].iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(tail < 1_000);
    }

    #[test]
    fn test_wav_header() {
        let wav = PingSound::synthesize(1000.0, 0.5, 8000).to_wav();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 8000);
        assert_eq!(&wav[36..40], b"data");
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_len, 8000);
        assert_eq!(wav.len(), 44 + 8000);
    }
}
