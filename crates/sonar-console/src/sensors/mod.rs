//! Best-effort host sensors feeding the HUD.
//!
//! Every source runs in its own background thread and publishes a
//! [`Reading`] the render loop picks up without blocking. A source that
//! cannot be read is reported as offline; nothing here ever fails the
//! console.

pub mod audio_devices;
pub mod geolocation;
pub mod host_load;
pub mod orientation;

use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use sonar_config::SensorConfig;
use sonar_core::{SensorStatus, SystemStatus};
use thiserror::Error;
use tracing::{debug, info, warn};

use audio_devices::AudioDevices;
use geolocation::Position;
use orientation::Orientation;

/// Granularity at which monitor threads check for shutdown.
const STOP_POLL: Duration = Duration::from_millis(200);

/// Why a probe could not produce a value.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("not available on this host: {0}")]
    Unavailable(String),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("lookup failed: {0}")]
    Http(String),
    #[error("malformed data: {0}")]
    Parse(String),
}

/// Latest published state of one source.
#[derive(Debug, Clone)]
pub struct Reading<T> {
    pub status: SensorStatus,
    pub value: Option<T>,
    /// Disabled sources never count towards a degraded status.
    pub enabled: bool,
}

impl<T> Reading<T> {
    fn pending() -> Self {
        Self {
            status: SensorStatus::Pending,
            value: None,
            enabled: true,
        }
    }

    fn disabled() -> Self {
        Self {
            status: SensorStatus::Offline,
            value: None,
            enabled: false,
        }
    }

    fn online(value: T) -> Self {
        Self {
            status: SensorStatus::Online,
            value: Some(value),
            enabled: true,
        }
    }

    fn offline() -> Self {
        Self {
            status: SensorStatus::Offline,
            value: None,
            enabled: true,
        }
    }
}

/// A background probe publishing readings at a fixed period.
#[derive(Debug)]
pub struct Monitor<T> {
    /// Shared reading updated by the background thread.
    reading: Arc<RwLock<Reading<T>>>,
    /// Cached reading for when the lock is contended.
    cached: Arc<RwLock<Reading<T>>>,
    /// Flag to signal thread termination.
    running: Arc<RwLock<bool>>,
}

impl<T> Monitor<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn with_reading(reading: Reading<T>) -> Self {
        Self {
            reading: Arc::new(RwLock::new(reading.clone())),
            cached: Arc::new(RwLock::new(reading)),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// A source switched off in config.
    pub fn disabled() -> Self {
        Self::with_reading(Reading::disabled())
    }

    /// A source with a constant value, such as a manually set position.
    pub fn fixed(value: T) -> Self {
        Self::with_reading(Reading::online(value))
    }

    /// Spawn a thread calling `probe` every `period`.
    pub fn start<F>(name: &'static str, period: Duration, mut probe: F) -> Self
    where
        F: FnMut() -> Result<T, SensorError> + Send + 'static,
    {
        let monitor = Self::with_reading(Reading::pending());
        if let Ok(mut running) = monitor.running.write() {
            *running = true;
        }

        let reading = monitor.reading.clone();
        let cached = monitor.cached.clone();
        let running = monitor.running.clone();

        let spawned = thread::Builder::new()
            .name(format!("sensor-{name}"))
            .spawn(move || {
                let mut last_status = SensorStatus::Pending;
                loop {
                    let next = match probe() {
                        Ok(value) => Reading::online(value),
                        Err(err) => {
                            if last_status != SensorStatus::Offline {
                                info!(sensor = name, error = %err, "sensor offline");
                            }
                            Reading::offline()
                        }
                    };
                    if next.status == SensorStatus::Online && last_status != SensorStatus::Online {
                        info!(sensor = name, "sensor online");
                    }
                    last_status = next.status;

                    if let Ok(mut r) = reading.write() {
                        *r = next.clone();
                    }
                    if let Ok(mut c) = cached.write() {
                        *c = next;
                    }

                    if !sleep_while_running(&running, period) {
                        debug!(sensor = name, "monitor stopped");
                        break;
                    }
                }
            });

        if let Err(err) = spawned {
            warn!(sensor = name, error = %err, "could not start sensor thread");
            let offline = Reading::offline();
            if let Ok(mut r) = monitor.reading.write() {
                *r = offline.clone();
            }
            if let Ok(mut c) = monitor.cached.write() {
                *c = offline;
            }
        }

        monitor
    }

    /// Get the latest reading.
    /// Uses try_read with fallback to the cache to avoid blocking the frame.
    pub fn get(&self) -> Reading<T> {
        if let Ok(r) = self.reading.try_read() {
            return r.clone();
        }
        if let Ok(c) = self.cached.read() {
            return c.clone();
        }
        Reading::offline()
    }

    /// Stop the background thread.
    pub fn stop(&self) {
        if let Ok(mut running) = self.running.write() {
            *running = false;
        }
    }
}

impl<T> Drop for Monitor<T> {
    fn drop(&mut self) {
        if let Ok(mut running) = self.running.write() {
            *running = false;
        }
    }
}

/// Sleep up to `period`, returning false as soon as `running` is cleared.
fn sleep_while_running(running: &RwLock<bool>, period: Duration) -> bool {
    let deadline = Instant::now() + period;
    loop {
        if let Ok(is_running) = running.read()
            && !*is_running
        {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

/// Snapshot of every source for one frame.
#[derive(Debug, Clone)]
pub struct SensorReadings {
    pub audio_devices: Reading<AudioDevices>,
    pub orientation: Reading<Orientation>,
    pub position: Reading<Position>,
    /// Host CPU load in [0, 1].
    pub host_load: Reading<f32>,
}

impl SensorReadings {
    pub fn speaker_status(&self) -> SensorStatus {
        self.device_status(|d| d.playback)
    }

    pub fn mic_status(&self) -> SensorStatus {
        self.device_status(|d| d.capture)
    }

    fn device_status(&self, count: impl Fn(&AudioDevices) -> usize) -> SensorStatus {
        match (&self.audio_devices.status, &self.audio_devices.value) {
            (SensorStatus::Online, Some(devices)) if count(devices) > 0 => SensorStatus::Online,
            (SensorStatus::Pending, _) => SensorStatus::Pending,
            _ => SensorStatus::Offline,
        }
    }

    /// Self-noise level for the scope speckle.
    pub fn self_noise(&self) -> f32 {
        self.host_load.value.unwrap_or(0.0).clamp(0.0, 1.0)
    }

    /// Console health across enabled sources and ping audio.
    pub fn system_status(&self, audio: Option<SensorStatus>) -> SystemStatus {
        let mut sources = Vec::with_capacity(6);
        if self.audio_devices.enabled {
            sources.push(self.speaker_status());
            sources.push(self.mic_status());
        }
        if self.orientation.enabled {
            sources.push(self.orientation.status);
        }
        if self.position.enabled {
            sources.push(self.position.status);
        }
        if self.host_load.enabled {
            sources.push(self.host_load.status);
        }
        sources.extend(audio);
        SystemStatus::from_sources(sources)
    }
}

/// Owns every sensor monitor.
#[derive(Debug)]
pub struct SensorHub {
    audio_devices: Monitor<AudioDevices>,
    orientation: Monitor<Orientation>,
    position: Monitor<Position>,
    host_load: Monitor<f32>,
}

impl SensorHub {
    /// Start the sources enabled in `config`.
    pub fn start(config: &SensorConfig) -> Self {
        let audio_devices = if config.audio_devices {
            Monitor::start(
                "audio-devices",
                audio_devices::REFRESH_INTERVAL,
                audio_devices::probe,
            )
        } else {
            Monitor::disabled()
        };

        let orientation = if config.orientation {
            Monitor::start("orientation", orientation::REFRESH_INTERVAL, orientation::probe)
        } else {
            Monitor::disabled()
        };

        let position = match config.manual_position() {
            Some((latitude, longitude)) => Monitor::fixed(Position::manual(latitude, longitude)),
            None if config.geolocation => Monitor::start(
                "geolocation",
                geolocation::REFRESH_INTERVAL,
                geolocation::lookup,
            ),
            None => Monitor::disabled(),
        };

        let host_load = if config.host_load {
            let mut sampler = host_load::HostLoadSampler::new();
            Monitor::start("host-load", host_load::REFRESH_INTERVAL, move || {
                Ok(sampler.sample())
            })
        } else {
            Monitor::disabled()
        };

        Self {
            audio_devices,
            orientation,
            position,
            host_load,
        }
    }

    /// A hub with every source switched off.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            audio_devices: Monitor::disabled(),
            orientation: Monitor::disabled(),
            position: Monitor::disabled(),
            host_load: Monitor::disabled(),
        }
    }

    pub fn readings(&self) -> SensorReadings {
        SensorReadings {
            audio_devices: self.audio_devices.get(),
            orientation: self.orientation.get(),
            position: self.position.get(),
            host_load: self.host_load.get(),
        }
    }

    pub fn stop(&self) {
        self.audio_devices.stop();
        self.orientation.stop();
        self.position.stop();
        self.host_load.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wait_for<T: Clone + Send + Sync + 'static>(monitor: &Monitor<T>) -> Reading<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let reading = monitor.get();
            if reading.status != SensorStatus::Pending || Instant::now() > deadline {
                return reading;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_monitor_publishes_value() {
        let monitor = Monitor::start("test-ok", Duration::from_secs(60), || Ok(42u32));
        let reading = wait_for(&monitor);
        assert_eq!(reading.status, SensorStatus::Online);
        assert_eq!(reading.value, Some(42));
        monitor.stop();
    }

    #[test]
    fn test_monitor_failure_is_offline() {
        let monitor: Monitor<u32> = Monitor::start("test-err", Duration::from_secs(60), || {
            Err(SensorError::Unavailable("no hardware".into()))
        });
        let reading = wait_for(&monitor);
        assert_eq!(reading.status, SensorStatus::Offline);
        assert!(reading.enabled);
        assert!(reading.value.is_none());
    }

    #[test]
    fn test_disabled_hub_is_nominal() {
        let hub = SensorHub::disabled();
        let readings = hub.readings();
        assert_eq!(readings.system_status(None), SystemStatus::Nominal);
        assert_eq!(readings.speaker_status(), SensorStatus::Offline);
        assert_eq!(readings.self_noise(), 0.0);
    }

    #[test]
    fn test_offline_audio_degrades() {
        let readings = SensorHub::disabled().readings();
        assert_eq!(
            readings.system_status(Some(SensorStatus::Offline)),
            SystemStatus::Degraded
        );
    }

    #[test]
    fn test_speaker_and_mic_split() {
        let mut readings = SensorHub::disabled().readings();
        readings.audio_devices = Reading::online(AudioDevices {
            playback: 2,
            capture: 0,
        });
        assert_eq!(readings.speaker_status(), SensorStatus::Online);
        assert_eq!(readings.mic_status(), SensorStatus::Offline);
        assert_eq!(readings.system_status(None), SystemStatus::Degraded);
    }

    #[test]
    fn test_fixed_monitor() {
        let monitor = Monitor::fixed(Position::manual(10.0, 20.0));
        let reading = monitor.get();
        assert_eq!(reading.status, SensorStatus::Online);
        assert_eq!(reading.value.map(|p| p.latitude), Some(10.0));
    }
}
