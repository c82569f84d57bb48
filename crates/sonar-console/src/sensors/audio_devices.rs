//! Speaker and microphone presence from the ALSA device list.

use std::fs;
use std::path::Path;
use std::time::Duration;

use super::SensorError;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

const PCM_LIST: &str = "/proc/asound/pcm";

/// Number of PCM endpoints in each direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioDevices {
    pub playback: usize,
    pub capture: usize,
}

pub fn probe() -> Result<AudioDevices, SensorError> {
    probe_at(Path::new(PCM_LIST))
}

pub fn probe_at(path: &Path) -> Result<AudioDevices, SensorError> {
    if !path.exists() {
        return Err(SensorError::Unavailable(format!(
            "{} not present",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    Ok(parse_pcm(&text))
}

/// Count endpoints in `/proc/asound/pcm` content.
///
/// Lines look like `00-00: ALC892 Analog : ALC892 Analog : playback 1 : capture 1`.
pub fn parse_pcm(text: &str) -> AudioDevices {
    text.lines().fold(AudioDevices::default(), |mut acc, line| {
        for field in line.split(':').skip(1) {
            let field = field.trim_start();
            if field.starts_with("playback") {
                acc.playback += 1;
            } else if field.starts_with("capture") {
                acc.capture += 1;
            }
        }
        acc
    })
}
