//! Device attitude from Linux IIO accelerometer and magnetometer channels.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::SensorError;

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

const IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Device attitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
    /// Compass heading, present only with a magnetometer.
    pub heading: Option<f32>,
}

pub fn probe() -> Result<Orientation, SensorError> {
    probe_at(Path::new(IIO_ROOT))
}

/// Read the first accelerometer (and magnetometer, if any) under `root`.
pub fn probe_at(root: &Path) -> Result<Orientation, SensorError> {
    let devices = list_devices(root)?;

    let accel = devices
        .iter()
        .find_map(|dir| read_vector(dir, "accel"))
        .ok_or_else(|| SensorError::Unavailable("no accelerometer".into()))?;
    let (pitch, roll) = tilt(accel);

    let heading = devices
        .iter()
        .find_map(|dir| read_vector(dir, "magn"))
        .map(|magn| tilt_compensated_heading(magn, pitch, roll));

    Ok(Orientation {
        pitch,
        roll,
        heading,
    })
}

fn list_devices(root: &Path) -> Result<Vec<PathBuf>, SensorError> {
    if !root.exists() {
        return Err(SensorError::Unavailable(format!(
            "{} not present",
            root.display()
        )));
    }
    let mut devices: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    devices.sort();
    Ok(devices)
}

/// Scaled `(x, y, z)` for channel `kind` (`accel` or `magn`).
fn read_vector(dir: &Path, kind: &str) -> Option<(f32, f32, f32)> {
    let scale = read_number(&dir.join(format!("in_{kind}_scale"))).unwrap_or(1.0);
    let axis = |a: &str| read_number(&dir.join(format!("in_{kind}_{a}_raw"))).map(|v| v * scale);
    Some((axis("x")?, axis("y")?, axis("z")?))
}

fn read_number(path: &Path) -> Option<f32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Pitch and roll in degrees from a gravity vector.
pub fn tilt((x, y, z): (f32, f32, f32)) -> (f32, f32) {
    let pitch = (-x).atan2((y * y + z * z).sqrt()).to_degrees();
    let roll = y.atan2(z).to_degrees();
    (pitch, roll)
}

/// Heading in [0, 360) from a magnetic field vector and known tilt.
pub fn tilt_compensated_heading((mx, my, mz): (f32, f32, f32), pitch: f32, roll: f32) -> f32 {
    let (p, r) = (pitch.to_radians(), roll.to_radians());
    let xh = mx * p.cos() + mz * p.sin();
    let yh = mx * r.sin() * p.sin() + my * r.cos() - mz * r.sin() * p.cos();
    let heading = (-yh).atan2(xh).to_degrees().rem_euclid(360.0);
    if heading >= 360.0 { 0.0 } else { heading }
}
