//! Host CPU load, shown on the scope as self-noise.

use std::time::Duration;

use sysinfo::System;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Keeps a `System` between samples so CPU usage has a baseline.
#[derive(Debug)]
pub struct HostLoadSampler {
    sys: System,
}

impl Default for HostLoadSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl HostLoadSampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        Self { sys }
    }

    /// Average CPU usage across all cores (0.0 - 1.0).
    pub fn sample(&mut self) -> f32 {
        self.sys.refresh_cpu_all();
        average_usage(self.sys.cpus().iter().map(|c| c.cpu_usage()))
    }
}

/// Mean of per-core percentages, as a fraction.
fn average_usage(cores: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = cores.fold((0.0, 0usize), |(s, n), usage| (s + usage, n + 1));
    (sum / count.max(1) as f32 / 100.0).clamp(0.0, 1.0)
}
