//! Sensor availability as shown on the HUD.

/// Availability of a best-effort sensor source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SensorStatus {
    /// Probe has not reported yet.
    #[default]
    Pending,
    Online,
    Offline,
}

impl SensorStatus {
    pub fn label(self) -> &'static str {
        match self {
            SensorStatus::Pending => "SCANNING",
            SensorStatus::Online => "ONLINE",
            SensorStatus::Offline => "OFFLINE",
        }
    }

    pub fn is_offline(self) -> bool {
        self == SensorStatus::Offline
    }
}

/// Overall console health derived from the individual sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Nominal,
    Degraded,
}

impl SystemStatus {
    /// Aggregate the statuses of every enabled source.
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = SensorStatus>,
    {
        if sources.into_iter().any(SensorStatus::is_offline) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Nominal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::Nominal => "NOMINAL",
            SystemStatus::Degraded => "DEGRADED",
        }
    }
}
