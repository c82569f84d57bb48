//! Approximate position from an IP geolocation lookup.

use std::time::Duration;

use serde::Deserialize;

use super::SensorError;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Request timeout for the lookup.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const LOOKUP_URL: &str = "https://ipapi.co/json/";

/// Observer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Place name, when the lookup provides one.
    pub place: Option<String>,
}

impl Position {
    pub fn manual(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            place: None,
        }
    }

    pub fn coords(&self) -> String {
        format_coords(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

pub fn lookup() -> Result<Position, SensorError> {
    let agent = ureq::Agent::config_builder()
        .timeout_global(Some(REQUEST_TIMEOUT))
        .build()
        .new_agent();

    let response: LookupResponse = agent
        .get(LOOKUP_URL)
        .call()
        .map_err(|e| SensorError::Http(e.to_string()))?
        .body_mut()
        .read_json()
        .map_err(|e| SensorError::Parse(e.to_string()))?;

    position_from(response)
}

fn position_from(response: LookupResponse) -> Result<Position, SensorError> {
    if response.error {
        return Err(SensorError::Http(
            response.reason.unwrap_or_else(|| "lookup refused".into()),
        ));
    }
    let (Some(latitude), Some(longitude)) = (response.latitude, response.longitude) else {
        return Err(SensorError::Parse("response has no coordinates".into()));
    };

    let place = match (response.city, response.country_name) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (city, country) => city.or(country),
    };

    Ok(Position {
        latitude,
        longitude,
        place,
    })
}

/// Format as `59.9127°N 10.7461°E`.
pub fn format_coords(latitude: f64, longitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.4}°{ns} {:.4}°{ew}",
        latitude.abs(),
        longitude.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Position, SensorError> {
        position_from(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(59.91273, 10.74609), "59.9127°N 10.7461°E");
        assert_eq!(format_coords(-33.8688, -70.0), "33.8688°S 70.0000°W");
    }

    #[test]
    fn test_parse_response() {
        let position = parse(
            r#"{"ip":"1.2.3.4","city":"Oslo","country_name":"Norway",
                "latitude":59.9127,"longitude":10.7461}"#,
        )
        .unwrap();
        assert_eq!(position.place.as_deref(), Some("Oslo, Norway"));
        assert_eq!(position.coords(), "59.9127°N 10.7461°E");
    }

    #[test]
    fn test_rate_limited_response() {
        let err = parse(r#"{"error":true,"reason":"RateLimited"}"#).unwrap_err();
        assert!(matches!(err, SensorError::Http(reason) if reason == "RateLimited"));
    }

    #[test]
    fn test_missing_coordinates() {
        assert!(matches!(
            parse(r#"{"city":"Nowhere"}"#),
            Err(SensorError::Parse(_))
        ));
    }
}
