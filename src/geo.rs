//! IP geolocation
//!
//! One GET to an ipapi-style endpoint returning `{latitude, longitude, city}`.
//! Every failure (network, timeout, HTTP status, odd body) ends up as "no
//! location": callers get an `Option` and keep their configured coordinates.

use crate::config::Config;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";

/// Upper bound for the whole request
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A located position
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.city {
            Some(city) => write!(f, "{} ({:.4}, {:.4})", city, self.latitude, self.longitude),
            None => write!(f, "({:.4}, {:.4})", self.latitude, self.longitude),
        }
    }
}

/// Why a lookup produced no location
#[derive(Debug)]
pub enum GeoError {
    /// HTTP client could not be built
    Client(String),
    /// Connection failure or timeout
    Network(String),
    /// Non-success HTTP status
    Status(u16),
    /// Body was not a usable location
    Malformed(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(msg) => write!(f, "HTTP client error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status(code) => write!(f, "Geolocation service returned HTTP {}", code),
            Self::Malformed(msg) => write!(f, "Unusable geolocation response: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

/// Response body; ipapi.co reports failures as `{"error": true, "reason": ..}`
#[derive(Debug, Deserialize)]
struct GeoResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Parse a response body into a location
pub fn parse_response(body: &str) -> Result<GeoLocation, GeoError> {
    let response: GeoResponse =
        serde_json::from_str(body).map_err(|e| GeoError::Malformed(e.to_string()))?;

    if response.error {
        return Err(GeoError::Malformed(
            response.reason.unwrap_or_else(|| "service error".to_string()),
        ));
    }

    let (Some(latitude), Some(longitude)) = (response.latitude, response.longitude) else {
        return Err(GeoError::Malformed("missing coordinates".to_string()));
    };
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoError::Malformed(format!(
            "coordinates out of range: {}, {}",
            latitude, longitude
        )));
    }

    Ok(GeoLocation {
        latitude,
        longitude,
        city: response.city.filter(|c| !c.trim().is_empty()),
    })
}

/// Geolocation client
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    url: String,
}

impl GeoLocator {
    pub fn new(url: impl Into<String>) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(concat!("suntint/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeoError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn lookup_inner(&self) -> Result<GeoLocation, GeoError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeoError::Network(e.to_string()))?;
        parse_response(&body)
    }

    /// Look up the current position; `None` on any failure
    pub async fn lookup(&self) -> Option<GeoLocation> {
        match self.lookup_inner().await {
            Ok(location) => {
                tracing::info!("Detected location: {}", location);
                Some(location)
            }
            Err(e) => {
                tracing::warn!("Location lookup failed: {}", e);
                None
            }
        }
    }
}

/// Record a lookup result in the config. The initialized flag is set whether
/// or not a location was found, so the lookup runs only once.
/// Returns true when coordinates changed.
pub fn record_detection(config: &mut Config, found: Option<&GeoLocation>) -> bool {
    config.location_initialized = true;
    match found {
        Some(location) => {
            let changed = config.solar.latitude != location.latitude
                || config.solar.longitude != location.longitude;
            config.solar.latitude = location.latitude;
            config.solar.longitude = location.longitude;
            changed
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_ipapi_body() {
        let body = r#"{"ip":"203.0.113.7","city":"Lisbon","latitude":38.7223,"longitude":-9.1393,"country":"PT"}"#;
        let location = parse_response(body).expect("location");
        assert_eq!(location.latitude, 38.7223);
        assert_eq!(location.longitude, -9.1393);
        assert_eq!(location.city.as_deref(), Some("Lisbon"));
        assert_eq!(location.to_string(), "Lisbon (38.7223, -9.1393)");
    }

    #[test]
    fn test_service_error_is_malformed() {
        let body = r#"{"error":true,"reason":"RateLimited"}"#;
        let err = parse_response(body).expect_err("rate limited");
        assert!(matches!(err, GeoError::Malformed(ref reason) if reason == "RateLimited"));
    }

    #[test]
    fn test_missing_or_bad_coordinates() {
        assert!(matches!(
            parse_response(r#"{"city":"Nowhere"}"#),
            Err(GeoError::Malformed(_))
        ));
        assert!(matches!(
            parse_response(r#"{"latitude":95.0,"longitude":0.0}"#),
            Err(GeoError::Malformed(_))
        ));
        assert!(matches!(
            parse_response("<html>"),
            Err(GeoError::Malformed(_))
        ));
    }

    #[test]
    fn test_blank_city_is_dropped() {
        let location =
            parse_response(r#"{"latitude":1.5,"longitude":2.5,"city":" "}"#).expect("location");
        assert_eq!(location.city, None);
        assert_eq!(location.to_string(), "(1.5000, 2.5000)");
    }

    #[test]
    fn test_record_detection_sets_flag_either_way() {
        let mut config = Config::default();
        assert!(!record_detection(&mut config, None));
        assert!(config.location_initialized);
        assert_eq!(config.solar.latitude, Config::default().solar.latitude);

        let mut config = Config::default();
        let found = GeoLocation {
            latitude: -33.8688,
            longitude: 151.2093,
            city: Some("Sydney".to_string()),
        };
        assert!(record_detection(&mut config, Some(&found)));
        assert!(config.location_initialized);
        assert_eq!(config.solar.latitude, -33.8688);
        assert_eq!(config.solar.longitude, 151.2093);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_gives_none() {
        // Port 9 on localhost: connection refused, well inside the timeout
        let locator = GeoLocator::new("http://127.0.0.1:9/json/").expect("client");
        assert_eq!(locator.lookup().await, None);
    }
}
