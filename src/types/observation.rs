//! The record produced for every city the weather provider answered for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current weather conditions for one city, as reported by the provider.
///
/// Created once per successful response and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// The city name the provider was queried with.
    pub city: String,
    /// Latitude reported by the provider, in decimal degrees.
    pub latitude: f64,
    /// Longitude reported by the provider, in decimal degrees.
    pub longitude: f64,
    /// Maximum temperature in degrees Celsius.
    pub max_temp: f64,
    /// Relative humidity in percent.
    pub humidity: i64,
    /// Cloud cover in percent.
    pub cloudiness: i64,
    /// Wind speed in metres per second.
    pub wind_speed: f64,
    /// ISO 3166 country code (e.g. "FR"). The provider must send one; only a
    /// reloaded table with a blank cell yields an empty string.
    pub country: String,
    /// Time of the observation as Unix epoch seconds.
    pub date: i64,
}

impl WeatherObservation {
    /// The observation time as a UTC datetime, if the timestamp is representable.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}
