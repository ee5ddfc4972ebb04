//! Geographic coordinates and the bounds they are validated against.

use std::ops::Range;

/// Valid latitudes in decimal degrees.
pub const LATITUDE_BOUNDS: Range<f64> = -90.0..90.0;
/// Valid longitudes in decimal degrees.
pub const LONGITUDE_BOUNDS: Range<f64> = -180.0..180.0;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use weather_survey::LatLon;
///
/// let paris = LatLon(48.8566, 2.3522);
/// assert_eq!(paris.0, 48.8566); // Latitude
/// assert_eq!(paris.1, 2.3522); // Longitude
/// assert!(paris.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// `true` when both components lie inside the closed world bounds
    /// (`[-90, 90]` and `[-180, 180]`).
    pub fn is_valid(&self) -> bool {
        is_valid_latitude(self.0) && is_valid_longitude(self.1)
    }
}

pub fn is_valid_latitude(latitude: f64) -> bool {
    (LATITUDE_BOUNDS.start..=LATITUDE_BOUNDS.end).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    (LONGITUDE_BOUNDS.start..=LONGITUDE_BOUNDS.end).contains(&longitude)
}
