//! Defines the gazetteer entry used for nearest-city resolution, together with
//! the implementations needed to index it spatially with the `rstar` crate.

use crate::types::lat_lon::LatLon;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A single populated place from the world-cities gazetteer.
///
/// Only `name` travels further down the pipeline (it is the key the weather
/// provider is queried with); the remaining fields exist so the city can be
/// placed in an R-tree and compared by distance.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Lower-case city name as listed in the gazetteer (e.g. "punta arenas").
    pub name: String,
    /// Two-letter country code, lower case (e.g. "cl").
    pub country: String,
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}

/// A city is a point, so its envelope is a degenerate box around
/// `[latitude, longitude]`.
impl RTreeObject for City {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

/// Squared planar distance in degree space. Only used to order R-tree
/// candidates; the final pick is made on haversine distance.
impl PointDistance for City {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}
