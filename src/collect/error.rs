use std::fmt;
use thiserror::Error;

/// Why a single city was dropped from the collection run.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("Network request failed for '{city}'")]
    NetworkRequest {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("City '{city}' not found by the weather provider")]
    CityNotFound { city: String },

    #[error("Weather request for '{city}' failed with status {status}")]
    HttpStatus {
        city: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed weather response for '{city}'")]
    MalformedResponse {
        city: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Weather response for '{city}' has coordinates out of range ({lat}, {lon})")]
    InvalidCoordinates { city: String, lat: f64, lon: f64 },
}

impl FetchFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchFailure::NetworkRequest { .. } => FailureKind::Network,
            FetchFailure::CityNotFound { .. } => FailureKind::NotFound,
            FetchFailure::HttpStatus { .. } => FailureKind::HttpStatus,
            FetchFailure::MalformedResponse { .. } => FailureKind::Malformed,
            FetchFailure::InvalidCoordinates { .. } => FailureKind::InvalidCoordinates,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            FetchFailure::NetworkRequest { city, .. }
            | FetchFailure::CityNotFound { city }
            | FetchFailure::HttpStatus { city, .. }
            | FetchFailure::MalformedResponse { city, .. }
            | FetchFailure::InvalidCoordinates { city, .. } => city,
        }
    }
}

/// Category of a [`FetchFailure`], used for aggregate counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    Network,
    NotFound,
    HttpStatus,
    Malformed,
    InvalidCoordinates,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Network => "network",
            FailureKind::NotFound => "not_found",
            FailureKind::HttpStatus => "http_status",
            FailureKind::Malformed => "malformed",
            FailureKind::InvalidCoordinates => "invalid_coordinates",
        };
        write!(f, "{}", name)
    }
}
