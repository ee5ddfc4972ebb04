use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("Latitude range {start}..{end} is empty or outside -90..90")]
    InvalidLatitudeRange { start: f64, end: f64 },

    #[error("Longitude range {start}..{end} is empty or outside -180..180")]
    InvalidLongitudeRange { start: f64, end: f64 },
}
