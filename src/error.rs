use crate::cities::error::LocateCityError;
use crate::report::error::ReportError;
use crate::sampling::error::SamplingError;
use crate::table::error::TableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    LocateCity(#[from] LocateCityError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("No OpenWeatherMap API key configured (set OPENWEATHER_API_KEY or pass --api-key)")]
    MissingApiKey,

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
