mod cities;
mod collect;
mod error;
mod report;
mod sampling;
mod survey;
mod table;
mod types;
mod utils;

pub use error::SurveyError;
pub use survey::*;

pub use sampling::coordinate_sampler::{CoordinateSampler, DEFAULT_SAMPLE_COUNT};
pub use sampling::error::SamplingError;

pub use cities::error::LocateCityError;
pub use cities::locate_city::{parse_gazetteer_csv, CityLocator, NearestCity, DEFAULT_GAZETTEER_URL};
pub use cities::resolve::resolve_unique_cities;

pub use collect::collector::{collect_weather, CollectionReport, SkippedCity, PROGRESS_SET_SIZE};
pub use collect::error::{FailureKind, FetchFailure};
pub use collect::open_weather::{parse_observation, OpenWeatherClient, WeatherSource, DEFAULT_WEATHER_URL};

pub use table::error::TableError;
pub use table::weather_table::{WeatherTable, TABLE_FILE_NAME};

pub use report::error::ReportError;
pub use report::plot::{write_latitude_scatter, write_regression_plot};
pub use report::regression::{linear_regression, LinearFit, RegressionError};
pub use report::reporter::{
    hemisphere_regressions, write_regression_summary, HemisphereRegression, ReportSummary,
    Reporter, REGRESSION_SUMMARY_FILE_NAME,
};

pub use types::city::City;
pub use types::hemisphere::Hemisphere;
pub use types::lat_lon::{is_valid_latitude, is_valid_longitude, LatLon, LATITUDE_BOUNDS, LONGITUDE_BOUNDS};
pub use types::observation::WeatherObservation;
pub use types::weather_variable::*;
