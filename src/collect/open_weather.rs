//! Client for the OpenWeatherMap current-weather endpoint.

use crate::collect::error::FetchFailure;
use crate::types::lat_lon::LatLon;
use crate::types::observation::WeatherObservation;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// A provider of current weather conditions, queried by city name.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, FetchFailure>;
}

/// The subset of the provider's response body that ends up in an observation.
/// Every field is required; a missing key fails deserialization.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    coord: Coord,
    main: MainReadings,
    clouds: Clouds,
    wind: Wind,
    sys: Sys,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp_max: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: i64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
}

pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_WEATHER_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<WeatherObservation, FetchFailure> {
        let network_error = |source| FetchFailure::NetworkRequest {
            city: city.to_string(),
            source,
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("q", city),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchFailure::CityNotFound {
                city: city.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus {
                city: city.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(network_error)?;
        debug!("Weather response for '{}': {} bytes", city, body.len());
        parse_observation(city, &body)
    }
}

/// Turns a current-weather response body into an observation for `city`.
pub fn parse_observation(city: &str, body: &str) -> Result<WeatherObservation, FetchFailure> {
    let response: CurrentWeatherResponse =
        serde_json::from_str(body).map_err(|source| FetchFailure::MalformedResponse {
            city: city.to_string(),
            source,
        })?;

    if !LatLon(response.coord.lat, response.coord.lon).is_valid() {
        return Err(FetchFailure::InvalidCoordinates {
            city: city.to_string(),
            lat: response.coord.lat,
            lon: response.coord.lon,
        });
    }

    Ok(WeatherObservation {
        city: city.to_string(),
        latitude: response.coord.lat,
        longitude: response.coord.lon,
        max_temp: response.main.temp_max,
        humidity: response.main.humidity,
        cloudiness: response.clouds.all,
        wind_speed: response.wind.speed,
        country: response.sys.country,
        date: response.dt,
    })
}
