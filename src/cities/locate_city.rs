use crate::cities::error::LocateCityError;
use crate::types::city::City;
use crate::types::lat_lon::LatLon;
use async_compression::tokio::bufread::GzipDecoder;
use bincode::config::{Configuration, Fixint, LittleEndian};
use futures_util::TryStreamExt;
use haversine::{distance, Location as HaversineLocation, Units};
use log::{info, warn};
use ordered_float::OrderedFloat;
use polars::prelude::*;
use reqwest::Client;
use rstar::RTree;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

/// World cities table shipped with the citipy gazetteer
/// (`country,city,latitude,longitude`, lower-case names).
pub const DEFAULT_GAZETTEER_URL: &str =
    "https://raw.githubusercontent.com/wingchen/citipy/master/citipy/worldcities.csv";
const BINCODE_CACHE_FILE_NAME: &str = "world_cities.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

const GAZETTEER_COLUMNS: usize = 4;
// R-tree order is planar; re-rank this many candidates by haversine distance.
const CANDIDATE_LIMIT: usize = 8;

/// Anything that can name the city closest to a coordinate.
pub trait NearestCity {
    /// Name of the city nearest to `location`, or `None` when nothing is known.
    fn nearest_city(&self, location: LatLon) -> Option<&str>;
}

/// Spatial index over a city gazetteer.
#[derive(Debug, Clone)]
pub struct CityLocator {
    rtree: RTree<City>,
}

impl CityLocator {
    /// Loads the gazetteer from the binary cache in `cache_dir`, downloading it
    /// from `url` (and writing the cache) when the cache file is missing.
    pub async fn new(cache_dir: &Path, url: &str) -> Result<Self, LocateCityError> {
        let cache_file = cache_dir.join(BINCODE_CACHE_FILE_NAME);

        let cities: Vec<City> = if cache_file.exists() {
            let path_clone = cache_file.clone();
            tokio::task::spawn_blocking(move || Self::get_cached_cities(&path_clone)).await??
        } else {
            info!("Gazetteer cache not found. Fetching from URL: {}", url);
            let cities = Self::fetch_cities(url).await?;
            Self::cache_cities(cities.clone(), &cache_file).await?;
            cities
        };

        Ok(Self::from_cities(cities))
    }

    /// Builds a locator from a local gazetteer CSV, bypassing cache and network.
    pub async fn from_csv_file(path: &Path) -> Result<Self, LocateCityError> {
        let path_buf = path.to_path_buf();
        let cities = tokio::task::spawn_blocking(move || parse_gazetteer_csv(&path_buf)).await??;
        Ok(Self::from_cities(cities))
    }

    pub fn from_cities(cities: Vec<City>) -> Self {
        if cities.is_empty() {
            warn!("Gazetteer is empty, no coordinate will resolve to a city");
        }
        CityLocator {
            rtree: RTree::bulk_load(cities),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    fn get_cached_cities(cache_path: &Path) -> Result<Vec<City>, LocateCityError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| LocateCityError::CacheRead(cache_path.to_path_buf(), e))?;
        let (decoded, _) = bincode::serde::decode_from_slice::<Vec<City>, _>(
            &bytes,
            BINCODE_CONFIG,
        )
        .map_err(|e| LocateCityError::CacheDecode(cache_path.to_path_buf(), Box::from(e)))?;
        Ok(decoded)
    }

    async fn fetch_cities(url: &str) -> Result<Vec<City>, LocateCityError> {
        let client = Client::new();
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| LocateCityError::NetworkRequest(url.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.status() {
                    Some(status) => LocateCityError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => LocateCityError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        let stream = response.bytes_stream().map_err(io::Error::other);
        let stream_reader = BufReader::new(StreamReader::new(stream));
        let mut raw = Vec::new();
        if url.ends_with(".gz") {
            let mut decoder = BufReader::new(GzipDecoder::new(stream_reader));
            decoder.read_to_end(&mut raw).await?;
        } else {
            let mut reader = stream_reader;
            reader.read_to_end(&mut raw).await?;
        }
        info!("Downloaded gazetteer ({} bytes) from {}", raw.len(), url);

        let parse_start = std::time::Instant::now();
        let cities = tokio::task::spawn_blocking(move || -> Result<Vec<City>, LocateCityError> {
            let mut temp_file = NamedTempFile::new()?;
            temp_file.write_all(&raw)?;
            temp_file.flush()?;
            parse_gazetteer_csv(temp_file.path())
        })
        .await??;
        info!(
            "Parsed {} cities from CSV in {:?}",
            cities.len(),
            parse_start.elapsed()
        );
        Ok(cities)
    }

    async fn cache_cities(cities: Vec<City>, cache_path: &Path) -> Result<(), LocateCityError> {
        let bincode_data = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(cities, BINCODE_CONFIG)
                .map_err(|e| LocateCityError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(cache_path, &bincode_data)
            .await
            .map_err(|e| LocateCityError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Wrote gazetteer cache ({} bytes) to {}",
            bincode_data.len(),
            cache_path.display()
        );
        Ok(())
    }

    /// The nearest city to `location` and its great-circle distance in km.
    pub fn query(&self, location: LatLon) -> Option<(&City, f64)> {
        self.rtree
            .nearest_neighbor_iter(&[location.0, location.1])
            .take(CANDIDATE_LIMIT)
            .map(|city| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude: location.0,
                        longitude: location.1,
                    },
                    HaversineLocation {
                        latitude: city.latitude,
                        longitude: city.longitude,
                    },
                    Units::Kilometers,
                );
                (city, dist_km)
            })
            .min_by_key(|(_, dist_km)| OrderedFloat(*dist_km))
    }
}

impl NearestCity for CityLocator {
    fn nearest_city(&self, location: LatLon) -> Option<&str> {
        self.query(location).map(|(city, _)| city.name.as_str())
    }
}

/// Reads a gazetteer CSV with a header row and the columns
/// `country, city, latitude, longitude` (matched by position, extra columns ignored).
/// Rows with a missing name or coordinate are dropped.
pub fn parse_gazetteer_csv(path: &Path) -> Result<Vec<City>, LocateCityError> {
    let csv_error = |source| LocateCityError::CsvRead {
        path: path.to_path_buf(),
        source,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    if df.width() < GAZETTEER_COLUMNS {
        return Err(LocateCityError::SchemaMismatch {
            path: path.to_path_buf(),
            expected: GAZETTEER_COLUMNS,
            found: df.width(),
        });
    }

    let column = |idx: usize, dtype: &DataType| -> Result<Column, LocateCityError> {
        let columns = df.get_columns();
        columns[idx].cast(dtype).map_err(csv_error)
    };
    let countries = column(0, &DataType::String)?;
    let names = column(1, &DataType::String)?;
    let latitudes = column(2, &DataType::Float64)?;
    let longitudes = column(3, &DataType::Float64)?;

    let cities = countries
        .str()
        .map_err(csv_error)?
        .into_iter()
        .zip(names.str().map_err(csv_error)?)
        .zip(latitudes.f64().map_err(csv_error)?)
        .zip(longitudes.f64().map_err(csv_error)?)
        .filter_map(|(((country, name), lat), lng)| {
            let (name, lat, lng) = (name?, lat?, lng?);
            LatLon(lat, lng)
                .is_valid()
                .then(|| City::new(name, country.unwrap_or_default(), lat, lng))
        })
        .collect();

    Ok(cities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_cache_dir;

    fn sample_cities() -> Vec<City> {
        vec![
            City::new("paris", "fr", 48.866667, 2.333333),
            City::new("london", "gb", 51.514125, -0.093689),
            City::new("ushuaia", "ar", -54.8, -68.3),
            City::new("hilo", "us", 19.729722, -155.09),
            City::new("suva", "fj", -18.133333, 178.416667),
            City::new("taveuni", "fj", -16.85, -179.966667),
        ]
    }

    #[test]
    fn test_query_exact_location() {
        let locator = CityLocator::from_cities(sample_cities());
        let (city, dist) = locator.query(LatLon(48.866667, 2.333333)).unwrap();
        assert_eq!(city.name, "paris");
        assert!(dist < 1e-6);
    }

    #[test]
    fn test_query_picks_nearest() {
        let locator = CityLocator::from_cities(sample_cities());
        // Somewhere over the Channel, closer to London than to Paris.
        assert_eq!(locator.nearest_city(LatLon(51.0, 0.0)), Some("london"));
        assert_eq!(locator.nearest_city(LatLon(-60.0, -70.0)), Some("ushuaia"));
        assert_eq!(locator.nearest_city(LatLon(20.0, -150.0)), Some("hilo"));
    }

    #[test]
    fn test_query_empty_gazetteer() {
        let locator = CityLocator::from_cities(vec![]);
        assert!(locator.is_empty());
        assert_eq!(locator.nearest_city(LatLon(0.0, 0.0)), None);
    }

    #[test]
    fn test_parse_gazetteer_csv() -> Result<(), LocateCityError> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Country,City,Latitude,Longitude")?;
        writeln!(file, "fr,paris,48.866667,2.333333")?;
        writeln!(file, "gb,london,51.514125,-0.093689")?;
        writeln!(file, "xx,nowhere,,10.0")?;
        writeln!(file, "ar,ushuaia,-54.8,-68.3")?;
        file.flush()?;

        let cities = parse_gazetteer_csv(file.path())?;
        let names: Vec<_> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["paris", "london", "ushuaia"]);
        assert_eq!(cities[2].country, "ar");
        assert_eq!(cities[2].latitude, -54.8);
        Ok(())
    }

    #[test]
    fn test_parse_gazetteer_too_few_columns() -> Result<(), LocateCityError> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Country,City")?;
        writeln!(file, "fr,paris")?;
        file.flush()?;

        let result = parse_gazetteer_csv(file.path());
        assert!(matches!(
            result,
            Err(LocateCityError::SchemaMismatch { found: 2, .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_cache_round_trip() -> Result<(), LocateCityError> {
        let dir = tempfile::tempdir()?;
        let cache_file = dir.path().join(BINCODE_CACHE_FILE_NAME);
        CityLocator::cache_cities(sample_cities(), &cache_file).await?;

        // The cache is present, so the URL is never contacted.
        let locator = CityLocator::new(dir.path(), "http://invalid.localhost/cities.csv").await?;
        assert_eq!(locator.len(), sample_cities().len());
        assert_eq!(locator.nearest_city(LatLon(-18.0, 178.0)), Some("suva"));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "downloads the world cities gazetteer"]
    async fn test_default_gazetteer() -> Result<(), LocateCityError> {
        let cache_path = get_cache_dir().expect("Failed to get cache dir for tests");
        tokio::fs::create_dir_all(&cache_path).await?;
        let locator = CityLocator::new(&cache_path, DEFAULT_GAZETTEER_URL).await?;

        assert!(locator.len() > 10_000);
        assert_eq!(locator.nearest_city(LatLon(48.8566, 2.3522)), Some("paris"));
        Ok(())
    }
}
