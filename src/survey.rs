//! End-to-end survey: sample coordinates, resolve them to cities, collect
//! their current weather, persist the table and report on the reloaded copy.

use crate::cities::locate_city::{CityLocator, NearestCity};
use crate::cities::resolve::resolve_unique_cities;
use crate::collect::collector::{collect_weather, CollectionReport};
use crate::collect::open_weather::WeatherSource;
use crate::error::SurveyError;
use crate::report::reporter::{ReportSummary, Reporter};
use crate::sampling::coordinate_sampler::{CoordinateSampler, DEFAULT_SAMPLE_COUNT};
use crate::table::weather_table::{WeatherTable, TABLE_FILE_NAME};
use crate::utils::{ensure_dir_exists, get_cache_dir};
use bon::bon;
use chrono::{NaiveDate, Utc};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "output_data";

/// What one survey run produced.
#[derive(Debug, Clone)]
pub struct SurveyOutcome {
    /// Unique city names, in the order they were resolved.
    pub cities: Vec<String>,
    pub collection: CollectionReport,
    pub table_path: PathBuf,
    pub report: ReportSummary,
}

/// Runs the survey against a city resolver and a weather source.
///
/// # Examples
///
/// ```no_run
/// # use weather_survey::{CityLocator, OpenWeatherClient, WeatherSurvey, SurveyError};
/// # use weather_survey::DEFAULT_GAZETTEER_URL;
/// # use std::path::Path;
/// # async fn run() -> Result<(), SurveyError> {
/// let locator = CityLocator::new(Path::new("/tmp/cache"), DEFAULT_GAZETTEER_URL).await?;
/// let survey = WeatherSurvey::builder()
///     .resolver(locator)
///     .source(OpenWeatherClient::new("my-api-key"))
///     .build();
///
/// let outcome = survey.run().samples(500).seed(7).call().await?;
/// println!("{} cities, {} rows", outcome.cities.len(), outcome.collection.observations.len());
/// # Ok(())
/// # }
/// ```
pub struct WeatherSurvey<R, S> {
    resolver: R,
    source: S,
    sampler: CoordinateSampler,
    output_dir: PathBuf,
}

#[bon]
impl<R: NearestCity, S: WeatherSource> WeatherSurvey<R, S> {
    /// `sampler` defaults to the whole world, `output_dir` to `output_data`.
    #[builder]
    pub fn new(
        resolver: R,
        source: S,
        sampler: Option<CoordinateSampler>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            source,
            sampler: sampler.unwrap_or_default(),
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Runs every stage once, in order.
    ///
    /// The reporter works on the table as reloaded from disk, so the plots
    /// reflect exactly what was persisted.
    ///
    /// * `.samples(usize)`: number of random points. Defaults to 1500.
    /// * `.seed(u64)`: makes the sampled points reproducible.
    /// * `.run_date(NaiveDate)`: date shown in plot titles. Defaults to today (UTC).
    /// * `.render_plots(bool)`: write the HTML plots. Defaults to `true`.
    #[builder]
    pub async fn run(
        &self,
        samples: Option<usize>,
        seed: Option<u64>,
        run_date: Option<NaiveDate>,
        render_plots: Option<bool>,
    ) -> Result<SurveyOutcome, SurveyError> {
        let samples = samples.unwrap_or(DEFAULT_SAMPLE_COUNT);
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let points = self.sampler.sample(&mut rng, samples);
        let cities = resolve_unique_cities(&self.resolver, &points);
        info!(
            "Resolved {} random points to {} unique cities",
            points.len(),
            cities.len()
        );

        let collection = collect_weather(&self.source, &cities).await;

        let table_path = self.output_dir.join(TABLE_FILE_NAME);
        WeatherTable::from_observations(&collection.observations)?.save(&table_path)?;

        let report = report_saved_table(
            &table_path,
            &self.output_dir,
            run_date.unwrap_or_else(|| Utc::now().date_naive()),
            render_plots.unwrap_or(true),
        )?;

        Ok(SurveyOutcome {
            cities,
            collection,
            table_path,
            report,
        })
    }
}

/// Reloads a persisted table and runs the reporter on it.
pub fn report_saved_table(
    table_path: &Path,
    output_dir: &Path,
    run_date: NaiveDate,
    render_plots: bool,
) -> Result<ReportSummary, SurveyError> {
    let table = WeatherTable::load(table_path)?;

    let mut reporter = Reporter::new(output_dir, run_date);
    if !render_plots {
        reporter = reporter.without_plots();
    }
    Ok(reporter.report(&table)?)
}

/// Builds a locator from a local gazetteer CSV, or from the cached download
/// of `url` when no path is given.
pub async fn load_city_locator(
    gazetteer: Option<&Path>,
    url: &str,
) -> Result<CityLocator, SurveyError> {
    if let Some(path) = gazetteer {
        return Ok(CityLocator::from_csv_file(path).await?);
    }
    let cache_dir = get_cache_dir().map_err(SurveyError::CacheDirResolution)?;
    ensure_dir_exists(&cache_dir)
        .await
        .map_err(|e| SurveyError::CacheDirCreation(cache_dir.clone(), e))?;
    Ok(CityLocator::new(&cache_dir, url).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::error::{FailureKind, FetchFailure};
    use crate::types::lat_lon::LatLon;
    use crate::types::observation::WeatherObservation;
    use tempfile::tempdir;

    /// One city per 10-degree latitude band, named after the band.
    struct BandResolver {
        names: Vec<String>,
    }

    impl BandResolver {
        fn new() -> Self {
            Self {
                names: (0..18).map(|band| format!("band-{}", band)).collect(),
            }
        }
    }

    impl NearestCity for BandResolver {
        fn nearest_city(&self, location: LatLon) -> Option<&str> {
            let band = ((location.0 + 90.0) / 10.0).floor() as usize;
            self.names.get(band.min(17)).map(String::as_str)
        }
    }

    struct NoCities;

    impl NearestCity for NoCities {
        fn nearest_city(&self, _location: LatLon) -> Option<&str> {
            None
        }
    }

    /// Reports the centre of the city's band; band 9 (the equator) is unknown.
    struct BandWeather;

    impl WeatherSource for BandWeather {
        async fn current_weather(&self, city: &str) -> Result<WeatherObservation, FetchFailure> {
            let band: i64 = city
                .trim_start_matches("band-")
                .parse()
                .map_err(|_| FetchFailure::CityNotFound {
                    city: city.to_string(),
                })?;
            if band == 9 {
                return Err(FetchFailure::CityNotFound {
                    city: city.to_string(),
                });
            }
            let latitude = band as f64 * 10.0 - 85.0;
            Ok(WeatherObservation {
                city: city.to_string(),
                latitude,
                longitude: 0.0,
                max_temp: 35.0 - latitude.abs() / 2.0,
                humidity: 50 + band,
                cloudiness: band * 5,
                wind_speed: 1.0 + band as f64 / 4.0,
                country: "ZZ".to_string(),
                date: 1_666_094_400,
            })
        }
    }

    #[tokio::test]
    async fn test_survey_end_to_end() -> Result<(), SurveyError> {
        let dir = tempdir().map_err(SurveyError::CacheDirResolution)?;
        let output_dir = dir.path().join("output_data");
        let survey = WeatherSurvey::builder()
            .resolver(BandResolver::new())
            .source(BandWeather)
            .output_dir(output_dir.clone())
            .build();

        let outcome = survey
            .run()
            .samples(2000)
            .seed(42)
            .run_date(NaiveDate::from_ymd_opt(2022, 10, 18).unwrap())
            .render_plots(false)
            .call()
            .await?;

        // 2000 uniform points hit every band.
        assert_eq!(outcome.cities.len(), 18);
        assert_eq!(outcome.collection.observations.len(), 17);
        assert_eq!(
            outcome.collection.failure_counts().get(&FailureKind::NotFound),
            Some(&1)
        );

        let table = WeatherTable::load(&outcome.table_path)?;
        assert_eq!(table.len(), 17);
        assert_eq!(table.rows()?, outcome.collection.observations);

        // Both hemispheres have enough spread for all four variables.
        assert_eq!(outcome.report.fits().count(), 8);
        assert_eq!(outcome.report.skipped().count(), 0);
        assert!(output_dir.join("regressions.csv").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_makes_runs_reproducible() -> Result<(), SurveyError> {
        let dir = tempdir().map_err(SurveyError::CacheDirResolution)?;
        let survey = WeatherSurvey::builder()
            .resolver(BandResolver::new())
            .source(BandWeather)
            .output_dir(dir.path().to_path_buf())
            .build();

        let first = survey.run().samples(20).seed(3).render_plots(false).call().await?;
        let second = survey.run().samples(20).seed(3).render_plots(false).call().await?;
        assert_eq!(first.cities, second.cities);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_cities_writes_empty_table() -> Result<(), SurveyError> {
        let dir = tempdir().map_err(SurveyError::CacheDirResolution)?;
        let survey = WeatherSurvey::builder()
            .resolver(NoCities)
            .source(BandWeather)
            .output_dir(dir.path().to_path_buf())
            .build();

        let outcome = survey.run().samples(10).seed(1).call().await?;
        assert!(outcome.cities.is_empty());
        assert_eq!(outcome.collection.attempted(), 0);
        assert!(WeatherTable::load(&outcome.table_path)?.is_empty());
        assert!(outcome.report.files.is_empty());
        Ok(())
    }

    #[test]
    fn test_report_missing_table() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("cities.csv");
        let result = report_saved_table(
            &missing,
            dir.path(),
            NaiveDate::from_ymd_opt(2022, 10, 18).unwrap(),
            false,
        );
        assert!(matches!(result, Err(SurveyError::Table(_))));
    }
}
