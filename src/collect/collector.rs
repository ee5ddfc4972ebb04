use crate::collect::error::{FailureKind, FetchFailure};
use crate::collect::open_weather::WeatherSource;
use crate::types::observation::WeatherObservation;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;

/// Cities are grouped in sets of this size in the progress log.
pub const PROGRESS_SET_SIZE: usize = 50;

/// A city that was dropped from the run, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCity {
    pub city: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of one collection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionReport {
    /// Successful observations, in request order.
    pub observations: Vec<WeatherObservation>,
    /// Cities the provider could not deliver, in request order.
    pub skipped: Vec<SkippedCity>,
    /// Repeated names in the input that were not requested again.
    pub duplicates: usize,
}

impl CollectionReport {
    pub fn attempted(&self) -> usize {
        self.observations.len() + self.skipped.len()
    }

    pub fn failure_counts(&self) -> BTreeMap<FailureKind, usize> {
        let mut counts = BTreeMap::new();
        for skipped in &self.skipped {
            *counts.entry(skipped.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Requests current weather for each city in order, one request at a time.
///
/// Each distinct name is requested at most once. Failed cities are logged,
/// recorded in the report and skipped; nothing is retried.
pub async fn collect_weather<S: WeatherSource>(source: &S, cities: &[String]) -> CollectionReport {
    let mut report = CollectionReport::default();
    let mut requested: HashSet<&str> = HashSet::with_capacity(cities.len());

    println!("Beginning Data Retrieval     ");
    println!("-----------------------------");

    for (i, city) in cities.iter().enumerate() {
        if !requested.insert(city.as_str()) {
            debug!("Already requested '{}', skipping duplicate", city);
            report.duplicates += 1;
            continue;
        }

        let set = i / PROGRESS_SET_SIZE + 1;
        let record = i % PROGRESS_SET_SIZE + 1;
        info!("Processing Record {} of Set {} | {}", record, set, city);

        match source.current_weather(city).await {
            Ok(observation) => report.observations.push(observation),
            Err(failure) => {
                warn!("Skipping {}", describe(&failure));
                report.skipped.push(SkippedCity {
                    city: failure.city().to_string(),
                    kind: failure.kind(),
                    reason: describe(&failure),
                });
            }
        }
    }

    println!("-----------------------------");
    println!("Data Retrieval Complete      ");
    println!("-----------------------------");

    info!(
        "Collected {} of {} cities ({} skipped, {} duplicates)",
        report.observations.len(),
        report.attempted(),
        report.skipped.len(),
        report.duplicates
    );
    for (kind, count) in report.failure_counts() {
        info!("  {}: {}", kind, count);
    }

    report
}

/// Error message including its source chain.
fn describe(failure: &FetchFailure) -> String {
    let mut message = failure.to_string();
    let mut source = failure.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
