use crate::cities::locate_city::NearestCity;
use crate::types::lat_lon::LatLon;
use log::{debug, warn};
use std::collections::HashSet;

/// Resolves every point to its nearest city and keeps each city name once,
/// in order of first appearance.
///
/// The result is never longer than `points`; many random points fall in the
/// ocean and share the same nearest coastal town.
pub fn resolve_unique_cities<R: NearestCity + ?Sized>(resolver: &R, points: &[LatLon]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(points.len());
    let mut cities = Vec::new();

    for point in points {
        let Some(name) = resolver.nearest_city(*point) else {
            warn!("No city found near ({:.4}, {:.4}), skipping point", point.0, point.1);
            continue;
        };
        if seen.insert(name) {
            cities.push(name.to_string());
        } else {
            debug!("Duplicate city '{}' for ({:.4}, {:.4})", name, point.0, point.1);
        }
    }

    cities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::locate_city::CityLocator;
    use crate::sampling::coordinate_sampler::CoordinateSampler;
    use crate::types::city::City;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Names a city per 10-degree latitude band, ignoring longitude.
    struct BandResolver {
        names: Vec<String>,
    }

    impl BandResolver {
        fn new() -> Self {
            Self {
                names: (0..=18).map(|band| format!("band-{}", band)).collect(),
            }
        }
    }

    impl NearestCity for BandResolver {
        fn nearest_city(&self, location: LatLon) -> Option<&str> {
            let band = ((location.0 + 90.0) / 10.0).floor() as usize;
            self.names.get(band).map(String::as_str)
        }
    }

    #[test]
    fn test_duplicates_keep_first_appearance_order() {
        let resolver = BandResolver::new();
        let points = [
            LatLon(45.0, 0.0),
            LatLon(-45.0, 10.0),
            LatLon(46.0, 100.0),
            LatLon(5.0, 0.0),
            LatLon(-44.0, -120.0),
        ];
        let cities = resolve_unique_cities(&resolver, &points);
        assert_eq!(cities, ["band-13", "band-4", "band-9"]);
    }

    #[test]
    fn test_unique_and_never_longer_than_input() {
        let resolver = BandResolver::new();
        let sampler = CoordinateSampler::default();
        let mut rng = StdRng::seed_from_u64(11);

        for n in [1, 2, 17, 300] {
            let points = sampler.sample(&mut rng, n);
            let cities = resolve_unique_cities(&resolver, &points);

            assert!(cities.len() <= n);
            assert!(!cities.is_empty());
            let unique: HashSet<_> = cities.iter().collect();
            assert_eq!(unique.len(), cities.len());
        }
    }

    #[test]
    fn test_with_locator() {
        let locator = CityLocator::from_cities(vec![
            City::new("paris", "fr", 48.866667, 2.333333),
            City::new("london", "gb", 51.514125, -0.093689),
        ]);
        let points = [LatLon(48.0, 2.0), LatLon(52.0, 0.0), LatLon(49.0, 3.0)];
        assert_eq!(resolve_unique_cities(&locator, &points), ["paris", "london"]);
    }

    #[test]
    fn test_unresolvable_points_are_skipped() {
        let locator = CityLocator::from_cities(vec![]);
        let points = [LatLon(0.0, 0.0), LatLon(10.0, 10.0)];
        assert!(resolve_unique_cities(&locator, &points).is_empty());
    }
}
