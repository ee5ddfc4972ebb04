use crate::sampling::error::SamplingError;
use crate::types::lat_lon::{
    is_valid_latitude, is_valid_longitude, LatLon, LATITUDE_BOUNDS, LONGITUDE_BOUNDS,
};
use rand::Rng;
use std::ops::Range;

/// Number of points drawn when no count is configured.
pub const DEFAULT_SAMPLE_COUNT: usize = 1500;

/// Draws uniformly distributed coordinates over a latitude and a longitude range.
///
/// Latitudes and longitudes are drawn independently from the half-open ranges
/// `[start, end)` and paired by position.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSampler {
    latitude_range: Range<f64>,
    longitude_range: Range<f64>,
}

impl Default for CoordinateSampler {
    fn default() -> Self {
        Self {
            latitude_range: LATITUDE_BOUNDS,
            longitude_range: LONGITUDE_BOUNDS,
        }
    }
}

impl CoordinateSampler {
    /// Creates a sampler over custom ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError`] when a range is empty or reaches outside the
    /// valid world bounds.
    pub fn new(
        latitude_range: Range<f64>,
        longitude_range: Range<f64>,
    ) -> Result<Self, SamplingError> {
        if !Self::is_usable(&latitude_range, is_valid_latitude) {
            return Err(SamplingError::InvalidLatitudeRange {
                start: latitude_range.start,
                end: latitude_range.end,
            });
        }
        if !Self::is_usable(&longitude_range, is_valid_longitude) {
            return Err(SamplingError::InvalidLongitudeRange {
                start: longitude_range.start,
                end: longitude_range.end,
            });
        }
        Ok(Self {
            latitude_range,
            longitude_range,
        })
    }

    fn is_usable(range: &Range<f64>, in_bounds: fn(f64) -> bool) -> bool {
        range.start < range.end && in_bounds(range.start) && in_bounds(range.end)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<LatLon> {
        let latitudes: Vec<f64> = (0..count)
            .map(|_| rng.gen_range(self.latitude_range.clone()))
            .collect();
        let longitudes: Vec<f64> = (0..count)
            .map(|_| rng.gen_range(self.longitude_range.clone()))
            .collect();

        latitudes
            .into_iter()
            .zip(longitudes)
            .map(|(lat, lng)| LatLon(lat, lng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_count_and_bounds() {
        let sampler = CoordinateSampler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let points = sampler.sample(&mut rng, DEFAULT_SAMPLE_COUNT);

        assert_eq!(points.len(), DEFAULT_SAMPLE_COUNT);
        for point in &points {
            assert!(point.is_valid(), "{:?} out of bounds", point);
            assert!(point.0 < 90.0 && point.1 < 180.0);
        }
    }

    #[test]
    fn test_sample_covers_both_hemispheres() {
        let sampler = CoordinateSampler::default();
        let mut rng = StdRng::seed_from_u64(42);
        let points = sampler.sample(&mut rng, 500);

        assert!(points.iter().any(|p| p.0 >= 0.0));
        assert!(points.iter().any(|p| p.0 < 0.0));
    }

    #[test]
    fn test_same_seed_same_points() {
        let sampler = CoordinateSampler::default();
        let a = sampler.sample(&mut StdRng::seed_from_u64(1), 10);
        let b = sampler.sample(&mut StdRng::seed_from_u64(1), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_range_is_respected() {
        let sampler = CoordinateSampler::new(10.0..20.0, -5.0..5.0).unwrap();
        let points = sampler.sample(&mut StdRng::seed_from_u64(3), 200);
        for LatLon(lat, lng) in points {
            assert!((10.0..20.0).contains(&lat));
            assert!((-5.0..5.0).contains(&lng));
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let points = CoordinateSampler::default().sample(&mut StdRng::seed_from_u64(0), 0);
        assert!(points.is_empty());
    }

    #[test]
    fn test_invalid_ranges_are_rejected() {
        assert!(matches!(
            CoordinateSampler::new(10.0..10.0, LONGITUDE_BOUNDS),
            Err(SamplingError::InvalidLatitudeRange { .. })
        ));
        assert!(matches!(
            CoordinateSampler::new(-95.0..0.0, LONGITUDE_BOUNDS),
            Err(SamplingError::InvalidLatitudeRange { .. })
        ));
        assert!(matches!(
            CoordinateSampler::new(LATITUDE_BOUNDS, 0.0..181.0),
            Err(SamplingError::InvalidLongitudeRange { .. })
        ));
    }
}
