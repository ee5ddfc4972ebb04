use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use weather_survey::{linear_regression, City, CityLocator, CoordinateSampler, NearestCity};

fn bench_survey(c: &mut Criterion) {
    let sampler = CoordinateSampler::default();
    let mut rng = StdRng::seed_from_u64(7);

    let cities = sampler
        .sample(&mut rng, 40_000)
        .into_iter()
        .enumerate()
        .map(|(i, p)| City::new(format!("city-{}", i), "xx", p.0, p.1))
        .collect();
    let locator = CityLocator::from_cities(cities);
    let points = sampler.sample(&mut rng, 1500);

    c.bench_function("nearest_city_1500", |b| {
        b.iter(|| {
            points
                .iter()
                .filter_map(|p| locator.nearest_city(black_box(*p)))
                .count()
        })
    });

    let x: Vec<f64> = points.iter().map(|p| p.0).collect();
    let y: Vec<f64> = points.iter().map(|p| 30.0 - 0.4 * p.0.abs() + p.1 / 100.0).collect();
    c.bench_function("linear_regression_1500", |b| {
        b.iter(|| linear_regression(black_box(&x), black_box(&y)))
    });
}

criterion_group!(benches, bench_survey);
criterion_main!(benches);
