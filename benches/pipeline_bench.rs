//! Benchmarks for the Worldpop pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use worldpop::dataset::{Dataset, Metric, Record};
use worldpop::pipeline::{aggregate, filter_records, FilterSelection, InteractionController, Trigger};

const CONTINENTS: [&str; 5] = ["Africa", "Americas", "Asia", "Europe", "Oceania"];

/// `countries` countries observed every five years from 1952 to 2007
fn create_test_dataset(countries: usize) -> Dataset {
    let mut records = Vec::with_capacity(countries * 12);
    for i in 0..countries {
        let continent = CONTINENTS[i % CONTINENTS.len()];
        let iso = format!(
            "{}{}{}",
            (b'A' + (i / 676 % 26) as u8) as char,
            (b'A' + (i / 26 % 26) as u8) as char,
            (b'A' + (i % 26) as u8) as char
        );
        for (step, year) in (1952..=2007).step_by(5).enumerate() {
            records.push(
                Record::new(format!("Country {}", i), continent, year, iso.clone())
                    .pop(1_000_000 + (i * 1_000 + step * 10) as u64)
                    .life_exp(40.0 + step as f64 * 2.5)
                    .gdp_percap(500.0 + (i % 97) as f64 * 100.0),
            );
        }
    }
    Dataset::from_records(records).unwrap()
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    for countries in [142, 1_000] {
        let dataset = create_test_dataset(countries);
        let selection = FilterSelection::defaults(&dataset, Metric::LifeExp);

        group.throughput(Throughput::Elements(dataset.len() as u64));

        group.bench_function(format!("filter_{}", countries), |b| {
            b.iter(|| filter_records(black_box(&dataset), black_box(&selection)))
        });

        let filtered = filter_records(&dataset, &selection);

        group.bench_function(format!("aggregate_{}", countries), |b| {
            b.iter(|| aggregate(black_box(&filtered)))
        });
    }

    group.finish();
}

fn bench_controller(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller");

    let controller = InteractionController::new(Arc::new(create_test_dataset(142)));
    let everything = FilterSelection::defaults(controller.dataset(), Metric::Pop);
    let one_year = FilterSelection::new(Metric::GdpPercap)
        .in_year(2007)
        .continents(["Africa", "Asia"]);

    group.bench_function("handle_all_years", |b| {
        b.iter(|| controller.handle(Trigger, black_box(&everything)).unwrap())
    });

    group.bench_function("handle_single_year", |b| {
        b.iter(|| controller.handle(Trigger, black_box(&one_year)).unwrap())
    });

    group.bench_function("overview", |b| {
        b.iter(|| controller.overview(black_box(Metric::LifeExp)))
    });

    group.finish();
}

criterion_group!(benches, bench_stages, bench_controller);
criterion_main!(benches);
