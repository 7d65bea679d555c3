use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::io::Cursor;
use std::time::Duration;
use tempfile::TempDir;
use vesna_cdf::prelude::*;

/// Build an experiment with `num_devices` nodes and `num_iterations` recorded iterations
fn generate_experiment(num_devices: u32, num_iterations: usize) -> Experiment {
    let mut experiment = Experiment::new(
        "Benchmark",
        "Synthetic",
        2_400_000_000,
        2_500_000_000,
        400_000,
        Some("bench".to_string()),
    )
    .unwrap();
    experiment.set_duration(Duration::from_secs(3600)).unwrap();

    let devices: Vec<_> = (0..num_devices)
        .map(|addr| Device::new("http://sensor", 10001, addr))
        .collect();
    for device in &devices {
        experiment.add_device(device.clone()).unwrap();
    }

    let dir = TempDir::new().unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    for i in 0..num_iterations {
        let start = t0 + ChronoDuration::seconds(60 * i as i64);
        let mut iteration = Iteration::new(start, start + ChronoDuration::seconds(60));
        for device in &devices {
            iteration.add_reading(device.clone(), PowerSweep::new());
        }
        experiment.add_iteration(iteration);
    }
    experiment.flush(dir.path().join("bench")).unwrap();

    experiment
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");

    for &(devices, iterations) in &[(4, 10), (16, 100), (32, 500)] {
        let experiment = generate_experiment(devices, iterations);
        let size = experiment.to_xml_string().unwrap().len();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("to_xml_string", format!("{}x{}", devices, iterations)),
            &experiment,
            |b, experiment| b.iter(|| experiment.to_xml_string().unwrap()),
        );
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for &(devices, iterations) in &[(4, 10), (16, 100), (32, 500)] {
        let xml = generate_experiment(devices, iterations).to_xml_string().unwrap();
        group.throughput(Throughput::Bytes(xml.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("load", format!("{}x{}", devices, iterations)),
            &xml,
            |b, xml| b.iter(|| Experiment::load(Cursor::new(xml.as_bytes())).unwrap()),
        );
    }

    group.finish();
}

fn bench_metadata_codec(c: &mut Criterion) {
    use vesna_cdf::metadata::{decode, encode, ExperimentExtension};

    let payload = ExperimentExtension {
        step_hz: 400_000,
        duration: Some(3600.0),
        interferers: Vec::new(),
    };
    let encoded = encode("Human readable notes.\n", &payload).unwrap();

    c.bench_function("metadata/encode", |b| {
        b.iter(|| encode(&encoded, &payload).unwrap())
    });
    c.bench_function("metadata/decode", |b| {
        b.iter(|| decode::<ExperimentExtension>(&encoded).unwrap())
    });
}

criterion_group!(benches, bench_save, bench_load, bench_metadata_codec);
criterion_main!(benches);
