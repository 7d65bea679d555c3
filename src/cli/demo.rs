use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use vesna_cdf::cdf::{Author, Device, Documentation, Interferer, Iteration};
use vesna_cdf::experiment::{Experiment, ExperimentBuilder};
use vesna_cdf::trace::PowerSweep;

const START_HZ: u64 = 2_400_000_000;
const STOP_HZ: u64 = 2_500_000_000;
const STEP_HZ: u64 = 400_000;
const ITERATION_SECS: i64 = 60;
const BASE_URL: &str = "http://sensor.example/communicator";
const CLUSTER_ID: u32 = 10001;

/// Record a synthetic spectrum sensing experiment
pub fn run(output: PathBuf, iterations: usize) -> Result<()> {
    info!("vesna-cdf - Spectrum Sensing Demo");
    info!("=================================");

    let (mut experiment, sensors, interferer) = build_demo_experiment(iterations)?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    info!("Recording {} iterations...", iterations);
    let started = Utc::now();
    for i in 0..iterations {
        let start = started + ChronoDuration::seconds(ITERATION_SECS * i as i64);
        let end = start + ChronoDuration::seconds(ITERATION_SECS);

        let mut iteration = Iteration::new(start, end);
        for (n, sensor) in sensors.iter().enumerate() {
            let offset = (i as i64 * ITERATION_SECS) as f64;
            iteration.add_reading(sensor.clone(), synthetic_sweep(offset, n, &interferer));
        }
        experiment.add_iteration(iteration);

        // Flush in batches of 10, like a long-running recorder would
        if (i + 1) % 10 == 0 {
            experiment
                .flush_default(&output)
                .context("Failed to flush iterations")?;
            info!("  Flushed {} iterations...", i + 1);
        }
    }

    let stats = experiment
        .flush_default(&output)
        .context("Failed to flush iterations")?;

    info!("Recording complete!");
    info!("  Last flush: {}", stats);
    info!("  Experiment: {}", output.join(format!("{}.cdf", experiment.tag())).display());
    println!("{}", experiment.tag());

    Ok(())
}

/// Two recording nodes and one interfering node
fn build_demo_experiment(iterations: usize) -> Result<(Experiment, Vec<Device>, Interferer)> {
    let mut experiment = ExperimentBuilder::new("VESNA demo sweep", START_HZ, STOP_HZ, STEP_HZ)
        .summary("Synthetic 2.4 GHz ISM band sweep with a single interferer")
        .build()?;

    experiment.set_duration(Duration::from_secs(ITERATION_SECS as u64 * iterations as u64))?;
    experiment.add_author(Author::new("vesna-cdf demo").with_email("demo@example.org"));
    experiment.add_methodology("Each node sweeps the band once per iteration.");
    experiment.add_documentation(Documentation::new("Generated by vesna-cdf demo"));
    experiment.add_note("Power values are synthetic.")?;

    let sensors = vec![
        Device::new(BASE_URL, CLUSTER_ID, 5),
        Device::new(BASE_URL, CLUSTER_ID, 7),
    ];
    for sensor in &sensors {
        experiment.add_device(sensor.clone())?;
    }

    let interferer = Interferer {
        device: Device::new(BASE_URL, CLUSTER_ID, 25),
        center_hz: 2_420_000_000,
        power_dbm: 0,
        device_id: 0,
        config_id: 0,
        start_time: Duration::from_secs(ITERATION_SECS as u64 / 2),
        end_time: Duration::from_secs(ITERATION_SECS as u64 * iterations.max(1) as u64),
    };
    experiment.add_interferer(interferer.clone())?;

    Ok((experiment, sensors, interferer))
}

/// Noise floor with a bump around the interferer while it transmits
fn synthetic_sweep(offset_s: f64, node: usize, interferer: &Interferer) -> PowerSweep {
    let mut sweep = PowerSweep::new();
    let steps = (STOP_HZ - START_HZ) / STEP_HZ;
    let sweep_secs = ITERATION_SECS as f64 / 2.0;

    for step in 0..=steps {
        let time_s = step as f64 / steps as f64 * sweep_secs;
        let frequency_hz = START_HZ + step * STEP_HZ;

        let noise = ((step as f64 * 0.37 + node as f64).sin()) * 1.5;
        let mut power_dbm = -100.0 + noise;

        let active = (interferer.start_time.as_secs_f64()..interferer.end_time.as_secs_f64())
            .contains(&(offset_s + time_s));
        if active {
            let distance_mhz =
                (frequency_hz as f64 - interferer.center_hz as f64).abs() / 1_000_000.0;
            if distance_mhz < 2.0 {
                power_dbm = -45.0 - distance_mhz * 10.0 - node as f64 * 3.0;
            }
        }

        sweep.push(time_s, frequency_hz, power_dbm);
    }

    sweep
}
