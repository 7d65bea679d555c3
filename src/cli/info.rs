use anyhow::{Context, Result};
use std::path::PathBuf;

use vesna_cdf::experiment::Experiment;

/// Display information about a .cdf experiment description
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let experiment = Experiment::open(&file).context("Failed to load experiment description")?;

    println!("{}", heading("CDF Experiment Information"));
    println!("==========================");
    println!("File: {}", file.display());
    println!();

    println!("{}", heading("Abstract:"));
    println!("  Title: {}", experiment.title());
    println!("  Tag: {}", experiment.tag());
    println!("  Release date: {}", experiment.release_date());
    if !experiment.summary().is_empty() {
        println!("  Summary: {}", experiment.summary());
    }
    for author in experiment.authors() {
        match &author.email {
            Some(email) => println!("  Author: {} <{}>", author.name, email),
            None => println!("  Author: {}", author.name),
        }
    }
    for note in experiment.notes() {
        println!("  Note: {}", note.trim());
    }
    println!();

    println!("{}", heading("Sweep:"));
    println!(
        "  {} Hz - {} Hz, step {} Hz",
        experiment.start_hz(),
        experiment.stop_hz(),
        experiment.step_hz()
    );
    match experiment.duration() {
        Some(duration) => println!("  Duration: {:.1} s", duration.as_secs_f64()),
        None => println!("  Duration: <not set>"),
    }
    println!();

    println!("{}", heading("Devices:"));
    for (key, device) in experiment.devices() {
        println!("  node {:5}  cluster {}  {}", key.0, device.cluster_id, device.base_url);
    }
    for interferer in experiment.interferers() {
        println!(
            "  node {:5}  interferer at {} Hz, {} dBm, {:.1}-{:.1} s",
            interferer.key().0,
            interferer.center_hz,
            interferer.power_dbm,
            interferer.start_time.as_secs_f64(),
            interferer.end_time.as_secs_f64()
        );
    }
    println!();

    let iterations = experiment.recorded_iterations();
    println!("{}", heading("Iterations:"));
    println!("  Recorded: {}", iterations.len());
    for (i, iteration) in iterations.iter().enumerate() {
        println!(
            "  {:3}. {} - {} ({} traces)",
            i + 1,
            iteration.start_time,
            iteration.end_time,
            iteration.trace_files.len()
        );
    }

    Ok(())
}

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    console::style(text).bold().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}
