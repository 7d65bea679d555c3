//! Integration tests for vesna-cdf
//!
//! These tests drive the full lifecycle through the public API: create an
//! experiment, record and flush iterations, reopen the files and keep going.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use vesna_cdf::prelude::*;

fn node(addr: u32) -> Device {
    Device::new("http://sensor.example/communicator", 10001, addr)
}

fn sweep(power_dbm: f64) -> PowerSweep {
    let mut sweep = PowerSweep::new();
    sweep.push(0.0, 2_400_000_000, power_dbm);
    sweep.push(0.5, 2_400_400_000, power_dbm - 1.0);
    sweep
}

/// Create, record, reopen and record again
#[test]
fn test_record_reopen_record() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("session");
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let mut experiment = Experiment::new(
        "Rooftop",
        "Two nodes",
        2_400_000_000,
        2_500_000_000,
        400_000,
        Some("session".to_string()),
    )
    .unwrap();
    experiment.add_device(node(5)).unwrap();
    experiment.add_device(node(7)).unwrap();
    experiment.set_duration(Duration::from_secs(120)).unwrap();

    let mut first = Iteration::new(t0, t0 + ChronoDuration::seconds(60));
    first.add_reading(node(5), sweep(-90.0));
    first.add_reading(node(7), sweep(-91.0));
    experiment.add_iteration(first);
    experiment.flush(&base).unwrap();

    // A later process picks up where the first one stopped
    let mut reopened = Experiment::open(dir.path().join("session.cdf")).unwrap();
    assert_eq!(reopened.devices().len(), 2);
    assert_eq!(reopened.duration(), Some(Duration::from_secs(120)));
    assert!(reopened.pending_iterations().is_empty());

    let t1 = t0 + ChronoDuration::seconds(60);
    let mut second = Iteration::new(t1, t1 + ChronoDuration::seconds(60));
    second.add_reading(node(5), sweep(-88.0));
    reopened.add_iteration(second);
    let stats = reopened.flush(&base).unwrap();
    assert_eq!(stats.iterations_written, 1);
    assert_eq!(stats.trace_files_written, 1);

    let last = Experiment::open(dir.path().join("session.cdf")).unwrap();
    let recorded = last.recorded_iterations();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].trace_files.len(), 2);
    assert_eq!(recorded[1].trace_files.len(), 1);

    // Every referenced trace exists relative to the metadata file
    for reference in recorded.iter().flat_map(|r| &r.trace_files) {
        let path = dir.path().join(reference);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('#'), "{} has no header", path.display());
    }
}

/// A node that becomes an interferer disappears from the plain device list
#[test]
fn test_interferer_survives_reopen() {
    let dir = tempdir().unwrap();

    let mut experiment =
        Experiment::new("Jamming", "", 2_400_000_000, 2_500_000_000, 400_000, None).unwrap();
    experiment.add_device(node(5)).unwrap();
    experiment.add_device(node(25)).unwrap();
    experiment
        .add_interferer(Interferer {
            device: node(25),
            center_hz: 2_420_000_000,
            power_dbm: 0,
            device_id: 1,
            config_id: 2,
            start_time: Duration::from_secs(10),
            end_time: Duration::from_secs(50),
        })
        .unwrap();
    experiment.flush_default(dir.path()).unwrap();

    let path = dir.path().join(format!("{}.cdf", experiment.tag()));
    let loaded = Experiment::open(&path).unwrap();

    assert!(loaded.tag().starts_with(DEFAULT_TAG_PREFIX));
    assert_eq!(loaded.devices().keys().copied().collect::<Vec<_>>(), vec![DeviceKey(5)]);
    assert_eq!(loaded.interferers(), experiment.interferers());
    assert_eq!(loaded.all_device_keys(), vec![DeviceKey(5), DeviceKey(25)]);
}

/// Standard CDF readers see the human-readable text before the metadata
#[test]
fn test_document_stays_readable() {
    let mut experiment = Experiment::new(
        "Readable",
        "",
        400_000_000,
        420_000_000,
        100_000,
        Some("r1".to_string()),
    )
    .unwrap();
    experiment.add_device(node(3)).unwrap();
    experiment.add_author(Author::new("Jane Doe"));

    let xml = experiment.to_xml_string().unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<name>VESNA node 3</name>"));
    assert!(xml.contains(METADATA_HEADER));

    let root = vesna_cdf::xml::parse(xml.as_bytes()).unwrap();
    assert_eq!(root.name, "experimentDescription");
    assert_eq!(
        root.child_text("experimentAbstract/author/name"),
        Some("Jane Doe")
    );
}

/// Opening something that is not a CDF file fails cleanly
#[test]
fn test_open_errors() {
    let dir = tempdir().unwrap();

    let missing = Experiment::open(dir.path().join("missing.cdf"));
    assert!(matches!(missing, Err(ExperimentError::IoError(_))));

    let garbage = dir.path().join("garbage.cdf");
    fs::write(&garbage, "<experimentDescription><unclosed>").unwrap();
    assert!(Experiment::open(&garbage).is_err());

    let other = dir.path().join("other.cdf");
    fs::write(&other, "<?xml version=\"1.0\"?><mzML/>").unwrap();
    assert!(matches!(
        Experiment::open(&other),
        Err(ExperimentError::UnexpectedRoot(_))
    ));
}
