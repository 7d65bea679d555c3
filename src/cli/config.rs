//! TOML description of an experiment for the `new` command.
//!
//! ```toml
//! # experiment.toml
//! [experiment]
//! title = "Scan A"
//! summary = "Rooftop sweep"
//! start_hz = 2400000000
//! stop_hz = 2500000000
//! step_hz = 400000
//! duration_secs = 60.0
//!
//! [[device]]
//! base_url = "http://sensor.example/communicator"
//! cluster_id = 10001
//! addr = 5
//!
//! [[interferer]]
//! base_url = "http://sensor.example/communicator"
//! cluster_id = 10001
//! addr = 25
//! center_hz = 2420000000
//! power_dbm = 0
//! start_secs = 5.0
//! end_secs = 25.0
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use vesna_cdf::cdf::{Author, Device, Interferer};
use vesna_cdf::experiment::{Experiment, ExperimentBuilder};

/// Root configuration structure for experiment files.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Experiment-wide settings.
    pub experiment: ExperimentConfig,

    /// Authors, in document order.
    #[serde(default, rename = "author")]
    pub authors: Vec<AuthorConfig>,

    /// Plain recording nodes.
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceConfig>,

    /// Nodes acting as interference sources.
    #[serde(default, rename = "interferer")]
    pub interferers: Vec<InterfererConfig>,
}

/// The `[experiment]` table.
#[derive(Debug, Deserialize)]
pub struct ExperimentConfig {
    pub title: String,

    #[serde(default)]
    pub summary: String,

    /// Generated when absent.
    pub tag: Option<String>,

    pub start_hz: u64,
    pub stop_hz: u64,
    pub step_hz: u64,

    pub duration_secs: Option<f64>,
}

/// An `[[author]]` entry.
#[derive(Debug, Deserialize)]
pub struct AuthorConfig {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// A `[[device]]` entry.
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    pub base_url: String,
    pub cluster_id: u32,
    pub addr: u32,
}

/// An `[[interferer]]` entry.
#[derive(Debug, Deserialize)]
pub struct InterfererConfig {
    #[serde(flatten)]
    pub device: DeviceConfig,

    pub center_hz: u64,
    pub power_dbm: i32,

    #[serde(default)]
    pub device_id: u32,

    #[serde(default)]
    pub config_id: u32,

    pub start_secs: f64,
    pub end_secs: f64,
}

impl DeviceConfig {
    fn to_device(&self) -> Device {
        Device::new(self.base_url.as_str(), self.cluster_id, self.addr)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Build the experiment this file describes.
    pub fn to_experiment(&self) -> Result<Experiment> {
        let settings = &self.experiment;
        let mut builder = ExperimentBuilder::new(
            settings.title.as_str(),
            settings.start_hz,
            settings.stop_hz,
            settings.step_hz,
        )
        .summary(settings.summary.as_str());
        if let Some(tag) = &settings.tag {
            builder = builder.tag(tag.as_str());
        }
        let mut experiment = builder.build().context("Invalid [experiment] settings")?;

        if let Some(secs) = settings.duration_secs {
            let duration = Duration::try_from_secs_f64(secs)
                .with_context(|| format!("Invalid duration_secs: {}", secs))?;
            experiment.set_duration(duration)?;
        }

        for author in &self.authors {
            experiment.add_author(Author {
                name: author.name.clone(),
                email: author.email.clone(),
                address: author.address.clone(),
                phone: author.phone.clone(),
            });
        }

        for device in &self.devices {
            experiment
                .add_device(device.to_device())
                .with_context(|| format!("Cannot add device {}", device.addr))?;
        }

        for interferer in &self.interferers {
            let start_time = Duration::try_from_secs_f64(interferer.start_secs)
                .with_context(|| format!("Invalid start_secs: {}", interferer.start_secs))?;
            let end_time = Duration::try_from_secs_f64(interferer.end_secs)
                .with_context(|| format!("Invalid end_secs: {}", interferer.end_secs))?;

            experiment
                .add_interferer(Interferer {
                    device: interferer.device.to_device(),
                    center_hz: interferer.center_hz,
                    power_dbm: interferer.power_dbm,
                    device_id: interferer.device_id,
                    config_id: interferer.config_id,
                    start_time,
                    end_time,
                })
                .with_context(|| format!("Cannot add interferer {}", interferer.device.addr))?;
        }

        Ok(experiment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesna_cdf::cdf::DeviceKey;

    const FULL: &str = r#"
        [experiment]
        title = "Scan A"
        summary = "Rooftop sweep"
        tag = "t1"
        start_hz = 2400000000
        stop_hz = 2500000000
        step_hz = 400000
        duration_secs = 60.0

        [[author]]
        name = "Jane Doe"
        email = "jane@example.org"

        [[device]]
        base_url = "http://sensor"
        cluster_id = 10001
        addr = 5

        [[interferer]]
        base_url = "http://sensor"
        cluster_id = 10001
        addr = 25
        center_hz = 2420000000
        power_dbm = -10
        start_secs = 5.0
        end_secs = 25.0
    "#;

    #[test]
    fn test_parse_config() {
        let config = Config::from_str(FULL).unwrap();
        assert_eq!(config.experiment.title, "Scan A");
        assert_eq!(config.experiment.tag.as_deref(), Some("t1"));
        assert_eq!(config.experiment.duration_secs, Some(60.0));
        assert_eq!(config.authors.len(), 1);
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.interferers[0].device.addr, 25);
        assert_eq!(config.interferers[0].config_id, 0);
    }

    #[test]
    fn test_minimal_config() {
        let toml = r#"
            [experiment]
            title = "Bare"
            start_hz = 1
            stop_hz = 2
            step_hz = 1
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.experiment.summary, "");
        assert!(config.experiment.tag.is_none());
        assert!(config.devices.is_empty());
        assert!(config.interferers.is_empty());
    }

    #[test]
    fn test_missing_experiment_table() {
        assert!(Config::from_str("").is_err());
    }

    #[test]
    fn test_to_experiment() {
        let experiment = Config::from_str(FULL).unwrap().to_experiment().unwrap();
        assert_eq!(experiment.tag(), "t1");
        assert_eq!(experiment.duration(), Some(Duration::from_secs(60)));
        assert_eq!(experiment.authors()[0].email.as_deref(), Some("jane@example.org"));
        assert!(experiment.device(DeviceKey(5)).is_some());
        assert_eq!(experiment.interferers()[0].key(), DeviceKey(25));
        assert_eq!(experiment.interferers()[0].end_time, Duration::from_secs(25));
    }

    #[test]
    fn test_device_listed_twice_is_rejected() {
        let toml = FULL.replace(
            "[[interferer]]",
            "[[device]]\nbase_url = \"http://other\"\ncluster_id = 1\naddr = 5\n\n[[interferer]]",
        );
        let result = Config::from_str(&toml).unwrap().to_experiment();
        assert!(result.is_err());
    }
}
