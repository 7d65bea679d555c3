use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use uuid::Uuid;

use crate::metadata::{self, ExperimentExtension};
use crate::xml::XmlElement;

use super::{Experiment, ExperimentError, ROOT_ELEMENT};

/// Prefix of generated experiment tags
pub const DEFAULT_TAG_PREFIX: &str = "vesna-alh-tools-";

/// Format of the `releaseDate` element
pub(crate) const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Builder for a fresh experiment document
///
/// # Example
///
/// ```rust
/// use vesna_cdf::experiment::ExperimentBuilder;
///
/// let experiment = ExperimentBuilder::new("Scan A", 400_000_000, 420_000_000, 100_000)
///     .summary("Rooftop sweep")
///     .tag("t1")
///     .build()?;
///
/// assert_eq!(experiment.tag(), "t1");
/// # Ok::<(), vesna_cdf::experiment::ExperimentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExperimentBuilder {
    title: String,
    summary: String,
    start_hz: u64,
    stop_hz: u64,
    step_hz: u64,
    tag: Option<String>,
    created: Option<DateTime<Utc>>,
}

impl ExperimentBuilder {
    /// Start a builder with the mandatory title and frequency sweep
    pub fn new(title: impl Into<String>, start_hz: u64, stop_hz: u64, step_hz: u64) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            start_hz,
            stop_hz,
            step_hz,
            tag: None,
            created: None,
        }
    }

    /// Set the free-text summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Use a fixed tag instead of a generated one
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Override the creation time (defaults to now)
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Build the experiment and its document skeleton
    pub fn build(self) -> Result<Experiment, ExperimentError> {
        if self.stop_hz < self.start_hz {
            return Err(ExperimentError::InvalidFrequencyRange {
                start_hz: self.start_hz,
                stop_hz: self.stop_hz,
            });
        }

        let created = self.created.unwrap_or_else(Utc::now);
        let tag = self
            .tag
            .unwrap_or_else(|| format!("{}{}", DEFAULT_TAG_PREFIX, Uuid::new_v4()));
        let release_date = created.date_naive();

        let notes = metadata::encode(
            "",
            &ExperimentExtension {
                step_hz: self.step_hz,
                ..Default::default()
            },
        )?;

        let experiment_abstract = XmlElement::new("experimentAbstract")
            .child(XmlElement::with_text("title", self.title.as_str()))
            .child(XmlElement::with_text("uniqueCREWTag", tag.as_str()))
            .child(XmlElement::with_text(
                "releaseDate",
                release_date.format(RELEASE_DATE_FORMAT).to_string(),
            ))
            .child(XmlElement::with_text("experimentSummary", self.summary.as_str()))
            .child(XmlElement::new("relatedExperiments"))
            .child(XmlElement::with_text("notes", notes));

        let document = XmlElement::new(ROOT_ELEMENT)
            .child(experiment_abstract)
            .child(meta_information(self.start_hz, self.stop_hz, &created));

        debug!("Created experiment skeleton for {}", tag);

        Ok(Experiment {
            title: self.title,
            summary: self.summary,
            tag,
            release_date,
            start_hz: self.start_hz,
            stop_hz: self.stop_hz,
            step_hz: self.step_hz,
            duration: None,
            authors: Vec::new(),
            documentation: Vec::new(),
            methodology: Vec::new(),
            related_experiments: None,
            notes: Vec::new(),
            devices: BTreeMap::new(),
            interferers: Vec::new(),
            pending: Vec::new(),
            document,
        })
    }
}

fn meta_information(start_hz: u64, stop_hz: u64, created: &DateTime<Utc>) -> XmlElement {
    let metric = |name: &str, unit: &str| {
        XmlElement::new("collectedMetrics")
            .child(XmlElement::with_text("name", name))
            .child(XmlElement::with_text("unitOfMeasurements", unit))
    };

    let trace_description = XmlElement::new("traceDescription")
        .child(XmlElement::with_text(
            "format",
            "Tab-separated-values file with timestamp, frequency, power triplets.",
        ))
        .child(
            XmlElement::new("fileFormat")
                .child(XmlElement::with_text("header", "Comment line, starting with #"))
                .child(metric("time", "s"))
                .child(metric("frequency", "Hz"))
                .child(metric("power", "dBm")),
        );

    XmlElement::new("metaInformation")
        .child(
            XmlElement::new("radioFrequency")
                .child(XmlElement::with_text("startFrequency", start_hz.to_string()))
                .child(XmlElement::with_text("stopFrequency", stop_hz.to_string())),
        )
        .child(XmlElement::with_text(
            "date",
            created.to_rfc3339_opts(SecondsFormat::Secs, true),
        ))
        .child(trace_description)
}
