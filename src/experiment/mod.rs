//! # Experiment Descriptions
//!
//! An [`Experiment`] owns one CDF document tree for its whole lifetime and
//! keeps it in step with the model: every mutator edits both. Fields the
//! schema has no slot for (frequency step, duration, interferers) live in the
//! embedded metadata of the abstract's `notes` node.
//!
//! ## Document Layout
//!
//! ```text
//! experimentDescription
//! ├── experimentAbstract
//! │   ├── title, uniqueCREWTag, releaseDate, experimentSummary
//! │   ├── relatedExperiments
//! │   ├── notes*              (one carries the embedded metadata)
//! │   ├── author*
//! │   ├── collectionMethodology*
//! │   └── furtherDocumentation*
//! ├── metaInformation
//! │   ├── radioFrequency/{startFrequency, stopFrequency}
//! │   ├── date
//! │   ├── traceDescription
//! │   └── device*
//! └── experimentIteration*    (appended by flush)
//! ```
//!
//! ## Files on Disk
//!
//! ```text
//! {base}.cdf                                 # metadata document
//! {base}.dat/data_{start}_node_{addr}_{i}.dat # one trace per sensor reading
//! ```

mod builder;
mod error;
mod load;
mod persist;


use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use chrono::NaiveDate;

use crate::cdf::{
    Author, Device, DeviceKey, Documentation, Interferer, Iteration, RecordedIteration,
};
use crate::metadata::{self, ExperimentExtension};
use crate::xml::{self, XmlElement};

pub use builder::{ExperimentBuilder, DEFAULT_TAG_PREFIX};
pub use error::ExperimentError;
pub use persist::{
    metadata_path, trace_dir_path, trace_file_name, FlushStats, CDF_EXTENSION, DAT_EXTENSION,
};

/// Root element of a CDF experiment description
pub const ROOT_ELEMENT: &str = "experimentDescription";

/// Schema order of the children of `experimentAbstract`
const ABSTRACT_ORDER: [&str; 9] = [
    "title",
    "uniqueCREWTag",
    "releaseDate",
    "experimentSummary",
    "relatedExperiments",
    "notes",
    "author",
    "collectionMethodology",
    "furtherDocumentation",
];

/// A spectrum sensing experiment backed by a CDF document
#[derive(Debug)]
pub struct Experiment {
    title: String,
    summary: String,
    tag: String,
    release_date: NaiveDate,
    start_hz: u64,
    stop_hz: u64,
    step_hz: u64,
    duration: Option<Duration>,
    authors: Vec<Author>,
    documentation: Vec<Documentation>,
    methodology: Vec<String>,
    related_experiments: Option<String>,
    notes: Vec<String>,
    devices: BTreeMap<DeviceKey, Device>,
    interferers: Vec<Interferer>,
    pending: Vec<Iteration>,
    document: XmlElement,
}

impl Experiment {
    /// Create a fresh experiment.
    ///
    /// A tag of the form `vesna-alh-tools-<uuid>` is generated when `tag` is
    /// `None`. See [`ExperimentBuilder`] for more control.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        start_hz: u64,
        stop_hz: u64,
        step_hz: u64,
        tag: Option<String>,
    ) -> Result<Self, ExperimentError> {
        let mut builder = ExperimentBuilder::new(title, start_hz, stop_hz, step_hz).summary(summary);
        if let Some(tag) = tag {
            builder = builder.tag(tag);
        }
        builder.build()
    }

    /// Experiment title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text summary
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Unique tag, also the default base name of the files on disk
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Release date
    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    /// Lowest swept frequency in Hz
    pub fn start_hz(&self) -> u64 {
        self.start_hz
    }

    /// Highest swept frequency in Hz
    pub fn stop_hz(&self) -> u64 {
        self.stop_hz
    }

    /// Sweep step in Hz
    pub fn step_hz(&self) -> u64 {
        self.step_hz
    }

    /// Total duration, if set
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Authors in document order
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Further documentation references in document order
    pub fn documentation(&self) -> &[Documentation] {
        &self.documentation
    }

    /// Collection methodology descriptions
    pub fn methodology(&self) -> &[String] {
        &self.methodology
    }

    /// Free-text note on related experiments
    pub fn related_experiments(&self) -> Option<&str> {
        self.related_experiments.as_deref()
    }

    /// Human-readable notes, without embedded metadata
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Plain recording devices by key
    pub fn devices(&self) -> &BTreeMap<DeviceKey, Device> {
        &self.devices
    }

    /// Look up a plain recording device
    pub fn device(&self, key: DeviceKey) -> Option<&Device> {
        self.devices.get(&key)
    }

    /// Interference sources
    pub fn interferers(&self) -> &[Interferer] {
        &self.interferers
    }

    /// Iterations queued for the next flush
    pub fn pending_iterations(&self) -> &[Iteration] {
        &self.pending
    }

    /// Iterations already stored in the document
    pub fn recorded_iterations(&self) -> Vec<RecordedIteration> {
        self.document
            .find_all("experimentIteration")
            .into_iter()
            .map(RecordedIteration::from_xml)
            .collect()
    }

    /// Change the frequency sweep
    pub fn set_frequency_range(
        &mut self,
        start_hz: u64,
        stop_hz: u64,
        step_hz: u64,
    ) -> Result<(), ExperimentError> {
        if stop_hz < start_hz {
            return Err(ExperimentError::InvalidFrequencyRange { start_hz, stop_hz });
        }

        self.start_hz = start_hz;
        self.stop_hz = stop_hz;
        self.step_hz = step_hz;

        self.document
            .find_or_create("metaInformation/radioFrequency/startFrequency")
            .set_text(start_hz.to_string());
        self.document
            .find_or_create("metaInformation/radioFrequency/stopFrequency")
            .set_text(stop_hz.to_string());
        self.sync_extension()
    }

    /// Set the total experiment duration
    pub fn set_duration(&mut self, duration: Duration) -> Result<(), ExperimentError> {
        self.duration = Some(duration);
        self.sync_extension()
    }

    /// Register a plain recording device
    pub fn add_device(&mut self, device: Device) -> Result<(), ExperimentError> {
        let key = device.key();
        if self.is_registered(key) {
            return Err(ExperimentError::DuplicateDevice(key));
        }

        self.store_device_element(&device)?;
        self.devices.insert(key, device);
        Ok(())
    }

    /// Register an interference source.
    ///
    /// If its device is currently a plain device, it stops being one.
    pub fn add_interferer(&mut self, interferer: Interferer) -> Result<(), ExperimentError> {
        let key = interferer.key();
        if self.interferers.iter().any(|i| i.key() == key) {
            return Err(ExperimentError::DuplicateDevice(key));
        }

        self.store_device_element(&interferer.device)?;
        self.devices.remove(&key);
        self.interferers.push(interferer);
        self.sync_extension()
    }

    /// Append an author
    pub fn add_author(&mut self, author: Author) {
        self.insert_abstract(author.to_xml());
        self.authors.push(author);
    }

    /// Append a further documentation reference
    pub fn add_documentation(&mut self, documentation: Documentation) {
        self.insert_abstract(documentation.to_xml());
        self.documentation.push(documentation);
    }

    /// Append a collection methodology description
    pub fn add_methodology(&mut self, methodology: impl Into<String>) {
        let methodology = methodology.into();
        self.insert_abstract(XmlElement::with_text(
            "collectionMethodology",
            methodology.as_str(),
        ));
        self.methodology.push(methodology);
    }

    /// Append a human-readable note.
    ///
    /// Notes may not contain [`metadata::METADATA_HEADER`]; such a note would
    /// be read back as embedded metadata.
    pub fn add_note(&mut self, note: impl Into<String>) -> Result<(), ExperimentError> {
        let note = note.into();
        if metadata::has_metadata(&note) {
            return Err(ExperimentError::ReservedNoteText);
        }

        self.insert_abstract(XmlElement::with_text("notes", note.as_str()));
        self.notes.push(note);
        Ok(())
    }

    /// Set the related experiments note
    pub fn set_related_experiments(&mut self, text: impl Into<String>) {
        let text = text.into();
        let experiment_abstract = self.document.find_or_create("experimentAbstract");
        match experiment_abstract.find_mut("relatedExperiments") {
            Some(element) => element.set_text(text.as_str()),
            None => {
                insert_in_schema_order(
                    experiment_abstract,
                    XmlElement::with_text("relatedExperiments", text.as_str()),
                );
            }
        }
        self.related_experiments = Some(text);
    }

    /// Write the document, indented, to `writer`
    pub fn save<W: Write>(&self, writer: W) -> Result<(), ExperimentError> {
        xml::write(&self.document, writer)?;
        Ok(())
    }

    /// Render the document to a string
    pub fn to_xml_string(&self) -> Result<String, ExperimentError> {
        let mut buf = Vec::new();
        self.save(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn is_registered(&self, key: DeviceKey) -> bool {
        self.devices.contains_key(&key) || self.interferers.iter().any(|i| i.key() == key)
    }

    fn insert_abstract(&mut self, element: XmlElement) {
        let experiment_abstract = self.document.find_or_create("experimentAbstract");
        insert_in_schema_order(experiment_abstract, element);
    }

    /// Write or replace the `device` element for `device`'s key
    fn store_device_element(&mut self, device: &Device) -> Result<(), ExperimentError> {
        let element = device.to_xml()?;
        let key = device.key();
        let meta = self.document.find_or_create("metaInformation");

        let existing = meta.children.iter().position(|c| {
            c.name == "device" && Device::from_xml(c).map(|d| d.key() == key).unwrap_or(false)
        });
        match existing {
            Some(i) => meta.children[i] = element,
            None => {
                meta.push(element);
            }
        }
        Ok(())
    }

    /// Re-encode the embedded metadata into its notes node
    fn sync_extension(&mut self) -> Result<(), ExperimentError> {
        let extension = ExperimentExtension {
            step_hz: self.step_hz,
            duration: self.duration.map(|d| d.as_secs_f64()),
            interferers: self.interferers.iter().map(Interferer::to_extension).collect(),
        };

        let note = self.extension_note_mut();
        let encoded = metadata::encode(note.text(), &extension)?;
        note.set_text(encoded);
        Ok(())
    }

    fn extension_note_mut(&mut self) -> &mut XmlElement {
        let experiment_abstract = self.document.find_or_create("experimentAbstract");
        let index = experiment_abstract
            .children
            .iter()
            .rposition(|c| c.name == "notes" && metadata::has_metadata(c.text()));

        match index {
            Some(i) => &mut experiment_abstract.children[i],
            None => insert_in_schema_order(experiment_abstract, XmlElement::new("notes")),
        }
    }
}

fn insert_in_schema_order(parent: &mut XmlElement, element: XmlElement) -> &mut XmlElement {
    let position = ABSTRACT_ORDER
        .iter()
        .position(|name| *name == element.name)
        .unwrap_or(ABSTRACT_ORDER.len() - 1);
    parent.insert_after(&ABSTRACT_ORDER[..=position], element)
}
