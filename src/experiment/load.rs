use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};

use crate::cdf::{seconds, Author, Device, DeviceKey, Documentation, Interferer};
use crate::metadata::{self, ExperimentExtension};
use crate::xml::{self, XmlElement};

use super::builder::RELEASE_DATE_FORMAT;
use super::{Experiment, ExperimentError, ROOT_ELEMENT};

impl Experiment {
    /// Open and load a `.cdf` document from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentError> {
        let path = path.as_ref();
        info!("Loading experiment from {}", path.display());
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }

    /// Load an experiment from a CDF document.
    ///
    /// Either the whole experiment is reconstructed or an error is returned;
    /// a document that is missing the embedded experiment metadata is not one
    /// this crate can work with.
    pub fn load<R: BufRead>(reader: R) -> Result<Self, ExperimentError> {
        let document = xml::parse(reader)?;
        if document.name != ROOT_ELEMENT {
            return Err(ExperimentError::UnexpectedRoot(document.name));
        }

        let text = |path: &str| document.child_text(path).map(str::to_string);

        let title = text("experimentAbstract/title").unwrap_or_default();
        let summary = text("experimentAbstract/experimentSummary").unwrap_or_default();
        let related_experiments = text("experimentAbstract/relatedExperiments");
        let tag = required_text(&document, "experimentAbstract/uniqueCREWTag")?.to_string();
        let release_date =
            parse_release_date(required_text(&document, "experimentAbstract/releaseDate")?)?;

        let authors = document
            .find_all("experimentAbstract/author")
            .into_iter()
            .map(Author::from_xml)
            .collect();
        let methodology = document
            .find_all("experimentAbstract/collectionMethodology")
            .into_iter()
            .map(|m| m.text().to_string())
            .collect();
        let documentation = document
            .find_all("experimentAbstract/furtherDocumentation")
            .into_iter()
            .map(Documentation::from_xml)
            .collect();

        let mut notes = Vec::new();
        let mut extension: Option<ExperimentExtension> = None;
        for note in document.find_all("experimentAbstract/notes") {
            if let Some(decoded) = metadata::decode(note.text())? {
                extension = Some(decoded);
            }
            let human = metadata::human_text(note.text());
            if !human.trim().is_empty() {
                notes.push(human.to_string());
            }
        }
        let extension = extension.ok_or(ExperimentError::MissingExtensionMetadata)?;

        let start_hz = parse_number(&document, "metaInformation/radioFrequency/startFrequency")?;
        let stop_hz = parse_number(&document, "metaInformation/radioFrequency/stopFrequency")?;

        // Every device first, so interferers can claim theirs by key
        let mut devices = BTreeMap::new();
        for element in document.find_all("metaInformation/device") {
            let device = Device::from_xml(element)?;
            let key = device.key();
            if devices.insert(key, device).is_some() {
                return Err(ExperimentError::DuplicateDevice(key));
            }
        }

        let mut interferers = Vec::with_capacity(extension.interferers.len());
        for record in &extension.interferers {
            let device = devices
                .remove(&record.device)
                .ok_or(ExperimentError::DanglingInterfererReference(record.device))?;
            interferers.push(Interferer::from_extension(device, record));
        }

        debug!(
            "Loaded experiment {}: {} devices, {} interferers",
            tag,
            devices.len(),
            interferers.len()
        );

        Ok(Experiment {
            title,
            summary,
            tag,
            release_date,
            start_hz,
            stop_hz,
            step_hz: extension.step_hz,
            duration: extension.duration.map(seconds),
            authors,
            documentation,
            methodology,
            related_experiments,
            notes,
            devices,
            interferers,
            pending: Vec::new(),
            document,
        })
    }

    /// Keys of every device in the document, plain and interfering
    pub fn all_device_keys(&self) -> Vec<DeviceKey> {
        let mut keys: Vec<_> = self
            .devices
            .keys()
            .copied()
            .chain(self.interferers.iter().map(Interferer::key))
            .collect();
        keys.sort();
        keys
    }
}

fn required_text<'a>(document: &'a XmlElement, path: &str) -> Result<&'a str, ExperimentError> {
    document
        .child_text(path)
        .ok_or_else(|| ExperimentError::MissingElement(path.to_string()))
}

fn parse_number<T: FromStr>(document: &XmlElement, path: &str) -> Result<T, ExperimentError> {
    let value = required_text(document, path)?;
    value
        .trim()
        .parse()
        .map_err(|_| ExperimentError::InvalidNumber {
            field: path.to_string(),
            value: value.to_string(),
        })
}

/// Parse a release date.
///
/// Older documents store a full date-time here; its date part is used.
fn parse_release_date(value: &str) -> Result<NaiveDate, ExperimentError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|t| t.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|t| t.date_naive()))
        .map_err(|_| ExperimentError::InvalidDate(value.to_string()))
}
