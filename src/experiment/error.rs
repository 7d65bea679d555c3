use crate::cdf::{DeviceError, DeviceKey};
use crate::metadata::MetadataError;
use crate::xml::XmlError;

/// Errors that can occur while building, loading or persisting an experiment
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document could not be parsed or written
    #[error("XML error: {0}")]
    XmlError(#[from] XmlError),

    /// Embedded metadata could not be encoded or decoded
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),

    /// A `device` element could not be mapped
    #[error("Device error: {0}")]
    DeviceError(#[from] DeviceError),

    /// No notes node carries the experiment's embedded metadata
    #[error("Missing experiment extension metadata")]
    MissingExtensionMetadata,

    /// The release date is not a calendar date
    #[error("Invalid release date: {0:?}")]
    InvalidDate(String),

    /// An interferer references a device that is not in the document
    #[error("Interferer references unknown device {0}")]
    DanglingInterfererReference(DeviceKey),

    /// Two devices share the same key
    #[error("Duplicate device {0}")]
    DuplicateDevice(DeviceKey),

    /// A required schema element is absent
    #[error("Missing required element: {0}")]
    MissingElement(String),

    /// A numeric schema slot holds something that is not a number
    #[error("Invalid number in {field}: {value:?}")]
    InvalidNumber {
        /// Path of the offending element
        field: String,
        /// Text found in it
        value: String,
    },

    /// The stop frequency lies below the start frequency
    #[error("Invalid frequency range: {start_hz} Hz - {stop_hz} Hz")]
    InvalidFrequencyRange {
        /// Requested start frequency
        start_hz: u64,
        /// Requested stop frequency
        stop_hz: u64,
    },

    /// A note contains the embedded metadata header
    #[error("Note text contains the embedded metadata header")]
    ReservedNoteText,

    /// The document root is not `experimentDescription`
    #[error("Unexpected root element <{0}>")]
    UnexpectedRoot(String),

    /// The base path for a flush has no file name component
    #[error("Invalid experiment path: {0}")]
    InvalidPath(String),
}
