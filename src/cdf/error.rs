use crate::metadata::MetadataError;

/// Errors that can occur while mapping a `device` element
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The element carries no embedded device metadata, so it was not written by this crate
    #[error("Missing device metadata in <{0}>")]
    MissingMetadata(String),

    /// The embedded device metadata could not be decoded
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),
}
