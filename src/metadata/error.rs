/// Errors that can occur while embedding or extracting metadata payloads
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The metadata header is present but the payload after it cannot be decoded
    #[error("Malformed embedded metadata: {0}")]
    MalformedMetadata(#[source] serde_json::Error),

    /// The value could not be serialized to JSON
    #[error("Metadata serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}
