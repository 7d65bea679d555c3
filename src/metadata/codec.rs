use serde::de::DeserializeOwned;
use serde::Serialize;

use super::MetadataError;

/// Marker separating human-readable text from the embedded JSON payload
pub const METADATA_HEADER: &str = "Additional VESNA metadata follows:\n\n";

/// Indentation used for the embedded JSON
const JSON_INDENT: &[u8] = b"    ";

/// Embed `value` into `text`.
///
/// Anything from an existing header onwards is discarded first, so encoding
/// the same node repeatedly replaces the payload instead of stacking them. The
/// human-readable prefix is kept as is.
pub fn encode<T: Serialize + ?Sized>(text: &str, value: &T) -> Result<String, MetadataError> {
    let json = to_indented_json(value)?;

    let human = human_text(text);
    let mut encoded = String::with_capacity(human.len() + METADATA_HEADER.len() + json.len());
    encoded.push_str(human);
    encoded.push_str(METADATA_HEADER);
    encoded.push_str(&json);
    Ok(encoded)
}

/// Extract the payload embedded in `text`.
///
/// Returns `Ok(None)` when `text` carries no header at all. A header followed
/// by content that does not deserialize into `T` is a
/// [`MetadataError::MalformedMetadata`].
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<Option<T>, MetadataError> {
    match text.find(METADATA_HEADER) {
        Some(i) => serde_json::from_str(&text[i + METADATA_HEADER.len()..])
            .map(Some)
            .map_err(MetadataError::MalformedMetadata),
        None => Ok(None),
    }
}

/// The part of `text` before the metadata header (all of it if there is none)
pub fn human_text(text: &str) -> &str {
    match text.find(METADATA_HEADER) {
        Some(i) => &text[..i],
        None => text,
    }
}

/// Whether `text` carries an embedded payload
pub fn has_metadata(text: &str) -> bool {
    text.contains(METADATA_HEADER)
}

fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<String, MetadataError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(MetadataError::Serialize)?;

    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
