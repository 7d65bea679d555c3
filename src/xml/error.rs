/// Errors that can occur while reading or writing an XML document tree
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Error reported by the XML parser or writer
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error while reading or writing the document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in a name or text node
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Document is not a single balanced element tree
    #[error("Invalid XML structure: {0}")]
    InvalidStructure(String),
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        XmlError::XmlError(quick_xml::Error::from(e))
    }
}
