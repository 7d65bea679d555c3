use crate::xml::XmlElement;

/// A reference listed in `experimentAbstract/furtherDocumentation`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Free-text description of the reference
    pub description: String,

    /// BibTeX entry for the reference
    pub bibtex: Option<String>,
}

impl Documentation {
    /// Create a reference with a description only
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            bibtex: None,
        }
    }

    /// Build the `furtherDocumentation` element
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("furtherDocumentation");
        element.push(XmlElement::with_text("description", self.description.as_str()));
        if let Some(ref bibtex) = self.bibtex {
            element.push(XmlElement::with_text("bibtex", bibtex.as_str()));
        }
        element
    }

    /// Read a `furtherDocumentation` element
    pub fn from_xml(element: &XmlElement) -> Self {
        Self {
            description: element
                .child_text("description")
                .unwrap_or_default()
                .to_string(),
            bibtex: element.child_text("bibtex").map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_roundtrip() {
        let doc = Documentation {
            description: "Testbed paper".to_string(),
            bibtex: Some("@article{vesna}".to_string()),
        };
        assert_eq!(Documentation::from_xml(&doc.to_xml()), doc);

        let plain = Documentation::new("Wiki page");
        let element = plain.to_xml();
        assert_eq!(element.children.len(), 1);
        assert_eq!(Documentation::from_xml(&element), plain);
    }
}
