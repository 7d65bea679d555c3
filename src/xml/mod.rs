//! # Owned XML Element Tree
//!
//! A small mutable element tree used to hold a CDF document for the lifetime
//! of an experiment. Parsing uses the quick-xml pull reader and writing uses
//! the quick-xml indenting writer; everything in between is plain Rust data.
//!
//! The CDF schema never mixes text and child elements, so an element carries
//! either text or children. Whitespace between child elements is treated as
//! indentation and discarded on read.

mod error;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use error::XmlError;
pub use reader::parse;
pub use writer::write;

/// A single XML element with its attributes, text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Element name
    pub name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Text content, `None` when the element carries no text node
    pub text: Option<String>,

    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element holding only text
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Builder-style child append
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element and return a mutable reference to it
    pub fn push(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Insert `child` right after the last existing child whose name is one
    /// of `anchors`, or append it when none matches.
    ///
    /// Keeps repeated schema elements (`author*`, `notes`, ...) grouped in the
    /// order the schema expects.
    pub fn insert_after(&mut self, anchors: &[&str], child: XmlElement) -> &mut XmlElement {
        let position = self
            .children
            .iter()
            .rposition(|c| anchors.contains(&c.name.as_str()))
            .map(|i| i + 1)
            .unwrap_or(self.children.len());
        self.children.insert(position, child);
        &mut self.children[position]
    }

    /// Text content, empty when the element has no text node
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Replace the text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Look up an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Find the first element matching a `/`-separated path of child names
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .try_fold(self, |node, segment| {
                node.children.iter().find(|c| c.name == segment)
            })
    }

    /// Mutable variant of [`XmlElement::find`]
    pub fn find_mut(&mut self, path: &str) -> Option<&mut XmlElement> {
        let mut node = self;
        for segment in path.split('/') {
            node = node.children.iter_mut().find(|c| c.name == segment)?;
        }
        Some(node)
    }

    /// Like [`XmlElement::find_mut`], appending any missing element on the way
    pub fn find_or_create(&mut self, path: &str) -> &mut XmlElement {
        let mut node = self;
        for segment in path.split('/') {
            let index = match node.children.iter().position(|c| c.name == segment) {
                Some(i) => i,
                None => {
                    node.children.push(XmlElement::new(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        node
    }

    /// All elements matching a path; only the last segment may repeat
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a XmlElement> {
        let (parent, last) = match path.rsplit_once('/') {
            Some((parent, last)) => (self.find(parent), last),
            None => (Some(self), path),
        };

        parent
            .map(|p| p.children.iter().filter(|c| c.name == last).collect())
            .unwrap_or_default()
    }

    /// Text of the element at `path`.
    ///
    /// Returns `None` only when no such element exists. An element that is
    /// present but has no text yields `Some("")`.
    pub fn child_text(&self, path: &str) -> Option<&str> {
        self.find(path).map(XmlElement::text)
    }
}
