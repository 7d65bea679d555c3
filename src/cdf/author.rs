use crate::xml::XmlElement;

/// An experiment author as listed in `experimentAbstract/author`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Full name
    pub name: String,

    /// Postal address or affiliation
    pub address: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// E-mail address
    pub email: Option<String>,
}

impl Author {
    /// Create an author with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the e-mail address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Build the `author` element
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("author");
        element.push(XmlElement::with_text("name", self.name.as_str()));
        let optional = [
            ("address", &self.address),
            ("phone", &self.phone),
            ("email", &self.email),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                element.push(XmlElement::with_text(name, value.as_str()));
            }
        }
        element
    }

    /// Read an `author` element
    pub fn from_xml(element: &XmlElement) -> Self {
        let text = |path: &str| element.child_text(path).map(str::to_string);
        Self {
            name: text("name").unwrap_or_default(),
            address: text("address"),
            phone: text("phone"),
            email: text("email"),
        }
    }
}
