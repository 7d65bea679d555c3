use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::{self, DeviceExtension};
use crate::xml::XmlElement;

use super::DeviceError;

/// Identity of a device within an experiment, derived from its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceKey(pub u32);

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sensing node taking part in an experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Base URL of the node's service endpoint
    pub base_url: String,

    /// Cluster identifier
    pub cluster_id: u32,

    /// Node address within the cluster
    pub addr: u32,
}

impl Device {
    /// Create a device descriptor
    pub fn new(base_url: impl Into<String>, cluster_id: u32, addr: u32) -> Self {
        Self {
            base_url: base_url.into(),
            cluster_id,
            addr,
        }
    }

    /// Lookup key of this device
    pub fn key(&self) -> DeviceKey {
        DeviceKey(self.addr)
    }

    /// Build the `device` element for this node.
    ///
    /// The schema only has a free-text description, so the connection details
    /// travel as embedded metadata inside it.
    pub fn to_xml(&self) -> Result<XmlElement, DeviceError> {
        let description = metadata::encode(
            "",
            &DeviceExtension {
                base_url: self.base_url.clone(),
                cluster_id: self.cluster_id,
                addr: self.addr,
            },
        )?;

        Ok(XmlElement::new("device")
            .child(XmlElement::with_text("name", format!("VESNA node {}", self.addr)))
            .child(XmlElement::with_text("description", description)))
    }

    /// Read a device back from a `device` element
    pub fn from_xml(element: &XmlElement) -> Result<Self, DeviceError> {
        let description = element
            .child_text("description")
            .ok_or_else(|| DeviceError::MissingMetadata(element.name.clone()))?;

        let extension: DeviceExtension = metadata::decode(description)?
            .ok_or_else(|| DeviceError::MissingMetadata(element.name.clone()))?;

        Ok(Self {
            base_url: extension.base_url,
            cluster_id: extension.cluster_id,
            addr: extension.addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_xml_roundtrip() {
        let device = Device::new("http://crn.log-a-tec.eu/communicator", 10002, 17);
        let element = device.to_xml().unwrap();

        assert_eq!(element.name, "device");
        assert_eq!(element.child_text("name"), Some("VESNA node 17"));
        assert!(metadata::has_metadata(element.child_text("description").unwrap()));

        let restored = Device::from_xml(&element).unwrap();
        assert_eq!(restored, device);
        assert_eq!(restored.key(), DeviceKey(17));
    }

    #[test]
    fn test_device_without_metadata() {
        let element = XmlElement::new("device")
            .child(XmlElement::with_text("name", "hand-written"))
            .child(XmlElement::with_text("description", "a spectrum analyzer"));

        let result = Device::from_xml(&element);
        assert!(matches!(result, Err(DeviceError::MissingMetadata(_))));

        let bare = XmlElement::new("device");
        assert!(matches!(
            Device::from_xml(&bare),
            Err(DeviceError::MissingMetadata(_))
        ));
    }

    #[test]
    fn test_key_depends_only_on_address() {
        let a = Device::new("http://a", 1, 5);
        let b = Device::new("http://b", 2, 5);
        assert_eq!(a.key(), b.key());
    }
}
