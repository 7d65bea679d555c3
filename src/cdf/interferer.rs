use std::time::Duration;

use crate::metadata::InterfererExtension;

use super::{Device, DeviceKey};

/// A device reclassified as a source of interference during an experiment
#[derive(Debug, Clone, PartialEq)]
pub struct Interferer {
    /// Transmitting node
    pub device: Device,

    /// Center frequency in Hz
    pub center_hz: u64,

    /// Transmit power in dBm
    pub power_dbm: i32,

    /// Signal generator device identifier
    pub device_id: u32,

    /// Signal generator configuration identifier
    pub config_id: u32,

    /// Offset from experiment start at which transmission begins
    pub start_time: Duration,

    /// Offset from experiment start at which transmission ends
    pub end_time: Duration,
}

impl Interferer {
    /// Key of the underlying device
    pub fn key(&self) -> DeviceKey {
        self.device.key()
    }

    /// Embedded-metadata form, referencing the device by key
    pub(crate) fn to_extension(&self) -> InterfererExtension {
        InterfererExtension {
            device: self.key(),
            center_hz: self.center_hz,
            power_dbm: self.power_dbm,
            device_id: self.device_id,
            config_id: self.config_id,
            start_time: self.start_time.as_secs_f64(),
            end_time: self.end_time.as_secs_f64(),
        }
    }

    /// Reattach an embedded record to the device it references.
    ///
    /// Negative or non-finite offsets are clamped to zero.
    pub(crate) fn from_extension(device: Device, extension: &InterfererExtension) -> Self {
        Self {
            device,
            center_hz: extension.center_hz,
            power_dbm: extension.power_dbm,
            device_id: extension.device_id,
            config_id: extension.config_id,
            start_time: seconds(extension.start_time),
            end_time: seconds(extension.end_time),
        }
    }
}

pub(crate) fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_roundtrip() {
        let interferer = Interferer {
            device: Device::new("http://node", 10001, 25),
            center_hz: 2_422_000_000,
            power_dbm: 0,
            device_id: 0,
            config_id: 0,
            start_time: Duration::from_secs(10),
            end_time: Duration::from_millis(20_500),
        };

        let extension = interferer.to_extension();
        assert_eq!(extension.device, DeviceKey(25));
        assert_eq!(extension.end_time, 20.5);

        let restored = Interferer::from_extension(interferer.device.clone(), &extension);
        assert_eq!(restored, interferer);
    }

    #[test]
    fn test_invalid_offsets_clamp_to_zero() {
        assert_eq!(seconds(-1.0), Duration::ZERO);
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
        assert_eq!(seconds(1.5), Duration::from_millis(1500));
    }
}
