use serde::{Deserialize, Serialize};

use crate::cdf::DeviceKey;

/// Experiment-level fields the CDF schema has no slot for.
///
/// Stored in the `experimentAbstract/notes` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentExtension {
    /// Frequency sweep step in Hz
    pub step_hz: u64,

    /// Total experiment duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Devices reclassified as interference sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interferers: Vec<InterfererExtension>,
}

/// One interference source, referencing its device by key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfererExtension {
    /// Key of the `device` element this interferer transmits from
    pub device: DeviceKey,

    /// Center frequency in Hz
    pub center_hz: u64,

    /// Transmit power in dBm
    pub power_dbm: i32,

    /// Signal generator device identifier
    pub device_id: u32,

    /// Signal generator configuration identifier
    pub config_id: u32,

    /// Start of the active window, seconds from experiment start
    pub start_time: f64,

    /// End of the active window, seconds from experiment start
    pub end_time: f64,
}

/// Device attributes carried in a `device/description` node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceExtension {
    /// Base URL of the node's service endpoint
    pub base_url: String,

    /// Cluster identifier
    pub cluster_id: u32,

    /// Node address within the cluster
    pub addr: u32,
}
