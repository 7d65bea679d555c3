use std::fmt;

use chrono::{DateTime, Utc};

use crate::trace::TraceResult;
use crate::xml::XmlElement;

use super::Device;

/// Storage slot used when the caller does not pick one
pub const DEFAULT_SLOT_ID: u32 = 10;

/// Result of one sensor during an iteration
pub struct SensorReading {
    /// Node that produced the reading
    pub sensor: Device,

    /// Trace content to persist
    pub result: Box<dyn TraceResult>,
}

impl fmt::Debug for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorReading")
            .field("sensor", &self.sensor)
            .finish_non_exhaustive()
    }
}

/// A completed measurement run waiting to be persisted
#[derive(Debug)]
pub struct Iteration {
    /// When the run started
    pub start_time: DateTime<Utc>,

    /// When the run ended
    pub end_time: DateTime<Utc>,

    /// Storage slot the sensors recorded into
    pub slot_id: u32,

    /// Readings in the order they are written to disk
    pub readings: Vec<SensorReading>,
}

impl Iteration {
    /// Create an iteration without readings, using the default slot
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            slot_id: DEFAULT_SLOT_ID,
            readings: Vec::new(),
        }
    }

    /// Use a specific storage slot
    pub fn with_slot(mut self, slot_id: u32) -> Self {
        self.slot_id = slot_id;
        self
    }

    /// Append a sensor reading
    pub fn add_reading<T: TraceResult + 'static>(&mut self, sensor: Device, result: T) {
        self.readings.push(SensorReading {
            sensor,
            result: Box::new(result),
        });
    }
}

/// An iteration already stored in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedIteration {
    /// Start time as written in the document
    pub start_time: String,

    /// End time as written in the document
    pub end_time: String,

    /// Trace file paths, relative to the metadata file
    pub trace_files: Vec<String>,
}

impl RecordedIteration {
    /// Read an `experimentIteration` element
    pub fn from_xml(element: &XmlElement) -> Self {
        Self {
            start_time: element
                .child_text("time/starttime")
                .unwrap_or_default()
                .to_string(),
            end_time: element
                .child_text("time/endtime")
                .unwrap_or_default()
                .to_string(),
            trace_files: element
                .find_all("traceFile")
                .into_iter()
                .map(|t| t.text().to_string())
                .collect(),
        }
    }
}
