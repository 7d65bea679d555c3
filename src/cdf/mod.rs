//! # CDF Element Mappings
//!
//! Plain conversions between model types and the elements of the CDF
//! experiment description schema. None of these touch a whole document; the
//! [`crate::experiment`] module decides where the elements go.

mod author;
mod device;
mod documentation;
mod error;
mod interferer;
mod iteration;

pub use author::Author;
pub use device::{Device, DeviceKey};
pub use documentation::Documentation;
pub use error::DeviceError;
pub use interferer::Interferer;
pub(crate) use interferer::seconds;
pub use iteration::{Iteration, RecordedIteration, SensorReading, DEFAULT_SLOT_ID};
