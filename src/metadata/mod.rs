//! # Embedded Metadata
//!
//! The CDF schema only offers free text in places where this crate needs to
//! store structured values (frequency step, duration, interferers, device
//! connection details). This module hides those values inside ordinary text
//! nodes: a fixed header line marks where human-readable text ends, and an
//! indented JSON document follows it.
//!
//! ```text
//! Measured on the rooftop cluster.
//! Additional VESNA metadata follows:
//!
//! {
//!     "step_hz": 100000,
//!     "duration": 60.0
//! }
//! ```
//!
//! All reads and writes of embedded payloads go through [`encode`] and
//! [`decode`]; callers never search for the header themselves.

mod codec;
mod error;
mod payload;


pub use codec::{decode, encode, has_metadata, human_text, METADATA_HEADER};
pub use error::MetadataError;
pub use payload::{DeviceExtension, ExperimentExtension, InterfererExtension};
