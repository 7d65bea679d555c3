//! # vesna-cdf - CDF Experiment Descriptions for Spectrum Sensing
//!
//! `vesna_cdf` reads and writes experiment descriptions in the CREW Common
//! Data Format (CDF): an XML document describing a spectrum sensing
//! experiment, plus a directory of trace files with the measurements of every
//! iteration.
//!
//! ## Key Features
//!
//! - **Lossless Extension Metadata**: Fields the CDF schema has no slot for
//!   (sweep step, duration, interference sources, node addressing) are stored
//!   as JSON behind a fixed marker inside ordinary text nodes, so standard CDF
//!   tooling still reads the document.
//!
//! - **One Tree, Always in Sync**: An [`experiment::Experiment`] owns the
//!   document it was created or loaded from; every mutation edits the model
//!   and the tree together, and unknown elements survive a load/save cycle.
//!
//! - **Incremental Persistence**: Iterations are queued and flushed in
//!   batches. Each flush writes the trace files, appends the iteration records
//!   and replaces the metadata document atomically.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use vesna_cdf::prelude::*;
//!
//! let mut experiment = Experiment::new(
//!     "Scan A",
//!     "Rooftop sweep",
//!     2_400_000_000,
//!     2_500_000_000,
//!     400_000,
//!     None,
//! )?;
//!
//! let node = Device::new("http://sensor.example/communicator", 10001, 5);
//! experiment.add_device(node.clone())?;
//!
//! let mut sweep = PowerSweep::new();
//! sweep.push(0.0, 2_400_000_000, -97.5);
//!
//! let now = Utc::now();
//! let mut iteration = Iteration::new(now, now);
//! iteration.add_reading(node, sweep);
//! experiment.add_iteration(iteration);
//!
//! let stats = experiment.flush("scan-a")?;
//! println!("Wrote {}", stats);
//! # Ok::<(), vesna_cdf::experiment::ExperimentError>(())
//! ```
//!
//! This creates:
//! ```text
//! scan-a.cdf                       # experiment description
//! scan-a.dat/data_<t>_node_5_0.dat # one trace per sensor reading
//! ```
//!
//! ## Architecture
//!
//! - [`xml`]: Owned element tree with a quick-xml reader and writer
//! - [`metadata`]: The embedded JSON metadata codec and its payloads
//! - [`cdf`]: Conversions between model types and CDF elements
//! - [`trace`]: Trace file contents
//! - [`experiment`]: The experiment model, loading and persistence

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cdf;
pub mod experiment;
pub mod metadata;
pub mod trace;
pub mod xml;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cdf::{
        Author, Device, DeviceError, DeviceKey, Documentation, Interferer, Iteration,
        RecordedIteration, DEFAULT_SLOT_ID,
    };
    pub use crate::experiment::{
        Experiment, ExperimentBuilder, ExperimentError, FlushStats, DEFAULT_TAG_PREFIX,
    };
    pub use crate::metadata::{MetadataError, METADATA_HEADER};
    pub use crate::trace::{PowerSample, PowerSweep, TraceResult};
    pub use crate::xml::{XmlElement, XmlError};
}
