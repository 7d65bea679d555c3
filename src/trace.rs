//! # Trace Files
//!
//! Every sensor reading of an iteration ends up in its own trace file next
//! to the experiment's metadata document. The metadata layer does not care
//! what is inside: anything implementing [`TraceResult`] can be persisted.
//!
//! [`PowerSweep`] is the format the document template describes: a comment
//! header followed by tab-separated time, frequency and power triplets.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Content of one trace file
pub trait TraceResult {
    /// Write the trace to `path`, replacing any existing file
    fn write(&self, path: &Path) -> std::io::Result<()>;
}

/// A single power measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSample {
    /// Seconds since the start of the iteration
    pub time_s: f64,

    /// Measured frequency in Hz
    pub frequency_hz: u64,

    /// Received power in dBm
    pub power_dbm: f64,
}

/// Power spectral readings captured by one sensor during one iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerSweep {
    samples: Vec<PowerSample>,
}

impl PowerSweep {
    /// Create an empty sweep
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample
    pub fn push(&mut self, time_s: f64, frequency_hz: u64, power_dbm: f64) {
        self.samples.push(PowerSample {
            time_s,
            frequency_hz,
            power_dbm,
        });
    }

    /// Recorded samples
    pub fn samples(&self) -> &[PowerSample] {
        &self.samples
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl TraceResult for PowerSweep {
    fn write(&self, path: &Path) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# t [s]\tf [Hz]\tP [dBm]")?;
        for sample in &self.samples {
            writeln!(
                out,
                "{:.3}\t{}\t{:.2}",
                sample.time_s, sample.frequency_hz, sample.power_dbm
            )?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_power_sweep_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.dat");

        let mut sweep = PowerSweep::new();
        sweep.push(0.0, 2_400_000_000, -95.5);
        sweep.push(0.25, 2_400_400_000, -101.0);
        sweep.write(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[1], "0.000\t2400000000\t-95.50");
        assert_eq!(lines[2], "0.250\t2400400000\t-101.00");
    }
}
