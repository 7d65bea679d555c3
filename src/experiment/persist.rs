use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use log::{debug, info, warn};
use tempfile::{Builder, NamedTempFile};

use crate::cdf::Iteration;
use crate::xml::XmlElement;

use super::{Experiment, ExperimentError};

/// Extension of the metadata document
pub const CDF_EXTENSION: &str = "cdf";

/// Extension of the trace directory
pub const DAT_EXTENSION: &str = "dat";

/// Statistics from a completed flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Iterations appended to the document
    pub iterations_written: usize,

    /// Trace files written
    pub trace_files_written: usize,
}

impl fmt::Display for FlushStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iterations, {} trace files",
            self.iterations_written, self.trace_files_written
        )
    }
}

/// `{base}.cdf`
pub fn metadata_path(base: &Path) -> PathBuf {
    with_extension_suffix(base, CDF_EXTENSION)
}

/// `{base}.dat`
pub fn trace_dir_path(base: &Path) -> PathBuf {
    with_extension_suffix(base, DAT_EXTENSION)
}

/// Name of the trace file for reading `index` of an iteration
pub fn trace_file_name(start_epoch: i64, addr: u32, index: usize) -> String {
    format!("data_{}_node_{}_{}.dat", start_epoch, addr, index)
}

/// Append `.ext` without replacing an existing extension (`run.v2` -> `run.v2.cdf`)
fn with_extension_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

impl Experiment {
    /// Queue a completed iteration for the next flush
    pub fn add_iteration(&mut self, iteration: Iteration) {
        self.pending.push(iteration);
    }

    /// Persist queued iterations and the metadata document.
    ///
    /// Writes one trace file per sensor reading into `{base}.dat/`, appends an
    /// `experimentIteration` element per iteration, replaces `{base}.cdf`
    /// atomically and finally empties the queue.
    ///
    /// On failure the document is restored to its state before the call and
    /// the queue is left intact, so the flush can be retried. Trace files
    /// written before the failure stay on disk and are overwritten by the
    /// retry.
    pub fn flush<P: AsRef<Path>>(&mut self, base_path: P) -> Result<FlushStats, ExperimentError> {
        let base = base_path.as_ref();
        let dat_name = base
            .file_name()
            .map(|name| format!("{}.{}", name.to_string_lossy(), DAT_EXTENSION))
            .ok_or_else(|| ExperimentError::InvalidPath(base.display().to_string()))?;

        let cdf_path = metadata_path(base);
        let dat_path = trace_dir_path(base);
        create_trace_dir(&dat_path)?;

        let mark = self.document.children.len();
        let result = self
            .append_pending(&dat_path, &dat_name)
            .and_then(|stats| self.write_metadata(&cdf_path).map(|_| stats));

        match result {
            Ok(stats) => {
                self.pending.clear();
                info!("Flushed {} to {}", stats, cdf_path.display());
                Ok(stats)
            }
            Err(e) => {
                warn!("Flush to {} failed, rolling back: {}", cdf_path.display(), e);
                self.document.children.truncate(mark);
                Err(e)
            }
        }
    }

    /// Flush into `dir`, using the tag as the base file name
    pub fn flush_default<P: AsRef<Path>>(&mut self, dir: P) -> Result<FlushStats, ExperimentError> {
        let base = dir.as_ref().join(&self.tag);
        self.flush(base)
    }

    fn append_pending(&mut self, dat_path: &Path, dat_name: &str) -> Result<FlushStats, ExperimentError> {
        let mut stats = FlushStats::default();

        for iteration in &self.pending {
            let start_epoch = iteration.start_time.timestamp();
            let mut element = XmlElement::new("experimentIteration").child(
                XmlElement::new("time")
                    .child(XmlElement::with_text(
                        "starttime",
                        iteration.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                    ))
                    .child(XmlElement::with_text(
                        "endtime",
                        iteration.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
                    )),
            );

            for (index, reading) in iteration.readings.iter().enumerate() {
                let file_name = trace_file_name(start_epoch, reading.sensor.addr, index);
                let path = dat_path.join(&file_name);
                debug!("Writing trace {}", path.display());
                reading.result.write(&path)?;

                element.push(XmlElement::with_text(
                    "traceFile",
                    format!("{}/{}", dat_name, file_name),
                ));
                stats.trace_files_written += 1;
            }

            self.document.push(element);
            stats.iterations_written += 1;
        }

        Ok(stats)
    }

    fn write_metadata(&self, cdf_path: &Path) -> Result<(), ExperimentError> {
        let dir = cdf_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = metadata_temp_file(dir)?;
        // A replaced document keeps its mode
        if let Ok(existing) = fs::metadata(cdf_path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }

        self.save(BufWriter::new(temp.as_file_mut()))?;
        temp.persist(cdf_path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Temp file next to the document, created with the mode a plain create would get
fn metadata_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".").suffix(".cdf.tmp");

    // Subject to the process umask, like the trace files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir)
}

fn create_trace_dir(path: &Path) -> Result<(), ExperimentError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Trace directory {} already exists", path.display());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
