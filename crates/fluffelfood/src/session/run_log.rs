use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::debug;

use crate::error::Result;

/// Run log file in the working directory
pub const DEFAULT_RUN_LOG: &str = "alieniso_nmg.log";

/// Plain-text log of a run, one line per labelled event
///
/// Lines look like `Thu Oct 15 21:04:05 2026\t12.345 s\tLoading!`, with the
/// seconds counted from the first start.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
    started_at: Option<Instant>,
}

impl RunLog {
    /// Create `path`, replacing the log of a previous run
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        debug!("Run log at {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            started_at: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start the clock; later calls keep the first start
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, at: Instant) {
        self.started_at.get_or_insert(at);
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Append a line for `label`; empty labels and lines before the start are skipped
    pub fn record(&mut self, label: &str) -> Result<()> {
        let Some(started_at) = self.started_at else {
            return Ok(());
        };
        if label.is_empty() {
            return Ok(());
        }

        let line = format_line(
            &Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
            started_at.elapsed(),
            label,
        );
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}

fn format_line(timestamp: &str, elapsed: Duration, label: &str) -> String {
    format!("{}\t{:.3} s\t{}", timestamp, elapsed.as_secs_f64(), label)
}
