//! The autosplitter: polls the game, detects run events and drives the timer.
//!
//! Each tick samples a fresh [`StateSnapshot`], compares it with the last one
//! that was sent and, only when something changed, runs the
//! [`TransitionDetector`] and sends the full timer state.
//!
//! ## Example
//!
//! ```ignore
//! use fluffelfood::autosplitter::{Autosplitter, AutosplitterConfig};
//!
//! let config = AutosplitterConfig::builder()
//!     .socket_path("/tmp/fluffelwatch")
//!     .poll_interval(Duration::from_millis(25))
//!     .build();
//! let mut autosplitter = Autosplitter::new(config);
//!
//! autosplitter.run(&mut sampler, &mut client, shutdown.as_atomic())?;
//! ```

mod game_loop;

use std::path::PathBuf;
use std::time::Duration;

use crate::game::{StateSnapshot, TransitionDetector};
use crate::offset::ResolveMode;
use crate::protocol::DEFAULT_SOCKET;
use crate::session::{DEFAULT_RUN_LOG, RunLog};

pub use game_loop::TickOutcome;

/// Polling period of the original tool; a quarter of the 100 ms the timer shows
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Configuration for the autosplitter
#[derive(Debug, Clone)]
pub struct AutosplitterConfig {
    pub poll_interval: Duration,
    /// Unix socket of the timer
    pub socket_path: PathBuf,
    /// Run log file, `None` to disable
    pub run_log_path: Option<PathBuf>,
    pub resolve_mode: ResolveMode,
}

impl Default for AutosplitterConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            socket_path: PathBuf::from(DEFAULT_SOCKET),
            run_log_path: Some(PathBuf::from(DEFAULT_RUN_LOG)),
            resolve_mode: ResolveMode::default(),
        }
    }
}

impl AutosplitterConfig {
    pub fn builder() -> AutosplitterConfigBuilder {
        AutosplitterConfigBuilder::default()
    }
}

/// Builder for AutosplitterConfig
#[derive(Debug, Clone, Default)]
pub struct AutosplitterConfigBuilder {
    poll_interval: Option<Duration>,
    socket_path: Option<PathBuf>,
    run_log_path: Option<Option<PathBuf>>,
    resolve_mode: Option<ResolveMode>,
}

impl AutosplitterConfigBuilder {
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn socket_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    pub fn run_log_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.run_log_path = Some(Some(path.into()));
        self
    }

    /// Do not write a run log
    pub fn no_run_log(mut self) -> Self {
        self.run_log_path = Some(None);
        self
    }

    pub fn resolve_mode(mut self, mode: ResolveMode) -> Self {
        self.resolve_mode = Some(mode);
        self
    }

    pub fn build(self) -> AutosplitterConfig {
        let default = AutosplitterConfig::default();
        AutosplitterConfig {
            poll_interval: self.poll_interval.unwrap_or(default.poll_interval),
            socket_path: self.socket_path.unwrap_or(default.socket_path),
            run_log_path: self.run_log_path.unwrap_or(default.run_log_path),
            resolve_mode: self.resolve_mode.unwrap_or(default.resolve_mode),
        }
    }
}

/// Driver state between ticks
pub struct Autosplitter {
    pub(crate) config: AutosplitterConfig,
    pub(crate) detector: TransitionDetector,
    /// Last snapshot sent to the timer
    pub(crate) baseline: StateSnapshot,
    pub(crate) run_log: Option<RunLog>,
    /// Most recent non-empty status label
    pub(crate) last_label: &'static str,
    pub(crate) finished: bool,
}

impl Autosplitter {
    pub fn new(config: AutosplitterConfig) -> Self {
        Self {
            config,
            detector: TransitionDetector::new(),
            baseline: StateSnapshot::default(),
            run_log: None,
            last_label: "",
            finished: false,
        }
    }

    /// Record labelled events of the run to `log`
    pub fn with_run_log(mut self, log: RunLog) -> Self {
        self.run_log = Some(log);
        self
    }

    pub fn config(&self) -> &AutosplitterConfig {
        &self.config
    }

    pub fn baseline(&self) -> &StateSnapshot {
        &self.baseline
    }

    pub fn last_label(&self) -> &'static str {
        self.last_label
    }

    /// The final stop was sent
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
