use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tracing::info;

/// Stop flag shared by the Ctrl+C handler and the polling loops
///
/// Waits on the signal return as soon as it is triggered.
pub struct ShutdownSignal {
    shutdown: AtomicBool,
    condvar: Condvar,
    mutex: Mutex<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
        }
    }

    /// Create a signal that Ctrl+C triggers
    pub fn install() -> anyhow::Result<Arc<Self>> {
        let shutdown = Arc::new(Self::new());
        let handler = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            info!("Received Ctrl+C, stopping...");
            handler.trigger();
        })?;
        Ok(shutdown)
    }

    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Wait for `duration` or until triggered.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, duration: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        // Poisoned mutex: treat as shutdown
        let Ok(guard) = self.mutex.lock() else {
            return true;
        };
        match self
            .condvar
            .wait_timeout_while(guard, duration, |_| !self.is_shutdown())
        {
            Ok((_, timeout)) => !timeout.timed_out(),
            Err(_) => true,
        }
    }

    /// The flag the library loops poll
    pub fn as_atomic(&self) -> &AtomicBool {
        &self.shutdown
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
