use std::fs::File;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use sysinfo::System;
use tracing::debug;

use crate::error::{Error, Result};

/// Default install location of the game binary under Steam
pub const DEFAULT_BINARY: &str = "~/.steam/steam/steamapps/common/Alien Isolation/bin/AlienIsolation";

/// Open handle to a game process's address space (`/proc/<pid>/mem`)
///
/// The handle is scoped to one process lifetime. Reconnecting after the game
/// restarts means opening a new handle.
#[derive(Debug)]
pub struct ProcessHandle {
    pub pid: u32,
    /// Resolved `/proc/<pid>/exe`, if readable
    pub exe_path: Option<PathBuf>,
    mem: File,
}

impl ProcessHandle {
    /// Open the memory of an already known process
    pub fn open(pid: u32) -> Result<Self> {
        if pid == 0 {
            return Err(Error::ProcessOpenFailed("no process id set".to_string()));
        }

        let mem_path = format!("/proc/{}/mem", pid);
        let mem = File::open(&mem_path)
            .map_err(|e| Error::ProcessOpenFailed(format!("{}: {}", mem_path, e)))?;
        let exe_path = std::fs::read_link(format!("/proc/{}/exe", pid)).ok();

        debug!("Opened {} (exe: {:?})", mem_path, exe_path);

        Ok(Self { pid, exe_path, mem })
    }

    /// Locate the game by its binary path and open it
    pub fn find_and_open(binary: &str) -> Result<Self> {
        let pid = find_process(binary)?;
        Self::open(pid)
    }

    /// Positioned read of exactly `size` bytes
    pub fn read_at(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        self.mem
            .read_exact_at(&mut buffer, address)
            .map_err(|e| Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            })?;
        Ok(buffer)
    }

    /// Whether the process still exists
    pub fn is_alive(&self) -> bool {
        Path::new(&format!("/proc/{}", self.pid)).exists()
    }
}

/// Find the lowest pid whose executable or command line starts with `binary`
///
/// Threads are skipped so the main process id is returned.
pub fn find_process(binary: &str) -> Result<u32> {
    let binary = expand_home(binary);
    let system = System::new_all();

    let mut candidates: Vec<u32> = system
        .processes()
        .values()
        .filter(|p| p.thread_kind().is_none())
        .filter(|p| {
            let exe_matches = p
                .exe()
                .map(|exe| exe.to_string_lossy().starts_with(&binary))
                .unwrap_or(false);
            let cmdline = p
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ");
            exe_matches || cmdline.starts_with(&binary)
        })
        .map(|p| p.pid().as_u32())
        .collect();

    candidates.sort_unstable();
    candidates
        .first()
        .copied()
        .ok_or_else(|| Error::ProcessNotFound(binary))
}

/// Expand a leading `~` using `$HOME`
pub fn expand_home(path: &str) -> String {
    match (path.strip_prefix('~'), std::env::var("HOME")) {
        (Some(rest), Ok(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", home, rest)
        }
        _ => path.to_string(),
    }
}
