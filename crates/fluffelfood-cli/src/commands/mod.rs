//! CLI command implementations.

pub mod addresses;
pub mod fingerprint;
pub mod offsets;
pub mod run;
pub mod watch;

use anyhow::{Context, Result};
use fluffelfood::{OffsetsCollection, ProcessHandle, ResolveMode, load_offsets};
use tracing::{debug, info};

use crate::TargetArgs;

/// Open the game process by pid or by binary path
pub fn attach(pid: Option<u32>, binary: &str) -> Result<ProcessHandle> {
    let process = match pid {
        Some(pid) => ProcessHandle::open(pid)
            .with_context(|| format!("Cannot open memory of process {}", pid))?,
        None => ProcessHandle::find_and_open(binary)
            .with_context(|| "Is the game running? Use --pid or --binary to point at it")?,
    };

    info!("Attached to process {}", process.pid);
    Ok(process)
}

/// Offsets from `--offsets`, or the built-in table
pub fn offsets_for(target: &TargetArgs) -> Result<OffsetsCollection> {
    match &target.offsets {
        Some(path) => {
            let offsets = load_offsets(path)
                .with_context(|| format!("Failed to load offsets from {}", path.display()))?;
            info!("Loaded offsets {} from {}", offsets.version, path.display());
            Ok(offsets)
        }
        None => {
            let offsets = OffsetsCollection::builtin();
            debug!("Using built-in offsets {}", offsets.version);
            Ok(offsets)
        }
    }
}

pub fn resolve_mode(target: &TargetArgs) -> ResolveMode {
    if target.legacy_resolve {
        ResolveMode::Legacy
    } else {
        ResolveMode::Strict
    }
}
