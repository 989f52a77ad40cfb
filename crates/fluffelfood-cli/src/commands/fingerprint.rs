//! Fingerprint command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use fluffelfood::process::expand_home;
use fluffelfood::{BinaryFingerprint, OffsetsCollection, load_offsets, verify_binary};

/// Hash a game binary and compare it with the offsets
pub fn run(path: &str, offsets: Option<&Path>) -> Result<()> {
    let path = expand_home(path);
    let fingerprint = BinaryFingerprint::of_file(&path)
        .with_context(|| format!("Cannot read {}", path))?;

    println!("Binary:  {}", path);
    println!("Size:    {} bytes", fingerprint.size);
    println!("SHA-256: {}", fingerprint.sha256);

    let offsets = match offsets {
        Some(file) => load_offsets(file)?,
        None => OffsetsCollection::builtin(),
    };

    println!();
    match verify_binary(&path, &offsets) {
        Ok(()) => println!("Matches offsets {}", offsets.version),
        Err(e) => println!("Does not match offsets {}: {}", offsets.version, e),
    }
    Ok(())
}
