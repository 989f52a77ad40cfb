//! Offsets file commands.

use std::path::Path;

use anyhow::{Context, Result};
use fluffelfood::{OffsetsCollection, load_offsets, save_offsets};

/// Write the built-in offsets to `output`
pub fn write(output: &Path) -> Result<()> {
    let offsets = OffsetsCollection::builtin();
    save_offsets(output, &offsets)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote offsets {} ({} chains) to {}",
        offsets.version,
        offsets.chains.len(),
        output.display()
    );
    Ok(())
}

/// Load and validate an offsets file
pub fn check(path: &Path) -> Result<()> {
    let offsets =
        load_offsets(path).with_context(|| format!("Invalid offsets file {}", path.display()))?;

    println!("Version: {}", offsets.version);
    match offsets.binary_size {
        Some(size) => println!("Binary size: {} bytes", size),
        None => println!("Binary size: not recorded"),
    }
    if let Some(sha) = &offsets.binary_sha256 {
        println!("Binary SHA-256: {}", sha);
    }
    println!();
    for (field, chain) in &offsets.chains {
        println!("{:<14}{}", format!("{}:", field), chain);
    }
    Ok(())
}
