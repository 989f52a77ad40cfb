use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::offset::OffsetsCollection;

/// Load an offsets file (JSON)
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetsCollection> {
    let content = fs::read_to_string(path.as_ref())?;
    let offsets: OffsetsCollection = serde_json::from_str(&content)?;
    offsets.validate()?;
    Ok(offsets)
}

/// Write an offsets file (JSON, pretty-printed)
pub fn save_offsets<P: AsRef<Path>>(path: P, offsets: &OffsetsCollection) -> Result<()> {
    let content = serde_json::to_string_pretty(offsets)?;
    fs::write(path.as_ref(), content)?;
    info!("Saved offsets to {}", path.as_ref().display());
    Ok(())
}
