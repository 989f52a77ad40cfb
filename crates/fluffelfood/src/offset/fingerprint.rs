//! Identification of the game binary an offsets table was made for.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::offset::OffsetsCollection;

/// Size and hash of a binary on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFingerprint {
    pub size: u64,
    pub sha256: String,
}

impl BinaryFingerprint {
    pub fn of_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let size = fs::metadata(path)?.len();

        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 64 * 1024];
        loop {
            let read = reader.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        let sha256 = hex::encode(hasher.finalize());
        debug!("{}: {} bytes, sha256 {}", path.display(), size, sha256);

        Ok(Self { size, sha256 })
    }
}

/// Check a binary against the fingerprint stored with the offsets
///
/// Only the parts the offsets actually record are compared. Size is checked
/// first because it needs no hashing.
pub fn verify_binary<P: AsRef<Path>>(path: P, offsets: &OffsetsCollection) -> Result<()> {
    if offsets.binary_size.is_none() && offsets.binary_sha256.is_none() {
        return Ok(());
    }

    let path = path.as_ref();
    if let Some(expected) = offsets.binary_size {
        let actual = fs::metadata(path)?.len();
        if actual != expected {
            return Err(Error::BinaryMismatch {
                expected: format!("{} bytes", expected),
                actual: format!("{} bytes", actual),
            });
        }
    }

    if let Some(expected) = &offsets.binary_sha256 {
        let actual = BinaryFingerprint::of_file(path)?.sha256;
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(Error::BinaryMismatch {
                expected: format!("sha256 {}", expected),
                actual: format!("sha256 {}", actual),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn binary(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_fingerprint_of_file() {
        let file = binary(b"");
        let fp = BinaryFingerprint::of_file(file.path()).unwrap();
        assert_eq!(fp.size, 0);
        assert_eq!(
            fp.sha256,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify_without_fingerprint_passes() {
        let file = binary(b"anything");
        let mut offsets = OffsetsCollection::builtin();
        offsets.binary_size = None;
        assert!(verify_binary(file.path(), &offsets).is_ok());
    }

    #[test]
    fn test_verify_size_mismatch() {
        let file = binary(b"fluffel");
        let offsets = OffsetsCollection::builtin();
        let err = verify_binary(file.path(), &offsets).unwrap_err();
        assert!(matches!(err, Error::BinaryMismatch { .. }));
        assert!(err.to_string().contains("60460400 bytes"));
    }

    #[test]
    fn test_verify_hash() {
        let file = binary(b"fluffel");
        let actual = BinaryFingerprint::of_file(file.path()).unwrap();

        let mut offsets = OffsetsCollection::builtin();
        offsets.binary_size = Some(7);
        offsets.binary_sha256 = Some(actual.sha256.to_uppercase());
        assert!(verify_binary(file.path(), &offsets).is_ok());

        offsets.binary_sha256 = Some("0".repeat(64));
        assert!(matches!(
            verify_binary(file.path(), &offsets),
            Err(Error::BinaryMismatch { .. })
        ));
    }
}
