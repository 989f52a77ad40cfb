use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::offset::{Field, PointerChain};

/// Pointer chains for one build of the game binary
///
/// Absolute addresses only hold for the binary they were found in, so the
/// collection carries a fingerprint of that binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetsCollection {
    pub version: String,
    /// Size of the game binary in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_size: Option<u64>,
    /// Lowercase hex SHA-256 of the game binary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_sha256: Option<String>,
    pub chains: BTreeMap<Field, PointerChain>,
}

// Returned for fields missing from a hand-written offsets file
static NULL_CHAIN: PointerChain = PointerChain::null();

impl OffsetsCollection {
    /// Chains for the Linux ELF build (CRC32 839a6c9a), found with PINCE/gdb.
    ///
    /// The ELF image is mapped at 0x4000000, so these do not line up with the
    /// Windows build.
    pub fn builtin() -> Self {
        let chains = BTreeMap::from([
            (Field::GameState, PointerChain::from([0x4024f40, 0])),
            (Field::LoadingIcon, PointerChain::from([0x4088510, 0x1c])),
            (Field::FadeState, PointerChain::from([0x415df88])),
            (Field::FadeValue, PointerChain::from([0x415df8c])),
            (Field::GameFlow, PointerChain::from([0x4024f60, 0x90, 0x10])),
            (Field::LevelManager, PointerChain::from([0x4024f60, 0x78, 0x90])),
            (Field::Mission, PointerChain::from([0x47899a0, 0x560, 0xe0])),
        ]);

        Self {
            version: "linux-elf-839a6c9a".to_string(),
            binary_size: Some(60_460_400),
            binary_sha256: None,
            chains,
        }
    }

    /// Chain for a field; missing entries resolve to the null address
    pub fn chain(&self, field: Field) -> &PointerChain {
        self.chains.get(&field).unwrap_or(&NULL_CHAIN)
    }

    pub fn set_chain(&mut self, field: Field, chain: PointerChain) {
        self.chains.insert(field, chain);
    }

    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.chain(*f).is_empty())
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.version.is_empty() && self.missing_fields().is_empty()
    }

    /// Like [`is_valid`](Self::is_valid), with the reason
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(Error::InvalidOffsets("version is empty".to_string()));
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
            return Err(Error::InvalidOffsets(format!(
                "no pointer chain for {}",
                names.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let offsets = OffsetsCollection::builtin();
        assert!(offsets.is_valid());
        assert!(offsets.validate().is_ok());
        assert_eq!(offsets.chains.len(), Field::COUNT);
        assert_eq!(offsets.chain(Field::FadeValue).offsets(), &[0x415df8c]);
        assert_eq!(
            offsets.chain(Field::Mission).offsets(),
            &[0x47899a0, 0x560, 0xe0]
        );
    }

    #[test]
    fn test_default_is_invalid() {
        let offsets = OffsetsCollection::default();
        assert!(!offsets.is_valid());
        assert!(offsets.chain(Field::GameState).is_empty());
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let mut offsets = OffsetsCollection::builtin();
        offsets.chains.remove(&Field::LevelManager);
        offsets.chains.remove(&Field::Mission);

        let err = offsets.validate().unwrap_err().to_string();
        assert!(err.contains("level_manager, mission"), "{}", err);
    }

    #[test]
    fn test_validate_requires_version() {
        let mut offsets = OffsetsCollection::builtin();
        offsets.version.clear();
        assert!(matches!(offsets.validate(), Err(Error::InvalidOffsets(_))));
    }
}
