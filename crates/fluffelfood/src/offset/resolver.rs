use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;
use crate::offset::{Field, OffsetsCollection, PointerChain};
use crate::process::ReadMemory;

/// What to do when a pointer in a chain cannot be followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Stop at the first unreadable or null pointer and report the field as
    /// unresolved
    #[default]
    Strict,
    /// Treat a failed read as 0 and keep adding offsets, like the original
    /// autosplitter scripts did
    Legacy,
}

/// Where a strict resolution stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBreak {
    /// 1-based index of the dereference that failed
    pub step: usize,
    /// Address that could not be followed
    pub address: u64,
}

impl ChainBreak {
    pub fn into_error(self, field: Field) -> Error {
        Error::UnresolvedAddress {
            field: field.name().to_string(),
            step: self.step,
            address: self.address,
        }
    }
}

/// Walks pointer chains through a [`ReadMemory`] source
pub struct PointerResolver<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    mode: ResolveMode,
}

impl<'a, R: ReadMemory + ?Sized> PointerResolver<'a, R> {
    pub fn new(reader: &'a R, mode: ResolveMode) -> Self {
        Self { reader, mode }
    }

    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Resolve a chain to its final absolute address
    ///
    /// Only strict mode can fail. Legacy mode always yields an address, even if
    /// it is garbage.
    pub fn resolve(&self, chain: &PointerChain) -> std::result::Result<u64, ChainBreak> {
        let offsets = chain.offsets();
        let Some((&base, rest)) = offsets.split_first() else {
            return Ok(0);
        };

        let mut current = base as u64;
        for (i, &offset) in rest.iter().enumerate() {
            let pointer = match (self.reader.read_u64(current), self.mode) {
                (Ok(0), ResolveMode::Strict) | (Err(_), ResolveMode::Strict) => {
                    return Err(ChainBreak {
                        step: i + 1,
                        address: current,
                    });
                }
                (Ok(pointer), _) => pointer,
                (Err(_), ResolveMode::Legacy) => 0,
            };
            current = pointer.wrapping_add(offset as u64);
        }

        Ok(current)
    }

    /// Resolve every configured field independently
    pub fn resolve_all(&self, offsets: &OffsetsCollection) -> ResolvedAddressTable {
        let mut table = ResolvedAddressTable::default();

        for field in Field::ALL {
            match self.resolve(offsets.chain(field)) {
                Ok(address) => {
                    debug!("{}: {} -> {:#x}", field, offsets.chain(field), address);
                    table.addresses[field.index()] = address;
                }
                Err(brk) => {
                    warn!("{}", brk.into_error(field));
                    table.unresolved.push(field);
                }
            }
        }

        table
    }
}

/// Final address for each tracked field
///
/// Always holds exactly one entry per [`Field`]. Unresolved fields are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAddressTable {
    addresses: [u64; Field::COUNT],
    unresolved: Vec<Field>,
}

impl ResolvedAddressTable {
    /// Build a table from explicit addresses (tests and diagnostics)
    pub fn from_addresses(addresses: [u64; Field::COUNT]) -> Self {
        Self {
            addresses,
            unresolved: Vec::new(),
        }
    }

    pub fn get(&self, field: Field) -> u64 {
        self.addresses[field.index()]
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, u64)> + '_ {
        Field::ALL.iter().map(|&f| (f, self.get(f)))
    }

    /// Fields whose chain could not be followed
    pub fn unresolved(&self) -> &[Field] {
        &self.unresolved
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{MockMemoryBuilder, MockMemoryReader};

    // 0x1000 -> 0x5000, 0x5000 + 0x90 -> 0x9000
    fn two_level_memory() -> MockMemoryReader {
        MockMemoryBuilder::new()
            .base(0x1000)
            .write_u64(0, 0x5000)
            .base(0x5000)
            .write_u64(0x90, 0x9000)
            .base(0x9000)
            .write_u32(0x10, 4)
            .build()
    }

    #[test]
    fn test_resolve_empty_chain_is_null() {
        let reader = two_level_memory();
        let resolver = PointerResolver::new(&reader, ResolveMode::Strict);
        assert_eq!(resolver.resolve(&PointerChain::null()), Ok(0));
    }

    #[test]
    fn test_resolve_fixed_address_is_literal() {
        let reader = two_level_memory();
        let resolver = PointerResolver::new(&reader, ResolveMode::Strict);
        // No indirection, even for unmapped addresses
        assert_eq!(resolver.resolve(&PointerChain::fixed(0x415df88)), Ok(0x415df88));
    }

    #[test]
    fn test_resolve_multi_level_chain() {
        let reader = two_level_memory();

        for mode in [ResolveMode::Strict, ResolveMode::Legacy] {
            let resolver = PointerResolver::new(&reader, mode);
            assert_eq!(resolver.resolve(&PointerChain::from([0x1000, 0])), Ok(0x5000));
            assert_eq!(
                resolver.resolve(&PointerChain::from([0x1000, 0x90, 0x10])),
                Ok(0x9010)
            );
            assert_eq!(reader.read_u32(0x9010).unwrap(), 4);
        }
    }

    #[test]
    fn test_resolve_negative_offset() {
        let reader = two_level_memory();
        let resolver = PointerResolver::new(&reader, ResolveMode::Strict);
        assert_eq!(resolver.resolve(&PointerChain::from([0x1000, -0x10])), Ok(0x4ff0));
    }

    #[test]
    fn test_strict_stops_at_unreadable_pointer() {
        let reader = two_level_memory();
        let resolver = PointerResolver::new(&reader, ResolveMode::Strict);

        let brk = resolver
            .resolve(&PointerChain::from([0x1000, 0x20, 0x8]))
            .unwrap_err();
        assert_eq!(
            brk,
            ChainBreak {
                step: 2,
                address: 0x5020
            }
        );
    }

    #[test]
    fn test_strict_stops_at_null_pointer() {
        let reader = MockMemoryBuilder::new().base(0x1000).write_u64(0, 0).build();
        let resolver = PointerResolver::new(&reader, ResolveMode::Strict);

        let brk = resolver.resolve(&PointerChain::from([0x1000, 0x8])).unwrap_err();
        assert_eq!(brk.step, 1);
        assert_eq!(brk.address, 0x1000);
    }

    #[test]
    fn test_legacy_propagates_sentinel_arithmetically() {
        let reader = two_level_memory();
        let resolver = PointerResolver::new(&reader, ResolveMode::Legacy);

        // 0x5020 is unmapped: the read degrades to 0 and the offset is still added
        assert_eq!(
            resolver.resolve(&PointerChain::from([0x1000, 0x20, 0x8])),
            Ok(0x8)
        );
    }

    #[test]
    fn test_resolve_all_marks_unresolved_fields() {
        let reader = two_level_memory();
        let mut offsets = OffsetsCollection::builtin();
        offsets.set_chain(Field::GameState, PointerChain::from([0x1000, 0]));
        offsets.set_chain(Field::GameFlow, PointerChain::from([0x1000, 0x90, 0x10]));
        offsets.set_chain(Field::FadeState, PointerChain::fixed(0x415df88));

        let table = PointerResolver::new(&reader, ResolveMode::Strict).resolve_all(&offsets);

        assert_eq!(table.len(), Field::COUNT);
        assert_eq!(table.get(Field::GameState), 0x5000);
        assert_eq!(table.get(Field::GameFlow), 0x9010);
        assert_eq!(table.get(Field::FadeState), 0x415df88);
        // Built-in chains point into the real game, which the mock does not map
        assert_eq!(table.get(Field::Mission), 0);
        assert!(table.unresolved().contains(&Field::Mission));
        assert!(table.unresolved().contains(&Field::LevelManager));
        assert!(!table.unresolved().contains(&Field::FadeValue));
        assert!(!table.is_complete());
    }

    #[test]
    fn test_table_iter_covers_all_fields() {
        let table = ResolvedAddressTable::from_addresses([1, 2, 3, 4, 5, 6, 7]);
        let collected: Vec<_> = table.iter().collect();
        assert_eq!(collected.len(), Field::COUNT);
        assert_eq!(collected[6], (Field::Mission, 7));
        assert!(table.is_complete());
    }
}
