//! Synthetic address space for tests.
//!
//! A [`MockMemoryReader`] holds any number of disjoint regions. Reads that are
//! not fully contained in one region fail the same way an unmapped page in a
//! live process does.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::process::ReadMemory;

#[derive(Debug, Clone)]
struct Region {
    base: u64,
    data: Vec<u8>,
}

impl Region {
    fn slice(&self, address: u64, size: usize) -> Option<&[u8]> {
        let start = address.checked_sub(self.base)? as usize;
        let end = start.checked_add(size)?;
        self.data.get(start..end)
    }

    fn slice_mut(&mut self, address: u64, size: usize) -> Option<&mut [u8]> {
        let start = address.checked_sub(self.base)? as usize;
        let end = start.checked_add(size)?;
        self.data.get_mut(start..end)
    }
}

/// In-memory reader with patchable contents
#[derive(Debug, Default)]
pub struct MockMemoryReader {
    regions: RefCell<Vec<Region>>,
}

impl MockMemoryReader {
    /// Overwrite bytes at an absolute address inside an existing region
    ///
    /// Panics when the address is not mapped; only meant for tests.
    pub fn poke(&self, address: u64, bytes: &[u8]) {
        let mut regions = self.regions.borrow_mut();
        let target = regions
            .iter_mut()
            .find_map(|r| r.slice_mut(address, bytes.len()))
            .unwrap_or_else(|| panic!("mock address {:#x} is not mapped", address));
        target.copy_from_slice(bytes);
    }

    pub fn poke_u16(&self, address: u64, value: u16) {
        self.poke(address, &value.to_le_bytes());
    }

    pub fn poke_u32(&self, address: u64, value: u32) {
        self.poke(address, &value.to_le_bytes());
    }

    pub fn poke_u64(&self, address: u64, value: u64) {
        self.poke(address, &value.to_le_bytes());
    }

    pub fn poke_f32(&self, address: u64, value: f32) {
        self.poke(address, &value.to_le_bytes());
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.regions
            .borrow()
            .iter()
            .find_map(|r| r.slice(address, size))
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::MemoryReadFailed {
                address,
                message: format!("{} bytes not mapped", size),
            })
    }
}

/// Builder for [`MockMemoryReader`]
///
/// Each call to [`base`](MockMemoryBuilder::base) starts a new region; the
/// `write_*` helpers take offsets relative to the current region and grow it
/// as needed.
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    regions: Vec<Region>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new region at `address`
    pub fn base(mut self, address: u64) -> Self {
        self.regions.push(Region {
            base: address,
            data: Vec::new(),
        });
        self
    }

    /// Make the current region at least `size` bytes long
    pub fn with_size(mut self, size: usize) -> Self {
        let region = self.current();
        if region.data.len() < size {
            region.data.resize(size, 0);
        }
        self
    }

    pub fn write_bytes(mut self, offset: usize, bytes: &[u8]) -> Self {
        let region = self.current();
        let end = offset + bytes.len();
        if region.data.len() < end {
            region.data.resize(end, 0);
        }
        region.data[offset..end].copy_from_slice(bytes);
        self
    }

    pub fn write_u16(self, offset: usize, value: u16) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_u32(self, offset: usize, value: u32) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_u64(self, offset: usize, value: u64) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn write_f32(self, offset: usize, value: f32) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            regions: RefCell::new(self.regions),
        }
    }

    fn current(&mut self) -> &mut Region {
        if self.regions.is_empty() {
            self.regions.push(Region {
                base: 0,
                data: Vec::new(),
            });
        }
        let last = self.regions.len() - 1;
        &mut self.regions[last]
    }
}
