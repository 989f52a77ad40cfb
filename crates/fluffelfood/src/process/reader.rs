use byteorder::{ByteOrder, LE};

use crate::error::{Error, Result};
use crate::process::ProcessHandle;

/// Random-access reads from a foreign address space.
///
/// Implementors only provide [`read_bytes`](ReadMemory::read_bytes); the typed
/// helpers decode little-endian values on top of it.
pub trait ReadMemory {
    /// Read exactly `size` bytes starting at `address`
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Read an unsigned integer of `width` bytes (1, 2, 4 or 8)
    ///
    /// Any other width is rejected before touching memory.
    fn read_uint(&self, address: u64, width: usize) -> Result<u64> {
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(Error::UnsupportedWidth(width));
        }

        let bytes = self.read_bytes(address, width)?;
        Ok(LE::read_uint(&bytes, width))
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        let bytes = self.read_bytes(address, 2)?;
        Ok(LE::read_u16(&bytes))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(LE::read_u32(&bytes))
    }

    /// Read an 8-byte pointer
    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(LE::read_u64(&bytes))
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(LE::read_f32(&bytes))
    }
}

impl<R: ReadMemory + ?Sized> ReadMemory for &R {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }
}

/// Reader over an opened game process
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn pid(&self) -> u32 {
        self.process.pid
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.process.read_at(address, size)
    }
}
