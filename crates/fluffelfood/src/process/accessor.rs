use std::cell::RefCell;

use tracing::trace;

use crate::error::Error;
use crate::process::ReadMemory;

/// Sentinel returned for every failed or rejected read
pub const SENTINEL: u64 = 0;

/// Degrading wrapper around a [`ReadMemory`] source.
///
/// Reads never fail: unsupported widths and I/O errors come back as
/// [`SENTINEL`]. The cause of the most recent failure is kept so callers can
/// still tell a real zero from a failed read.
pub struct MemoryAccessor<R> {
    reader: R,
    last_error: RefCell<Option<Error>>,
}

impl<R: ReadMemory> MemoryAccessor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            last_error: RefCell::new(None),
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Read an unsigned integer, or 0 on any failure
    pub fn read_uint(&self, address: u64, width: usize) -> u64 {
        let result = self.reader.read_uint(address, width);
        self.settle(result, SENTINEL)
    }

    /// Read a 32-bit float, or 0.0 on any failure
    pub fn read_f32(&self, address: u64) -> f32 {
        let result = self.reader.read_f32(address);
        self.settle(result, 0.0)
    }

    /// Whether the most recent read failed
    pub fn last_failed(&self) -> bool {
        self.last_error.borrow().is_some()
    }

    /// Take the cause of the most recent failed read
    pub fn take_last_error(&self) -> Option<Error> {
        self.last_error.borrow_mut().take()
    }

    fn settle<T>(&self, result: crate::Result<T>, sentinel: T) -> T {
        match result {
            Ok(value) => {
                *self.last_error.borrow_mut() = None;
                value
            }
            Err(e) => {
                trace!("Read degraded to sentinel: {}", e);
                *self.last_error.borrow_mut() = Some(e);
                sentinel
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::MockMemoryBuilder;

    fn accessor() -> MemoryAccessor<crate::process::MockMemoryReader> {
        let reader = MockMemoryBuilder::new()
            .base(0x4000)
            .write_u64(0, u64::MAX)
            .write_u32(8, 0)
            .write_f32(12, 0.5)
            .build();
        MemoryAccessor::new(reader)
    }

    #[test]
    fn test_unsupported_width_is_sentinel() {
        let accessor = accessor();
        for width in [0, 3, 5, 6, 7, 9] {
            assert_eq!(accessor.read_uint(0x4000, width), SENTINEL);
            assert!(accessor.last_failed());
            assert!(matches!(
                accessor.take_last_error(),
                Some(Error::UnsupportedWidth(_))
            ));
        }
    }

    #[test]
    fn test_zero_is_distinguishable_from_failure() {
        let accessor = accessor();

        assert_eq!(accessor.read_uint(0x4008, 4), 0);
        assert!(!accessor.last_failed());

        assert_eq!(accessor.read_uint(0xdead_0000, 4), 0);
        assert!(accessor.last_failed());
        assert!(matches!(
            accessor.take_last_error(),
            Some(Error::MemoryReadFailed { address: 0xdead_0000, .. })
        ));
        assert!(!accessor.last_failed());
    }

    #[test]
    fn test_success_clears_failure() {
        let accessor = accessor();
        accessor.read_uint(0x10, 4);
        assert!(accessor.last_failed());

        assert_eq!(accessor.read_uint(0x4000, 8), u64::MAX);
        assert!(!accessor.last_failed());
    }

    #[test]
    fn test_read_f32() {
        let accessor = accessor();
        assert_eq!(accessor.read_f32(0x400c), 0.5);
        assert_eq!(accessor.read_f32(0x10), 0.0);
        assert!(accessor.last_failed());
    }
}
