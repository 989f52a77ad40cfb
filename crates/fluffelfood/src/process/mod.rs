mod accessor;
mod handle;
mod reader;

// Mock memory reader for unit tests and, with `test-utils`, integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use accessor::{MemoryAccessor, SENTINEL};
pub use handle::*;
pub use reader::{MemoryReader, ReadMemory};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
