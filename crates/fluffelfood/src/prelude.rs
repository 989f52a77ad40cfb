//! Prelude module for convenient imports
//!
//! ```ignore
//! use fluffelfood::prelude::*;
//! ```

// Driver
pub use crate::autosplitter::{Autosplitter, AutosplitterConfig, TickOutcome};

// Error handling
pub use crate::error::{Error, Result};

// Game state
pub use crate::game::{StateSampler, StateSnapshot, TransitionDetector, TransitionEvent};

// Memory access
pub use crate::offset::{OffsetsCollection, ResolveMode};
pub use crate::process::{MemoryReader, ProcessHandle, ReadMemory};

// Timer
pub use crate::protocol::{Control, TimerClient};
