//! # fluffelfood
//!
//! Autosplitter for Alien: Isolation (Linux build) feeding the Fluffelwatch
//! timer.
//!
//! This crate provides:
//! - Read-only access to the game's memory through `/proc/<pid>/mem`
//! - Pointer chain resolution for the tracked game values
//! - Per-tick state sampling and run event detection
//! - The 9-byte Fluffelwatch timer protocol over a Unix socket
//! - The polling loop tying it all together, with a run log

pub mod autosplitter;
pub mod display;
pub mod error;
pub mod game;
pub mod offset;
pub mod prelude;
pub mod process;
pub mod protocol;
pub mod session;

pub use autosplitter::{Autosplitter, AutosplitterConfig, AutosplitterConfigBuilder, TickOutcome};
pub use error::{Error, Result};
pub use game::{
    Carry, Detection, FadeState, GameFlow, GameStateFlags, Icon, LevelManagerState, LoadingIcon,
    StateSampler, StateSnapshot, TransitionDetector, TransitionEvent, icons_for,
};
pub use offset::{
    BinaryFingerprint, Field, OffsetsCollection, PointerChain, PointerResolver, ResolveMode,
    ResolvedAddressTable, load_offsets, save_offsets, verify_binary,
};
pub use process::{MemoryAccessor, MemoryReader, ProcessHandle, ReadMemory};
pub use protocol::{Control, DEFAULT_SOCKET, TimerClient, TimerMessage};
pub use session::RunLog;
