use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process memory: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to connect to timer socket {path}: {source}")]
    SocketConnectFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Unsupported read width: {0} bytes")]
    UnsupportedWidth(usize),

    #[error("Pointer chain for {field} broke at step {step} (address {address:#x})")]
    UnresolvedAddress {
        field: String,
        step: usize,
        address: u64,
    },

    #[error("Failed to send timer message: {0}")]
    ProtocolSendFailed(#[source] std::io::Error),

    #[error("Invalid timer message: {0}")]
    InvalidMessage(String),

    #[error("Invalid offsets: {0}")]
    InvalidOffsets(String),

    #[error("Game binary mismatch: expected {expected}, got {actual}")]
    BinaryMismatch { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Failures to attach to the game or the timer. These abort startup.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            Error::ProcessNotFound(_)
                | Error::ProcessOpenFailed(_)
                | Error::SocketConnectFailed { .. }
        )
    }
}
