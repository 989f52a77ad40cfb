use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::protocol::{Control, TimerMessage, icon_mask_from};

/// Socket the timer listens on by default
pub const DEFAULT_SOCKET: &str = "/tmp/fluffelwatch";

/// Client side of the timer protocol
///
/// Keeps the last control, section and icon mask so callers can update one
/// part and resend the whole state.
pub struct TimerClient<W: Write = UnixStream> {
    stream: Option<W>,
    state: TimerMessage,
}

impl TimerClient<UnixStream> {
    /// Connect to the timer's Unix socket
    pub fn connect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| Error::SocketConnectFailed {
            path: path.display().to_string(),
            source,
        })?;

        info!("Connected to timer at {}", path.display());
        Ok(Self::from_stream(stream))
    }
}

impl<W: Write> TimerClient<W> {
    pub fn from_stream(stream: W) -> Self {
        Self {
            stream: Some(stream),
            state: TimerMessage::default(),
        }
    }

    /// Retained state that the next send will carry
    pub fn state(&self) -> TimerMessage {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&W> {
        self.stream.as_ref()
    }

    /// Send one message and retain it; one-shot controls are dropped afterwards
    pub fn send(&mut self, control: Control, section: u32, icon_mask: u32) -> Result<()> {
        let message = TimerMessage::new(control, section, icon_mask);
        let stream = self.stream.as_mut().ok_or_else(|| {
            Error::ProtocolSendFailed(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "timer client is disconnected",
            ))
        })?;

        stream
            .write_all(&message.encode())
            .and_then(|_| stream.flush())
            .map_err(Error::ProtocolSendFailed)?;

        debug!(
            "Sent control={} section={} icons={:#x}",
            control, section, icon_mask
        );

        self.state = message;
        if control.is_one_shot() {
            self.state.control = Control::None;
        }
        Ok(())
    }

    pub fn send_current_state(&mut self) -> Result<()> {
        let TimerMessage {
            control,
            section,
            icon_mask,
        } = self.state;
        self.send(control, section, icon_mask)
    }

    pub fn update_control(&mut self, control: Control) {
        self.state.control = control;
    }

    pub fn update_section(&mut self, section: u32) {
        self.state.section = section;
    }

    /// Replace the shown icons with the given 1-based indices
    pub fn update_icons<I>(&mut self, indices: I)
    where
        I: IntoIterator<Item = u32>,
    {
        self.state.icon_mask = icon_mask_from(indices);
    }

    pub fn clear_icons(&mut self) {
        self.state.icon_mask = 0;
    }

    pub fn clear_state(&mut self) {
        self.state = TimerMessage::default();
    }

    /// Drop the connection; further sends fail
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            info!("Disconnected from timer");
        }
    }
}
