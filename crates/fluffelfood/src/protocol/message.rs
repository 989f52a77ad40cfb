use byteorder::{ByteOrder, LE};
use strum::{Display, FromRepr, IntoStaticStr};
use tracing::warn;

use crate::error::{Error, Result};

/// Encoded size of a [`TimerMessage`]
pub const MESSAGE_SIZE: usize = 9;

/// Highest icon index the mask can carry
pub const MAX_ICON: u32 = 32;

/// Run control sent to the timer
///
/// `Start` and `Stop` are one-shot: the timer acts on them once and the
/// client forgets them after a send.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Control {
    /// Also means "continue" after a pause
    #[default]
    None = 0,
    Pause = 1,
    Start = 200,
    Stop = 201,
}

impl Control {
    pub const CONTINUE: Control = Control::None;

    pub fn is_one_shot(self) -> bool {
        self as u8 >= 200
    }
}

/// One frame of the timer protocol
///
/// Layout: control (u8), section (u32 LE), icon mask (u32 LE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerMessage {
    pub control: Control,
    pub section: u32,
    /// Bit `i` shows icon `i + 1`
    pub icon_mask: u32,
}

impl TimerMessage {
    pub fn new(control: Control, section: u32, icon_mask: u32) -> Self {
        Self {
            control,
            section,
            icon_mask,
        }
    }

    pub fn encode(&self) -> [u8; MESSAGE_SIZE] {
        let mut buf = [0u8; MESSAGE_SIZE];
        buf[0] = self.control as u8;
        LE::write_u32(&mut buf[1..5], self.section);
        LE::write_u32(&mut buf[5..9], self.icon_mask);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != MESSAGE_SIZE {
            return Err(Error::InvalidMessage(format!(
                "expected {} bytes, got {}",
                MESSAGE_SIZE,
                buf.len()
            )));
        }

        let control = Control::from_repr(buf[0])
            .ok_or_else(|| Error::InvalidMessage(format!("unknown control {}", buf[0])))?;

        Ok(Self {
            control,
            section: LE::read_u32(&buf[1..5]),
            icon_mask: LE::read_u32(&buf[5..9]),
        })
    }
}

/// Mask bit for a 1-based icon index, `None` outside 1..=32
pub fn icon_bit(index: u32) -> Option<u32> {
    (1..=MAX_ICON).contains(&index).then(|| 1u32 << (index - 1))
}

/// OR together the bits for the given icon indices
pub fn icon_mask_from<I>(indices: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    indices.into_iter().fold(0, |mask, index| match icon_bit(index) {
        Some(bit) => mask | bit,
        None => {
            warn!("Ignoring icon index {} (valid: 1..={})", index, MAX_ICON);
            mask
        }
    })
}
