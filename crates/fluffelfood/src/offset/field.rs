use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// How a tracked value is stored in game memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Little-endian unsigned integer of the given byte width
    Uint(usize),
    Float32,
}

impl ValueKind {
    pub fn width(&self) -> usize {
        match self {
            Self::Uint(width) => *width,
            Self::Float32 => 4,
        }
    }
}

/// Game values sampled every tick
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    GameState,
    LoadingIcon,
    FadeState,
    FadeValue,
    GameFlow,
    LevelManager,
    Mission,
}

impl Field {
    pub const COUNT: usize = 7;

    /// All fields, in table order
    pub const ALL: [Field; Field::COUNT] = [
        Field::GameState,
        Field::LoadingIcon,
        Field::FadeState,
        Field::FadeValue,
        Field::GameFlow,
        Field::LevelManager,
        Field::Mission,
    ];

    /// Storage layout of the value behind this field
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::GameState => ValueKind::Uint(4),
            Self::LoadingIcon => ValueKind::Uint(2),
            Self::FadeState => ValueKind::Uint(4),
            Self::FadeValue => ValueKind::Float32,
            Self::GameFlow => ValueKind::Uint(4),
            Self::LevelManager => ValueKind::Uint(4),
            Self::Mission => ValueKind::Uint(2),
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}
