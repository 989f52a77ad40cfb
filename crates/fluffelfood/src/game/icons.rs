use strum::{Display, FromRepr, IntoStaticStr};

use crate::game::{GameStateFlags, StateSnapshot};

/// Icons the timer can show, by their 1-based index in the timer's icon
/// configuration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromRepr, IntoStaticStr, Display,
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Icon {
    Logo = 1,
    Loading = 7,
    SaveGame = 8,
    Menu = 9,
    Cinematic = 11,
    Dead = 12,
}

impl Icon {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Icons for a snapshot, ascending by index
pub fn icons_for(snapshot: &StateSnapshot) -> Vec<Icon> {
    let flags = snapshot.gamestate;
    let mut icons = vec![Icon::Logo];

    if snapshot.loading_icon != 0 {
        icons.push(Icon::Loading);
    }
    if flags.contains(GameStateFlags::LOADING_SAVE) {
        icons.push(Icon::SaveGame);
    }
    if flags.in_menu() {
        icons.push(Icon::Menu);
    }
    if flags.contains(GameStateFlags::CINEMATIC) {
        icons.push(Icon::Cinematic);
    }
    if flags.contains(GameStateFlags::DEAD) {
        icons.push(Icon::Dead);
    }

    icons
}
