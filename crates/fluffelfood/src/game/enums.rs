use bitflags::bitflags;
use strum::{Display, FromRepr, IntoStaticStr};

bitflags! {
    /// Gamestate word. Bits not listed here (4, 32, 64, ...) have been seen
    /// but their meaning is unknown; they are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GameStateFlags: u32 {
        const PAUSED = 1;
        /// Ripley is dead
        const DEAD = 2;
        const LOADING_SAVE = 8;
        const CINEMATIC = 16;
        const MENU = 1024;
        /// The main menu with the gas giant in the background
        const MAIN_MENU = 32768;
    }
}

impl Default for GameStateFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl GameStateFlags {
    /// Bits without a known meaning
    pub fn unknown_bits(&self) -> u32 {
        self.bits() & !Self::all().bits()
    }

    pub fn in_menu(&self) -> bool {
        self.intersects(Self::MENU | Self::MAIN_MENU)
    }
}

/// Bottom-right corner indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Display)]
#[repr(u16)]
pub enum LoadingIcon {
    #[strum(serialize = "hidden")]
    None = 0,
    /// Skip-cinematic bar is filling (player holds enter)
    #[strum(serialize = "pressing enter")]
    SkipBar = 1,
    #[strum(serialize = "visible")]
    Loading = 256,
}

/// How the fade value is applied to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Display)]
#[repr(u32)]
pub enum FadeState {
    /// Full visual, fade value ignored
    #[strum(serialize = "none")]
    None = 0,
    /// Black screen, fade value ignored
    #[strum(serialize = "black screen")]
    Black = 1,
    /// Fade value is how much of the screen is visible
    #[strum(serialize = "fading in/out")]
    Fading = 2,
    /// Eye blink overlay darkening from the top by the fade value
    #[strum(serialize = "blink effect")]
    FadeBlink = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Display)]
#[repr(u32)]
pub enum GameFlow {
    #[strum(serialize = "sleeping")]
    Nothing = 0,
    /// Before the intro plays
    #[strum(serialize = "initializing")]
    Init = 1,
    #[strum(serialize = "main menu")]
    MainMenu = 2,
    #[strum(serialize = "ingame")]
    InGame = 4,
    #[strum(serialize = "credits")]
    Credits = 5,
    #[strum(serialize = "loading screen")]
    LoadScreen = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Display)]
#[repr(u32)]
pub enum LevelManagerState {
    #[strum(serialize = "sleeping")]
    Nothing = 0,
    /// Loading level data
    #[strum(serialize = "loading")]
    Loading = 3,
    #[strum(serialize = "loaded")]
    Loaded = 5,
    /// Wrapping up the old level and starting to load the next one
    #[strum(serialize = "start loading")]
    LoadingStart = 7,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamestate_flags_keep_unknown_bits() {
        let flags = GameStateFlags::from_bits_retain(2 | 16 | 64);
        assert!(flags.contains(GameStateFlags::DEAD));
        assert!(flags.contains(GameStateFlags::CINEMATIC));
        assert_eq!(flags.unknown_bits(), 64);
        assert_eq!(flags.bits(), 82);
    }

    #[test]
    fn test_in_menu() {
        assert!(GameStateFlags::MENU.in_menu());
        assert!(GameStateFlags::MAIN_MENU.in_menu());
        assert!(!GameStateFlags::PAUSED.in_menu());
        assert!(!GameStateFlags::empty().in_menu());
    }

    #[test]
    fn test_from_repr() {
        assert_eq!(FadeState::from_repr(2), Some(FadeState::Fading));
        assert_eq!(FadeState::from_repr(9), None);
        assert_eq!(GameFlow::from_repr(6), Some(GameFlow::LoadScreen));
        assert_eq!(GameFlow::from_repr(3), None);
        assert_eq!(LevelManagerState::from_repr(7), Some(LevelManagerState::LoadingStart));
        assert_eq!(LoadingIcon::from_repr(256), Some(LoadingIcon::Loading));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(GameFlow::InGame.to_string(), "ingame");
        assert_eq!(FadeState::Black.to_string(), "black screen");
        assert_eq!(LoadingIcon::SkipBar.to_string(), "pressing enter");
        assert_eq!(LevelManagerState::LoadingStart.to_string(), "start loading");
    }
}
