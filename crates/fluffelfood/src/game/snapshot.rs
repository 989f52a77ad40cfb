use crate::game::{FadeState, GameFlow, GameStateFlags, LevelManagerState, LoadingIcon};

/// Run flags decided by the detector and carried from tick to tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Carry {
    /// The run has been started (timer received START)
    pub started: bool,
    /// The fade-in at the start of mission 19 has been seen
    pub final_sequence_seen: bool,
}

/// All sampled values for one tick
///
/// Raw integers are kept as read so that unknown values survive; the typed
/// accessors return `None` for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateSnapshot {
    pub gamestate: GameStateFlags,
    pub loading_icon: u16,
    pub fade_state: u32,
    pub fade_value: f32,
    pub game_flow: u32,
    pub level_manager: u32,
    pub mission: u16,
    pub carry: Carry,
}

impl StateSnapshot {
    pub fn loading_icon(&self) -> Option<LoadingIcon> {
        LoadingIcon::from_repr(self.loading_icon)
    }

    pub fn fade_state(&self) -> Option<FadeState> {
        FadeState::from_repr(self.fade_state)
    }

    pub fn game_flow(&self) -> Option<GameFlow> {
        GameFlow::from_repr(self.game_flow)
    }

    pub fn level_manager(&self) -> Option<LevelManagerState> {
        LevelManagerState::from_repr(self.level_manager)
    }

    pub fn started(&self) -> bool {
        self.carry.started
    }

    pub fn final_sequence_seen(&self) -> bool {
        self.carry.final_sequence_seen
    }

    pub fn is_fading(&self) -> bool {
        self.fade_state() == Some(FadeState::Fading)
    }

    /// Same snapshot with different carried flags
    pub fn with_carry(mut self, carry: Carry) -> Self {
        self.carry = carry;
        self
    }
}

// Fade values compare bitwise so a NaN read still equals itself.
impl PartialEq for StateSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.gamestate == other.gamestate
            && self.loading_icon == other.loading_icon
            && self.fade_state == other.fade_state
            && self.fade_value.to_bits() == other.fade_value.to_bits()
            && self.game_flow == other.game_flow
            && self.level_manager == other.level_manager
            && self.mission == other.mission
            && self.carry == other.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let snapshot = StateSnapshot {
            loading_icon: 256,
            fade_state: 2,
            game_flow: 4,
            level_manager: 42,
            ..Default::default()
        };

        assert_eq!(snapshot.loading_icon(), Some(LoadingIcon::Loading));
        assert_eq!(snapshot.fade_state(), Some(FadeState::Fading));
        assert!(snapshot.is_fading());
        assert_eq!(snapshot.game_flow(), Some(GameFlow::InGame));
        assert_eq!(snapshot.level_manager(), None);
    }

    #[test]
    fn test_equality_includes_carry() {
        let a = StateSnapshot::default();
        let b = a.with_carry(Carry {
            started: true,
            final_sequence_seen: false,
        });
        assert_ne!(a, b);
        assert_eq!(a, b.with_carry(Carry::default()));
    }

    #[test]
    fn test_nan_fade_value_equals_itself() {
        let snapshot = StateSnapshot {
            fade_value: f32::NAN,
            ..Default::default()
        };
        assert_eq!(snapshot, snapshot);
        assert_ne!(
            snapshot,
            StateSnapshot {
                fade_value: 0.0,
                ..Default::default()
            }
        );
    }
}
