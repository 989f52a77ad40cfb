//! Run-control events from snapshot to snapshot changes.
//!
//! Detection is a pure function of the previous and the current snapshot. The
//! rules live in one ordered table, [`RULES`], and the first rule whose guard
//! holds decides the event for the tick. Lifecycle edges (start, loading,
//! final sequence) come before the generic mission split, which would
//! otherwise fire on every mission change during a run.
//!
//! Most of the conditions follow the community ASL autosplitters for the game.

use crate::game::{Carry, FadeState, GameFlow, LevelManagerState, StateSnapshot};

/// Mission number of the last mission
pub const FINAL_MISSION: u16 = 19;

/// Fade value a loading fade-in has to cross to end the pause
pub const LOADING_END_FADE: f32 = 0.2;

/// Fade value the first fade-in of the final mission has to cross
pub const FINAL_SEQUENCE_FADE: f32 = 0.5;

/// Result of one detection step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    Start,
    LoadingBegin,
    LoadingEnd,
    FinalSequenceMarker,
    FinalStop,
    MissionSplit { to: u16 },
    None,
}

impl TransitionEvent {
    /// Human-readable status, empty for [`TransitionEvent::None`]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Start!",
            Self::LoadingBegin => "Loading!",
            Self::LoadingEnd => "Stopped loading!",
            Self::FinalSequenceMarker => "Final mission!",
            Self::FinalStop => "Final stop!",
            Self::MissionSplit { .. } => "Split mission",
            Self::None => "",
        }
    }

    /// Whether polling should stop after this event
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FinalStop)
    }

    /// Carried flags after this event
    pub fn apply(&self, carry: Carry) -> Carry {
        match self {
            Self::Start => Carry {
                started: true,
                ..carry
            },
            Self::FinalSequenceMarker => Carry {
                final_sequence_seen: true,
                ..carry
            },
            _ => carry,
        }
    }
}

/// Guard and event of one detection rule
pub struct Rule {
    pub name: &'static str,
    pub guard: fn(&StateSnapshot, &StateSnapshot) -> bool,
    pub event: fn(&StateSnapshot) -> TransitionEvent,
}

/// Detection rules in priority order
pub const RULES: &[Rule] = &[
    Rule {
        name: "start",
        guard: is_run_start,
        event: |_| TransitionEvent::Start,
    },
    Rule {
        name: "loading_begin",
        guard: is_loading_begin,
        event: |_| TransitionEvent::LoadingBegin,
    },
    Rule {
        name: "loading_end",
        guard: is_loading_end,
        event: |_| TransitionEvent::LoadingEnd,
    },
    Rule {
        name: "final_sequence",
        guard: is_final_sequence,
        event: |_| TransitionEvent::FinalSequenceMarker,
    },
    Rule {
        name: "final_stop",
        guard: is_final_stop,
        event: |_| TransitionEvent::FinalStop,
    },
    Rule {
        name: "mission_split",
        guard: is_mission_split,
        event: |curr| TransitionEvent::MissionSplit { to: curr.mission },
    },
];

// Mission 1 either fades in from the intro or leaves its loading screen
fn is_run_start(prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    !curr.started()
        && curr.mission == 1
        && ((curr.is_fading() && curr.fade_value > 0.0)
            || (prev.game_flow() == Some(GameFlow::LoadScreen)
                && curr.game_flow() == Some(GameFlow::InGame)))
}

fn is_loading_begin(prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    (prev.level_manager() == Some(LevelManagerState::Loaded)
        && curr.level_manager() == Some(LevelManagerState::LoadingStart))
        || curr.game_flow() == Some(GameFlow::LoadScreen)
}

fn is_loading_end(prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    curr.is_fading() && prev.fade_value < LOADING_END_FADE && curr.fade_value >= LOADING_END_FADE
}

// Initial fade-in of mission 19; blackouts before it must not stop the run
fn is_final_sequence(prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    curr.mission == FINAL_MISSION
        && curr.is_fading()
        && prev.fade_value < FINAL_SEQUENCE_FADE
        && curr.fade_value >= FINAL_SEQUENCE_FADE
}

fn is_final_stop(_prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    curr.final_sequence_seen()
        && curr.mission == FINAL_MISSION
        && curr.fade_state() == Some(FadeState::Black)
        && curr.game_flow() == Some(GameFlow::InGame)
}

fn is_mission_split(prev: &StateSnapshot, curr: &StateSnapshot) -> bool {
    prev.mission > 0 && prev.mission < curr.mission
}

/// Event, updated carry and label for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub event: TransitionEvent,
    pub carry: Carry,
    /// Name of the rule that matched, if any
    pub rule: Option<&'static str>,
}

impl Detection {
    pub fn label(&self) -> &'static str {
        self.event.label()
    }
}

/// Stateless evaluator of [`RULES`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitionDetector;

impl TransitionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Classify the change from `prev` to `curr`
    ///
    /// The carried flags are read from `curr`, which the sampler copied
    /// forward from the previous tick.
    pub fn detect(&self, prev: &StateSnapshot, curr: &StateSnapshot) -> Detection {
        let matched = RULES.iter().find(|rule| (rule.guard)(prev, curr));

        let (event, rule) = match matched {
            Some(rule) => ((rule.event)(curr), Some(rule.name)),
            None => (TransitionEvent::None, None),
        };

        Detection {
            event,
            carry: event.apply(curr.carry),
            rule,
        }
    }
}
