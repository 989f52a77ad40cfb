//! Human-readable status of a snapshot for the terminal

use std::fmt;

use owo_colors::OwoColorize;

use crate::game::{GameStateFlags, StateSnapshot};
use crate::offset::{Field, ResolvedAddressTable};

/// One `label: value` line of the status view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub label: &'static str,
    pub value: String,
    /// Value is unknown or unreadable
    pub warn: bool,
}

impl StatusLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            warn: false,
        }
    }

    fn warn(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            warn: true,
            ..Self::new(label, value)
        }
    }

    /// Plain text without colors
    pub fn plain(&self) -> String {
        format!("{:<14}{}", format!("{}:", self.label), self.value)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("{:<14}", format!("{}:", self.label));
        if self.warn {
            write!(f, "{}{}", label.bold(), self.value.yellow())
        } else {
            write!(f, "{}{}", label.bold(), self.value.green())
        }
    }
}

fn flag_names(flags: GameStateFlags) -> String {
    let mut names: Vec<String> = flags
        .iter_names()
        .map(|(name, _)| name.to_lowercase().replace('_', " "))
        .collect();

    let unknown = flags.unknown_bits();
    if unknown != 0 {
        names.push(format!("unknown {:#x}", unknown));
    }

    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn typed_or_raw<T: fmt::Display>(label: &'static str, typed: Option<T>, raw: u32) -> StatusLine {
    match typed {
        Some(v) => StatusLine::new(label, v.to_string()),
        None => StatusLine::warn(label, format!("unknown ({})", raw)),
    }
}

/// Status view of one snapshot
pub fn status_lines(snapshot: &StateSnapshot) -> Vec<StatusLine> {
    let fading = match snapshot.fade_state() {
        Some(state) => StatusLine::new(
            "Fading",
            format!("{} ({:.1})", state, snapshot.fade_value),
        ),
        None => StatusLine::warn(
            "Fading",
            format!("unknown ({}) ({:.1})", snapshot.fade_state, snapshot.fade_value),
        ),
    };

    vec![
        StatusLine::new("Gamestate", flag_names(snapshot.gamestate)),
        typed_or_raw(
            "Loading icon",
            snapshot.loading_icon(),
            u32::from(snapshot.loading_icon),
        ),
        fading,
        typed_or_raw("Game flow", snapshot.game_flow(), snapshot.game_flow),
        typed_or_raw(
            "Level manager",
            snapshot.level_manager(),
            snapshot.level_manager,
        ),
        StatusLine::new("Mission", format!("M{:02}", snapshot.mission)),
    ]
}

/// Status view plus the last event label, as shown while a run is tracked
pub fn run_status_lines(snapshot: &StateSnapshot, last_label: &str) -> Vec<StatusLine> {
    let mut lines = status_lines(snapshot);
    let status = if last_label.is_empty() {
        StatusLine::new("Status", "waiting for start")
    } else {
        StatusLine::new("Status", last_label)
    };
    lines.push(status);
    lines
}

/// One line per field with its resolved address
pub fn address_lines(table: &ResolvedAddressTable) -> Vec<StatusLine> {
    Field::ALL
        .iter()
        .map(|&field| {
            let address = table.get(field);
            let value = format!("0x{:016X}", address);
            if address == 0 {
                StatusLine::warn(field.name(), value)
            } else {
                StatusLine::new(field.name(), value)
            }
        })
        .collect()
}
