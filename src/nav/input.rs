//! Host-independent key vocabulary for the navigation core.
//!
//! The terminal layer translates raw key events into [`NavKey`] values; the
//! state machine never sees host key codes.

#![allow(missing_docs)]

/// Logical keys the remote-control interface understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    /// Dedicated fullscreen toggle (default `f`).
    ToggleFullscreen,
    /// Dedicated virtual-cursor toggle (default `m`).
    ToggleMouse,
    /// Leave the kiosk (honoured on the landing view only).
    Quit,
}

/// Directional component of a key, if it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl NavKey {
    /// Enter and Space both activate.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }

    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Help text for the on-screen key legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// Bindings shown in the footer legend of each view.
#[must_use]
pub const fn legend(view: super::model::View) -> &'static [HelpBinding] {
    use super::model::View;
    match view {
        View::Landing => &LANDING_LEGEND,
        View::Calibration => &CALIBRATION_LEGEND,
        View::ChartDisplay => &CHART_LEGEND,
    }
}

const LANDING_LEGEND: [HelpBinding; 4] = [
    HelpBinding {
        keys: "←/→",
        description: "choose",
    },
    HelpBinding {
        keys: "Enter",
        description: "open",
    },
    HelpBinding {
        keys: "m",
        description: "pointer",
    },
    HelpBinding {
        keys: "q",
        description: "quit",
    },
];

const CALIBRATION_LEGEND: [HelpBinding; 4] = [
    HelpBinding {
        keys: "←/→",
        description: "choose button",
    },
    HelpBinding {
        keys: "↑/↓",
        description: "resize box",
    },
    HelpBinding {
        keys: "Enter",
        description: "press",
    },
    HelpBinding {
        keys: "m",
        description: "pointer",
    },
];

const CHART_LEGEND: [HelpBinding; 5] = [
    HelpBinding {
        keys: "↑/↓",
        description: "line",
    },
    HelpBinding {
        keys: "←/→",
        description: "letter",
    },
    HelpBinding {
        keys: "Enter",
        description: "single letter",
    },
    HelpBinding {
        keys: "Esc",
        description: "controls",
    },
    HelpBinding {
        keys: "f",
        description: "fullscreen",
    },
];
