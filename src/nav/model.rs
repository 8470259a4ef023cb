//! Elm-style state model for the navigation core.
//!
//! All navigation state lives in [`NavModel`]. Input arrives as [`NavMsg`]
//! values; side effects are described by the [`Effect`] list inside the
//! [`Transition`] returned from [`super::update::update`].
//!
//! **Design invariant:** the model is deterministic and testable; no I/O
//! happens here.

use crate::calibration::{DEFAULT_MIN_WIDTH_PX, DEFAULT_PIXELS_PER_MM};
use crate::charts::ChartVariant;

use super::input::NavKey;
use super::selection::Selection;
use super::targets::{Target, focusable_targets};

// ──────────────────── views ────────────────────

/// Top-level screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Chart picker plus the calibration entry.
    #[default]
    Landing,
    /// Reference-card sizing flow.
    Calibration,
    /// The optotype chart itself.
    ChartDisplay,
}

impl View {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Calibration => "calibration",
            Self::ChartDisplay => "chart",
        }
    }
}

/// Whether directional input drives the chart or the control bar.
/// Only meaningful while `view == ChartDisplay`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChartSubMode {
    #[default]
    Display,
    ControlBar,
}

// ──────────────────── messages & effects ────────────────────

/// Input to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMsg {
    /// A logical key press.
    Key(NavKey),
    /// A pointer press on a rendered target (virtual cursor hit).
    Press(Target),
    /// Host notification that fullscreen was entered or left.
    FullscreenChanged(bool),
}

/// Side effect requested by a transition, executed in order by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Grant input focus to the target.
    Focus(Target),
    /// Drop focus if it currently rests inside the control bar.
    ClearFocus,
    /// The target's primary action ran.
    Activate(Target),
    /// Overwrite the persisted calibration scalar.
    PersistCalibration(f64),
    EnterFullscreen,
    ExitFullscreen,
    /// Leave the kiosk.
    Quit,
}

/// Outcome of one reducer step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    /// The event was acted on; the host must suppress its default handling.
    pub consumed: bool,
    pub effects: Vec<Effect>,
}

impl Transition {
    /// The event was not handled and may fall through to the host.
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            consumed: false,
            effects: Vec::new(),
        }
    }

    /// Handled, no side effects.
    #[must_use]
    pub const fn consumed() -> Self {
        Self {
            consumed: true,
            effects: Vec::new(),
        }
    }

    /// Handled with the given effects.
    #[must_use]
    pub const fn with(effects: Vec<Effect>) -> Self {
        Self {
            consumed: true,
            effects,
        }
    }
}

// ──────────────────── model ────────────────────

/// Tunables the reducer needs from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavSettings {
    /// Lower bound for the calibration box width.
    pub min_width_px: u32,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            min_width_px: DEFAULT_MIN_WIDTH_PX,
        }
    }
}

/// Complete navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct NavModel {
    pub view: View,
    pub sub_mode: ChartSubMode,
    pub selection: Selection,
    /// Focus cursor into the landing targets.
    pub landing_focus: usize,
    /// Focus cursor into the calibration targets.
    pub calibration_focus: usize,
    /// Focus cursor into the chart control bar.
    pub controls_focus: usize,
    /// Live width of the calibration box.
    pub calibration_width_px: u32,
    /// Read copy of the calibration scalar.
    pub pixels_per_mm: f64,
    /// Mirrors the host's fullscreen state; only host notifications change it.
    pub fullscreen: bool,
    pub settings: NavSettings,
}

impl Default for NavModel {
    fn default() -> Self {
        Self::new(DEFAULT_PIXELS_PER_MM, NavSettings::default())
    }
}

impl NavModel {
    /// Fresh model on the landing view.
    #[must_use]
    pub fn new(pixels_per_mm: f64, settings: NavSettings) -> Self {
        Self {
            view: View::Landing,
            sub_mode: ChartSubMode::Display,
            selection: Selection::default(),
            landing_focus: 0,
            calibration_focus: 0,
            controls_focus: 0,
            calibration_width_px: crate::calibration::width_px_for(
                pixels_per_mm,
                settings.min_width_px,
            ),
            pixels_per_mm,
            fullscreen: false,
            settings,
        }
    }

    /// Start directly on a chart, as if its landing card had been pressed.
    #[must_use]
    pub fn open_chart(mut self, variant: ChartVariant) -> Self {
        self.selection.select_variant(variant);
        self.view = View::ChartDisplay;
        self.sub_mode = ChartSubMode::Display;
        self.controls_focus = 0;
        self.landing_focus = ChartVariant::ALL
            .iter()
            .position(|v| *v == variant)
            .unwrap_or(0);
        self
    }

    /// Focusable targets for the current view, computed fresh.
    ///
    /// Empty on a fullscreen chart: the control bar is not drawn there, so
    /// nothing in it can be traversed or activated.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        if self.view == View::ChartDisplay && self.fullscreen {
            return Vec::new();
        }
        focusable_targets(self.view, &self.selection)
    }

    /// Focus cursor that belongs to the current view.
    #[must_use]
    pub const fn focus_cursor(&self) -> usize {
        match self.view {
            View::Landing => self.landing_focus,
            View::Calibration => self.calibration_focus,
            View::ChartDisplay => self.controls_focus,
        }
    }

    pub const fn focus_cursor_mut(&mut self) -> &mut usize {
        match self.view {
            View::Landing => &mut self.landing_focus,
            View::Calibration => &mut self.calibration_focus,
            View::ChartDisplay => &mut self.controls_focus,
        }
    }

    /// True while directional input traverses the chart control bar.
    #[must_use]
    pub fn in_control_bar(&self) -> bool {
        self.view == View::ChartDisplay && self.sub_mode == ChartSubMode::ControlBar
    }

    /// On-screen font size for the current line.
    #[must_use]
    pub fn current_font_px(&self) -> Option<f64> {
        self.selection
            .current_line()
            .map(|line| crate::calibration::font_size_px(line.height_mm, self.pixels_per_mm))
    }
}
