//! Focusable target handles and the pure function that lists them.
//!
//! The list is recomputed from `(view, selection)` on every transition and at
//! activation time; nothing caches a target by index.

use std::fmt;

use crate::charts::ChartVariant;

use super::model::View;
use super::selection::Selection;

/// Opaque handle for one interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    // landing
    ChartCard(ChartVariant),
    Calibrate,
    // calibration
    CalibrationBack,
    WidthDecrease,
    WidthIncrease,
    CalibrationSave,
    // chart control bar
    Home,
    Variant(ChartVariant),
    SizeLarger,
    SizeSmaller,
    GlyphPrev,
    GlyphNext,
    Reset,
    Fullscreen,
}

impl Target {
    /// True for targets that live in the chart view's control bar.
    #[must_use]
    pub const fn is_control_bar(self) -> bool {
        matches!(
            self,
            Self::Home
                | Self::Variant(_)
                | Self::SizeLarger
                | Self::SizeSmaller
                | Self::GlyphPrev
                | Self::GlyphNext
                | Self::Reset
                | Self::Fullscreen
        )
    }

    /// Whether activating the target would do anything for `selection`.
    ///
    /// Disabled targets stay in the traversal order; they are drawn dimmed and
    /// activating them is a consumed no-op.
    #[must_use]
    pub fn is_enabled(self, selection: &Selection) -> bool {
        match self {
            Self::SizeLarger => !selection.is_first_line(),
            Self::SizeSmaller => !selection.is_last_line(),
            Self::GlyphPrev => !selection.at_absolute_start(),
            Self::GlyphNext => !selection.at_absolute_end(),
            _ => true,
        }
    }

    /// Button caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChartCard(variant) | Self::Variant(variant) => variant.title(),
            Self::Calibrate => "Calibrate",
            Self::CalibrationBack => "Back",
            Self::WidthDecrease => "−",
            Self::WidthIncrease => "+",
            Self::CalibrationSave => "Save",
            Self::Home => "Home",
            Self::SizeLarger => "Larger",
            Self::SizeSmaller => "Smaller",
            Self::GlyphPrev => "◀",
            Self::GlyphNext => "▶",
            Self::Reset => "Reset",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChartCard(variant) => return write!(f, "card:{variant}"),
            Self::Variant(variant) => return write!(f, "variant:{variant}"),
            Self::Calibrate => "calibrate",
            Self::CalibrationBack => "calibration_back",
            Self::WidthDecrease => "width_decrease",
            Self::WidthIncrease => "width_increase",
            Self::CalibrationSave => "calibration_save",
            Self::Home => "home",
            Self::SizeLarger => "size_larger",
            Self::SizeSmaller => "size_smaller",
            Self::GlyphPrev => "glyph_prev",
            Self::GlyphNext => "glyph_next",
            Self::Reset => "reset",
            Self::Fullscreen => "fullscreen",
        };
        f.write_str(name)
    }
}

/// Ordered focusable targets for `view`.
///
/// In the chart view this is the control bar; the list is the same in both
/// sub-modes; only the focus plan differs. Glyph stepping buttons appear only
/// in single-glyph mode.
#[must_use]
pub fn focusable_targets(view: View, selection: &Selection) -> Vec<Target> {
    match view {
        View::Landing => ChartVariant::ALL
            .into_iter()
            .map(Target::ChartCard)
            .chain([Target::Calibrate])
            .collect(),
        View::Calibration => vec![
            Target::CalibrationBack,
            Target::WidthDecrease,
            Target::WidthIncrease,
            Target::CalibrationSave,
        ],
        View::ChartDisplay => {
            let mut targets = Vec::with_capacity(11);
            targets.push(Target::Home);
            targets.extend(ChartVariant::ALL.into_iter().map(Target::Variant));
            targets.push(Target::SizeLarger);
            targets.push(Target::SizeSmaller);
            if selection.single_glyph {
                targets.push(Target::GlyphPrev);
                targets.push(Target::GlyphNext);
            }
            targets.push(Target::Reset);
            targets.push(Target::Fullscreen);
            targets
        }
    }
}
