//! Chart data provider: immutable optotype tables keyed by [`ChartVariant`].
//!
//! Every chart is ordered from the largest optotype (index 0) to the smallest.
//! Heights are physical millimetres for a 6-metre testing distance; the
//! rendering surface converts them to pixels with the calibration scalar.

mod tables;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::AcuityError;

/// Chart families offered by the kiosk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartVariant {
    /// Latin-letter Snellen chart.
    #[default]
    Snellen,
    /// Devanagari native-script chart.
    Hindi,
    /// Digit chart for readers without a shared alphabet.
    Numeric,
    /// Landolt C rings; orientation is chosen by the rendering surface.
    LandoltC,
}

impl ChartVariant {
    /// All variants in presentation order (landing cards, selector buttons).
    pub const ALL: [Self; 4] = [Self::Snellen, Self::Hindi, Self::Numeric, Self::LandoltC];

    /// Lines for this variant, largest first.
    #[must_use]
    pub const fn lines(self) -> &'static [ChartLine] {
        match self {
            Self::Snellen => tables::SNELLEN,
            Self::Hindi => tables::HINDI,
            Self::Numeric => tables::NUMERIC,
            Self::LandoltC => tables::LANDOLT_C,
        }
    }

    /// Human-facing title used on cards and selector buttons.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Snellen => "English",
            Self::Hindi => "Hindi",
            Self::Numeric => "Numbers",
            Self::LandoltC => "C Chart",
        }
    }

    /// Representative glyph shown on the landing card.
    #[must_use]
    pub const fn preview_glyph(self) -> &'static str {
        match self {
            Self::Snellen => "A",
            Self::Hindi => "र",
            Self::Numeric => "7",
            Self::LandoltC => "C",
        }
    }

    /// Stable identifier used by the CLI and the config file.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Snellen => "snellen",
            Self::Hindi => "hindi",
            Self::Numeric => "numeric",
            Self::LandoltC => "landolt_c",
        }
    }

    /// Whether individual optotypes are drawn in a random orientation.
    #[must_use]
    pub const fn is_rotatable(self) -> bool {
        matches!(self, Self::LandoltC)
    }

    /// Total optotype count across every line.
    #[must_use]
    pub fn glyph_count(self) -> usize {
        self.lines().iter().map(|line| line.glyphs.len()).sum()
    }
}

impl fmt::Display for ChartVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartVariant {
    type Err = AcuityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|variant| variant.id() == needle)
            .ok_or_else(|| AcuityError::UnknownChart {
                name: raw.to_string(),
            })
    }
}

/// Vertical rhythm hint for a chart line. Opaque to navigation; the rendering
/// surface maps it to padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSpacing {
    /// Leading of roughly 1.1 em; glyphs sit half a glyph apart.
    Tight,
}

/// One row of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartLine {
    /// Nominal acuity ratio, e.g. `"6/12"`.
    pub acuity: &'static str,
    /// Optotypes in reading order. May be empty; an empty line renders nothing.
    pub glyphs: &'static [&'static str],
    /// Physical optotype height in millimetres.
    pub height_mm: f64,
    /// Spacing token passed through to the renderer.
    pub spacing: LineSpacing,
}

impl ChartLine {
    /// Glyph at `index`, or `None` when the line is empty or the index is past
    /// the end.
    #[must_use]
    pub fn glyph(&self, index: usize) -> Option<&'static str> {
        self.glyphs.get(index).copied()
    }

    /// Index of the last glyph (0 for an empty line).
    #[must_use]
    pub const fn last_index(&self) -> usize {
        self.glyphs.len().saturating_sub(1)
    }
}
