//! Physical-size calibration: the single persisted pixels-per-millimetre
//! scalar and the size arithmetic built on it.
//!
//! # Protocol
//!
//! ```text
//! pixels_per_mm = observed_card_width_px / 85.6
//! font_size_px  = line.height_mm * pixels_per_mm * 1.4
//! ```
//!
//! The 1.4 factor (≈ 1 / 0.7) compensates for a font's em-box being taller
//! than the rendered cap height. Acuity sizes are physically wrong without it.
//!
//! # Error Philosophy
//!
//! Load problems (missing, unparseable, non-positive) fall back to the
//! default scalar and never block startup. Save errors are reported to the
//! caller, which logs them and keeps the in-memory value.

pub mod slot;

use crate::core::errors::{AcuityError, Result};

pub use slot::{FileSlot, KeyValueSlot, MemorySlot};

/// ISO/IEC 7810 ID-1 card width used as the on-screen reference.
pub const REFERENCE_CARD_WIDTH_MM: f64 = 85.6;

/// ID-1 card height, used only to draw the reference box at card proportions.
pub const REFERENCE_CARD_HEIGHT_MM: f64 = 53.98;

/// Scalar used when nothing has been persisted yet.
pub const DEFAULT_PIXELS_PER_MM: f64 = 2.7;

/// Em-box to cap-height compensation applied to every optotype.
pub const GLYPH_HEIGHT_CORRECTION: f64 = 1.4;

/// Slot key under which the scalar is stored.
pub const CALIBRATION_KEY: &str = "pixelsPerMm";

/// Default lower bound for the calibration box width.
pub const DEFAULT_MIN_WIDTH_PX: u32 = 50;

/// Scalar produced by matching the on-screen box to a physical card.
#[must_use]
pub fn pixels_per_mm_from_width(width_px: u32) -> f64 {
    f64::from(width_px) / REFERENCE_CARD_WIDTH_MM
}

/// Box width that corresponds to `pixels_per_mm`, rounded to whole pixels.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn width_px_for(pixels_per_mm: f64, min_width_px: u32) -> u32 {
    let raw = (pixels_per_mm * REFERENCE_CARD_WIDTH_MM).round();
    if !raw.is_finite() || raw <= 0.0 {
        return min_width_px;
    }
    (raw.min(f64::from(u32::MAX)) as u32).max(min_width_px)
}

/// Box height for a given width at ID-1 proportions.
#[must_use]
pub fn card_height_px(width_px: u32) -> f64 {
    f64::from(width_px) * (REFERENCE_CARD_HEIGHT_MM / REFERENCE_CARD_WIDTH_MM)
}

/// On-screen font size for an optotype of `height_mm`.
#[must_use]
pub fn font_size_px(height_mm: f64, pixels_per_mm: f64) -> f64 {
    height_mm * pixels_per_mm * GLYPH_HEIGHT_CORRECTION
}

/// Reject scalars that cannot describe a display.
pub fn validate_pixels_per_mm(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AcuityError::InvalidCalibration {
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(AcuityError::InvalidCalibration {
            value,
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// Result of reading the persisted scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A valid scalar was stored.
    Loaded(f64),
    /// Nothing stored yet (first launch).
    Missing,
    /// Something was stored but it is not a usable scalar.
    Invalid { raw: String, details: String },
    /// The slot itself could not be read.
    Unreadable { details: String },
}

impl LoadOutcome {
    /// Effective scalar, substituting `default` for every non-loaded outcome.
    #[must_use]
    pub fn value_or(&self, default: f64) -> f64 {
        match self {
            Self::Loaded(value) => *value,
            Self::Missing | Self::Invalid { .. } | Self::Unreadable { .. } => default,
        }
    }

    /// The stored scalar, if one was loaded.
    #[must_use]
    pub fn loaded(&self) -> Option<f64> {
        match self {
            Self::Loaded(value) => Some(*value),
            _ => None,
        }
    }
}

/// Calibration persistence over any [`KeyValueSlot`].
#[derive(Debug, Clone)]
pub struct CalibrationStore<S> {
    slot: S,
}

impl<S: KeyValueSlot> CalibrationStore<S> {
    #[must_use]
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    /// Read and classify the stored scalar.
    pub fn load_outcome(&self) -> LoadOutcome {
        let raw = match self.slot.get_string(CALIBRATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::Missing,
            Err(e) => {
                return LoadOutcome::Unreadable {
                    details: e.to_string(),
                };
            }
        };

        match raw.trim().parse::<f64>() {
            Ok(value) => match validate_pixels_per_mm(value) {
                Ok(value) => LoadOutcome::Loaded(value),
                Err(e) => LoadOutcome::Invalid {
                    raw,
                    details: e.to_string(),
                },
            },
            Err(e) => LoadOutcome::Invalid {
                raw,
                details: e.to_string(),
            },
        }
    }

    /// The stored scalar, or `None` when absent or unusable.
    pub fn load(&self) -> Option<f64> {
        self.load_outcome().loaded()
    }

    /// Overwrite the stored scalar.
    pub fn save(&mut self, pixels_per_mm: f64) -> Result<()> {
        let value = validate_pixels_per_mm(pixels_per_mm)?;
        self.slot.set_string(CALIBRATION_KEY, &value.to_string())
    }

    /// Forget the stored scalar so the next load falls back to the default.
    pub fn clear(&mut self) -> Result<()> {
        self.slot.remove(CALIBRATION_KEY)
    }
}
