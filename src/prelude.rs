//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use acuity_kiosk::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{AcuityError, Result};

// Charts & calibration
pub use crate::calibration::{
    CalibrationStore, FileSlot, KeyValueSlot, LoadOutcome, MemorySlot, pixels_per_mm_from_width,
};
pub use crate::charts::{ChartLine, ChartVariant};

// Navigation
pub use crate::nav::{
    ChartSubMode, Controller, Effect, FocusHost, HitTest, NavKey, NavModel, NavMsg, NavSettings,
    NoSurface, Selection, Target, Transition, View, Viewport, focusable_targets,
};

// Host capabilities
pub use crate::platform::{FullscreenCapability, TerminalFullscreen};

// Logging
pub use crate::logger::{EventType, JsonlWriter, LogEntry};
