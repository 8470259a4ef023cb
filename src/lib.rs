#![forbid(unsafe_code)]

//! acuity_kiosk: a remote-control driven visual acuity chart.
//!
//! The kiosk shows Snellen, Devanagari, numeric and Landolt C charts at their
//! true physical size. A one-time calibration against a bank card gives the
//! screen's pixels-per-millimetre; every optotype height is derived from it.
//!
//! Layers:
//! 1. **Chart data** ([`charts`]): immutable optotype tables, largest first.
//! 2. **Calibration** ([`calibration`]): the persisted scalar and the card
//!    geometry that produces it.
//! 3. **Navigation** ([`nav`]): a pure reducer plus focus planning and a
//!    virtual cursor, driven by a handful of remote-control keys.
//! 4. **Terminal host** (`tui`, feature `tui`): layout, drawing, effect
//!    execution and the event loop.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use acuity_kiosk::prelude::*;
//!
//! let mut controller = Controller::new(NavModel::default(), Viewport::new(800, 480));
//! controller.handle_key(NavKey::Enter, &NoSurface);
//! assert_eq!(controller.model().view, View::ChartDisplay);
//! ```

pub mod prelude;

pub mod calibration;
pub mod charts;
pub mod core;
pub mod logger;
pub mod nav;
pub mod platform;
#[cfg(feature = "tui")]
pub mod tui;
