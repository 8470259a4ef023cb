//! Remote-control navigation core.
//!
//! Host-independent: keys arrive as [`NavKey`], pointer hits as
//! [`Target`] presses, and every side effect leaves as an [`Effect`]. The
//! terminal host in [`crate::tui`] is one consumer; tests drive the same API
//! without any surface at all.

#![allow(missing_docs)]

pub mod controller;
pub mod cursor;
pub mod focus;
pub mod input;
pub mod model;
pub mod selection;
pub mod targets;
pub mod update;

#[cfg(test)]
mod test_properties;
#[cfg(test)]
mod test_scenarios;

pub use controller::Controller;
pub use cursor::{HitTest, NoSurface, VirtualCursor, Viewport};
pub use focus::{Enacted, FocusHost, FocusPlan};
pub use input::NavKey;
pub use model::{ChartSubMode, Effect, NavModel, NavMsg, NavSettings, Transition, View};
pub use selection::Selection;
pub use targets::{Target, focusable_targets};
pub use update::update;
