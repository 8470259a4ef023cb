//! Terminal host for the kiosk.
//!
//! The navigation core in [`crate::nav`] knows nothing about terminals; this
//! module supplies the surface it runs on: key translation, cell layout and
//! hit testing, drawing, the focus host, effect execution and the event loop.

#![allow(missing_docs)]

pub mod effects;
pub mod input;
pub mod layout;
pub mod render;
pub mod runtime;
pub mod signals;
pub mod terminal_guard;

pub use runtime::{Session, StopReason, run_kiosk};
