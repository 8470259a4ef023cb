//! Fullscreen capability consumed by the effect executor.
//!
//! A request either succeeds, after which the host reports the new state
//! back as a change notification, or fails with
//! [`AcuityError::FullscreenRejected`]. Failures never touch navigation state.

#![allow(missing_docs)]

use crate::core::errors::{AcuityError, Result};

/// Host fullscreen primitive.
pub trait FullscreenCapability {
    /// Ask the host to enter fullscreen.
    fn request(&mut self) -> Result<()>;

    /// Ask the host to leave fullscreen.
    fn exit(&mut self) -> Result<()>;

    /// Current host state, as reported in change notifications.
    fn is_active(&self) -> bool;
}

/// Terminal fullscreen: a chrome-free presentation of the chart.
///
/// The terminal already owns the whole window; "fullscreen" hides the
/// acuity label, legend and control bar. Kiosks that must always show the
/// controls disable it in config, and every request is then rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalFullscreen {
    allowed: bool,
    active: bool,
}

impl TerminalFullscreen {
    #[must_use]
    pub const fn new(allowed: bool) -> Self {
        Self {
            allowed,
            active: false,
        }
    }
}

impl FullscreenCapability for TerminalFullscreen {
    fn request(&mut self) -> Result<()> {
        if !self.allowed {
            return Err(AcuityError::FullscreenRejected {
                details: "fullscreen disabled by display.allow_fullscreen".to_string(),
            });
        }
        self.active = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
