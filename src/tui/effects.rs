//! Host side of the navigation core: focus bookkeeping and effect execution.
//!
//! Effects run in the order the reducer emitted them. Host failures (a
//! rejected fullscreen request, an unwritable calibration file, a focus
//! target that is not on screen) are logged and surfaced as a status line;
//! none of them changes navigation state or stops the kiosk.

#![allow(missing_docs)]

use crate::calibration::{CalibrationStore, KeyValueSlot};
use crate::core::errors::AcuityError;
use crate::logger::{EventType, JsonlWriter, LogEntry, Severity};
use crate::nav::focus::{self, Enacted, FocusHost};
use crate::nav::model::{Effect, NavMsg};
use crate::nav::targets::Target;
use crate::platform::FullscreenCapability;

use super::layout::SurfaceLayout;

// ──────────────────── focus host ────────────────────

/// Focus state of the terminal surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalFocus {
    focused: Option<Target>,
    mounted: Vec<Target>,
}

impl TerminalFocus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track what the latest layout put on screen. Focus on an element that
    /// is no longer mounted is dropped.
    pub fn remount(&mut self, layout: &SurfaceLayout) {
        self.mounted = layout.buttons.iter().map(|b| b.target).collect();
        if let Some(current) = self.focused
            && !self.mounted.contains(&current)
        {
            self.focused = None;
        }
    }
}

impl FocusHost for TerminalFocus {
    fn focused(&self) -> Option<Target> {
        self.focused
    }

    fn is_mounted(&self, target: Target) -> bool {
        self.mounted.contains(&target)
    }

    fn set_focus(&mut self, target: Option<Target>) {
        self.focused = target;
    }
}

// ──────────────────── executor ────────────────────

/// Result of running one transition's effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Executed {
    /// Host notifications to feed back into the reducer, in order.
    pub follow_ups: Vec<NavMsg>,
    pub quit: bool,
}

/// Runs effects against the calibration store, the fullscreen capability
/// and the session log.
pub struct EffectExecutor<S, F> {
    store: CalibrationStore<S>,
    fullscreen: F,
    log: JsonlWriter,
    status: Option<String>,
}

impl<S: KeyValueSlot, F: FullscreenCapability> EffectExecutor<S, F> {
    #[must_use]
    pub fn new(store: CalibrationStore<S>, fullscreen: F, log: JsonlWriter) -> Self {
        Self {
            store,
            fullscreen,
            log,
            status: None,
        }
    }

    pub fn execute(&mut self, effects: &[Effect], focus_host: &mut TerminalFocus) -> Executed {
        let mut executed = Executed::default();
        for effect in effects {
            match *effect {
                Effect::Focus(_) | Effect::ClearFocus => {
                    if let Enacted::Skipped(target) = focus::enact(focus_host, effect) {
                        self.log.write_entry(
                            &LogEntry::new(EventType::FocusSkipped, Severity::Warning)
                                .target(target)
                                .details("no mounted element"),
                        );
                    }
                }
                Effect::Activate(_) => {}
                Effect::PersistCalibration(value) => self.persist(value),
                Effect::EnterFullscreen => match self.fullscreen.request() {
                    Ok(()) => {
                        self.log.write_entry(&LogEntry::info(EventType::FullscreenEntered));
                        executed.follow_ups.push(NavMsg::FullscreenChanged(true));
                    }
                    Err(e) => {
                        self.log.write_entry(&failure_entry(EventType::FullscreenRejected, &e));
                        self.status = Some(format!("Fullscreen unavailable: {e}"));
                    }
                },
                Effect::ExitFullscreen => match self.fullscreen.exit() {
                    Ok(()) => {
                        self.log.write_entry(&LogEntry::info(EventType::FullscreenExited));
                        executed.follow_ups.push(NavMsg::FullscreenChanged(false));
                    }
                    Err(e) => {
                        self.log.write_entry(&failure_entry(EventType::FullscreenRejected, &e));
                    }
                },
                Effect::Quit => executed.quit = true,
            }
        }
        executed
    }

    fn persist(&mut self, value: f64) {
        match self.store.save(value) {
            Ok(()) => {
                self.log.write_entry(&LogEntry::info(EventType::CalibrationSaved).pixels_per_mm(value));
                self.status = None;
            }
            Err(e) => {
                self.log.write_entry(
                    &failure_entry(EventType::CalibrationPersistFailed, &e).pixels_per_mm(value),
                );
                self.status = Some(format!("Calibration not saved: {e}"));
            }
        }
    }

    /// Latest host failure worth showing, cleared on read.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn log(&mut self) -> &mut JsonlWriter {
        &mut self.log
    }

    #[must_use]
    pub fn store(&self) -> &CalibrationStore<S> {
        &self.store
    }

    #[must_use]
    pub fn fullscreen(&self) -> &F {
        &self.fullscreen
    }
}

/// Host capability failures are warnings; anything else is an error.
fn failure_entry(event: EventType, err: &AcuityError) -> LogEntry {
    let severity = if err.is_host_degradable() {
        Severity::Warning
    } else {
        Severity::Error
    };
    LogEntry::new(event, severity).error(err)
}
