//! Focus synchronization: from navigation state to host focus.
//!
//! After every transition the controller asks [`plan`] which element should
//! hold focus and appends the matching [`Effect`]. Hosts apply that effect
//! through [`enact`], which is idempotent and tolerates targets that are not
//! mounted (yet, or any more).
//!
//! Activation goes through [`resolve_activation`], which recomputes the
//! target list at activation time with the same function the plan uses, so
//! an index can never be resolved against a stale list.

use super::model::{ChartSubMode, Effect, NavModel, View};
use super::targets::Target;

/// What the host should do with focus after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPlan {
    /// Focus exactly this element.
    Grant { index: usize, target: Target },
    /// Free chart navigation: make sure no control-bar element keeps focus.
    ClearControls,
    /// The focusable list is empty; leave host focus alone.
    Idle,
}

impl FocusPlan {
    /// The effect that enacts this plan, if any.
    #[must_use]
    pub const fn effect(self) -> Option<Effect> {
        match self {
            Self::Grant { target, .. } => Some(Effect::Focus(target)),
            Self::ClearControls => Some(Effect::ClearFocus),
            Self::Idle => None,
        }
    }
}

/// Clamp `cursor` into `[0, len)`; an empty list pins it to 0.
#[must_use]
pub const fn clamp_index(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if cursor >= len {
        len - 1
    } else {
        cursor
    }
}

/// Re-clamp the current view's focus cursor against its current list.
pub fn reclamp(model: &mut NavModel) {
    let len = model.targets().len();
    let cursor = model.focus_cursor_mut();
    *cursor = clamp_index(*cursor, len);
}

/// Compute the focus plan for `model`.
#[must_use]
pub fn plan(model: &NavModel) -> FocusPlan {
    if model.view == View::ChartDisplay && model.sub_mode == ChartSubMode::Display {
        return FocusPlan::ClearControls;
    }
    let targets = model.targets();
    let index = clamp_index(model.focus_cursor(), targets.len());
    targets
        .get(index)
        .map_or(FocusPlan::Idle, |&target| FocusPlan::Grant { index, target })
}

/// The element an activation key press acts on, if any.
///
/// `None` in free chart navigation, where activation keys drive the chart.
#[must_use]
pub fn resolve_activation(model: &NavModel) -> Option<Target> {
    match plan(model) {
        FocusPlan::Grant { target, .. } => Some(target),
        FocusPlan::ClearControls | FocusPlan::Idle => None,
    }
}

// ──────────────────── host side ────────────────────

/// Host capability for moving input focus between rendered elements.
pub trait FocusHost {
    /// Element that currently holds focus.
    fn focused(&self) -> Option<Target>;

    /// Whether the element for `target` currently exists on the surface.
    fn is_mounted(&self, target: Target) -> bool;

    /// Move focus to `target`, or blur everything on `None`.
    fn set_focus(&mut self, target: Option<Target>);
}

/// What [`enact`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enacted {
    /// The host was already in the requested state.
    Unchanged,
    Granted(Target),
    Cleared,
    /// The target had no mounted element; nothing was focused.
    Skipped(Target),
}

/// Apply a focus effect to `host`. Non-focus effects are `Unchanged`.
pub fn enact<H: FocusHost + ?Sized>(host: &mut H, effect: &Effect) -> Enacted {
    match *effect {
        Effect::Focus(target) => {
            if host.focused() == Some(target) {
                Enacted::Unchanged
            } else if !host.is_mounted(target) {
                Enacted::Skipped(target)
            } else {
                host.set_focus(Some(target));
                Enacted::Granted(target)
            }
        }
        Effect::ClearFocus => match host.focused() {
            Some(current) if current.is_control_bar() => {
                host.set_focus(None);
                Enacted::Cleared
            }
            _ => Enacted::Unchanged,
        },
        _ => Enacted::Unchanged,
    }
}
