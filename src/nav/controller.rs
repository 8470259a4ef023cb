//! Input dispatcher wrapping the reducer.
//!
//! Keys run through a priority-ordered chain of handlers. Each handler either
//! consumes the key (returning a [`Transition`]) or passes it on:
//!
//! ```text
//! mouse toggle  →  virtual cursor (swallows everything while on)  →  view
//! ```
//!
//! Every consumed transition gets the current focus plan appended, so the
//! effect list always ends with the focus state the host should be in.

use super::cursor::{DEFAULT_CURSOR_STEP_PX, HitTest, VirtualCursor, Viewport};
use super::focus;
use super::input::NavKey;
use super::model::{NavModel, NavMsg, Transition};
use super::update::update;

type Handler = fn(&mut Controller, NavKey, &dyn HitTest) -> Option<Transition>;

/// Handler chain, highest priority first.
const CHAIN: [(&str, Handler); 3] = [
    ("mouse_toggle", mouse_toggle),
    ("virtual_cursor", virtual_cursor),
    ("view", view),
];

/// Owns the navigation model and the virtual cursor overlay.
#[derive(Debug, Clone)]
pub struct Controller {
    model: NavModel,
    cursor: VirtualCursor,
    viewport: Viewport,
    cursor_step_px: u32,
}

impl Controller {
    #[must_use]
    pub fn new(model: NavModel, viewport: Viewport) -> Self {
        Self {
            model,
            cursor: VirtualCursor::default(),
            viewport,
            cursor_step_px: DEFAULT_CURSOR_STEP_PX,
        }
    }

    /// Override the pointer step (pixels per arrow press).
    #[must_use]
    pub const fn with_cursor_step(mut self, step_px: u32) -> Self {
        self.cursor_step_px = step_px;
        self
    }

    #[must_use]
    pub const fn model(&self) -> &NavModel {
        &self.model
    }

    #[must_use]
    pub const fn cursor(&self) -> &VirtualCursor {
        &self.cursor
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Track a surface resize; the pointer is pulled back inside.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.cursor.clamp_to(viewport);
    }

    /// Route one key through the handler chain.
    pub fn handle_key(&mut self, key: NavKey, surface: &dyn HitTest) -> Transition {
        self.route(key, surface).1
    }

    /// Like [`Self::handle_key`], also naming the handler that consumed the
    /// key (`None` when it fell through).
    pub fn route(&mut self, key: NavKey, surface: &dyn HitTest) -> (Option<&'static str>, Transition) {
        for (name, handler) in CHAIN {
            if let Some(transition) = handler(self, key, surface) {
                return (Some(name), self.finish(transition));
            }
        }
        (None, Transition::ignored())
    }

    /// Deliver a non-key message (pointer press, host notification).
    pub fn dispatch(&mut self, msg: NavMsg) -> Transition {
        let transition = update(&mut self.model, msg);
        self.finish(transition)
    }

    fn finish(&self, mut transition: Transition) -> Transition {
        if transition.consumed
            && let Some(effect) = focus::plan(&self.model).effect()
        {
            transition.effects.push(effect);
        }
        transition
    }
}

fn mouse_toggle(ctl: &mut Controller, key: NavKey, _surface: &dyn HitTest) -> Option<Transition> {
    if key != NavKey::ToggleMouse {
        return None;
    }
    ctl.cursor.toggle(ctl.viewport);
    Some(Transition::consumed())
}

fn virtual_cursor(ctl: &mut Controller, key: NavKey, surface: &dyn HitTest) -> Option<Transition> {
    if !ctl.cursor.enabled {
        return None;
    }
    if let Some(direction) = key.direction() {
        ctl.cursor.nudge(direction, ctl.cursor_step_px, ctl.viewport);
        return Some(Transition::consumed());
    }
    if key.is_activation() {
        let Some(target) = ctl.cursor.probe(surface) else {
            return Some(Transition::consumed());
        };
        let mut transition = update(&mut ctl.model, NavMsg::Press(target));
        transition.consumed = true;
        return Some(transition);
    }
    // Everything else is swallowed while the pointer is active.
    Some(Transition::consumed())
}

fn view(ctl: &mut Controller, key: NavKey, _surface: &dyn HitTest) -> Option<Transition> {
    let transition = update(&mut ctl.model, NavMsg::Key(key));
    transition.consumed.then_some(transition)
}
