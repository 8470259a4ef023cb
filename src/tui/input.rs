//! Terminal key translation: crossterm events to logical [`NavKey`]s.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::config::InputConfig;
use crate::nav::NavKey;

/// Configurable character bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub mouse_toggle: char,
    pub fullscreen: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for KeyBindings {
    fn from(cfg: &InputConfig) -> Self {
        Self {
            mouse_toggle: cfg.mouse_toggle_key,
            fullscreen: cfg.fullscreen_key,
        }
    }
}

/// What the runtime should do with a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    /// Ctrl-C: leave immediately, before the navigation chain sees anything.
    Interrupt,
    Nav(NavKey),
    /// Not a key the kiosk understands; passed to nobody.
    Unmapped,
}

/// Translate one crossterm key event.
#[must_use]
pub fn route_key(event: &KeyEvent, bindings: KeyBindings) -> KeyRoute {
    if event.kind == KeyEventKind::Release {
        return KeyRoute::Unmapped;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c' | 'C') => KeyRoute::Interrupt,
            _ => KeyRoute::Unmapped,
        };
    }

    let key = match event.code {
        KeyCode::Up => NavKey::Up,
        KeyCode::Down => NavKey::Down,
        KeyCode::Left => NavKey::Left,
        KeyCode::Right => NavKey::Right,
        KeyCode::Enter => NavKey::Enter,
        KeyCode::Char(' ') => NavKey::Space,
        KeyCode::Esc => NavKey::Escape,
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&bindings.mouse_toggle) => NavKey::ToggleMouse,
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&bindings.fullscreen) => {
            NavKey::ToggleFullscreen
        }
        KeyCode::Char('q' | 'Q') => NavKey::Quit,
        _ => return KeyRoute::Unmapped,
    };
    KeyRoute::Nav(key)
}
