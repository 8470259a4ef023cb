//! Virtual mouse cursor overlay.
//!
//! A global mode orthogonal to view navigation: while enabled, arrow keys move
//! a pixel-space pointer and activation keys press whatever the rendered
//! surface reports under it.

use super::input::Direction;
use super::targets::Target;

/// Default pointer step per arrow press.
pub const DEFAULT_CURSOR_STEP_PX: u32 = 20;

/// Size of the rendering surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn center(self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    const fn max_x(self) -> u32 {
        self.width.saturating_sub(1)
    }

    const fn max_y(self) -> u32 {
        self.height.saturating_sub(1)
    }
}

/// Pixel-space hit testing against whatever is currently rendered.
pub trait HitTest {
    /// Interactive element under `(x, y)`, if any.
    fn hit(&self, x: u32, y: u32) -> Option<Target>;
}

/// Nothing is clickable. Useful when no surface has been laid out yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSurface;

impl HitTest for NoSurface {
    fn hit(&self, _x: u32, _y: u32) -> Option<Target> {
        None
    }
}

/// Pointer position and mode flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualCursor {
    pub x: u32,
    pub y: u32,
    pub enabled: bool,
}

impl VirtualCursor {
    /// Flip the mode. Turning it on recenters the pointer.
    pub fn toggle(&mut self, viewport: Viewport) {
        self.enabled = !self.enabled;
        if self.enabled {
            (self.x, self.y) = viewport.center();
        }
    }

    /// Move by `step` pixels, clamped to the viewport.
    pub fn nudge(&mut self, direction: Direction, step: u32, viewport: Viewport) {
        match direction {
            Direction::Up => self.y = self.y.saturating_sub(step),
            Direction::Down => self.y = self.y.saturating_add(step),
            Direction::Left => self.x = self.x.saturating_sub(step),
            Direction::Right => self.x = self.x.saturating_add(step),
        }
        self.clamp_to(viewport);
    }

    /// Keep the pointer inside `viewport` (after a resize, for instance).
    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.x = self.x.min(viewport.max_x());
        self.y = self.y.min(viewport.max_y());
    }

    /// Target under the pointer.
    #[must_use]
    pub fn probe(&self, surface: &dyn HitTest) -> Option<Target> {
        surface.hit(self.x, self.y)
    }
}
